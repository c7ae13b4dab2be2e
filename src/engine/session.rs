//! Session state machine and clock pair
//!
//! The engine is single-threaded and host-driven: the host calls `tick`
//! from its render loop, `guard_tick` from a coarse interval while a time
//! limit is set, and the pointer/lifecycle operations from input events.
//! Every operation takes `now_ms` from the host clock, so simulated time
//! works the same as wall-clock time.
//!
//! End conditions enforced here and in the physics pass: friendly-image
//! hit, score below zero, time limit (frame clock and guard clock), score
//! ceiling, manual stop.

use chrono::Utc;
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision;
use super::spawn;
use super::state::{EndReason, EngineSnapshot, GameObject, ObjectKind, Phase, PlayArea};
use crate::assets::Assets;
use crate::config::{ConfigPatch, GameConfig};
use crate::consts::MAX_FRAME_DELTA_MS;
use crate::hooks::{EngineHooks, SoundCue};
use crate::stats;

/// One engine instance holds everything a session needs; no globals.
pub struct Engine<H: EngineHooks> {
    /// Host-facing config; edits land here and apply on the next `start()`
    live_config: GameConfig,
    /// Per-session snapshot; physics and spawning read only this
    pub(crate) config: GameConfig,
    assets: Assets,
    pub(crate) hooks: H,
    rng: Pcg32,

    pub(crate) phase: Phase,
    pub(crate) objects: Vec<GameObject>,
    pub(crate) score: i32,
    pub(crate) hits: u32,
    misses: u32,
    clicks: u32,
    pub(crate) targets_penalized: u32,

    game_start: f64,
    total_paused: f64,
    pause_start: f64,
    last_spawn: Option<f64>,
    last_timestamp: Option<f64>,

    guard_armed: bool,
    end_reason: Option<EndReason>,
}

impl<H: EngineHooks> Engine<H> {
    /// Create an engine around the host's live config, asset bundle and
    /// hooks. The seed fixes every random draw for the engine's lifetime.
    pub fn new(config: GameConfig, assets: Assets, hooks: H, seed: u64) -> Self {
        Self {
            config: config.clone(),
            live_config: config,
            assets,
            hooks,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Idle,
            objects: Vec::new(),
            score: 0,
            hits: 0,
            misses: 0,
            clicks: 0,
            targets_penalized: 0,
            game_start: 0.0,
            total_paused: 0.0,
            pause_start: 0.0,
            last_spawn: None,
            last_timestamp: None,
            guard_armed: false,
            end_reason: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Diagnostic snapshot; callers get a copy, never internals
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            phase: self.phase,
            score: self.score,
            hits: self.hits,
            misses: self.misses,
            clicks: self.clicks,
            targets_penalized: self.targets_penalized,
            object_count: self.objects.len(),
            end_reason: self.end_reason,
        }
    }

    /// Merge a patch into the live config. The running session keeps its
    /// snapshot; the next `start()` observes the edit.
    pub fn set_config(&mut self, patch: &ConfigPatch) {
        patch.apply_to(&mut self.live_config);
    }

    pub fn set_assets(&mut self, next: Assets) {
        self.assets = next;
    }

    /// Consume the engine and hand back the hooks; hosts that accumulate
    /// state inside their hooks retrieve it this way
    pub fn into_hooks(self) -> H {
        self.hooks
    }

    /// Begin a session. When paused this is a `resume()`; when already
    /// running it restarts with a fresh snapshot and counters.
    pub fn start(&mut self, now_ms: f64) {
        if self.phase == Phase::Paused {
            return self.resume(now_ms);
        }
        self.config = self.live_config.clone();
        self.phase = Phase::Running;
        self.objects.clear();
        self.score = 0;
        self.hits = 0;
        self.misses = 0;
        self.clicks = 0;
        self.targets_penalized = 0;
        self.game_start = now_ms;
        self.total_paused = 0.0;
        self.pause_start = 0.0;
        self.last_timestamp = None;
        // None forces a spawn on the first tick
        self.last_spawn = None;
        self.end_reason = None;
        self.guard_armed = self.config.time_limit_enabled;
        log::info!(
            "session started (spawn {}/min, guard {})",
            self.config.spawn_rate,
            if self.guard_armed { "armed" } else { "off" }
        );
    }

    /// Freeze simulation time. No-op unless running.
    pub fn pause(&mut self, now_ms: f64) {
        if self.phase != Phase::Running {
            return;
        }
        self.pause_start = now_ms;
        self.phase = Phase::Paused;
        log::debug!("session paused");
    }

    /// Continue a paused session. No-op unless paused.
    pub fn resume(&mut self, now_ms: f64) {
        if self.phase != Phase::Paused {
            return;
        }
        self.total_paused += now_ms - self.pause_start;
        // Fresh delta anchor so the first post-resume frame isn't oversized
        self.last_timestamp = None;
        self.phase = Phase::Running;
        log::debug!("session resumed");
    }

    /// End the session: report the record, then reset to idle. Safe to call
    /// repeatedly and from inside a tick; only the first call reports.
    pub fn stop(&mut self, now_ms: f64, reason: EndReason) {
        if self.phase == Phase::Idle {
            return;
        }
        self.guard_armed = false;

        let pause_tail = if self.phase == Phase::Paused {
            now_ms - self.pause_start
        } else {
            0.0
        };
        let duration_ms = now_ms - self.game_start - self.total_paused - pause_tail;

        let record = stats::finalize(
            stats::SessionCounters {
                score: self.score,
                hits: self.hits,
                misses: self.misses,
                clicks: self.clicks,
                targets_penalized: self.targets_penalized,
            },
            duration_ms,
            reason,
            &self.config.player_name,
            Utc::now(),
        );
        log::info!(
            "session over: {:?}, score {}, {}s",
            reason,
            record.score,
            record.game_duration_seconds
        );

        self.end_reason = Some(reason);
        self.hooks.session_over(reason, &record);

        // Reset after reporting so the record sees the final counters
        self.phase = Phase::Idle;
        self.objects.clear();
        self.score = 0;
        self.hits = 0;
        self.misses = 0;
        self.clicks = 0;
        self.targets_penalized = 0;
        self.last_timestamp = None;
        self.last_spawn = None;
        self.hooks.score_changed(0);
        self.hooks.timer_updated("00:00");
    }

    /// One frame of the render-driven loop: spawn, advance, draw, check the
    /// time limit. Re-entrant stops (score went negative mid-pass) abort
    /// the remainder of the frame.
    pub fn tick(&mut self, now_ms: f64, area: PlayArea) {
        match self.phase {
            Phase::Idle => {
                self.hooks.timer_updated("00:00");
                return;
            }
            Phase::Paused => return,
            Phase::Running => {}
        }

        let dt = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.maybe_spawn(now_ms, area);
        self.advance_and_cull(now_ms, dt, area);
        if self.phase != Phase::Running {
            return;
        }

        self.hooks.render_frame(&self.objects, true);
        self.update_timer(now_ms);
    }

    /// Frame-independent time-limit check. The host drives this from a
    /// coarse interval (`consts::GUARD_INTERVAL_MS`) so the limit holds even
    /// when the render loop is throttled or suspended. Armed at `start()`
    /// when a limit is set, disarmed by `stop()`, silent while paused.
    pub fn guard_tick(&mut self, now_ms: f64) {
        if !self.guard_armed || self.phase != Phase::Running {
            return;
        }
        if self.elapsed_whole_seconds(now_ms) >= u64::from(self.config.time_limit) {
            log::debug!("guard clock hit the time limit");
            self.stop(now_ms, EndReason::TimeLimit);
        }
    }

    /// Resolve a click/tap. Counts the click, removes the topmost object
    /// under the pointer, applies scoring and end conditions.
    pub fn handle_pointer(&mut self, now_ms: f64, x: f32, y: f32) {
        if self.phase != Phase::Running {
            return;
        }
        self.clicks += 1;

        let Some(idx) = collision::topmost_hit(&self.objects, Vec2::new(x, y)) else {
            self.misses += 1;
            return;
        };
        let obj = self.objects.remove(idx);
        self.hits += 1;

        if obj.hazard {
            self.hooks.play_sound(SoundCue::HazardHit);
            self.stop(now_ms, EndReason::FriendlyShot);
            return;
        }

        if let Some(word) = &obj.word {
            self.hooks.caption_word(word);
        }
        match obj.kind {
            ObjectKind::Target => self.hooks.play_sound(SoundCue::TargetHit),
            ObjectKind::Friendly if obj.word.is_some() => {
                self.hooks.play_sound(SoundCue::FriendlyHit)
            }
            ObjectKind::Friendly => {}
        }

        self.score += obj.points;
        self.hooks.score_changed(self.score);
        if self.score < 0 {
            self.stop(now_ms, EndReason::ScoreNegative);
        } else if self.config.score_limit_enabled && self.score >= self.config.score_limit {
            self.stop(now_ms, EndReason::ScoreLimit);
        }
    }

    fn maybe_spawn(&mut self, now_ms: f64, area: PlayArea) {
        let Some(interval) = self.config.spawn_interval_ms() else {
            return;
        };
        if let Some(last) = self.last_spawn {
            if now_ms - last < interval {
                return;
            }
        }
        let obj = spawn::spawn_object(&self.config, &mut self.rng, area, &self.assets);
        log::trace!("spawned {:?} at {:?}", obj.kind, obj.pos);
        self.objects.push(obj);
        self.last_spawn = Some(now_ms);
    }

    /// Frame clock: timer display every tick plus the in-band limit check.
    /// Uses the same elapsed formula as the guard clock, so the two never
    /// disagree about when the limit was reached.
    fn update_timer(&mut self, now_ms: f64) {
        let elapsed = self.elapsed_ms(now_ms);
        self.hooks.timer_updated(&format_clock(elapsed));
        if self.config.time_limit_enabled
            && self.phase == Phase::Running
            && self.elapsed_whole_seconds(now_ms) >= u64::from(self.config.time_limit)
        {
            self.stop(now_ms, EndReason::TimeLimit);
        }
    }

    /// Simulation time excluding pauses; frozen at `pause_start` while paused
    fn elapsed_ms(&self, now_ms: f64) -> f64 {
        let anchor = if self.phase == Phase::Paused {
            self.pause_start
        } else {
            now_ms
        };
        (anchor - self.game_start - self.total_paused).max(0.0)
    }

    fn elapsed_whole_seconds(&self, now_ms: f64) -> u64 {
        (self.elapsed_ms(now_ms) / 1000.0).floor() as u64
    }
}

/// `mm:ss` timer text
fn format_clock(elapsed_ms: f64) -> String {
    let total_secs = (elapsed_ms / 1000.0).floor() as u64;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageHandle;
    use crate::config::FriendlyMode;
    use crate::engine::state::TrajectoryPath;
    use crate::stats::SessionRecord;

    const AREA: PlayArea = PlayArea {
        width: 800.0,
        height: 600.0,
    };

    /// Records every hook invocation for assertions
    #[derive(Default)]
    struct Recorder {
        scores: Vec<i32>,
        timer_texts: Vec<String>,
        captions: Vec<String>,
        sounds: Vec<SoundCue>,
        stops: Vec<(EndReason, SessionRecord)>,
        frames: usize,
    }

    impl EngineHooks for Recorder {
        fn score_changed(&mut self, score: i32) {
            self.scores.push(score);
        }
        fn timer_updated(&mut self, text: &str) {
            self.timer_texts.push(text.to_string());
        }
        fn caption_word(&mut self, word: &str) {
            self.captions.push(word.to_string());
        }
        fn play_sound(&mut self, cue: SoundCue) {
            self.sounds.push(cue);
        }
        fn session_over(&mut self, reason: EndReason, record: &SessionRecord) {
            self.stops.push((reason, record.clone()));
        }
        fn render_frame(&mut self, _objects: &[GameObject], _started: bool) {
            self.frames += 1;
        }
    }

    fn engine(config: GameConfig) -> Engine<Recorder> {
        Engine::new(config, Assets::default(), Recorder::default(), 42)
    }

    fn still_target(x: f32, y: f32) -> GameObject {
        GameObject {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            kind: ObjectKind::Target,
            radius: 20.0,
            points: 1,
            word: None,
            image: None,
            color: "#ffffff".to_string(),
            hazard: false,
            path: TrajectoryPath {
                start: Vec2::ZERO,
                end: Vec2::ZERO,
            },
        }
    }

    fn quiet_config() -> GameConfig {
        // No spawning, so tests place objects by hand
        GameConfig {
            spawn_rate: 0.0,
            ..GameConfig::default()
        }
    }

    #[test]
    fn stop_is_idempotent() {
        let mut eng = engine(quiet_config());
        eng.start(0.0);
        eng.stop(1_000.0, EndReason::StopButton);
        eng.stop(1_000.0, EndReason::StopButton);
        assert_eq!(eng.phase(), Phase::Idle);
        assert_eq!(eng.hooks.stops.len(), 1, "exactly one session_over");
        assert_eq!(eng.hooks.stops[0].0, EndReason::StopButton);
    }

    #[test]
    fn stop_when_idle_is_a_no_op() {
        let mut eng = engine(quiet_config());
        eng.stop(5.0, EndReason::Manual);
        assert!(eng.hooks.stops.is_empty());
    }

    #[test]
    fn pause_preserves_elapsed_time() {
        let mut eng = engine(quiet_config());
        eng.start(0.0);
        eng.tick(10_000.0, AREA);
        eng.pause(10_000.0);
        // 5 simulated seconds pass while paused; nothing moves
        eng.tick(15_000.0, AREA);
        eng.resume(15_000.0);
        eng.tick(17_000.0, AREA);
        assert_eq!(eng.hooks.timer_texts.last().map(String::as_str), Some("00:12"));
    }

    #[test]
    fn pause_and_resume_guard_phases() {
        let mut eng = engine(quiet_config());
        eng.pause(0.0); // idle: no-op
        assert_eq!(eng.phase(), Phase::Idle);
        eng.start(0.0);
        eng.resume(1.0); // running: no-op
        assert_eq!(eng.phase(), Phase::Running);
        eng.pause(2.0);
        eng.pause(3.0); // already paused: no-op
        assert_eq!(eng.phase(), Phase::Paused);
    }

    #[test]
    fn start_while_paused_resumes_without_reset() {
        let mut eng = engine(quiet_config());
        eng.start(0.0);
        eng.objects.push(still_target(100.0, 100.0));
        eng.handle_pointer(1.0, 100.0, 100.0);
        assert_eq!(eng.score(), 1);
        eng.pause(2.0);
        eng.start(5.0);
        assert_eq!(eng.phase(), Phase::Running);
        assert_eq!(eng.score(), 1, "resume keeps the session counters");
    }

    #[test]
    fn friendly_image_hit_is_instant_loss_at_any_score() {
        let mut cfg = quiet_config();
        cfg.ratio = 0.0;
        cfg.friendly_mode = FriendlyMode::Images;
        let mut eng = Engine::new(
            cfg,
            Assets::new(vec![ImageHandle(1)]),
            Recorder::default(),
            7,
        );
        eng.start(0.0);
        // Rack up a healthy score first
        for _ in 0..10 {
            eng.objects.push(still_target(100.0, 100.0));
            eng.handle_pointer(1.0, 100.0, 100.0);
        }
        assert_eq!(eng.score(), 10);

        let mut hazard = still_target(300.0, 300.0);
        hazard.kind = ObjectKind::Friendly;
        hazard.points = -1;
        hazard.image = Some(ImageHandle(1));
        hazard.hazard = true;
        eng.objects.push(hazard);

        eng.handle_pointer(2.0, 300.0, 300.0);
        assert_eq!(eng.phase(), Phase::Idle);
        assert_eq!(eng.snapshot().end_reason, Some(EndReason::FriendlyShot));
        assert_eq!(eng.hooks.sounds.last(), Some(&SoundCue::HazardHit));
        let (reason, record) = eng.hooks.stops.last().unwrap();
        assert_eq!(*reason, EndReason::FriendlyShot);
        assert_eq!(record.score, 10, "instant loss regardless of score");
    }

    #[test]
    fn escaped_target_penalty_can_end_the_session() {
        let mut cfg = quiet_config();
        cfg.miss_penalty_enabled = true;
        let mut eng = engine(cfg);
        eng.start(0.0);
        // Already past the cull margin; first tick removes and penalizes it
        let mut runaway = still_target(-500.0, 300.0);
        runaway.points = 1;
        eng.objects.push(runaway);
        eng.tick(16.0, AREA);

        assert_eq!(eng.phase(), Phase::Idle);
        let (reason, record) = eng.hooks.stops.last().unwrap();
        assert_eq!(*reason, EndReason::ScoreNegative);
        assert_eq!(record.score, -1);
        assert_eq!(record.targets_penalized, 1);
    }

    #[test]
    fn escaped_friendly_is_culled_without_penalty() {
        let mut cfg = quiet_config();
        cfg.miss_penalty_enabled = true;
        let mut eng = engine(cfg);
        eng.start(0.0);
        let mut fugitive = still_target(-500.0, 300.0);
        fugitive.kind = ObjectKind::Friendly;
        fugitive.points = -1;
        eng.objects.push(fugitive);
        eng.tick(16.0, AREA);
        assert_eq!(eng.phase(), Phase::Running);
        assert_eq!(eng.score(), 0);
        assert_eq!(eng.snapshot().object_count, 0);
    }

    #[test]
    fn score_limit_ends_the_session_at_the_ceiling() {
        let mut cfg = quiet_config();
        cfg.ratio = 1.0;
        cfg.score_limit_enabled = true;
        cfg.score_limit = 5;
        let mut eng = engine(cfg);
        eng.start(0.0);
        for i in 0..5 {
            eng.objects.push(still_target(100.0, 100.0));
            eng.handle_pointer(i as f64, 100.0, 100.0);
        }
        assert_eq!(eng.phase(), Phase::Idle);
        let (reason, record) = eng.hooks.stops.last().unwrap();
        assert_eq!(*reason, EndReason::ScoreLimit);
        assert_eq!(record.score, 5);
        assert_eq!(record.hits, 5);
    }

    #[test]
    fn guard_clock_fires_without_frame_ticks() {
        let mut cfg = quiet_config();
        cfg.time_limit_enabled = true;
        cfg.time_limit = 5;
        let mut eng = engine(cfg);
        eng.start(0.0);
        // Frame clock starved: no tick() at all
        eng.guard_tick(4_900.0);
        assert_eq!(eng.phase(), Phase::Running);
        eng.guard_tick(5_100.0);
        assert_eq!(eng.phase(), Phase::Idle);
        assert_eq!(eng.hooks.stops.last().unwrap().0, EndReason::TimeLimit);
    }

    #[test]
    fn guard_clock_skips_while_paused_and_dies_with_stop() {
        let mut cfg = quiet_config();
        cfg.time_limit_enabled = true;
        cfg.time_limit = 5;
        let mut eng = engine(cfg);
        eng.start(0.0);
        eng.pause(1_000.0);
        eng.guard_tick(20_000.0);
        assert_eq!(eng.phase(), Phase::Paused, "guard must not fire while paused");
        eng.stop(20_000.0, EndReason::StopButton);
        // A late interval firing after stop cannot re-stop
        eng.guard_tick(30_000.0);
        assert_eq!(eng.hooks.stops.len(), 1);
    }

    #[test]
    fn frame_clock_also_enforces_the_limit() {
        let mut cfg = quiet_config();
        cfg.time_limit_enabled = true;
        cfg.time_limit = 2;
        let mut eng = engine(cfg);
        eng.start(0.0);
        eng.tick(1_000.0, AREA);
        assert_eq!(eng.phase(), Phase::Running);
        eng.tick(2_050.0, AREA);
        assert_eq!(eng.phase(), Phase::Idle);
        assert_eq!(eng.hooks.stops.last().unwrap().0, EndReason::TimeLimit);
    }

    #[test]
    fn topmost_object_wins_the_pointer() {
        let mut eng = engine(quiet_config());
        eng.start(0.0);
        let mut under = still_target(200.0, 200.0);
        under.word = Some("under".to_string());
        let mut over = still_target(205.0, 200.0);
        over.word = Some("over".to_string());
        eng.objects.push(under);
        eng.objects.push(over);

        eng.handle_pointer(1.0, 202.0, 200.0);
        assert_eq!(eng.hooks.captions, vec!["over".to_string()]);
        assert_eq!(eng.snapshot().object_count, 1);
        assert_eq!(eng.objects[0].word.as_deref(), Some("under"));
    }

    #[test]
    fn pointer_miss_counts_and_pointer_is_ignored_when_idle() {
        let mut eng = engine(quiet_config());
        eng.handle_pointer(0.0, 10.0, 10.0); // idle: ignored entirely
        eng.start(0.0);
        eng.handle_pointer(1.0, 10.0, 10.0);
        let snap = eng.snapshot();
        assert_eq!(snap.clicks, 1);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.hits, 0);
    }

    #[test]
    fn live_config_edits_wait_for_the_next_start() {
        let mut eng = engine(GameConfig::default());
        eng.start(0.0);
        eng.tick(0.0, AREA); // immediate first spawn
        let v1 = eng.objects[0].vel.length();

        eng.set_config(&ConfigPatch {
            speed: Some(5.0),
            ..Default::default()
        });
        // Mid-session: snapshot still at speed 1
        assert_eq!(eng.config.speed, 1.0);
        eng.stop(10.0, EndReason::Manual);

        eng.start(100.0);
        eng.tick(100.0, AREA);
        let v2 = eng.objects[0].vel.length();
        assert!((v2 / v1 - 5.0).abs() < 1e-3, "next session sees the edit");
    }

    #[test]
    fn first_tick_spawns_immediately_and_respects_cadence() {
        let mut cfg = GameConfig::default();
        cfg.spawn_rate = 60.0; // one per second
        let mut eng = engine(cfg);
        eng.start(0.0);
        eng.tick(0.0, AREA);
        assert_eq!(eng.snapshot().object_count, 1);
        eng.tick(500.0, AREA);
        assert_eq!(eng.snapshot().object_count, 1, "cadence not yet due");
        eng.tick(1_000.0, AREA);
        assert_eq!(eng.snapshot().object_count, 2);
    }

    #[test]
    fn stop_resets_outward_displays() {
        let mut eng = engine(quiet_config());
        eng.start(0.0);
        eng.objects.push(still_target(100.0, 100.0));
        eng.handle_pointer(1.0, 100.0, 100.0);
        eng.stop(2_000.0, EndReason::Manual);
        assert_eq!(eng.hooks.scores.last(), Some(&0));
        assert_eq!(eng.hooks.timer_texts.last().map(String::as_str), Some("00:00"));
        assert_eq!(eng.snapshot().object_count, 0);
    }

    #[test]
    fn idle_tick_forces_zero_timer_and_no_frames() {
        let mut eng = engine(quiet_config());
        eng.tick(123.0, AREA);
        assert_eq!(eng.hooks.timer_texts, vec!["00:00".to_string()]);
        assert_eq!(eng.hooks.frames, 0);
    }

    #[test]
    fn frame_delta_is_clamped_after_a_stall() {
        let mut eng = engine(quiet_config());
        eng.start(0.0);
        let mut obj = still_target(400.0, 300.0);
        obj.vel = Vec2::new(1.0, 0.0); // 1 px/ms
        eng.objects.push(obj);
        eng.tick(0.0, AREA);
        // 10-second stall still advances at most MAX_FRAME_DELTA_MS worth
        eng.tick(10_000.0, AREA);
        let x = eng.objects[0].pos.x;
        assert!((x - 450.0).abs() < 1e-3, "expected 50px step, got {}", x - 400.0);
    }

    #[test]
    fn clock_formatting_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(999.0), "00:00");
        assert_eq!(format_clock(61_000.0), "01:01");
        assert_eq!(format_clock(600_000.0), "10:00");
    }
}
