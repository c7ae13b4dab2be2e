//! Headless demo runner
//!
//! Drives the engine with a simulated 60 Hz clock and an auto-clicker that
//! aims at whatever is on screen, logging what a real host would render.
//! Useful for eyeballing engine behavior without a front end.

use skeet::consts::GUARD_INTERVAL_MS;
use skeet::{
    Assets, EndReason, Engine, EngineHooks, GameConfig, GameObject, ImageHandle, Phase, PlayArea,
    SessionHistory, SessionRecord, SoundCue,
};

/// Hooks that narrate the session to the log
#[derive(Default)]
struct LogHooks {
    history: SessionHistory,
}

impl EngineHooks for LogHooks {
    fn score_changed(&mut self, score: i32) {
        log::info!("score: {score}");
    }

    fn timer_updated(&mut self, text: &str) {
        log::trace!("timer: {text}");
    }

    fn caption_word(&mut self, word: &str) {
        log::info!("caption += {word:?}");
    }

    fn play_sound(&mut self, cue: SoundCue) {
        log::debug!("sound: {cue:?}");
    }

    fn session_over(&mut self, reason: EndReason, record: &SessionRecord) {
        log::info!("session over ({reason:?})");
        self.history.push(record.clone());
    }

    fn render_frame(&mut self, objects: &[GameObject], _started: bool) {
        log::trace!("frame with {} objects", objects.len());
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig {
        spawn_rate: 120.0,
        ratio: 0.8,
        miss_penalty_enabled: true,
        time_limit_enabled: true,
        time_limit: 30,
        target_words: "pop fizz bang whiz".to_string(),
        ..GameConfig::default()
    };
    let assets = Assets::new(vec![ImageHandle(0), ImageHandle(1)]);
    let area = PlayArea::new(800.0, 600.0);
    let mut engine = Engine::new(config, assets, LogHooks::default(), 0xC0FFEE);

    engine.start(0.0);

    let frame_ms = 1000.0 / 60.0;
    let mut now = 0.0;
    let mut next_guard = GUARD_INTERVAL_MS;
    let mut next_click = 400.0;

    while engine.phase() != Phase::Idle {
        now += frame_ms;
        engine.tick(now, area);

        if now >= next_guard {
            engine.guard_tick(now);
            next_guard += GUARD_INTERVAL_MS;
        }

        // Clumsy player: clicks the play-area center every 400ms and
        // whatever drifts through it gets hit
        if now >= next_click {
            engine.handle_pointer(now, area.width / 2.0, area.height / 2.0);
            next_click += 400.0;
        }
    }

    let hooks = engine.into_hooks();
    if let Some(last) = hooks.history.sessions.last() {
        match serde_json::to_string_pretty(last) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("failed to serialize session record: {err}"),
        }
    }
}
