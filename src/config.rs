//! Game configuration
//!
//! The host owns a live `GameConfig` that a settings panel may edit at any
//! time. The engine clones it into a per-session snapshot at `start()`, so
//! mid-session edits never change in-flight physics; they apply to the next
//! session. Persistence of the live config is the host's job.

use serde::{Deserialize, Serialize};

/// What a friendly object carries on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FriendlyMode {
    /// Friendly objects carry an image handle (the instant-loss hazard)
    #[default]
    Images,
    /// Friendly objects carry a word from `friendly_words`
    Words,
    /// Fair coin per spawn between the two (bare shape if the chosen
    /// resource list is empty)
    Both,
}

/// Tunable gameplay parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Speed multiplier applied to the base object speed
    pub speed: f32,
    /// Spawn cadence in objects per minute
    pub spawn_rate: f32,
    /// Base object radius in pixels
    pub object_size: f32,
    /// Radius spread around `object_size`, in `[0, 1)`
    pub size_variation: f32,
    /// Probability a spawned object is a target, in `[0, 1]`
    pub ratio: f32,
    /// Lateral spread of the trajectory bias point, in `[0, 1]`
    pub randomness: f32,

    /// Deduct a point for every target that escapes the play area
    pub miss_penalty_enabled: bool,
    pub time_limit_enabled: bool,
    /// Session time limit in seconds
    pub time_limit: u32,
    pub score_limit_enabled: bool,
    /// Session ends once the score reaches this value
    pub score_limit: i32,

    pub friendly_mode: FriendlyMode,
    /// Whitespace-delimited word pool for targets
    pub target_words: String,
    /// Whitespace-delimited word pool for friendlies
    pub friendly_words: String,
    pub use_random_colors: bool,
    pub target_color: String,
    pub friendly_color: String,

    /// Name stamped on the session record
    pub player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            spawn_rate: 60.0,
            object_size: 30.0,
            size_variation: 0.3,
            ratio: 0.7,
            randomness: 0.5,
            miss_penalty_enabled: false,
            time_limit_enabled: false,
            time_limit: 60,
            score_limit_enabled: false,
            score_limit: 50,
            friendly_mode: FriendlyMode::Images,
            target_words: String::new(),
            friendly_words: String::new(),
            use_random_colors: true,
            target_color: "#ff4444".to_string(),
            friendly_color: "#44ff44".to_string(),
            player_name: "player 1".to_string(),
        }
    }
}

impl GameConfig {
    /// Milliseconds between spawns, or `None` when the rate cannot produce
    /// a meaningful cadence (`spawn_rate <= 0` means never spawn)
    pub fn spawn_interval_ms(&self) -> Option<f64> {
        if self.spawn_rate > 0.0 {
            Some((60.0 / self.spawn_rate as f64) * 1000.0)
        } else {
            None
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Partial update merged into the live config by `Engine::set_config`.
/// Unset fields leave the current value alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub speed: Option<f32>,
    pub spawn_rate: Option<f32>,
    pub object_size: Option<f32>,
    pub size_variation: Option<f32>,
    pub ratio: Option<f32>,
    pub randomness: Option<f32>,
    pub miss_penalty_enabled: Option<bool>,
    pub time_limit_enabled: Option<bool>,
    pub time_limit: Option<u32>,
    pub score_limit_enabled: Option<bool>,
    pub score_limit: Option<i32>,
    pub friendly_mode: Option<FriendlyMode>,
    pub target_words: Option<String>,
    pub friendly_words: Option<String>,
    pub use_random_colors: Option<bool>,
    pub target_color: Option<String>,
    pub friendly_color: Option<String>,
    pub player_name: Option<String>,
}

impl ConfigPatch {
    pub fn apply_to(&self, cfg: &mut GameConfig) {
        macro_rules! merge {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(v) = &self.$field {
                    cfg.$field = v.clone();
                })+
            };
        }
        merge!(
            speed,
            spawn_rate,
            object_size,
            size_variation,
            ratio,
            randomness,
            miss_penalty_enabled,
            time_limit_enabled,
            time_limit,
            score_limit_enabled,
            score_limit,
            friendly_mode,
            target_words,
            friendly_words,
            use_random_colors,
            target_color,
            friendly_color,
            player_name,
        );
    }
}
