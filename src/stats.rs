//! Session records, history and rank calculators
//!
//! The finalizer turns raw counters plus a duration into the immutable
//! record handed to the host at `stop()`. The history is a host-side
//! accumulator over completed sessions with 1-based rank lookups; storage
//! of the JSON it produces is the host's job.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::EndReason;

/// Raw per-session counters at the moment of `stop()`
#[derive(Debug, Clone, Copy)]
pub struct SessionCounters {
    pub score: i32,
    pub hits: u32,
    pub misses: u32,
    pub clicks: u32,
    pub targets_penalized: u32,
}

/// Immutable summary of one completed session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub player_name: String,
    pub score: i32,
    pub game_duration_seconds: u64,
    pub hits: u32,
    pub misses: u32,
    pub clicks: u32,
    pub targets_penalized: u32,
    pub game_end_reason: EndReason,
    /// ISO-8601, UTC
    pub game_end_time: String,
    /// Effective hits (hits minus penalized targets) per minute, 2 decimals
    pub average_hit_rate: f64,
    /// Hits per click as a percentage, 2 decimals
    pub accuracy: f64,
}

/// Round half away from zero to 2 decimal places
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Convert counters and elapsed time into a session record. Zero-duration
/// and zero-click sessions yield 0 rates rather than NaN or infinity.
pub fn finalize(
    counters: SessionCounters,
    duration_ms: f64,
    reason: EndReason,
    player_name: &str,
    end_time: DateTime<Utc>,
) -> SessionRecord {
    let duration_seconds = (duration_ms.max(0.0) / 1000.0).floor() as u64;
    let duration_minutes = duration_seconds as f64 / 60.0;

    let effective_hits = f64::from(counters.hits) - f64::from(counters.targets_penalized);
    let average_hit_rate = if duration_minutes > 0.0 {
        effective_hits / duration_minutes
    } else {
        0.0
    };
    let accuracy = if counters.clicks > 0 {
        f64::from(counters.hits) / f64::from(counters.clicks) * 100.0
    } else {
        0.0
    };

    SessionRecord {
        player_name: player_name.to_string(),
        score: counters.score,
        game_duration_seconds: duration_seconds,
        hits: counters.hits,
        misses: counters.misses,
        clicks: counters.clicks,
        targets_penalized: counters.targets_penalized,
        game_end_reason: reason,
        game_end_time: end_time.to_rfc3339_opts(SecondsFormat::Millis, true),
        average_hit_rate: round2(average_hit_rate),
        accuracy: round2(accuracy),
    }
}

/// Accumulated results across sessions, with rank lookups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionHistory {
    pub sessions: Vec<SessionRecord>,
    pub total_hits: u64,
    pub total_misses: u64,
    pub total_targets_penalized: u64,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SessionRecord) {
        self.total_hits += u64::from(record.hits);
        self.total_misses += u64::from(record.misses);
        self.total_targets_penalized += u64::from(record.targets_penalized);
        self.sessions.push(record);
    }

    /// 1-based rank of a score among all sessions, higher is better.
    /// Duplicates share the best rank; an absent value ranks 0.
    pub fn score_rank(&self, score: i32) -> usize {
        let mut scores: Vec<i32> = self.sessions.iter().map(|s| s.score).collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.iter().position(|&s| s == score).map_or(0, |i| i + 1)
    }

    /// 1-based rank of an average hit rate; see `score_rank`
    pub fn rate_rank(&self, rate: f64) -> usize {
        rank_desc(self.sessions.iter().map(|s| s.average_hit_rate), rate)
    }

    /// 1-based rank of an accuracy percentage; see `score_rank`
    pub fn accuracy_rank(&self, accuracy: f64) -> usize {
        rank_desc(self.sessions.iter().map(|s| s.accuracy), accuracy)
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn rank_desc(values: impl Iterator<Item = f64>, needle: f64) -> usize {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_unstable_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    sorted
        .iter()
        .position(|&v| v == needle)
        .map_or(0, |i| i + 1)
}
