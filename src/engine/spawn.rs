//! Object spawning
//!
//! One object per cadence interval: pick a type, place it just outside a
//! random edge, aim it at a jittered center point, and attach the visual
//! payload the config asks for.

use glam::Vec2;
use rand::Rng;

use super::state::{GameObject, ObjectKind, PlayArea, TrajectoryPath};
use crate::assets::Assets;
use crate::config::{FriendlyMode, GameConfig};
use crate::consts::{BASE_SPEED, PALETTE};

/// Build one freshly spawned object
pub(crate) fn spawn_object<R: Rng>(
    cfg: &GameConfig,
    rng: &mut R,
    area: PlayArea,
    assets: &Assets,
) -> GameObject {
    let kind = if rng.random_bool(cfg.ratio.clamp(0.0, 1.0) as f64) {
        ObjectKind::Target
    } else {
        ObjectKind::Friendly
    };

    // Place just outside a uniformly chosen edge
    let start = match rng.random_range(0..4u8) {
        0 => Vec2::new(rng.random::<f32>() * area.width, -cfg.object_size),
        1 => Vec2::new(area.width + cfg.object_size, rng.random::<f32>() * area.height),
        2 => Vec2::new(rng.random::<f32>() * area.width, area.height + cfg.object_size),
        _ => Vec2::new(-cfg.object_size, rng.random::<f32>() * area.height),
    };

    let min_radius = cfg.object_size * (1.0 - cfg.size_variation);
    let max_radius = cfg.object_size * (1.0 + cfg.size_variation);
    let radius = min_radius + rng.random::<f32>() * (max_radius - min_radius);

    // Aim roughly at center, jitter scaled by `randomness`
    let bias = area.center()
        + Vec2::new(
            (rng.random::<f32>() - 0.5) * area.width * cfg.randomness,
            (rng.random::<f32>() - 0.5) * area.height * cfg.randomness,
        );

    // Zero spawn distance would divide by zero; fall back to straight down
    let dir = (bias - start).try_normalize().unwrap_or(Vec2::Y);
    let vel = dir * (BASE_SPEED * cfg.speed / 1000.0);

    let color = if cfg.use_random_colors {
        PALETTE[rng.random_range(0..PALETTE.len())].to_string()
    } else {
        match kind {
            ObjectKind::Target => cfg.target_color.clone(),
            ObjectKind::Friendly => cfg.friendly_color.clone(),
        }
    };

    let mut obj = GameObject {
        pos: start,
        vel,
        kind,
        radius,
        points: match kind {
            ObjectKind::Target => 1,
            ObjectKind::Friendly => -1,
        },
        word: None,
        image: None,
        color,
        hazard: false,
        path: TrajectoryPath { start, end: bias },
    };

    attach_payload(&mut obj, cfg, rng, assets);
    obj
}

/// Word and image payload dispatch
fn attach_payload<R: Rng>(obj: &mut GameObject, cfg: &GameConfig, rng: &mut R, assets: &Assets) {
    match obj.kind {
        ObjectKind::Target => {
            obj.word = pick_word(&cfg.target_words, rng);
        }
        ObjectKind::Friendly => match cfg.friendly_mode {
            FriendlyMode::Images => attach_image(obj, rng, assets),
            FriendlyMode::Words => obj.word = pick_word(&cfg.friendly_words, rng),
            FriendlyMode::Both => {
                // Coin flip only matters when images exist; otherwise fall
                // back to words (possibly none, leaving a bare shape)
                if !assets.friendly_images.is_empty() && rng.random_bool(0.5) {
                    attach_image(obj, rng, assets);
                } else {
                    obj.word = pick_word(&cfg.friendly_words, rng);
                }
            }
        },
    }
}

fn attach_image<R: Rng>(obj: &mut GameObject, rng: &mut R, assets: &Assets) {
    if assets.friendly_images.is_empty() {
        return;
    }
    let idx = rng.random_range(0..assets.friendly_images.len());
    obj.image = Some(assets.friendly_images[idx]);
    obj.hazard = true;
}

/// Uniform draw from a whitespace-delimited word pool
fn pick_word<R: Rng>(pool: &str, rng: &mut R) -> Option<String> {
    let words: Vec<&str> = pool.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    Some(words[rng.random_range(0..words.len())].to_string())
}
