//! Session configuration
//!
//! Fixed at construction; a session never re-reads tunables mid-flight.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Construction-time tunables for a match session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Minimum rectangle edge length
    pub rect_size_min: f32,
    /// Maximum rectangle edge length
    pub rect_size_max: f32,
    /// Randomize rectangle alpha instead of fixing it at 1.0
    pub randomize_alpha: bool,
    /// Seconds between spawn ticks
    pub spawn_interval: f32,
    /// Session length in seconds
    pub game_duration: f32,
    /// Fade-out time for matched rectangles (consumed by the presentation layer)
    pub fade_duration: f32,
    /// Playfield dimensions
    pub canvas_size: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rect_size_min: RECT_SIZE_MIN,
            rect_size_max: RECT_SIZE_MAX,
            randomize_alpha: false,
            spawn_interval: SPAWN_INTERVAL,
            game_duration: GAME_DURATION,
            fade_duration: FADE_DURATION,
            canvas_size: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        }
    }
}
