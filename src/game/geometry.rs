//! Randomized rectangle attributes
//!
//! Uniform sampling for size, position, and color within configured bounds.
//! Every operation is a pure function of the bounds and the random stream;
//! callers inject the RNG, so any seeded source reproduces the same values.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;

/// An RGBA color, each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Sampling bounds for rectangle attributes
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RandomGeometry {
    /// Minimum edge length
    pub size_min: f32,
    /// Maximum edge length
    pub size_max: f32,
    /// Playfield dimensions
    pub canvas: Vec2,
    /// Draw alpha uniformly instead of fixing it at 1.0
    pub randomize_alpha: bool,
}

impl RandomGeometry {
    pub fn new(size_min: f32, size_max: f32, canvas: Vec2, randomize_alpha: bool) -> Self {
        Self {
            size_min,
            size_max,
            canvas,
            randomize_alpha,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.rect_size_min,
            config.rect_size_max,
            config.canvas_size,
            config.randomize_alpha,
        )
    }

    /// Width and height drawn independently from [size_min, size_max].
    /// Inverted bounds collapse to size_min rather than erroring.
    pub fn sample_size<R: Rng>(&self, rng: &mut R) -> Vec2 {
        let hi = self.size_max.max(self.size_min);
        Vec2::new(
            rng.random_range(self.size_min..=hi),
            rng.random_range(self.size_min..=hi),
        )
    }

    /// Top-left corner such that a rectangle of `size` sits fully on the
    /// canvas. A canvas smaller than the rectangle clamps the range to 0.
    pub fn sample_position<R: Rng>(&self, rng: &mut R, size: Vec2) -> Vec2 {
        let max_x = (self.canvas.x - size.x).max(0.0);
        let max_y = (self.canvas.y - size.y).max(0.0);
        Vec2::new(
            rng.random_range(0.0..=max_x),
            rng.random_range(0.0..=max_y),
        )
    }

    /// RGB channels uniform in [0, 1]; alpha fixed at 1.0 unless randomized
    pub fn sample_color<R: Rng>(&self, rng: &mut R) -> Rgba {
        Rgba {
            r: rng.random_range(0.0..=1.0),
            g: rng.random_range(0.0..=1.0),
            b: rng.random_range(0.0..=1.0),
            a: if self.randomize_alpha {
                rng.random_range(0.0..=1.0)
            } else {
                1.0
            },
        }
    }
}
