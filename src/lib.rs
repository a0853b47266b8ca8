//! Pair Tap - a timed rectangle-matching tap game core
//!
//! Core modules:
//! - `game`: Deterministic match-game core (entities, pairing, timers, session)
//!
//! Rendering, animation, and raw input delivery live outside this crate: a
//! presentation layer drains [`game::SessionEvent`]s after each driver step,
//! draws what they describe, and routes taps back into
//! [`game::MatchSession::handle_touch`].

pub mod game;

pub use game::{GameConfig, MatchSession, Rect, SessionEvent, SessionInfo, SessionPhase};

/// Game configuration constants
pub mod consts {
    /// Smallest rectangle edge, in canvas units
    pub const RECT_SIZE_MIN: f32 = 50.0;
    /// Largest rectangle edge, in canvas units
    pub const RECT_SIZE_MAX: f32 = 150.0;

    /// Seconds between spawn ticks
    pub const SPAWN_INTERVAL: f32 = 1.0;
    /// Session length in seconds
    pub const GAME_DURATION: f32 = 12.0;

    /// Fade-out time for a matched pair (consumed by the presentation layer)
    pub const FADE_DURATION: f32 = 0.8;

    /// Default playfield dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
}
