//! Deterministic match-game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through explicit `advance(dt)` calls
//! - Seeded RNG only
//! - No rendering or platform dependencies: the presentation layer is a pure
//!   subscriber draining [`SessionEvent`]s

pub mod config;
pub mod entity;
pub mod events;
pub mod geometry;
pub mod session;
pub mod timer;

pub use config::GameConfig;
pub use entity::{PairRegistry, Rect};
pub use events::{EventQueue, SessionEvent, SessionInfo};
pub use geometry::{RandomGeometry, Rgba};
pub use session::{MatchSession, SessionPhase};
pub use timer::TaskTimer;
