//! Session events - the core-to-presentation boundary
//!
//! The presentation layer drains the queue after driving the session and
//! reacts to what it finds; it never reaches into session state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::Rect;

/// Display projection of a session, recomputed from state on demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Seconds left in the spawn budget
    pub time_remaining: f32,
    pub pairs_created: u32,
    pub pairs_matched: u32,
}

impl fmt::Display for SessionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time: {:4.1} Pairs: {:2} Matched: {:2}",
            self.time_remaining, self.pairs_created, self.pairs_matched
        )
    }
}

/// Everything the presentation layer needs to hear from a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A new rectangle to render and wire for taps (twice per spawn tick)
    EntityCreated(Rect),
    /// Show the first-pick marker on this rectangle
    EntityRevealed { id: u32 },
    /// Hide the first-pick marker again (mismatch)
    EntityUnrevealed { id: u32 },
    /// Fade both rectangles out; the session has already dropped them from
    /// live state and does not need to hear back
    PairMatched { first: u32, second: u32 },
    /// HUD refresh, sent after every state-mutating event
    InfoChanged(SessionInfo),
    /// The session reached `Ended`
    SessionEnded,
}

/// FIFO queue the session pushes to and the presentation drains
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SessionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event onto the queue
    pub fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Take every pending event, leaving the queue empty
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
