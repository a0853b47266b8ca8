//! Pair Tap entry point
//!
//! Headless demo driver: runs one timed session with a scripted player and
//! logs what a presentation layer would render.

use std::time::{SystemTime, UNIX_EPOCH};

use pair_tap::game::{GameConfig, MatchSession, SessionEvent, SessionPhase};

/// Driver timestep in seconds
const STEP: f32 = 0.25;

/// Scripted stand-in for the player.
///
/// Remembers spawned pairs and taps both members of the oldest unresolved
/// one, fumbling every third attempt to exercise the mismatch path.
struct AutoPlayer {
    pending: Vec<(u32, u32)>,
    attempts: u32,
}

impl AutoPlayer {
    fn new() -> Self {
        Self {
            pending: Vec::new(),
            attempts: 0,
        }
    }

    /// Pick up newly spawned pairs (two consecutive creation events)
    fn observe(&mut self, events: &[SessionEvent]) {
        let mut created = events.iter().filter_map(|e| match e {
            SessionEvent::EntityCreated(rect) => Some(rect.id),
            _ => None,
        });
        while let (Some(a), Some(b)) = (created.next(), created.next()) {
            self.pending.push((a, b));
        }
    }

    /// Tap at most one pair this step
    fn play(&mut self, session: &mut MatchSession) {
        let Some((a, b)) = self.pending.first().copied() else {
            return;
        };
        self.attempts += 1;
        if self.attempts % 3 == 0 {
            // Fumble: tap the same rectangle twice, then retry next step
            session.handle_touch(a);
            session.handle_touch(a);
        } else {
            session.handle_touch(a);
            session.handle_touch(b);
            self.pending.remove(0);
        }
    }
}

fn log_events(events: &[SessionEvent], elapsed: f32, fade_duration: f32) {
    for event in events {
        match event {
            SessionEvent::EntityCreated(rect) => log::info!(
                "[{elapsed:5.2}s] + rect {} (pair {}) {:.0}x{:.0} at ({:.0}, {:.0})",
                rect.id,
                rect.pair_id,
                rect.size.x,
                rect.size.y,
                rect.pos.x,
                rect.pos.y
            ),
            SessionEvent::EntityRevealed { id } => {
                log::info!("[{elapsed:5.2}s] * rect {id} picked");
            }
            SessionEvent::EntityUnrevealed { id } => {
                log::info!("[{elapsed:5.2}s] o rect {id} unpicked (mismatch)");
            }
            SessionEvent::PairMatched { first, second } => log::info!(
                "[{elapsed:5.2}s] = rects {first}+{second} matched, fading over {fade_duration}s"
            ),
            SessionEvent::InfoChanged(info) => log::debug!("[{elapsed:5.2}s] {info}"),
            SessionEvent::SessionEnded => log::info!("[{elapsed:5.2}s] session over"),
        }
    }
}

fn main() {
    env_logger::init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_millis() as u64;
    let config = GameConfig::default();
    let fade_duration = config.fade_duration;

    log::info!("starting session with seed {seed}");
    let mut session = MatchSession::new(config, seed);
    let mut player = AutoPlayer::new();
    session.start();

    let mut elapsed = 0.0f32;
    while session.phase() == SessionPhase::Running {
        session.advance(STEP);
        elapsed += STEP;

        let events = session.drain_events();
        player.observe(&events);
        log_events(&events, elapsed, fade_duration);

        player.play(&mut session);
        let events = session.drain_events();
        log_events(&events, elapsed, fade_duration);
    }

    let info = session.session_info();
    log::info!("final: {info}");
    println!(
        "{}",
        serde_json::to_string_pretty(&info).expect("info serializes")
    );
}
