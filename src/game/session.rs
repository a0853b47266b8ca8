//! Match session state machine
//!
//! Owns the entities, the pair registry, both timers, and the outbound event
//! queue. Single-threaded by contract: the driver calls `advance` and
//! `handle_touch` from one loop, so no two mutations ever race.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::entity::{PairRegistry, Rect};
use super::events::{EventQueue, SessionEvent, SessionInfo};
use super::geometry::RandomGeometry;
use super::timer::TaskTimer;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Constructed, awaiting the first start
    Idle,
    /// Spawn ticks and touches are live
    Running,
    /// Timer expired; the board stays frozen until the next start
    Ended,
}

/// One timed play-through of the matching game.
///
/// Rectangles spawn in pairs on a fixed cadence; the player matches a pair by
/// tapping both members in turn before the session timer runs out.
pub struct MatchSession {
    config: GameConfig,
    geometry: RandomGeometry,
    rng: Pcg32,
    phase: SessionPhase,
    rects: Vec<Rect>,
    registry: PairRegistry,
    /// First pick awaiting its partner tap
    pending_first_pick: Option<u32>,
    pairs_created: u32,
    pairs_matched: u32,
    /// Spawn budget left, spent one interval per spawn tick
    time_remaining: f32,
    spawn_timer: TaskTimer,
    end_timer: TaskTimer,
    events: EventQueue,
    next_id: u32,
    next_pair_id: u32,
}

impl MatchSession {
    /// Build an idle session. Nothing happens until [`start`](Self::start).
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let geometry = RandomGeometry::from_config(&config);
        let mut spawn_timer = TaskTimer::repeating(config.spawn_interval);
        let mut end_timer = TaskTimer::one_shot(config.game_duration);
        spawn_timer.cancel();
        end_timer.cancel();

        Self {
            config,
            geometry,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Idle,
            rects: Vec::new(),
            registry: PairRegistry::new(),
            pending_first_pick: None,
            pairs_created: 0,
            pairs_matched: 0,
            time_remaining: 0.0,
            spawn_timer,
            end_timer,
            events: EventQueue::new(),
            next_id: 1,
            next_pair_id: 1,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// All rectangles of the current play-through, matched ones included
    /// (they stay on the board, flagged `removed`, until the next start)
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Display projection, computed from state on demand
    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            time_remaining: self.time_remaining,
            pairs_created: self.pairs_created,
            pairs_matched: self.pairs_matched,
        }
    }

    /// Take every pending event for the presentation layer
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain()
    }

    /// Begin a fresh play-through. Valid in any phase: a running session is
    /// fully reset and its old timers replaced, so stale spawn ticks cannot
    /// leak into the new session.
    pub fn start(&mut self) {
        self.rects.clear();
        self.registry.clear();
        self.pending_first_pick = None;
        self.pairs_created = 0;
        self.pairs_matched = 0;
        self.time_remaining = self.config.game_duration;
        self.spawn_timer = TaskTimer::repeating(self.config.spawn_interval);
        self.end_timer = TaskTimer::one_shot(self.config.game_duration);
        self.phase = SessionPhase::Running;

        log::debug!(
            "session started: {}s, spawn every {}s",
            self.config.game_duration,
            self.config.spawn_interval
        );
        self.emit_info();
    }

    /// Advance session time by `dt` seconds.
    ///
    /// Spawn ticks and the end-of-session action fire in time order; when a
    /// spawn and the timeout land on the same instant the spawn is processed
    /// first. Left-over time after the session ends is discarded. No-op
    /// outside `Running`.
    pub fn advance(&mut self, mut dt: f32) {
        while self.phase == SessionPhase::Running && dt > 0.0 {
            let mut step = dt;
            if let Some(t) = self.spawn_timer.time_to_fire() {
                step = step.min(t);
            }
            if let Some(t) = self.end_timer.time_to_fire() {
                step = step.min(t);
            }

            let spawns = self.spawn_timer.advance(step);
            let ended = self.end_timer.advance(step) > 0;
            for _ in 0..spawns {
                self.spawn_tick();
            }
            if ended {
                self.finish();
            }
            dt -= step;
        }
    }

    /// Resolve a tap on rectangle `id`.
    ///
    /// Ignores taps outside `Running` and taps on unknown or already-removed
    /// rectangles (stale input, e.g. a tap landing mid fade-out).
    pub fn handle_touch(&mut self, id: u32) {
        if self.phase != SessionPhase::Running {
            return;
        }
        let Some(idx) = self.rects.iter().position(|r| r.id == id && !r.removed) else {
            return;
        };

        match self.pending_first_pick {
            None => {
                self.rects[idx].revealed = true;
                self.pending_first_pick = Some(id);
                self.events.push(SessionEvent::EntityRevealed { id });
                self.emit_info();
            }
            Some(first) => {
                if self.registry.partner_of(id) == Some(first) {
                    self.match_pair(first, id);
                } else {
                    // Mismatch, re-tapping the first pick included: the pick
                    // unreveals and the player starts over on the next tap
                    if let Some(rect) = self.rects.iter_mut().find(|r| r.id == first) {
                        rect.revealed = false;
                    }
                    self.pending_first_pick = None;
                    self.events.push(SessionEvent::EntityUnrevealed { id: first });
                    self.emit_info();
                }
            }
        }
    }

    /// Create one new pair. Size and color are drawn once and shared by both
    /// members; positions are drawn independently.
    fn spawn_tick(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }

        let size = self.geometry.sample_size(&mut self.rng);
        let color = self.geometry.sample_color(&mut self.rng);
        let pair_id = self.next_pair_id;
        self.next_pair_id += 1;

        let pos_a = self.geometry.sample_position(&mut self.rng, size);
        let pos_b = self.geometry.sample_position(&mut self.rng, size);
        let first = Rect::new(self.next_entity_id(), pair_id, size, pos_a, color);
        let second = Rect::new(self.next_entity_id(), pair_id, size, pos_b, color);

        self.registry.insert_pair(first.id, second.id);
        self.pairs_created += 1;
        // Countdown is spawn-driven: each tick spends one interval of budget
        self.time_remaining -= self.config.spawn_interval;

        self.events.push(SessionEvent::EntityCreated(first.clone()));
        self.events.push(SessionEvent::EntityCreated(second.clone()));
        self.rects.push(first);
        self.rects.push(second);
        self.emit_info();
    }

    fn match_pair(&mut self, first: u32, second: u32) {
        for rect in self
            .rects
            .iter_mut()
            .filter(|r| r.id == first || r.id == second)
        {
            rect.revealed = true;
            rect.removed = true;
        }
        self.registry.remove_pair(second);
        self.pending_first_pick = None;
        self.pairs_matched += 1;
        self.events.push(SessionEvent::PairMatched { first, second });
        self.emit_info();
    }

    fn finish(&mut self) {
        self.spawn_timer.cancel();
        self.end_timer.cancel();
        self.time_remaining = 0.0;
        self.pending_first_pick = None;
        self.phase = SessionPhase::Ended;

        log::debug!(
            "session ended: matched {} of {} pairs",
            self.pairs_matched,
            self.pairs_created
        );
        self.emit_info();
        self.events.push(SessionEvent::SessionEnded);
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn emit_info(&mut self) {
        self.events.push(SessionEvent::InfoChanged(self.session_info()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> MatchSession {
        let mut session = MatchSession::new(GameConfig::default(), 12345);
        session.start();
        session
    }

    /// Advance far enough for exactly one spawn tick and return the new pair
    fn spawn_one(session: &mut MatchSession) -> (u32, u32) {
        let before = session.rects().len();
        let interval = session.config().spawn_interval;
        session.advance(interval);
        let rects = session.rects();
        assert_eq!(rects.len(), before + 2);
        (rects[before].id, rects[before + 1].id)
    }

    fn matched_events(events: &[SessionEvent]) -> Vec<(u32, u32)> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::PairMatched { first, second } => Some((*first, *second)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_new_session_is_idle() {
        let mut session = MatchSession::new(GameConfig::default(), 1);
        assert_eq!(session.phase(), SessionPhase::Idle);

        // Neither time nor touches do anything before start
        session.advance(100.0);
        session.handle_touch(1);
        assert!(session.rects().is_empty());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_spawn_tick_creates_matching_pair() {
        let mut session = started();
        session.drain_events();

        let (a, b) = spawn_one(&mut session);
        let rects = session.rects();

        // Pair members share pair id, size, and color
        assert_eq!(rects[0].pair_id, rects[1].pair_id);
        assert_eq!(rects[0].size, rects[1].size);
        assert_eq!(rects[0].color, rects[1].color);
        assert!(!rects[0].revealed && !rects[0].removed);

        let info = session.session_info();
        assert_eq!(info.pairs_created, 1);
        assert_eq!(info.pairs_matched, 0);
        assert_eq!(info.time_remaining, 11.0);

        let events = session.drain_events();
        let created: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::EntityCreated(_)))
            .collect();
        assert_eq!(created.len(), 2);
        assert!(matches!(events.last(), Some(SessionEvent::InfoChanged(_))));

        assert_eq!(session.registry.partner_of(a), Some(b));
        assert_eq!(session.registry.partner_of(b), Some(a));
        assert!(session.registry.is_symmetric());
    }

    #[test]
    fn test_alpha_defaults_to_opaque() {
        let mut session = started();
        session.advance(3.0);
        assert!(session.rects().iter().all(|r| r.color.a == 1.0));
    }

    #[test]
    fn test_twelve_ticks_then_timeout() {
        // spawn_interval=1.0, game_duration=12.0: exactly 12 spawn ticks
        // happen before the timeout fires
        let mut session = started();
        session.advance(12.0);

        assert_eq!(session.phase(), SessionPhase::Ended);
        assert_eq!(session.rects().len(), 24);

        let info = session.session_info();
        assert_eq!(info.pairs_created, 12);
        assert_eq!(info.time_remaining, 0.0);

        let events = session.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SessionEvent::SessionEnded))
                .count(),
            1
        );
    }

    #[test]
    fn test_small_steps_match_single_advance() {
        let mut stepped = MatchSession::new(GameConfig::default(), 777);
        let mut jumped = MatchSession::new(GameConfig::default(), 777);
        stepped.start();
        jumped.start();

        for _ in 0..48 {
            stepped.advance(0.25);
        }
        jumped.advance(12.0);

        assert_eq!(stepped.phase(), jumped.phase());
        assert_eq!(stepped.rects(), jumped.rects());
        assert_eq!(stepped.session_info(), jumped.session_info());
    }

    #[test]
    fn test_no_spawns_after_end() {
        let mut session = started();
        session.advance(12.0);
        assert_eq!(session.phase(), SessionPhase::Ended);
        session.drain_events();

        // Driving the clock further must not tick the cancelled spawn timer
        session.advance(100.0);
        assert_eq!(session.rects().len(), 24);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_match_pair() {
        let mut session = started();
        let (a, b) = spawn_one(&mut session);
        session.drain_events();

        session.handle_touch(a);
        session.handle_touch(b);

        let info = session.session_info();
        assert_eq!(info.pairs_matched, 1);

        let rects = session.rects();
        assert!(rects.iter().all(|r| r.revealed && r.removed));
        assert!(session.registry.is_empty());
        assert_eq!(session.pending_first_pick, None);

        let events = session.drain_events();
        assert_eq!(matched_events(&events), vec![(a, b)]);
    }

    #[test]
    fn test_mismatch_unreveals_first_pick() {
        let mut session = started();
        let (a, _) = spawn_one(&mut session);
        let (c, d) = spawn_one(&mut session);
        session.drain_events();

        session.handle_touch(a);
        session.handle_touch(c);

        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::EntityRevealed { id: a }));
        assert!(events.contains(&SessionEvent::EntityUnrevealed { id: a }));
        assert!(matched_events(&events).is_empty());
        assert_eq!(session.pending_first_pick, None);

        // The tapped rectangle was not adopted as a new first pick
        assert!(session.rects().iter().all(|r| !r.revealed));

        // Both rectangles stay live and tappable: c/d still match afterwards
        session.handle_touch(c);
        session.handle_touch(d);
        assert_eq!(session.session_info().pairs_matched, 1);
    }

    #[test]
    fn test_same_rect_twice_is_mismatch() {
        let mut session = started();
        let (a, b) = spawn_one(&mut session);
        session.drain_events();

        session.handle_touch(a);
        session.handle_touch(a);

        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::EntityUnrevealed { id: a }));
        assert!(matched_events(&events).is_empty());
        assert_eq!(session.pending_first_pick, None);
        assert_eq!(session.session_info().pairs_matched, 0);

        // Still matchable with a fresh tap sequence
        session.handle_touch(a);
        session.handle_touch(b);
        assert_eq!(session.session_info().pairs_matched, 1);
    }

    #[test]
    fn test_touch_on_removed_rect_is_ignored() {
        let mut session = started();
        let (a, b) = spawn_one(&mut session);
        session.handle_touch(a);
        session.handle_touch(b);
        session.drain_events();

        // Stale tap on a faded-out rectangle: no events, no state change
        session.handle_touch(a);
        assert!(session.drain_events().is_empty());
        assert_eq!(session.pending_first_pick, None);
    }

    #[test]
    fn test_touch_on_unknown_id_is_ignored() {
        let mut session = started();
        spawn_one(&mut session);
        session.drain_events();

        session.handle_touch(9999);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_touch_after_end_is_ignored() {
        let mut session = started();
        session.advance(12.0);
        session.drain_events();

        let id = session.rects()[0].id;
        session.handle_touch(id);
        assert!(session.drain_events().is_empty());
        assert!(!session.rects()[0].revealed);
    }

    #[test]
    fn test_timeout_clears_pending_pick() {
        let mut session = started();
        let (a, _) = spawn_one(&mut session);
        session.handle_touch(a);
        assert_eq!(session.pending_first_pick, Some(a));

        session.advance(11.0);
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert_eq!(session.pending_first_pick, None);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = started();
        let (a, b) = spawn_one(&mut session);
        spawn_one(&mut session);
        session.handle_touch(a);
        session.handle_touch(b);

        session.start();

        assert_eq!(session.phase(), SessionPhase::Running);
        assert!(session.rects().is_empty());
        assert!(session.registry.is_empty());
        let info = session.session_info();
        assert_eq!(info.pairs_created, 0);
        assert_eq!(info.pairs_matched, 0);
        assert_eq!(info.time_remaining, 12.0);
    }

    #[test]
    fn test_restart_discards_old_spawn_timer() {
        let mut session = started();
        session.advance(0.75);
        assert!(session.rects().is_empty());

        // Restart mid-interval: the old timer's 0.75s of progress must not
        // carry over into the new session
        session.start();
        session.advance(0.75);
        assert!(session.rects().is_empty());
        session.advance(0.25);
        assert_eq!(session.rects().len(), 2);
    }

    #[test]
    fn test_restart_after_end() {
        let mut session = started();
        session.advance(12.0);
        assert_eq!(session.phase(), SessionPhase::Ended);

        session.start();
        assert_eq!(session.phase(), SessionPhase::Running);
        session.advance(1.0);
        assert_eq!(session.session_info().pairs_created, 1);
    }

    #[test]
    fn test_pending_pick_invariant() {
        let mut session = started();
        let (a, _) = spawn_one(&mut session);
        session.handle_touch(a);

        let picked = session.pending_first_pick.expect("pick set");
        let rect = session
            .rects()
            .iter()
            .find(|r| r.id == picked)
            .expect("pick refers to a live rect");
        assert!(rect.revealed);
        assert!(!rect.removed);
        assert!(session.registry.contains(picked));
    }

    #[test]
    fn test_pair_ids_pair_exactly_two_live_rects() {
        let mut session = started();
        session.advance(5.0);

        for rect in session.rects() {
            let same_pair = session
                .rects()
                .iter()
                .filter(|r| r.pair_id == rect.pair_id)
                .count();
            assert_eq!(same_pair, 2);
        }
        assert!(session.registry.is_symmetric());
        assert_eq!(session.registry.len(), session.rects().len());
    }

    #[test]
    fn test_determinism_same_seed_same_board() {
        let mut one = MatchSession::new(GameConfig::default(), 424242);
        let mut two = MatchSession::new(GameConfig::default(), 424242);
        one.start();
        two.start();
        one.advance(7.0);
        two.advance(7.0);

        assert_eq!(one.rects(), two.rects());
    }

    #[test]
    fn test_info_events_follow_each_mutation() {
        let mut session = started();
        let (a, b) = spawn_one(&mut session);
        session.handle_touch(a);
        session.handle_touch(b);

        let events = session.drain_events();
        // Every reveal/match/spawn is chased by an InfoChanged
        let positions: Vec<_> = events
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match e {
                SessionEvent::EntityRevealed { .. }
                | SessionEvent::PairMatched { .. }
                | SessionEvent::EntityCreated(_) => Some(i),
                _ => None,
            })
            .collect();
        for i in positions {
            assert!(events[i + 1..]
                .iter()
                .any(|e| matches!(e, SessionEvent::InfoChanged(_))));
        }
    }
}
