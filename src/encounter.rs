//! The bug encounter loop: one bug at a time crawling across the viewport,
//! squash scoring, rank celebrations.
//!
//! Everything here is pure. The DOM host feeds in frame-clock timestamps, clicks
//! and storage events, then renders from the read-only accessors. Per bug:
//!
//! ```text
//! spawned -> traveling -> expired ---------------------> removed -> (delay) -> spawned
//!                      \-> squashing -> (squash_ms) ---/
//! ```

use rand::Rng;

use crate::config::Config;
use crate::ranks::RankTier;
use crate::spawner::{BugInstance, Point, Viewport, spawn_bug};
use crate::storage::SquashStore;
use crate::timers::Timer;
use crate::tracker::{ScoreTracker, SquashOutcome};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EncounterEvent {
    Spawned,
    /// Crossed the viewport without being squashed.
    Expired,
    Squashed(SquashOutcome),
    Removed,
    RankUp { rank: &'static RankTier, total: u32 },
    CelebrationDismissed,
}

/// Rank-up currently on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Celebration {
    pub rank: &'static RankTier,
    pub total: u32,
}

pub struct BugEncounter<S: SquashStore, R: Rng> {
    config: Config,
    viewport: Viewport,
    rng: R,
    tracker: ScoreTracker<S>,
    bug: Option<BugInstance>,
    celebration: Option<Celebration>,
    respawn: Timer,
    squash_removal: Timer,
    celebration_dismiss: Timer,
    score_pulse: Timer,
    floating_one: Timer,
    started: bool,
}

impl<S: SquashStore, R: Rng> BugEncounter<S, R> {
    /// Loads the persisted total; nothing spawns until [`BugEncounter::start`].
    pub fn new(config: Config, viewport: Viewport, store: S, rng: R) -> Self {
        let tracker = ScoreTracker::load(store, config.storage_key.clone());
        Self {
            config,
            viewport,
            rng,
            tracker,
            bug: None,
            celebration: None,
            respawn: Timer::idle(),
            squash_removal: Timer::idle(),
            celebration_dismiss: Timer::idle(),
            score_pulse: Timer::idle(),
            floating_one: Timer::idle(),
            started: false,
        }
    }

    /// Spawn the first bug immediately.
    pub fn start(&mut self, now: f64) -> Vec<EncounterEvent> {
        let mut events = Vec::new();
        if !self.started {
            self.started = true;
            self.spawn(now, &mut events);
        }
        events
    }

    /// Advance every deadline to `now`.
    pub fn tick(&mut self, now: f64) -> Vec<EncounterEvent> {
        let mut events = Vec::new();
        if !self.started {
            return events;
        }

        if self.bug.as_ref().is_some_and(|b| b.has_arrived(now)) {
            self.bug = None;
            self.respawn.arm(now, self.config.respawn_delay_ms);
            log::debug!("bug escaped");
            events.push(EncounterEvent::Expired);
        }

        if self.squash_removal.fire_if_due(now) {
            self.bug = None;
            self.respawn.arm(now, self.config.respawn_delay_ms);
            events.push(EncounterEvent::Removed);
        }

        // Zero respawn delay spawns within the same tick as the removal.
        if self.respawn.fire_if_due(now) && self.bug.is_none() {
            self.spawn(now, &mut events);
        }

        if self.celebration_dismiss.fire_if_due(now) {
            self.celebration = None;
            events.push(EncounterEvent::CelebrationDismissed);
        }

        self.score_pulse.fire_if_due(now);
        self.floating_one.fire_if_due(now);
        events
    }

    /// Squash the live bug where it currently is. Ignored when there is no bug or
    /// it is already being squashed.
    pub fn squash(&mut self, now: f64) -> Vec<EncounterEvent> {
        let at = match &self.bug {
            Some(bug) => bug.position_at(now),
            None => return Vec::new(),
        };
        self.squash_at(at, now)
    }

    /// Squash the live bug, freezing it at `at`.
    pub fn squash_at(&mut self, at: Point, now: f64) -> Vec<EncounterEvent> {
        let mut events = Vec::new();
        let Some(bug) = self.bug.as_mut() else {
            return events;
        };
        if !bug.squash(at, now) {
            return events;
        }
        self.squash_removal.arm(now, self.config.squash_ms);

        let outcome = self.tracker.record_squash();
        self.score_pulse.arm(now, self.config.score_pulse_ms);
        self.floating_one.arm(now, self.config.floating_one_ms);
        events.push(EncounterEvent::Squashed(outcome));

        if let (true, Some(rank)) = (outcome.rank_changed, outcome.rank) {
            self.celebration = Some(Celebration { rank, total: outcome.total });
            self.celebration_dismiss.arm(now, self.config.celebration_ms);
            log::info!("new QA rank unlocked: {} ({} bugs)", rank.name, outcome.total);
            events.push(EncounterEvent::RankUp { rank, total: outcome.total });
        }
        events
    }

    /// Close the celebration early (close button / Escape).
    pub fn dismiss_celebration(&mut self) -> Option<EncounterEvent> {
        self.celebration_dismiss.clear();
        self.celebration.take().map(|_| EncounterEvent::CelebrationDismissed)
    }

    /// Another tab wrote `key`. Other keys are ignored.
    pub fn on_storage_change(&mut self, key: Option<&str>, new_value: Option<&str>) -> bool {
        if key != Some(self.config.storage_key.as_str()) {
            return false;
        }
        self.tracker.adopt_external(new_value);
        true
    }

    /// New viewport for subsequent spawns; the live bug keeps its path.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Cancel every pending timer and drop the live bug.
    pub fn teardown(&mut self) {
        for timer in [
            &mut self.respawn,
            &mut self.squash_removal,
            &mut self.celebration_dismiss,
            &mut self.score_pulse,
            &mut self.floating_one,
        ] {
            timer.clear();
        }
        self.bug = None;
        self.celebration = None;
        self.started = false;
    }

    pub fn bug(&self) -> Option<&BugInstance> {
        self.bug.as_ref()
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.celebration.as_ref()
    }

    pub fn total(&self) -> u32 {
        self.tracker.total()
    }

    pub fn rank(&self) -> Option<&'static RankTier> {
        self.tracker.rank()
    }

    pub fn score_pulse_active(&self) -> bool {
        self.score_pulse.is_pending()
    }

    pub fn floating_one_active(&self) -> bool {
        self.floating_one.is_pending()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn has_pending_timers(&self) -> bool {
        [&self.respawn, &self.squash_removal, &self.celebration_dismiss, &self.score_pulse, &self.floating_one]
            .iter()
            .any(|t| t.is_pending())
    }

    fn spawn(&mut self, now: f64, events: &mut Vec<EncounterEvent>) {
        debug_assert!(self.bug.is_none(), "spawn while a bug is live");
        let bug = spawn_bug(&mut self.rng, self.viewport, &self.config, now);
        log::debug!("bug spawned on {:?} edge, crossing in {:.0} ms", bug.entry_edge, bug.travel_duration_ms);
        self.bug = Some(bug);
        events.push(EncounterEvent::Spawned);
    }
}
