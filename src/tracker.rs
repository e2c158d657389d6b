//! Cumulative squash count and the rank derived from it.

use crate::ranks::{RankTier, rank_for_total, same_tier};
use crate::storage::{SquashStore, parse_total};

/// Result of one squash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquashOutcome {
    pub total: u32,
    pub rank: Option<&'static RankTier>,
    pub rank_changed: bool,
}

pub struct ScoreTracker<S: SquashStore> {
    store: S,
    key: String,
    total: u32,
    // Last rank this session knows about; updated on load, squash and sync.
    rank: Option<&'static RankTier>,
}

impl<S: SquashStore> ScoreTracker<S> {
    /// Read the persisted count. Missing, malformed or unreadable values start at 0.
    /// Never celebrates.
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let mut tracker = Self { store, key: key.into(), total: 0, rank: None };
        if let Some(total) = tracker.read_persisted() {
            tracker.total = total;
            tracker.rank = rank_for_total(total);
        }
        log::debug!("bug hunter loaded total={} rank={:?}", tracker.total, tracker.rank.map(|r| r.name));
        tracker
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn rank(&self) -> Option<&'static RankTier> {
        self.rank
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read-modify-write against storage. The persisted value wins over the
    /// in-memory one so that squashes in other tabs are not lost; the in-memory
    /// total is only used when storage has nothing usable.
    pub fn record_squash(&mut self) -> SquashOutcome {
        let base = self.read_persisted().unwrap_or(self.total);
        let total = base.saturating_add(1);
        let rank = rank_for_total(total);
        let rank_changed = rank.is_some() && !same_tier(rank, self.rank);

        if let Err(e) = self.store.write(&self.key, &total.to_string()) {
            log::warn!("could not persist squash total {}: {}", total, e);
        }
        self.total = total;
        self.rank = rank;
        SquashOutcome { total, rank, rank_changed }
    }

    /// Adopt a value written by another browsing context (the `storage` event).
    /// `None` means the key was removed. Never celebrates.
    pub fn adopt_external(&mut self, new_value: Option<&str>) {
        let total = new_value.and_then(parse_total).unwrap_or(0);
        self.total = total;
        self.rank = rank_for_total(total);
        log::debug!("bug hunter synced total={} from another tab", total);
    }

    fn read_persisted(&self) -> Option<u32> {
        match self.store.read(&self.key) {
            Ok(raw) => raw.as_deref().and_then(parse_total),
            Err(e) => {
                log::debug!("squash total unreadable: {}", e);
                None
            }
        }
    }
}
