// Rank table invariants. Native-friendly; no wasm/browser APIs.

use std::collections::HashSet;

use bug_hunter::{RANK_TIERS, rank_for_total};

#[test]
fn tiers_are_strictly_ascending() {
    for pair in RANK_TIERS.windows(2) {
        assert!(pair[0].min_bugs < pair[1].min_bugs, "'{}' must come before '{}'", pair[0].name, pair[1].name);
        assert!(pair[0].id < pair[1].id);
    }
    assert_eq!(RANK_TIERS[0].min_bugs, 1, "first squash must unlock the first rank");
}

#[test]
fn tier_ids_and_names_are_unique() {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for tier in RANK_TIERS {
        assert!(ids.insert(tier.id), "duplicate id {}", tier.id);
        assert!(names.insert(tier.name), "duplicate name '{}'", tier.name);
        assert!(!tier.icon.is_empty(), "missing icon for '{}'", tier.name);
        assert!(tier.accent.starts_with('#'), "accent for '{}' should be a hex colour", tier.name);
    }
}

#[test]
fn every_threshold_unlocks_its_own_tier() {
    for tier in RANK_TIERS {
        assert_eq!(rank_for_total(tier.min_bugs).map(|t| t.id), Some(tier.id));
        if tier.min_bugs > 1 {
            assert_ne!(rank_for_total(tier.min_bugs - 1).map(|t| t.id), Some(tier.id));
        }
    }
}
