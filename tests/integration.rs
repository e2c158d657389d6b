// Integration tests (native) for the `bug-hunter` crate.
// These drive the encounter loop through the public API with an in-memory store
// and a seeded RNG, so they run under `cargo test` on the host.

use bug_hunter::{BugEncounter, Config, EncounterEvent, MemoryStore, SquashOutcome, Viewport};
use rand::SeedableRng;
use rand::rngs::StdRng;

const KEY: &str = "bugHunter.totalBugsSquashed";
const VIEW: Viewport = Viewport { width: 1024.0, height: 768.0 };

fn tab(store: &MemoryStore, seed: u64) -> BugEncounter<MemoryStore, StdRng> {
    let mut enc = BugEncounter::new(Config::default(), VIEW, store.clone(), StdRng::seed_from_u64(seed));
    enc.start(0.0);
    enc
}

fn squash_total(events: &[EncounterEvent]) -> Option<u32> {
    events.iter().find_map(|e| match e {
        EncounterEvent::Squashed(SquashOutcome { total, .. }) => Some(*total),
        _ => None,
    })
}

#[test]
fn fresh_visitor_unlocks_junior_rank() {
    let store = MemoryStore::new();
    let mut enc = tab(&store, 1);
    let events = enc.squash(1_000.0);
    assert_eq!(squash_total(&events), Some(1));
    assert!(events.iter().any(|e| matches!(e, EncounterEvent::RankUp { rank, .. } if rank.name == "Junior Test Engineer")));
    assert_eq!(store.get(KEY).as_deref(), Some("1"));
}

#[test]
fn returning_visitor_keeps_rank_without_celebration() {
    let store = MemoryStore::with_item(KEY, "5");
    let mut enc = tab(&store, 2);
    assert_eq!(enc.rank().unwrap().name, "Bug Reproduction Intern");
    assert!(enc.celebration().is_none());
    let events = enc.squash(500.0);
    assert_eq!(squash_total(&events), Some(6));
    assert!(!events.iter().any(|e| matches!(e, EncounterEvent::RankUp { .. })));
}

#[test]
fn two_tabs_never_lose_a_squash() {
    let store = MemoryStore::with_item(KEY, "4");
    let mut a = tab(&store, 3);
    let mut b = tab(&store, 4);

    assert_eq!(squash_total(&a.squash(100.0)), Some(5));
    // B squashes without having processed A's storage event
    assert_eq!(squash_total(&b.squash(200.0)), Some(6));
    assert_eq!(store.get(KEY).as_deref(), Some("6"));

    // A then hears about it and adopts the value silently
    assert!(a.on_storage_change(Some(KEY), store.get(KEY).as_deref()));
    assert_eq!(a.total(), 6);
    assert!(a.celebration().is_none());
}

#[test]
fn corrupted_storage_starts_from_zero() {
    let store = MemoryStore::with_item(KEY, "abc");
    let enc = tab(&store, 5);
    assert_eq!(enc.total(), 0);
    assert!(enc.rank().is_none());
}

#[test]
fn rank_name_lookup_for_js() {
    assert_eq!(bug_hunter::rank_name_for_total(0), None);
    assert_eq!(bug_hunter::rank_name_for_total(3).as_deref(), Some("Bug Reproduction Intern"));
    assert_eq!(bug_hunter::rank_name_for_total(1_000).as_deref(), Some("Legendary Production Firefighter"));
}

#[test]
fn stopped_overlay_reports_zero() {
    assert_eq!(bug_hunter::total_bugs_squashed(), 0);
}
