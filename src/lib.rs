//! Bug Hunter core crate.
//!
//! A bug crawls across the page; squash it to raise a cumulative total kept in
//! `localStorage` and climb a ladder of QA ranks. Game rules live in plain Rust
//! modules (`encounter`, `tracker`, `spawner`, `ranks`) that run natively under
//! `cargo test`; `overlay` is the browser host started from JS.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod encounter;
pub mod haptics;
mod logging;
mod overlay;
pub mod ranks;
pub mod spawner;
pub mod storage;
pub mod timers;
pub mod tracker;

pub use config::{Config, ConfigError};
pub use encounter::{BugEncounter, Celebration, EncounterEvent};
pub use ranks::{RANK_TIERS, RankTier, rank_for_total};
pub use spawner::{BugInstance, Edge, Point, Viewport};
pub use storage::{BrowserStorage, MemoryStore, SquashStore, StorageError};
pub use tracker::{ScoreTracker, SquashOutcome};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(logging::default_level());
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Mount the overlay with default settings. Restarts it if already running.
#[wasm_bindgen]
pub fn start_bug_hunter() -> Result<(), JsValue> {
    overlay::start(Config::default())
}

/// Mount the overlay with a partial JSON config, e.g. `{"respawn_delay_ms": 0}`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_bug_hunter_with_config(json: &str) -> Result<(), JsValue> {
    let config = Config::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    overlay::start(config)
}

/// Tear down the overlay: timers cleared, listeners detached, elements removed.
#[wasm_bindgen]
pub fn stop_bug_hunter() {
    overlay::stop()
}

/// Total squashed as known to the running overlay (0 when stopped).
#[wasm_bindgen]
pub fn total_bugs_squashed() -> u32 {
    overlay::total()
}

#[wasm_bindgen]
pub fn rank_name_for_total(total: u32) -> Option<String> {
    rank_for_total(total).map(|r| r.name.to_string())
}
