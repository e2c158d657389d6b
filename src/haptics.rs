//! Vibration feedback on touch devices.

use wasm_bindgen::JsValue;
use web_sys::window;

use crate::config::Config;
use crate::encounter::EncounterEvent;

/// Only real mobile devices expose both the Vibration API and touch input;
/// desktop browsers and emulators are skipped.
pub fn is_supported() -> bool {
    let Some(win) = window() else {
        return false;
    };
    let navigator = win.navigator();
    let has_vibrate = js_sys::Reflect::has(&navigator, &JsValue::from_str("vibrate")).unwrap_or(false);
    if !has_vibrate {
        return false;
    }
    js_sys::Reflect::has(&win, &JsValue::from_str("ontouchstart")).unwrap_or(false)
        || navigator.max_touch_points() > 0
}

pub fn trigger(duration_ms: u32) {
    if !is_supported() {
        return;
    }
    if let Some(win) = window() {
        let _ = win.navigator().vibrate_with_duration(duration_ms);
    }
}

/// Vibration to play for a batch of events. A rank-up buzz supersedes the tap.
pub fn vibration_for(events: &[EncounterEvent], config: &Config) -> Option<u32> {
    let mut duration = None;
    for ev in events {
        match ev {
            EncounterEvent::RankUp { .. } => return Some(config.rank_up_haptic_ms),
            EncounterEvent::Squashed(_) => duration = Some(config.tap_haptic_ms),
            _ => {}
        }
    }
    duration
}
