//! DOM host for the bug encounter: builds the overlay elements, wires input and
//! storage events into [`BugEncounter`], and renders it every animation frame.
//!
//! All state lives in one `thread_local!` slot. Listeners and the frame callback
//! are guards owned by that slot, so `stop()` detaches everything by dropping it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, HtmlElement, KeyboardEvent, StorageEvent, Window, window};

use crate::config::Config;
use crate::encounter::{BugEncounter, EncounterEvent};
use crate::haptics;
use crate::spawner::Viewport;
use crate::storage::BrowserStorage;

type Encounter = BugEncounter<BrowserStorage, SmallRng>;

// Lucide "bug" outline.
const BUG_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="36" height="36" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true"><path d="m8 2 1.88 1.88"/><path d="M14.12 3.88 16 2"/><path d="M9 7.13v-1a3.003 3.003 0 1 1 6 0v1"/><path d="M12 20c-3.3 0-6-2.7-6-6v-3a4 4 0 0 1 4-4h4a4 4 0 0 1 4 4v3c0 3.3-2.7 6-6 6"/><path d="M12 20v-9"/><path d="M6.53 9C4.6 8.8 3 7.1 3 5"/><path d="M6 13H2"/><path d="M3 21c0-2.1 1.7-3.9 3.8-4"/><path d="M20.97 5c0 2.1-1.6 3.8-3.5 4"/><path d="M22 13h-4"/><path d="M17.2 17c2.1.1 3.8 1.9 3.8 4"/></svg>"#;

const BUG_STYLE: &str = "position:fixed; left:0; top:0; z-index:1000; display:none; padding:0; border:none; background:transparent; color:#374151; cursor:crosshair; will-change:left,top,transform;";
const SCORE_STYLE: &str = "position:fixed; left:16px; bottom:16px; z-index:50; display:none; align-items:center; gap:12px; padding:8px 16px; border-radius:8px; background:rgba(243,244,246,0.95); color:#111827; box-shadow:0 10px 15px -3px rgba(0,0,0,0.15); font:700 24px system-ui,sans-serif;";
const PLUS_ONE_STYLE: &str = "position:absolute; left:50%; bottom:100%; margin-bottom:8px; transform:translateX(-50%); display:none; color:#22c55e; font:700 30px system-ui,sans-serif; pointer-events:none;";
const BACKDROP_STYLE: &str = "position:fixed; inset:0; z-index:1100; display:none; align-items:center; justify-content:center; background:rgba(0,0,0,0.45);";
const PANEL_STYLE: &str = "position:relative; max-width:360px; padding:24px; border-radius:12px; background:#fff; color:#111827; text-align:center; box-shadow:0 20px 25px -5px rgba(147,51,234,0.35); font:400 16px system-ui,sans-serif;";

thread_local! {
    static HUNTER: RefCell<Option<Hunter>> = const { RefCell::new(None) };
}

struct Hunter {
    encounter: Encounter,
    view: OverlayView,
    listeners: Vec<Listener>,
    frame: Option<FrameLoop>,
}

impl Hunter {
    fn react(&self, events: &[EncounterEvent]) {
        if let Some(ms) = haptics::vibration_for(events, self.encounter.config()) {
            haptics::trigger(ms);
        }
    }
}

pub fn start(config: Config) -> Result<(), JsValue> {
    stop();

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let store = BrowserStorage::acquire();
    if !store.is_available() {
        log::warn!("localStorage unavailable; squash total will not persist");
    }
    let mut encounter = BugEncounter::new(config, viewport_of(&win), store, SmallRng::from_entropy());
    let view = OverlayView::mount(&doc)?;
    encounter.start(now_ms());
    log::info!("bug hunter started (total={})", encounter.total());

    let listeners = vec![
        Listener::attach(&view.bug, "click", |_| {
            with_hunter(|h| {
                let events = h.encounter.squash(now_ms());
                h.react(&events);
            })
        })?,
        Listener::attach(&view.close, "click", |_| {
            with_hunter(|h| {
                h.encounter.dismiss_celebration();
            })
        })?,
        Listener::attach(&doc, "keydown", |evt| {
            let Ok(evt) = evt.dyn_into::<KeyboardEvent>() else {
                return;
            };
            if evt.key() == "Escape" {
                with_hunter(|h| {
                    h.encounter.dismiss_celebration();
                });
            }
        })?,
        // Fires only for writes made by other tabs / windows.
        Listener::attach(&win, "storage", |evt| {
            let Ok(evt) = evt.dyn_into::<StorageEvent>() else {
                return;
            };
            with_hunter(|h| {
                h.encounter.on_storage_change(evt.key().as_deref(), evt.new_value().as_deref());
            })
        })?,
        Listener::attach(&win, "resize", |_| {
            if let Some(w) = window() {
                with_hunter(|h| h.encounter.resize(viewport_of(&w)));
            }
        })?,
    ];

    HUNTER.with(|cell| {
        cell.replace(Some(Hunter { encounter, view, listeners, frame: None }));
    });

    let frame = FrameLoop::start(|ts| {
        with_hunter(|h| {
            let events = h.encounter.tick(ts);
            h.react(&events);
            if let Err(e) = h.view.render(&h.encounter, ts) {
                log::error!("bug hunter render failed: {:?}", e);
            }
        })
    });
    with_hunter(|h| h.frame = Some(frame));
    Ok(())
}

pub fn stop() {
    let hunter = HUNTER.with(|cell| cell.borrow_mut().take());
    if let Some(mut hunter) = hunter {
        hunter.encounter.teardown();
        hunter.view.unmount();
        hunter.frame.take();
        hunter.listeners.clear();
        log::info!("bug hunter stopped");
    }
}

pub fn total() -> u32 {
    let mut total = 0;
    with_hunter(|h| total = h.encounter.total());
    total
}

/// Skips silently when stopped or re-entered.
fn with_hunter(f: impl FnOnce(&mut Hunter)) {
    HUNTER.with(|cell| {
        if let Ok(mut guard) = cell.try_borrow_mut() {
            if let Some(hunter) = guard.as_mut() {
                f(hunter);
            }
        }
    });
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn viewport_of(win: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport { width: dim(win.inner_width()), height: dim(win.inner_height()) }
}

// --- Guards -----------------------------------------------------------------

/// Event listener that detaches itself on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, kind: &'static str, f: impl FnMut(Event) + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-rescheduling `requestAnimationFrame` loop; dropping it cancels the
/// pending frame and frees the callback.
struct FrameLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start(mut on_frame: impl FnMut(f64) + 'static) -> Self {
        let f: FrameCallback = Rc::new(RefCell::new(None));
        let g = f.clone();
        let pending = Rc::new(Cell::new(None));
        let p = pending.clone();
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            p.set(None);
            on_frame(ts);
            p.set(request_frame(&f));
        }) as Box<dyn FnMut(f64)>));
        pending.set(request_frame(&g));
        Self { callback: g, pending }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(w)) = (self.pending.take(), window()) {
            let _ = w.cancel_animation_frame(id);
        }
        // Breaks the closure -> Rc -> closure cycle.
        self.callback.borrow_mut().take();
    }
}

fn request_frame(f: &FrameCallback) -> Option<i32> {
    let w = window()?;
    let cb = f.borrow();
    w.request_animation_frame(cb.as_ref()?.as_ref().unchecked_ref()).ok()
}

// --- View -------------------------------------------------------------------

struct OverlayView {
    bug: HtmlElement,
    score: HtmlElement,
    score_count: HtmlElement,
    plus_one: HtmlElement,
    backdrop: HtmlElement,
    rank_icon: HtmlElement,
    rank_name: HtmlElement,
    rank_total: HtmlElement,
    close: HtmlElement,
    shown_total: Option<u32>,
    shown_celebration: Option<(u8, u32)>,
}

fn element(doc: &Document, tag: &str, style: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = doc.create_element(tag)?.dyn_into()?;
    el.set_attribute("style", style)?;
    Ok(el)
}

fn text(doc: &Document, tag: &str, style: &str, content: &str) -> Result<HtmlElement, JsValue> {
    let el = element(doc, tag, style)?;
    el.set_text_content(Some(content));
    Ok(el)
}

impl OverlayView {
    fn mount(doc: &Document) -> Result<Self, JsValue> {
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

        let bug = element(doc, "button", BUG_STYLE)?;
        bug.set_id("bh-bug");
        bug.set_attribute("type", "button")?;
        bug.set_attribute("aria-label", "Squash the bug")?;
        bug.set_inner_html(BUG_SVG);
        body.append_child(&bug)?;

        let score = element(doc, "div", SCORE_STYLE)?;
        score.set_id("bh-score");
        let icon = element(doc, "span", "position:relative; display:inline-flex; width:40px; height:40px; align-items:center; justify-content:center; color:#9333ea;")?;
        icon.set_attribute("role", "img")?;
        icon.set_attribute("aria-label", "Squashed bug indicator")?;
        icon.set_inner_html(BUG_SVG);
        let score_count = text(doc, "span", "display:inline-block; transition:transform 0.2s ease-out;", "0")?;
        score_count.set_id("bh-score-count");
        let plus_one = text(doc, "span", PLUS_ONE_STYLE, "+1")?;
        score.append_child(&icon)?;
        score.append_child(&score_count)?;
        score.append_child(&plus_one)?;
        body.append_child(&score)?;

        let backdrop = element(doc, "div", BACKDROP_STYLE)?;
        backdrop.set_id("bh-celebration");
        let panel = element(doc, "div", PANEL_STYLE)?;
        panel.set_attribute("role", "dialog")?;
        panel.set_attribute("aria-label", "New bug hunting rank unlocked")?;
        let rank_icon = text(doc, "div", "font-size:40px; line-height:1;", "")?;
        let title = text(doc, "h2", "margin:8px 0 0; font-size:18px; font-weight:600;", "New QA rank unlocked!")?;
        let line = text(doc, "p", "margin:12px 0 0;", "You are now ")?;
        let rank_name = text(doc, "strong", "color:#7e22ce;", "")?;
        line.append_child(&rank_name)?;
        line.append_with_str_1(".")?;
        let caption = text(doc, "div", "margin-top:12px; font-size:12px; letter-spacing:0.2em; text-transform:uppercase; color:#6b7280;", "Total bugs squashed")?;
        let rank_total = text(doc, "div", "font-size:24px; font-weight:800; color:#7e22ce;", "")?;
        let quip = text(doc, "p", "margin:12px 0 0; font-size:12px; color:#6b7280;", "HR just opened a ticket to upgrade your nerf-gun budget.")?;
        let close = text(doc, "button", "position:absolute; top:8px; right:12px; border:none; background:transparent; font-size:20px; cursor:pointer;", "×")?;
        close.set_attribute("type", "button")?;
        close.set_attribute("aria-label", "Close celebration")?;
        for child in [&rank_icon, &title, &line, &caption, &rank_total, &quip, &close] {
            panel.append_child(child)?;
        }
        backdrop.append_child(&panel)?;
        body.append_child(&backdrop)?;

        Ok(Self {
            bug,
            score,
            score_count,
            plus_one,
            backdrop,
            rank_icon,
            rank_name,
            rank_total,
            close,
            shown_total: None,
            shown_celebration: None,
        })
    }

    fn render(&mut self, encounter: &Encounter, now: f64) -> Result<(), JsValue> {
        let bug_style = self.bug.style();
        match encounter.bug().filter(|b| b.visible) {
            Some(bug) => {
                let pos = bug.position_at(now);
                bug_style.set_property("display", "block")?;
                bug_style.set_property("left", &format!("{:.1}px", pos.x))?;
                bug_style.set_property("top", &format!("{:.1}px", pos.y))?;
                let heading = bug.heading_deg();
                let transform = if bug.squashing {
                    let t = bug.squash_progress(now, encounter.config().squash_ms);
                    bug_style.set_property("opacity", &format!("{:.2}", 1.0 - t))?;
                    format!("rotate({:.1}deg) scale({:.2}, {:.2})", heading, 1.0 + 0.4 * t, 1.0 - 0.7 * t)
                } else {
                    bug_style.set_property("opacity", "1")?;
                    format!("rotate({:.1}deg)", heading)
                };
                bug_style.set_property("transform", &transform)?;
            }
            None => bug_style.set_property("display", "none")?,
        }

        let total = encounter.total();
        if self.shown_total != Some(total) {
            self.score_count.set_text_content(Some(&total.to_string()));
            self.score.style().set_property("display", if total > 0 { "flex" } else { "none" })?;
            self.shown_total = Some(total);
        }
        let pulse = if encounter.score_pulse_active() { "scale(1.25)" } else { "scale(1)" };
        self.score_count.style().set_property("transform", pulse)?;
        let plus_one = if encounter.floating_one_active() { "block" } else { "none" };
        self.plus_one.style().set_property("display", plus_one)?;

        let celebration = encounter.celebration().map(|c| (c.rank.id, c.total));
        if celebration != self.shown_celebration {
            match encounter.celebration() {
                Some(c) => {
                    self.rank_icon.set_text_content(Some(c.rank.icon));
                    self.rank_icon.style().set_property("color", c.rank.accent)?;
                    self.rank_name.set_text_content(Some(c.rank.name));
                    self.rank_total.set_text_content(Some(&format!("#{}", c.total)));
                    self.backdrop.style().set_property("display", "flex")?;
                }
                None => self.backdrop.style().set_property("display", "none")?,
            }
            self.shown_celebration = celebration;
        }
        Ok(())
    }

    fn unmount(&self) {
        self.bug.remove();
        self.score.remove();
        self.backdrop.remove();
    }
}
