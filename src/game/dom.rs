//! Browser front end: start screen, tutorial, game overlays, input listeners
//! and the 1 Hz countdown timer.
//!
//! All elements are created (or reused) by id and appended to the document
//! body with inline styles. Session state lives in a thread-local cell; event
//! closures are leaked via `forget()` for the lifetime of the page.

use std::cell::{Cell, RefCell};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, window};

use super::GameSession;
use super::history::{KeyValueStore, ScoreHistory};
use super::round::{NoticeKind, Outcome, RoundConfig};
use crate::{OPTION_KEYS, TUTORIAL_STEPS};

/// Balloon fill colors per answer slot.
pub const BALLOON_COLORS: [&str; 4] = ["#4ade80", "#fde047", "#60a5fa", "#f472b6"];

const CELEBRATION_MS: i32 = 1500;
const TOAST_MS: i32 = 1800;

// --- localStorage adapter ----------------------------------------------------

/// `localStorage`-backed store. Degrades to a no-op when storage is
/// unavailable (private browsing, disabled cookies); reads then come back
/// empty and the game still runs.
pub struct BrowserStore {
    storage: Option<web_sys::Storage>,
}

impl BrowserStore {
    pub fn from_window() -> Self {
        let storage = window().and_then(|w| w.local_storage().ok()).flatten();
        Self { storage }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage
            .as_ref()
            .and_then(|s| s.get_item(key).ok())
            .flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(s) = &self.storage {
            let _ = s.set_item(key, value);
        }
    }
}

// --- Session cell ------------------------------------------------------------

struct SessionState {
    session: GameSession<BrowserStore>,
    // setInterval handle for the 1 Hz tick; cleared on every path that ends
    // or tears down the round.
    interval_handle: Option<i32>,
}

thread_local! {
    static SESSION: RefCell<Option<SessionState>> = RefCell::new(None);
    static TUTORIAL_STEP: Cell<usize> = const { Cell::new(0) };
    static LISTENERS_BOUND: Cell<bool> = const { Cell::new(false) };
}

// --- Element styles ----------------------------------------------------------

const STYLE_CARD: &str = "position:fixed; left:50%; top:18%; transform:translateX(-50%); width:min(520px,90vw); padding:28px 32px; background:#ffffff; border:2px solid #bfdbfe; border-radius:16px; box-shadow:0 8px 32px rgba(0,0,0,0.18); font-family:'Trebuchet MS', sans-serif; text-align:center; z-index:30;";
const STYLE_HEADER: &str = "position:fixed; top:14px; left:50%; transform:translateX(-50%); width:min(640px,92vw); display:flex; justify-content:space-between; font-family:'Trebuchet MS', sans-serif; font-size:20px; font-weight:bold; color:#1e3a5f; z-index:25;";
const STYLE_TIMER: &str = "position:fixed; top:52px; left:50%; transform:translateX(-50%); width:min(640px,92vw); z-index:25;";
const STYLE_QUESTION: &str = "position:fixed; top:26%; left:50%; transform:translateX(-50%); font-family:'Trebuchet MS', sans-serif; font-size:32px; font-weight:bold; color:#1e3a5f; text-align:center; z-index:25;";
const STYLE_OPTIONS: &str = "position:fixed; top:40%; left:50%; transform:translateX(-50%); display:flex; gap:36px; z-index:25;";
const STYLE_TOAST: &str = "position:fixed; bottom:28px; left:50%; transform:translateX(-50%); padding:10px 18px; background:rgba(0,0,0,0.75); color:#ffffff; border-radius:10px; font-family:'Trebuchet MS', sans-serif; font-size:16px; text-align:center; z-index:50;";
const STYLE_CELEBRATE: &str = "position:fixed; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.35); color:#ffffff; font-family:'Trebuchet MS', sans-serif; font-size:44px; font-weight:bold; text-align:center; white-space:pre-line; z-index:60;";

// --- Entry -------------------------------------------------------------------

/// Mount the start screen and bind the page-wide input listeners. Called once
/// from `start_game()`.
pub fn mount_start_screen() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let existed = doc.get_element_by_id("bm-start").is_some();
    let card = ensure_element(&doc, "bm-start", STYLE_CARD)?;
    if existed {
        // Re-entry only needs to make the card visible again; the children and
        // their listeners are already in place.
        refresh_history_panel(&doc);
        return Ok(());
    }
    card.set_inner_html(
        "<h1 style='color:#1e40af; font-size:30px; margin:0 0 20px 0;'>¡Explosión de Multiplicaciones!</h1>\
         <button id='bm-start-btn' style='background:#06b6d4; color:#ffffff; border:none; border-radius:10px; padding:16px 28px; font-size:20px; cursor:pointer;'>INICIAR JUEGO</button>\
         <button id='bm-progress-btn' style='background:#ffffff; color:#1e3a5f; border:2px solid #cbd5e1; border-radius:10px; padding:16px 28px; font-size:20px; margin-left:12px; cursor:pointer;'>VER PROGRESO</button>\
         <div id='bm-history' style='display:none; margin-top:18px; font-size:17px; color:#334155;'></div>",
    );

    bind_page_listeners(&doc)?;
    refresh_history_panel(&doc);
    Ok(())
}

fn bind_page_listeners(doc: &Document) -> Result<(), JsValue> {
    if LISTENERS_BOUND.with(|b| b.replace(true)) {
        return Ok(());
    }

    if let Some(btn) = doc.get_element_by_id("bm-start-btn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            TUTORIAL_STEP.with(|s| s.set(0));
            show_tutorial_step().ok();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(btn) = doc.get_element_by_id("bm-progress-btn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                refresh_history_panel(&doc);
                if let Some(panel) = doc.get_element_by_id("bm-history") {
                    let visible = panel
                        .get_attribute("style")
                        .map(|s| s.contains("display:none"))
                        .unwrap_or(true);
                    let display = if visible { "block" } else { "none" };
                    panel
                        .set_attribute(
                            "style",
                            &format!(
                                "display:{display}; margin-top:18px; font-size:17px; color:#334155;"
                            ),
                        )
                        .ok();
                }
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyboard bindings a/s/d/f select answer slots 0-3.
    let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        let key = evt.key().to_lowercase();
        if let Some(c) = key.chars().next() {
            if key.len() == 1 {
                if let Some(index) = OPTION_KEYS.iter().position(|k| *k == c) {
                    handle_slot(index);
                }
            }
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// --- Tutorial ----------------------------------------------------------------

fn show_tutorial_step() -> Result<(), JsValue> {
    let doc = window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    hide(&doc, "bm-start");

    let step = TUTORIAL_STEP.with(|s| s.get());
    let (title, body) = TUTORIAL_STEPS[step.min(TUTORIAL_STEPS.len() - 1)];
    let last = step + 1 >= TUTORIAL_STEPS.len();
    let label = if last { "¡Empezar!" } else { "Siguiente" };

    let card = ensure_element(&doc, "bm-tutorial", STYLE_CARD)?;
    card.set_inner_html(&format!(
        "<h2 style='color:#1e40af; font-size:24px; margin:0 0 12px 0;'>{title}</h2>\
         <p style='font-size:18px; color:#334155;'>{body}</p>\
         <button id='bm-tutorial-next' style='background:#06b6d4; color:#ffffff; border:none; border-radius:10px; padding:12px 24px; font-size:18px; cursor:pointer;'>{label}</button>",
    ));

    if let Some(btn) = doc.get_element_by_id("bm-tutorial-next") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            let step = TUTORIAL_STEP.with(|s| {
                let next = s.get() + 1;
                s.set(next);
                next
            });
            if step >= TUTORIAL_STEPS.len() {
                if let Some(doc) = window().and_then(|w| w.document()) {
                    hide(&doc, "bm-tutorial");
                }
                begin_round().ok();
            } else {
                show_tutorial_step().ok();
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

// --- Round lifecycle ---------------------------------------------------------

fn begin_round() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Tear down any previous session, including its timer.
    SESSION.with(|cell| {
        if let Some(old) = cell.borrow_mut().take() {
            if let Some(handle) = old.interval_handle {
                win.clear_interval_with_handle(handle);
            }
        }
    });

    build_game_screen(&doc)?;

    let session = GameSession::new(BrowserStore::from_window(), RoundConfig::default());
    SESSION.with(|cell| {
        cell.replace(Some(SessionState {
            session,
            interval_handle: None,
        }))
    });

    // 1 Hz countdown tick. Handle is kept on the session so every exit path
    // can cancel it.
    let closure = Closure::wrap(Box::new(move || on_tick()) as Box<dyn FnMut()>);
    let handle =
        win.set_interval_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), 1_000)?;
    closure.forget();
    SESSION.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            state.interval_handle = Some(handle);
        }
    });

    render();
    dispatch_notices();
    Ok(())
}

fn build_game_screen(doc: &Document) -> Result<(), JsValue> {
    hide(doc, "bm-start");
    hide(doc, "bm-gameover");

    let header = ensure_element(doc, "bm-header", STYLE_HEADER)?;
    header.set_inner_html(
        "<span id='bm-level'>Nivel: 1</span><span id='bm-score'>⭐ 0</span>",
    );

    let timer = ensure_element(doc, "bm-timer", STYLE_TIMER)?;
    timer.set_inner_html(
        "<div style='height:8px; background:#e2e8f0; border-radius:4px; overflow:hidden;'>\
         <div id='bm-timer-bar' style='height:8px; width:100%; background:#22c55e;'></div></div>\
         <div id='bm-timer-label' style='text-align:center; margin-top:4px; font-family:\"Trebuchet MS\", sans-serif; font-size:14px; color:#334155;'></div>",
    );

    ensure_element(doc, "bm-question", STYLE_QUESTION)?;

    let options = ensure_element(doc, "bm-options", STYLE_OPTIONS)?;
    let mut html = String::new();
    for (i, key) in OPTION_KEYS.iter().enumerate() {
        let color = BALLOON_COLORS[i];
        let caption = key.to_ascii_uppercase();
        html.push_str(&format!(
            "<div style='display:flex; flex-direction:column; align-items:center; gap:8px;'>\
             <div style='width:44px; height:44px; display:flex; align-items:center; justify-content:center; background:#1f2937; color:#ffffff; border-radius:10px; font-weight:bold; font-family:\"Trebuchet MS\", sans-serif;'>{caption}</div>\
             <div id='bm-balloon-{i}' style='width:84px; height:84px; display:flex; align-items:center; justify-content:center; background:{color}; border-radius:50%; font-size:26px; font-weight:bold; font-family:\"Trebuchet MS\", sans-serif; box-shadow:0 4px 12px rgba(0,0,0,0.25); cursor:pointer;'></div>\
             </div>",
        ));
    }
    options.set_inner_html(&html);

    for i in 0..OPTION_KEYS.len() {
        if let Some(balloon) = doc.get_element_by_id(&format!("bm-balloon-{i}")) {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                handle_slot(i);
            }) as Box<dyn FnMut(_)>);
            balloon.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
    }
    Ok(())
}

/// Resolve a click / key press on answer slot `index`. Empty slots (distractor
/// shortfall) and out-of-phase input are no-ops.
fn handle_slot(index: usize) {
    let mut outcome = Outcome::Ignored;
    SESSION.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            if let Some(&value) = state.session.round().options().get(index) {
                outcome = state.session.submit_answer(value);
            }
        }
    });
    match outcome {
        Outcome::Ignored => {}
        Outcome::GameOver { final_score } | Outcome::TimedOut { final_score } => {
            end_round(final_score);
        }
        _ => {
            render();
            dispatch_notices();
        }
    }
}

fn on_tick() {
    let mut timed_out = None;
    SESSION.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            if let Outcome::TimedOut { final_score } = state.session.tick() {
                timed_out = Some(final_score);
            }
        }
    });
    match timed_out {
        Some(final_score) => end_round(final_score),
        None => render(),
    }
}

fn end_round(final_score: u32) {
    let Some(win) = window() else { return };
    let Some(doc) = win.document() else { return };

    // Cancel the countdown before anything else.
    let mut title = "";
    let mut body = String::new();
    let mut history = Vec::new();
    SESSION.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            if let Some(handle) = state.interval_handle.take() {
                win.clear_interval_with_handle(handle);
            }
            for notice in state.session.drain_notices() {
                if matches!(notice.kind, NoticeKind::TimeOut | NoticeKind::GameOver) {
                    title = notice.title;
                    body = notice.body;
                }
            }
            history = state.session.history();
        }
    });

    hide(&doc, "bm-header");
    hide(&doc, "bm-timer");
    hide(&doc, "bm-question");
    hide(&doc, "bm-options");

    let mut list = String::new();
    for score in &history {
        list.push_str(&format!("<li>⭐ {score}</li>"));
    }
    if let Ok(card) = ensure_element(&doc, "bm-gameover", STYLE_CARD) {
        card.set_inner_html(&format!(
            "<h2 style='color:#1e40af; font-size:26px; margin:0 0 8px 0;'>{title}</h2>\
             <p style='font-size:18px; color:#334155;'>{body}</p>\
             <p style='font-size:22px; font-weight:bold; color:#1e3a5f;'>Conseguiste {final_score} estrellas</p>\
             <div style='font-size:16px; color:#334155;'>Puntuaciones recientes:<ol style='list-style:none; padding:0;'>{list}</ol></div>\
             <button id='bm-back' style='background:#ffffff; color:#1e3a5f; border:2px solid #cbd5e1; border-radius:10px; padding:12px 24px; font-size:18px; cursor:pointer;'>Volver al inicio</button>",
        ));
        if let Some(btn) = doc.get_element_by_id("bm-back") {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                back_to_start();
            }) as Box<dyn FnMut(_)>);
            if btn
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .is_ok()
            {
                closure.forget();
            }
        }
    }
}

fn back_to_start() {
    let Some(win) = window() else { return };
    let Some(doc) = win.document() else { return };
    SESSION.with(|cell| {
        if let Some(state) = cell.borrow_mut().take() {
            if let Some(handle) = state.interval_handle {
                win.clear_interval_with_handle(handle);
            }
        }
    });
    hide(&doc, "bm-gameover");
    refresh_history_panel(&doc);
    if let Some(card) = doc.get_element_by_id("bm-start") {
        card.set_attribute("style", STYLE_CARD).ok();
    }
}

// --- Rendering ---------------------------------------------------------------

fn render() {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    SESSION.with(|cell| {
        if let Some(state) = cell.borrow().as_ref() {
            let round = state.session.round();
            set_text(&doc, "bm-level", &format!("Nivel: {}", round.level()));
            set_text(&doc, "bm-score", &format!("⭐ {}", round.score()));
            set_text(&doc, "bm-question", &round.question().prompt());

            let seconds = round.time_remaining();
            let budget = round.config().round_seconds.max(1);
            let pct = seconds * 100 / budget;
            let color = if seconds <= 3 {
                "#ef4444"
            } else if seconds <= 5 {
                "#eab308"
            } else {
                "#22c55e"
            };
            if let Some(bar) = doc.get_element_by_id("bm-timer-bar") {
                bar.set_attribute(
                    "style",
                    &format!("height:8px; width:{pct}%; background:{color};"),
                )
                .ok();
            }
            set_text(&doc, "bm-timer-label", &format!("Tiempo: {seconds}s"));

            let options = round.options();
            for i in 0..OPTION_KEYS.len() {
                let text = options
                    .get(i)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                set_text(&doc, &format!("bm-balloon-{i}"), &text);
            }
        }
    });
}

/// Surface pending notices: level-ups get the celebration overlay (which
/// resumes the round when it closes), everything else gets a toast.
fn dispatch_notices() {
    let mut notices = Vec::new();
    SESSION.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            notices = state.session.drain_notices();
        }
    });
    for notice in notices {
        match notice.kind {
            NoticeKind::LevelUp => show_celebration(&format!("{}\n{}", notice.title, notice.body)),
            _ => show_toast(notice.title, &notice.body),
        }
    }
}

fn show_celebration(message: &str) {
    let Some(win) = window() else { return };
    let Some(doc) = win.document() else { return };
    if let Ok(overlay) = ensure_element(&doc, "bm-celebrate", STYLE_CELEBRATE) {
        overlay.set_text_content(Some(message));
        overlay.set_attribute("style", STYLE_CELEBRATE).ok();
    }
    let closure = Closure::once(move || {
        SESSION.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                state.session.advance();
            }
        });
        if let Some(doc) = window().and_then(|w| w.document()) {
            hide(&doc, "bm-celebrate");
        }
        render();
    });
    if win
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            CELEBRATION_MS,
        )
        .is_ok()
    {
        closure.forget();
    }
}

fn show_toast(title: &str, body: &str) {
    let Some(win) = window() else { return };
    let Some(doc) = win.document() else { return };
    if let Ok(toast) = ensure_element(&doc, "bm-toast", STYLE_TOAST) {
        toast.set_inner_html(&format!("<b>{title}</b><br>{body}"));
        toast.set_attribute("style", STYLE_TOAST).ok();
    }
    let closure = Closure::once(move || {
        if let Some(doc) = window().and_then(|w| w.document()) {
            hide(&doc, "bm-toast");
        }
    });
    if win
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TOAST_MS,
        )
        .is_ok()
    {
        closure.forget();
    }
}

fn refresh_history_panel(doc: &Document) {
    let history = ScoreHistory::new(BrowserStore::from_window());
    let scores = history.load();
    if let Some(panel) = doc.get_element_by_id("bm-history") {
        if scores.is_empty() {
            panel.set_inner_html("Todavía no hay puntuaciones.");
        } else {
            let mut list = String::from("<ol style='list-style:none; padding:0;'>");
            for score in &scores {
                list.push_str(&format!("<li>⭐ {score}</li>"));
            }
            list.push_str("</ol>");
            panel.set_inner_html(&list);
        }
    }
}

// --- DOM helpers -------------------------------------------------------------

/// Create (or reuse) a body-level element with the given id and style.
fn ensure_element(doc: &Document, id: &str, style: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_attribute("style", style)?;
        return Ok(el);
    }
    let el = doc.create_element("div")?;
    el.set_id(id);
    el.set_attribute("style", style)?;
    doc.body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&el)?;
    Ok(el)
}

fn hide(doc: &Document, id: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_attribute("style", "display:none;").ok();
    }
}

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}
