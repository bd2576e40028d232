//! Browser binding
//!
//! `DomPresenter` paints the app onto the page: page containers toggled by
//! their `active` class, the game on a 2D canvas, quiz and story markup in
//! their slots. `run` wires browser events to the shared `App`, services
//! its host requests and keeps one `setTimeout` armed for the next timer
//! deadline, always running the same callback.

use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, ClipboardEvent, Document, Element, Event, EventTarget,
    HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement, KeyboardEvent,
    MouseEvent, Performance, TouchEvent, Window,
};

use super::markup;
use crate::app::{App, HostRequest};
use crate::cards::{Catalog, StoryBlock};
use crate::flow::{Millis, PageId};
use crate::input::Key;
use crate::port::{GateStatus, Presenter};
use crate::quiz::{Feedback, QuestionView, Summary};
use crate::render::{self, DrawCmd};
use crate::settings::Settings;

const CANVAS_ID: &str = "gameCanvas";
const DECOY_ID: &str = "noPlayBtn";
const CELL_SELECTOR: &str = ".password-input";

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

pub struct DomPresenter {
    window: Window,
    document: Document,
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
}

impl DomPresenter {
    pub fn new(window: Window, document: Document) -> Self {
        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        let ctx = canvas
            .as_ref()
            .and_then(|c| c.get_context("2d").ok().flatten())
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            log::warn!("No 2D context on #{CANVAS_ID}");
        }
        Self {
            window,
            document,
            canvas,
            ctx,
        }
    }

    fn html_element(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn query(&self, selector: &str) -> Option<HtmlElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn query_all<T: JsCast>(&self, selector: &str) -> Vec<T> {
        query_all(&self.document, selector)
    }

    fn set_html(&self, id: &str, html: &str) {
        match self.document.get_element_by_id(id) {
            Some(el) => el.set_inner_html(html),
            None => log::debug!("No #{id} to fill"),
        }
    }
}

fn query_all<T: JsCast>(document: &Document, selector: &str) -> Vec<T> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

fn clear_style(el: &HtmlElement, property: &str) {
    let _ = el.style().remove_property(property);
}

impl Presenter for DomPresenter {
    fn set_page_active(&mut self, page: PageId, active: bool) {
        let Some(el) = self.document.get_element_by_id(&page.dom_id()) else {
            log::debug!("No container for {page}");
            return;
        };
        let classes = el.class_list();
        let _ = if active {
            classes.add_1("active")
        } else {
            classes.remove_1("active")
        };
    }

    fn scroll_to_origin(&mut self) {
        self.window.scroll_to_with_x_and_y(0.0, 0.0);
    }

    fn set_gift_opening(&mut self, active: bool) {
        if let Some(el) = self.query(".grand-opening-container") {
            let classes = el.class_list();
            let _ = if active {
                classes.add_1("active")
            } else {
                classes.remove_1("active")
            };
        }
    }

    fn canvas_size(&self) -> Option<Vec2> {
        let canvas = self.canvas.as_ref()?;
        Some(Vec2::new(
            canvas.offset_width() as f32,
            canvas.offset_height() as f32,
        ))
    }

    fn set_canvas_size(&mut self, size: Vec2) {
        if let Some(canvas) = &self.canvas {
            canvas.set_width(size.x.max(0.0) as u32);
            canvas.set_height(size.y.max(0.0) as u32);
        }
    }

    fn draw(&mut self, commands: &[DrawCmd]) {
        if let Some(ctx) = &self.ctx {
            for cmd in commands {
                paint(ctx, cmd);
            }
        }
    }

    fn set_progress(&mut self, score: u32, target: u32, fill: f32) {
        if let Some(bar) = self.html_element("loveMeterFill") {
            set_style(&bar, "width", &format!("{}%", fill * 100.0));
        }
        if let Some(label) = self.document.get_element_by_id("loveMeterText") {
            label.set_text_content(Some(&format!("{score} / {target}")));
        }
    }

    fn set_cell(&mut self, index: usize, value: &str) {
        if let Some(cell) = self.query_all::<HtmlInputElement>(CELL_SELECTOR).get(index) {
            cell.set_value(value);
        }
    }

    fn focus_cell(&mut self, index: usize) {
        if let Some(cell) = self.query_all::<HtmlInputElement>(CELL_SELECTOR).get(index) {
            let _ = cell.focus();
        }
    }

    fn set_gate_status(&mut self, status: GateStatus) {
        let Some(el) = self.html_element("errorMessage") else {
            return;
        };
        match status {
            GateStatus::Idle => {
                el.set_text_content(None);
                clear_style(&el, "color");
            }
            GateStatus::Success => {
                el.set_text_content(Some(markup::GATE_ACCEPTED));
                set_style(&el, "color", markup::COLOR_SUCCESS);
            }
            GateStatus::Error => {
                el.set_text_content(Some(markup::GATE_REJECTED));
                set_style(&el, "color", markup::COLOR_ERROR);
            }
        }
    }

    fn set_gate_alarm(&mut self, on: bool, shake: bool) {
        if let Some(card) = self.query(".password-card") {
            if on && shake {
                set_style(&card, "animation", "shake 0.5s");
            } else {
                clear_style(&card, "animation");
            }
        }
        for cell in self.query_all::<HtmlElement>(CELL_SELECTOR) {
            if on {
                set_style(&cell, "border-color", markup::COLOR_ERROR);
            } else {
                clear_style(&cell, "border-color");
            }
        }
    }

    fn show_question(&mut self, view: &QuestionView<'_>) {
        self.set_html("quizContent", &markup::question(view));
    }

    fn mark_answer(&mut self, feedback: &Feedback) {
        self.set_html("quizFeedback", &markup::feedback(feedback));
        let options = self.query_all::<HtmlButtonElement>(".quiz-option");
        for (i, button) in options.iter().enumerate() {
            button.set_disabled(true);
            if i == feedback.correct {
                set_style(button, "background", markup::OPTION_RIGHT_BG);
                set_style(button, "border-color", markup::OPTION_RIGHT_BORDER);
            } else if i == feedback.selected {
                set_style(button, "background", markup::OPTION_WRONG_BG);
                set_style(button, "border-color", markup::OPTION_WRONG_BORDER);
            }
        }
    }

    fn show_summary(&mut self, summary: &Summary) {
        self.set_html("quizContent", &markup::summary(summary));
    }

    fn show_story(&mut self, blocks: &[StoryBlock]) {
        self.set_html("memoryContent", &markup::story(blocks));
    }

    fn move_decoy(&mut self, offset: Vec2) {
        let Some(button) = self.html_element(DECOY_ID) else {
            return;
        };
        set_style(&button, "position", "fixed");
        set_style(&button, "left", "50%");
        set_style(&button, "top", "50%");
        set_style(
            &button,
            "transform",
            &format!(
                "translate(calc(-50% + {}px), calc(-50% + {}px))",
                offset.x, offset.y
            ),
        );
    }
}

/// Execute one draw command
fn paint(ctx: &CanvasRenderingContext2d, cmd: &DrawCmd) {
    match *cmd {
        DrawCmd::Clear { width, height } => {
            ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
        }
        DrawCmd::Heart {
            center,
            size,
            rotation,
        } => {
            ctx.save();
            let _ = ctx.translate(center.x as f64, center.y as f64);
            let _ = ctx.rotate(rotation as f64);
            ctx.set_font(&format!("{size}px Arial"));
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            let _ = ctx.fill_text(render::HEART_GLYPH, 0.0, 0.0);
            ctx.restore();
        }
        DrawCmd::Flourish { pos } => {
            ctx.save();
            ctx.set_global_alpha(0.8);
            ctx.set_font(&format!("{}px Arial", render::FLOURISH_SIZE));
            ctx.set_text_align("center");
            let _ = ctx.fill_text(render::FLOURISH_GLYPH, pos.x as f64, pos.y as f64);
            ctx.restore();
        }
        DrawCmd::Basket { pos, width, height } => {
            let (x, y) = (pos.x as f64, pos.y as f64);
            let (w, h) = (width as f64, height as f64);

            // Bowl
            ctx.set_fill_style_str(render::BASKET_FILL);
            ctx.begin_path();
            let _ = ctx.arc(x + w / 2.0, y + h, w / 2.0, PI, 0.0);
            ctx.fill();

            // Handle
            ctx.set_stroke_style_str(render::BASKET_HANDLE);
            ctx.set_line_width(4.0);
            ctx.begin_path();
            let _ = ctx.arc(x + w / 2.0, y + h / 2.0, w / 2.5, PI, 0.0);
            ctx.stroke();

            // Weave
            ctx.set_stroke_style_str(render::BASKET_WEAVE);
            ctx.set_line_width(2.0);
            for i in 0..5 {
                let sx = x + w / 5.0 * i as f64 + w / 10.0;
                ctx.begin_path();
                ctx.move_to(sx, y + h * 0.3);
                ctx.line_to(sx, y + h);
                ctx.stroke();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

/// A removable event listener
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(target: &EventTarget, kind: &'static str, f: impl FnMut(Event) + 'static) -> Self {
        let callback = Closure::<dyn FnMut(Event)>::new(f);
        let _ = target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            kind,
            callback,
        }
    }

    fn remove(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Listener that lives as long as the page
fn listen(target: &EventTarget, kind: &str, f: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(f);
    let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// The browser timeout currently armed: app deadline and its handle
#[derive(Clone, Copy)]
struct Armed {
    deadline: Millis,
    handle: i32,
}

struct Host {
    app: RefCell<App<DomPresenter>>,
    window: Window,
    document: Document,
    /// Monotonic clock; app time is `performance.now()`
    performance: Performance,
    timeout: Cell<Option<Armed>>,
    /// The one callback every timeout runs, built once in `run`
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
    game_listeners: RefCell<Vec<Listener>>,
}

type Shared = Rc<Host>;

impl Host {
    fn now(&self) -> Millis {
        self.performance.now().max(0.0) as Millis
    }
}

/// Run `f` against the app at the current time, then service whatever it
/// asked of the host
fn dispatch(host: &Shared, f: impl FnOnce(&mut App<DomPresenter>)) {
    {
        let mut app = host.app.borrow_mut();
        app.advance(host.now());
        f(&mut app);
    }
    service(host);
}

fn service(host: &Shared) {
    let (requests, deadline) = {
        let mut app = host.app.borrow_mut();
        (app.drain_requests(), app.next_deadline())
    };

    for request in requests {
        match request {
            HostRequest::Frame => request_animation_frame(host.clone()),
            HostRequest::AttachGameInput => attach_game_input(host),
            HostRequest::DetachGameInput => detach_game_input(host),
        }
    }

    arm_timeout(host, deadline);
}

fn request_animation_frame(host: Shared) {
    let window = host.window.clone();
    let closure = Closure::once(move |_time: f64| {
        dispatch(&host, |app| app.frame());
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn timeout_callback(host: Weak<Host>) -> Closure<dyn FnMut()> {
    Closure::<dyn FnMut()>::new(move || {
        if let Some(host) = host.upgrade() {
            host.timeout.set(None);
            dispatch(&host, |_| {});
        }
    })
}

/// Keep exactly one browser timeout armed for the earliest app deadline
fn arm_timeout(host: &Shared, deadline: Option<Millis>) {
    let armed = host.timeout.get();
    if armed.map(|a| a.deadline) == deadline {
        return;
    }
    if let Some(armed) = armed {
        host.window.clear_timeout_with_handle(armed.handle);
        host.timeout.set(None);
    }
    let Some(deadline) = deadline else {
        return;
    };

    let tick = host.tick.borrow();
    let Some(callback) = tick.as_ref() else {
        return;
    };
    let delay = deadline.saturating_sub(host.now()).min(i32::MAX as Millis) as i32;
    match host
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay,
        ) {
        Ok(handle) => host.timeout.set(Some(Armed { deadline, handle })),
        Err(e) => log::error!("setTimeout failed: {e:?}"),
    }
}

fn canvas(document: &Document) -> Option<HtmlCanvasElement> {
    document
        .get_element_by_id(CANVAS_ID)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
}

fn attach_game_input(host: &Shared) {
    let mut listeners = host.game_listeners.borrow_mut();

    // Keyboard
    {
        let h = host.clone();
        listeners.push(Listener::new(&host.document, "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                let key = Key::from_dom(&event.key());
                dispatch(&h, |app| app.key_down(key));
            }
        }));
    }
    {
        let h = host.clone();
        listeners.push(Listener::new(&host.document, "keyup", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                let key = Key::from_dom(&event.key());
                dispatch(&h, |app| app.key_up(key));
            }
        }));
    }

    let Some(canvas) = canvas(&host.document) else {
        log::warn!("No #{CANVAS_ID}; pointer input not attached");
        return;
    };

    // Mouse follows absolute position
    {
        let h = host.clone();
        let c = canvas.clone();
        listeners.push(Listener::new(&canvas, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let x = event.client_x() as f32 - c.get_bounding_client_rect().left() as f32;
                dispatch(&h, |app| app.pointer_moved(x));
            }
        }));
    }

    // Touch
    {
        let h = host.clone();
        let c = canvas.clone();
        listeners.push(Listener::new(&canvas, "touchmove", move |event| {
            event.prevent_default();
            let Some(touch) = event
                .dyn_ref::<TouchEvent>()
                .and_then(|e| e.touches().get(0))
            else {
                return;
            };
            let x = touch.client_x() as f32 - c.get_bounding_client_rect().left() as f32;
            dispatch(&h, |app| app.pointer_moved(x));
        }));
    }

    log::debug!("Game input attached");
}

fn detach_game_input(host: &Shared) {
    for listener in host.game_listeners.borrow_mut().drain(..) {
        listener.remove();
    }
    log::debug!("Game input detached");
}

/// Delegated click handling for every `data-action` element
fn setup_actions(host: &Shared) {
    let h = host.clone();
    listen(&host.document, "click", move |event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let Ok(Some(el)) = target.closest("[data-action]") else {
            return;
        };
        let index = |name: &str| el.get_attribute(name).and_then(|v| v.parse::<usize>().ok());

        match el.get_attribute("data-action").as_deref() {
            Some("play") => dispatch(&h, |app| app.start_game()),
            Some("open-card") => {
                if let Some(card) = index("data-card") {
                    dispatch(&h, |app| app.open_card(card));
                }
            }
            Some("back") => dispatch(&h, |app| app.back_to_cards()),
            Some("answer") => {
                if let Some(choice) = index("data-answer") {
                    dispatch(&h, |app| app.select_answer(choice));
                }
            }
            Some("retry") => dispatch(&h, |app| app.retry_quiz()),
            other => log::debug!("Unhandled action {other:?}"),
        }
    });
}

fn setup_passcode(host: &Shared) {
    let cells = query_all::<HtmlInputElement>(&host.document, CELL_SELECTOR);
    for (index, cell) in cells.iter().enumerate() {
        {
            let h = host.clone();
            let c = cell.clone();
            listen(cell, "input", move |_event| {
                let value = c.value();
                dispatch(&h, |app| app.cell_input(index, &value));
            });
        }
        {
            let h = host.clone();
            listen(cell, "keydown", move |event| {
                if event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|e| e.key() == "Backspace")
                {
                    dispatch(&h, |app| app.cell_backspace(index));
                }
            });
        }
        {
            let h = host.clone();
            listen(cell, "paste", move |event| {
                event.prevent_default();
                let text = event
                    .dyn_ref::<ClipboardEvent>()
                    .and_then(|e| e.clipboard_data())
                    .and_then(|data| data.get_data("text").ok())
                    .unwrap_or_default();
                dispatch(&h, |app| app.cell_paste(index, &text));
            });
        }
    }
    log::debug!("{} passcode cells wired", cells.len());
}

fn setup_decoy(host: &Shared) {
    let Some(button) = host
        .document
        .get_element_by_id(DECOY_ID)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };

    for kind in ["mouseenter", "touchstart", "click"] {
        let h = host.clone();
        let b = button.clone();
        listen(&button, kind, move |event| {
            if kind == "touchstart" {
                event.prevent_default();
            }
            let dim = |v: Result<JsValue, JsValue>| {
                v.ok().and_then(|v| v.as_f64()).unwrap_or_default() as f32
            };
            let viewport = Vec2::new(dim(h.window.inner_width()), dim(h.window.inner_height()));
            let size = Vec2::new(b.offset_width() as f32, b.offset_height() as f32);
            dispatch(&h, |app| app.dodge_decoy(viewport, size));
        });
    }
}

fn setup_resize(host: &Shared) {
    let h = host.clone();
    listen(&host.window, "resize", move |_event| {
        dispatch(&h, |app| app.resize());
    });
}

/// Build the card grid and one page per card
fn mount_cards(document: &Document, catalog: &Catalog) -> Result<(), JsValue> {
    let grid = document
        .get_element_by_id("cardsGrid")
        .ok_or_else(|| JsValue::from_str("missing #cardsGrid"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("missing <body>"))?;

    for (index, card) in catalog.iter().enumerate() {
        grid.insert_adjacent_html("beforeend", &markup::card_tile(index, card))?;
        body.insert_adjacent_html("beforeend", &markup::card_page(index, card))?;
    }
    Ok(())
}

/// Mount the catalog, wire the page and show the landing page
pub fn run(settings: Settings, catalog: Catalog) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let performance = window
        .performance()
        .ok_or_else(|| JsValue::from_str("no performance clock"))?;
    mount_cards(&document, &catalog)?;

    let presenter = DomPresenter::new(window.clone(), document.clone());
    let host = Rc::new(Host {
        app: RefCell::new(App::new(presenter, settings, catalog)),
        window,
        document,
        performance,
        timeout: Cell::new(None),
        tick: RefCell::new(None),
        game_listeners: RefCell::new(Vec::new()),
    });
    host.tick
        .replace(Some(timeout_callback(Rc::downgrade(&host))));

    setup_actions(&host);
    setup_passcode(&host);
    setup_decoy(&host);
    setup_resize(&host);

    dispatch(&host, |app| app.boot());
    log::info!("Heart gift running");
    Ok(())
}
