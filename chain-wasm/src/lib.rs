use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent,
};

mod config;
mod constants;
mod physics;
mod state;
mod view;

use chain_core::{
    ChainRegistry, ClickOutcome, FrameLayout, Instruction, LayoutSpec, OPENED_COLOR, PENDING_COLOR,
    chain_color, resolve_collisions,
};

use crate::config::{fetch_layout_json, query_param};
use crate::constants::{FRAME_MARGIN, WORLD_H, WORLD_W};
use crate::physics::PhysicsWorld;
use crate::state::{Mode, STATE, State};
use crate::view::{Viewport, sync_backing_store};

fn log(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

// fillStyle/strokeStyle via property assignment; the typed setters are
// deprecated in web-sys.
fn set_paint(ctx: &CanvasRenderingContext2d, prop: &str, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str(prop),
        &JsValue::from_str(color),
    );
}

fn draw(state: &mut State) {
    sync_backing_store(&state.window, &state.canvas);
    state.view.fit(&state.canvas);
    let width = state.canvas.width() as f64;
    let height = state.canvas.height() as f64;
    state.ctx.clear_rect(0.0, 0.0, width, height);

    draw_frame(state);

    // Constraints first so the links overlap them.
    state.ctx.set_line_width((2.5 * state.view.scale()).max(1.5));
    for ((x1, y1), (x2, y2), style) in state.physics.constraint_segments() {
        let color = match style {
            chain_core::ConstraintStyle::Pending => PENDING_COLOR,
            chain_core::ConstraintStyle::Normal => "#555",
        };
        set_paint(&state.ctx, "strokeStyle", color);
        let (sx1, sy1) = state.view.to_screen(x1, y1);
        let (sx2, sy2) = state.view.to_screen(x2, y2);
        state.ctx.begin_path();
        state.ctx.move_to(sx1, sy1);
        state.ctx.line_to(sx2, sy2);
        state.ctx.stroke();
    }

    let mut draws: Vec<(chain_core::LinkId, &'static str)> = Vec::new();
    for (i, chain) in state.registry.all_chains().enumerate() {
        for link in chain.links() {
            draws.push((*link, chain_color(i)));
        }
    }
    // The opened link sits outside the registry while its session runs.
    if let Some(session) = state.controller.session() {
        draws.push((session.opened(), OPENED_COLOR));
    }

    for (link, color) in draws {
        let Some((x, y, angle)) = state.physics.link_pose(link) else {
            continue;
        };
        let color = match state.physics.link_style(link) {
            chain_core::LinkStyle::Opened => OPENED_COLOR,
            chain_core::LinkStyle::Normal => color,
        };
        let (hx, hy) = state.physics.link_half_extents(link);
        let (sx, sy) = state.view.to_screen(x, y);
        let (w, h) = (
            2.0 * hx as f64 * state.view.scale(),
            2.0 * hy as f64 * state.view.scale(),
        );
        state.ctx.save();
        let _ = state.ctx.translate(sx, sy);
        // screen y points down, so the rotation flips sign
        let _ = state.ctx.rotate(-angle as f64);
        set_paint(&state.ctx, "fillStyle", color);
        state.ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
        state.ctx.set_line_width(1.2);
        set_paint(&state.ctx, "strokeStyle", "#333");
        state.ctx.stroke_rect(-w / 2.0, -h / 2.0, w, h);
        state.ctx.restore();
    }

    update_status_dom(state);
}

fn draw_frame(state: &State) {
    let (x0, y0) = state.view.to_screen(0.0, 0.0);
    let (x1, y1) = state.view.to_screen(WORLD_W, WORLD_H);
    set_paint(&state.ctx, "strokeStyle", "#999");
    state.ctx.set_line_width(2.0);
    state.ctx.stroke_rect(x0, y1, x1 - x0, y0 - y1);
}

fn update_status_dom(state: &State) {
    if let Some(el) = state.document.get_element_by_id("status")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        let prompt = state.status.unwrap_or_else(|| match state.mode {
            Mode::Puzzle => state.controller.instruction(),
            Mode::Auto => {
                if state.registry.chain_count() <= 1 {
                    Instruction::AllConnected
                } else {
                    Instruction::DragChains
                }
            }
        });
        el.set_inner_text(prompt.text(&state.lang));
    }
}

fn update_note_dom(state: &State) {
    if let Some(el) = state.document.get_element_by_id("note")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        let note = if state.lang == "zh" {
            state.layout.note_zh.as_ref().or(state.layout.note_en.as_ref())
        } else {
            state.layout.note_en.as_ref().or(state.layout.note_zh.as_ref())
        };
        el.set_inner_text(note.map(String::as_str).unwrap_or(""));
    }
}

/// Convert client coordinates into canvas internal pixel coordinates so hit
/// testing works even if CSS scales the canvas element.
fn event_canvas_coords(e: &MouseEvent, cv: &HtmlCanvasElement) -> (f64, f64) {
    if let Some(el) = cv.dyn_ref::<web_sys::Element>() {
        let rect = el.get_bounding_client_rect();
        let x = (e.client_x() as f64 - rect.left()) * (cv.width() as f64) / rect.width().max(1.0);
        let y = (e.client_y() as f64 - rect.top()) * (cv.height() as f64) / rect.height().max(1.0);
        (x, y)
    } else {
        (e.offset_x() as f64, e.offset_y() as f64)
    }
}

fn handle_puzzle_click(state: &mut State, link: chain_core::LinkId) {
    let outcome = {
        let State {
            registry,
            physics,
            controller,
            ..
        } = state;
        controller.handle_click(registry, physics, link)
    };
    match outcome {
        ClickOutcome::Opened { .. } | ClickOutcome::Connected { .. } => {
            state.status = None;
        }
        ClickOutcome::Closed { links, .. } => {
            state.status = Some(if state.registry.chain_count() <= 1 {
                Instruction::AllConnected
            } else {
                Instruction::LinkClosed
            });
            log(&format!("closed a link; merged chain has {links} links"));
        }
        ClickOutcome::Cancelled { partial } => {
            state.status = Some(Instruction::Cancelled);
            if partial {
                log("cancelled after connecting; the made connections stay");
            }
        }
        ClickOutcome::RejectedAnchor { degree, .. } => {
            log(&format!("cannot open a link holding {degree} constraints"));
        }
        ClickOutcome::Ignored => {}
    }
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let (px, py) = event_canvas_coords(&e, &s.canvas);
            let (wx, wy) = s.view.to_world(px, py);
            let Some(link) = s.physics.link_at_point(wx, wy) else {
                return;
            };
            match s.mode {
                Mode::Auto => {
                    s.physics.begin_drag(link, wx, wy);
                    s.dragging = Some(link);
                }
                Mode::Puzzle => handle_puzzle_click(&mut s, link),
            }
            draw(&mut s);
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            if s.dragging.is_none() {
                return;
            }
            let (px, py) = event_canvas_coords(&e, &s.canvas);
            let (wx, wy) = s.view.to_world(px, py);
            s.physics.move_pointer(wx, wy);
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    {
        let st = state.clone();
        let mouseup = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            let mut s = st.borrow_mut();
            s.physics.end_drag();
            s.dragging = None;
        }));
        state
            .borrow()
            .window
            .add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
        mouseup.forget();
    }

    // Escape abandons an open-link session.
    {
        let st = state.clone();
        let keydown =
            Closure::<dyn FnMut(KeyboardEvent)>::wrap(Box::new(move |e: KeyboardEvent| {
                if e.key() != "Escape" {
                    return;
                }
                let mut s = st.borrow_mut();
                if s.mode != Mode::Puzzle {
                    return;
                }
                let outcome = {
                    let State {
                        registry,
                        physics,
                        controller,
                        ..
                    } = &mut *s;
                    controller.cancel(registry, physics)
                };
                if let ClickOutcome::Cancelled { partial } = outcome {
                    s.status = Some(Instruction::Cancelled);
                    if partial {
                        log("cancelled after connecting; the made connections stay");
                    }
                    draw(&mut s);
                }
            }));
        state
            .borrow()
            .window
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    // Language selector
    if let Some(sel) = doc.get_element_by_id("langSel") {
        let sel: HtmlElement = sel.dyn_into()?;
        let st = state.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            if let Some(input) = s.document.get_element_by_id("langSel")
                && let Ok(sel) = input.dyn_into::<web_sys::HtmlSelectElement>()
            {
                let v = sel.value();
                s.lang = if v.to_lowercase().starts_with("zh") {
                    "zh".to_string()
                } else {
                    "en".to_string()
                };
                update_note_dom(&s);
                update_status_dom(&s);
            }
        }));
        sel.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    }

    Ok(())
}

fn start_animation(state: Rc<RefCell<State>>) {
    type RafClosure = Closure<dyn FnMut(f64)>;
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        {
            let mut s = state.borrow_mut();
            let pairs = s.physics.step();
            if s.mode == Mode::Auto && !pairs.is_empty() {
                let merged = {
                    let State {
                        registry, physics, ..
                    } = &mut *s;
                    resolve_collisions(registry, physics, &pairs)
                };
                if let Some(m) = merged {
                    s.status = Some(if s.registry.chain_count() <= 1 {
                        Instruction::AllConnected
                    } else {
                        Instruction::Connected
                    });
                    log(&format!("chains merged; the new chain has {} links", m.links));
                }
            }
            draw(&mut s);
        }
        if let Some(w) = web_sys::window()
            && let Some(cb) = f.borrow().as_ref()
        {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = web_sys::window()
        && let Some(cb) = g.borrow().as_ref()
    {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Build a fresh world and registry from a layout: boundary walls, one body
/// chain per seed, and, in the puzzle variant, the first link of each chain
/// hung from a fixed anchor.
fn build_world(layout: &LayoutSpec, mode: Mode) -> Result<(PhysicsWorld, ChainRegistry), JsValue> {
    let mut physics = PhysicsWorld::new();
    let mut registry = ChainRegistry::new();
    physics.spawn_walls();
    let frame = FrameLayout {
        origin: (FRAME_MARGIN, FRAME_MARGIN),
        width: WORLD_W - 2.0 * FRAME_MARGIN,
        height: WORLD_H - 2.0 * FRAME_MARGIN,
    };
    for (i, seed) in frame.seeds(layout).iter().enumerate() {
        let links = physics
            .spawn_chain(&mut registry, seed, i)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        if mode == Mode::Puzzle
            && let Some(first) = links.first()
        {
            physics.pin_link(*first);
        }
    }
    Ok((physics, registry))
}

fn init_canvas(
    document: &Document,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id("cv")
        .ok_or_else(|| JsValue::from_str("canvas #cv not found"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document)?;

    let search = window.location().search().unwrap_or_default();
    let mode = match query_param(&search, "mode").as_deref() {
        Some("puzzle") => Mode::Puzzle,
        _ => Mode::Auto,
    };

    let layout = LayoutSpec::default();
    let (physics, registry) = build_world(&layout, mode)?;

    let state = Rc::new(RefCell::new(State {
        window: window.clone(),
        document,
        canvas,
        ctx,
        mode,
        layout,
        physics,
        registry,
        controller: Default::default(),
        dragging: None,
        view: Viewport::new(),
        status: None,
        lang: "en".to_string(),
    }));
    STATE.with(|st| st.replace(Some(state.clone())));

    // If URL param layout is set we try to fetch layouts/<name>.json; until
    // it arrives (or if it fails) the default layout stays up.
    if let Some(name) = query_param(&search, "layout") {
        let win = window.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = fetch_and_load_layout(win, &name).await {
                log(&format!("Failed to load layout '{}': {:?}", name, err));
            }
        });
    }

    {
        let s = state.borrow();
        update_note_dom(&s);
        update_status_dom(&s);
    }
    attach_ui(state.clone())?;
    start_animation(state.clone());
    draw(&mut state.borrow_mut());
    Ok(())
}

async fn fetch_and_load_layout(window: web_sys::Window, name: &str) -> Result<(), JsValue> {
    let text = fetch_layout_json(&window, name)
        .await
        .ok_or_else(|| JsValue::from_str("layout not found"))?;
    let layout: LayoutSpec =
        serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))?;

    STATE.with(|st| -> Result<(), JsValue> {
        if let Some(st_rc) = st.borrow().as_ref() {
            let mut s = st_rc.borrow_mut();
            let (physics, registry) = build_world(&layout, s.mode)?;
            s.layout = layout;
            s.physics = physics;
            s.registry = registry;
            s.controller = Default::default();
            s.dragging = None;
            s.status = None;
            update_note_dom(&s);
            update_status_dom(&s);
            draw(&mut s);
        }
        Ok(())
    })
}
