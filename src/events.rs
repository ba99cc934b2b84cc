//! DOM listeners. Callbacks only translate browser events into
//! [`AppEvent`]s; all state changes happen when the frame loop drains them.

use portal_core::{AppEvent, EventQueue};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Default, Clone, Copy)]
struct DragState {
    active: bool,
    pointer_id: i32,
    last_x: f32,
    last_y: f32,
}

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub queue: Rc<RefCell<EventQueue>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    let drag = Rc::new(RefCell::new(DragState::default()));
    wire_resize(&w);
    wire_pointermove(&w, drag.clone());
    wire_pointerdown(&w, drag.clone());
    wire_pointerup(&w, drag);
    wire_wheel(&w);
}

fn wire_resize(w: &InputWiring) {
    let queue = w.queue.clone();
    let closure = Closure::wrap(Box::new(move || {
        if let Some(wnd) = web::window() {
            let vp = crate::dom::viewport(&wnd);
            queue.borrow_mut().push(AppEvent::Resize {
                width: vp.width,
                height: vp.height,
                device_pixel_ratio: wnd.device_pixel_ratio(),
            });
        }
    }) as Box<dyn FnMut()>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointermove(w: &InputWiring, drag: Rc<RefCell<DragState>>) {
    let queue = w.queue.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let (x, y) = (ev.client_x() as f32, ev.client_y() as f32);
        let mut q = queue.borrow_mut();
        q.push(AppEvent::PointerMove {
            client_x: x,
            client_y: y,
        });
        let mut ds = drag.borrow_mut();
        if ds.active && ds.pointer_id == ev.pointer_id() {
            q.push(AppEvent::OrbitDrag {
                dx: x - ds.last_x,
                dy: y - ds.last_y,
            });
            ds.last_x = x;
            ds.last_y = y;
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerdown(w: &InputWiring, drag: Rc<RefCell<DragState>>) {
    // Page-wide press: click dispatch against the current hover state.
    let queue = w.queue.clone();
    let on_window = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        queue.borrow_mut().push(AppEvent::PointerDown);
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointerdown", on_window.as_ref().unchecked_ref());
    }
    on_window.forget();

    // Canvas press: begin an orbit drag.
    let canvas = w.canvas.clone();
    let on_canvas = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        *drag.borrow_mut() = DragState {
            active: true,
            pointer_id: ev.pointer_id(),
            last_x: ev.client_x() as f32,
            last_y: ev.client_y() as f32,
        };
        _ = canvas.set_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    _ = w
        .canvas
        .add_event_listener_with_callback("pointerdown", on_canvas.as_ref().unchecked_ref());
    on_canvas.forget();
}

fn wire_pointerup(w: &InputWiring, drag: Rc<RefCell<DragState>>) {
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let mut ds = drag.borrow_mut();
        if ds.pointer_id == ev.pointer_id() {
            ds.active = false;
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        for name in ["pointerup", "pointercancel"] {
            _ = wnd.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
    closure.forget();
}

fn wire_wheel(w: &InputWiring) {
    let queue = w.queue.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        ev.prevent_default();
        queue.borrow_mut().push(AppEvent::Wheel {
            delta_y: ev.delta_y() as f32,
        });
    }) as Box<dyn FnMut(_)>);
    _ = w
        .canvas
        .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
    closure.forget();
}
