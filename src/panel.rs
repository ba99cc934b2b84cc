//! Tweak panel rendered as plain DOM from the control descriptors.

use crate::dom::js_err;
use portal_core::constants::PANEL_WIDTH_PX;
use portal_core::debug::{initial_value, ControlKind, ControlSpec, DebugChange, CONTROLS};
use portal_core::{AppEvent, EventQueue, SceneConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const PANEL_STYLE: &str = "position:fixed;top:0;right:15px;z-index:10;\
    background:#1f1f1f;color:#ebebeb;font:11px monospace;padding:6px 8px;\
    box-sizing:border-box;";
const ROW_STYLE: &str = "display:flex;align-items:center;gap:6px;margin:3px 0;";

pub fn build(
    document: &web::Document,
    config: &SceneConfig,
    queue: Rc<RefCell<EventQueue>>,
) -> anyhow::Result<()> {
    let panel: web::HtmlElement = document
        .create_element("div")
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    panel.set_id("debug-panel");
    panel
        .set_attribute("style", &format!("{}width:{}px;", PANEL_STYLE, PANEL_WIDTH_PX))
        .map_err(js_err)?;

    for spec in CONTROLS.iter() {
        let row = build_row(document, spec, &initial_value(spec.id, config), queue.clone())?;
        panel.append_child(&row).map_err(js_err)?;
    }

    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no document body"))?;
    body.append_child(&panel).map_err(js_err)?;
    log::info!("[panel] {} controls", CONTROLS.len());
    Ok(())
}

fn build_row(
    document: &web::Document,
    spec: &'static ControlSpec,
    value: &str,
    queue: Rc<RefCell<EventQueue>>,
) -> anyhow::Result<web::Element> {
    let row = document.create_element("div").map_err(js_err)?;
    row.set_attribute("style", ROW_STYLE).map_err(js_err)?;

    let label = document.create_element("label").map_err(js_err)?;
    label
        .set_attribute("style", "flex:0 0 40%;overflow:hidden;")
        .map_err(js_err)?;
    label.set_text_content(Some(spec.label));
    row.append_child(&label).map_err(js_err)?;

    let input: web::HtmlInputElement = document
        .create_element("input")
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    let readout = document.create_element("span").map_err(js_err)?;
    match spec.kind {
        ControlKind::Color => input.set_type("color"),
        ControlKind::Slider { min, max, step } => {
            input.set_type("range");
            input.set_min(&min.to_string());
            input.set_max(&max.to_string());
            input.set_step(&step.to_string());
            input.set_attribute("style", "flex:1;").map_err(js_err)?;
            readout.set_text_content(Some(value));
        }
    }
    input.set_value(value);
    row.append_child(&input).map_err(js_err)?;
    row.append_child(&readout).map_err(js_err)?;

    let input_cb = input.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        let raw = input_cb.value();
        match DebugChange::from_input(spec.id, &raw) {
            Ok(change) => {
                if matches!(spec.kind, ControlKind::Slider { .. }) {
                    readout.set_text_content(Some(&raw));
                }
                queue.borrow_mut().push(AppEvent::Debug(change));
            }
            Err(e) => log::warn!("[panel] {}", e),
        }
    }) as Box<dyn FnMut(_)>);
    input
        .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())
        .map_err(js_err)?;
    closure.forget();
    Ok(row)
}
