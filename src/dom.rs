use portal_core::{CursorStyle, Viewport};
use wasm_bindgen::JsValue;
use web_sys as web;

#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// Window inner size in CSS pixels and the device pixel ratio.
pub fn viewport(window: &web::Window) -> Viewport {
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    Viewport::new(w as f32, h as f32, window.device_pixel_ratio())
}

/// Canvas backing store = CSS size × capped pixel ratio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, vp: &Viewport) {
    let (w_px, h_px) = vp.physical_size();
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    let style = canvas.style();
    _ = style.set_property("width", &format!("{}px", vp.width));
    _ = style.set_property("height", &format!("{}px", vp.height));
}

pub fn set_body_cursor(document: &web::Document, cursor: CursorStyle) {
    if let Some(body) = document.body() {
        _ = body.style().set_property("cursor", cursor.as_css());
    }
}

pub fn open_in_new_context(url: &str, target: &str) {
    if let Some(w) = web::window() {
        if let Err(e) = w.open_with_url_and_target(url, target) {
            log::warn!("[click] window.open({}) failed: {:?}", url, e);
        }
    }
}

/// `key=value` pairs from the page URL for the keys the app understands.
pub fn query_overrides(window: &web::Window, keys: &[&str]) -> Vec<(String, String)> {
    let Ok(search) = window.location().search() else {
        return Vec::new();
    };
    let Ok(params) = web::UrlSearchParams::new_with_str(&search) else {
        return Vec::new();
    };
    keys.iter()
        .filter_map(|k| params.get(k).map(|v| (k.to_string(), v)))
        .collect()
}
