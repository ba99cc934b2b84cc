#![cfg(target_arch = "wasm32")]
use instant::Instant;
use portal_core::{EventQueue, PortalApp, SceneConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod dom;
mod events;
mod frame;
mod panel;
mod render;

const QUERY_KEYS: [&str; 2] = ["seed", "panel"];

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("portal-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let mut config = SceneConfig::default();
    let overrides = dom::query_overrides(&window, &QUERY_KEYS);
    config.apply_query(overrides.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let canvas: web::HtmlCanvasElement = document
        .query_selector(&config.canvas_selector)
        .map_err(dom::js_err)?
        .ok_or_else(|| anyhow::anyhow!("missing {}", config.canvas_selector))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let viewport = dom::viewport(&window);
    dom::sync_canvas_backing_size(&canvas, &viewport);

    let queue = Rc::new(RefCell::new(EventQueue::new()));
    let queued_texture: Rc<RefCell<Option<web::ImageBitmap>>> = Rc::new(RefCell::new(None));

    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        queue: queue.clone(),
    });
    if config.show_panel {
        if let Err(e) = panel::build(&document, &config, queue.clone()) {
            log::warn!("[panel] not built: {:?}", e);
        }
    }

    assets::spawn_texture_load(config.texture_path.clone(), queued_texture.clone());
    assets::spawn_model_load(config.model_path.clone(), queue.clone());

    let gpu = frame::init_gpu(&canvas).await;
    let app = PortalApp::new(config, viewport);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        app,
        queue,
        gpu,
        queued_texture,
        canvas,
        document,
        clock: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
