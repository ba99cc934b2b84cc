//! Fetches for the baked texture and the scene model. Both run as detached
//! tasks; results reach the frame loop through queues, never directly.

use crate::dom::js_err;
use portal_core::loader::load_glb;
use portal_core::{AppEvent, EventQueue};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

async fn fetch_response(path: &str) -> anyhow::Result<web::Response> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !resp.ok() {
        anyhow::bail!("GET {} -> HTTP {}", path, resp.status());
    }
    Ok(resp)
}

async fn fetch_bytes(path: &str) -> anyhow::Result<Vec<u8>> {
    let resp = fetch_response(path).await?;
    let buf = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

async fn fetch_bitmap(path: &str) -> anyhow::Result<web::ImageBitmap> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp = fetch_response(path).await?;
    let blob: web::Blob = JsFuture::from(resp.blob().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    let bitmap = JsFuture::from(window.create_image_bitmap_with_blob(&blob).map_err(js_err)?)
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    Ok(bitmap)
}

pub fn spawn_texture_load(path: String, queued: Rc<RefCell<Option<web::ImageBitmap>>>) {
    spawn_local(async move {
        match fetch_bitmap(&path).await {
            Ok(bitmap) => {
                log::info!("[assets] texture ready: {}", path);
                *queued.borrow_mut() = Some(bitmap);
            }
            Err(e) => log::error!("[assets] texture {} failed: {:?}", path, e),
        }
    });
}

/// On failure the scene simply never arrives and hover stays inert.
pub fn spawn_model_load(path: String, queue: Rc<RefCell<EventQueue>>) {
    spawn_local(async move {
        let scene = match fetch_bytes(&path).await {
            Ok(bytes) => load_glb(&bytes).map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        match scene {
            Ok(scene) => queue
                .borrow_mut()
                .push(AppEvent::SceneLoaded(Box::new(scene))),
            Err(e) => log::error!("[assets] model {} failed: {:?}", path, e),
        }
    });
}
