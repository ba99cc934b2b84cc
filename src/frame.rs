use crate::dom;
use crate::render;
use instant::Instant;
use portal_core::constants::LINK_TARGET;
use portal_core::{ClickAction, CursorStyle, EventQueue, FrameData, FrameHost, PortalApp, Viewport};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub app: PortalApp,
    pub queue: Rc<RefCell<EventQueue>>,
    pub gpu: Option<render::GpuState>,
    pub queued_texture: Rc<RefCell<Option<web::ImageBitmap>>>,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub clock: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let elapsed = self.clock.elapsed().as_secs_f32();
        if let Some(g) = &mut self.gpu {
            if let Some(bitmap) = self.queued_texture.borrow_mut().take() {
                g.set_baked_texture(&bitmap);
            }
        }
        // Callbacks may push while we run; take a snapshot and release the borrow.
        let events = self.queue.borrow_mut().drain();
        let mut host = WebHost {
            document: &self.document,
            canvas: &self.canvas,
            gpu: self.gpu.as_mut(),
        };
        self.app.tick(elapsed, events, &mut host);
    }
}

/// Browser side of a tick: body cursor, navigation, canvas and GPU.
struct WebHost<'a> {
    document: &'a web::Document,
    canvas: &'a web::HtmlCanvasElement,
    gpu: Option<&'a mut render::GpuState>,
}

impl FrameHost for WebHost<'_> {
    fn set_cursor(&mut self, cursor: CursorStyle) {
        dom::set_body_cursor(self.document, cursor);
    }

    fn dispatch(&mut self, action: &ClickAction) {
        match action {
            ClickAction::OpenUrl(url) => dom::open_in_new_context(url, LINK_TARGET),
            ClickAction::Log(msg) => log::info!("[click] {}", msg),
        }
    }

    fn resize_surface(&mut self, viewport: &Viewport) {
        dom::sync_canvas_backing_size(self.canvas, viewport);
        if let Some(g) = self.gpu.as_deref_mut() {
            let (w, h) = viewport.physical_size();
            g.resize(w, h);
        }
    }

    fn render(&mut self, frame: &FrameData<'_>) {
        if let Some(g) = self.gpu.as_deref_mut() {
            if let Err(e) = g.render(frame) {
                log::error!("[gpu] render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState> {
    match render::GpuState::new(canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
