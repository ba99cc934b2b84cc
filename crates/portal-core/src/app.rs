//! Application context and the per-frame tick.
//!
//! `PortalApp` owns every piece of mutable scene state. The web frontend
//! feeds it queued [`AppEvent`]s and an elapsed time once per animation
//! frame; side effects that reach outside the app (cursor, navigation,
//! surface size, drawing) go through a [`FrameHost`].

use crate::camera::Camera;
use crate::color::Color;
use crate::config::SceneConfig;
use crate::controls::OrbitControls;
use crate::debug::DebugChange;
use crate::events::AppEvent;
use crate::fireflies::FireflyField;
use crate::interaction::{ClickAction, HoverController, Transition, Transitions};
use crate::loader;
use crate::raycast::Ray;
use crate::scene::SceneGraph;
use crate::uniforms::{
    capped_pixel_ratio, CameraUniformsRaw, FireflyUniforms, FireflyUniformsRaw, FlatColorRaw,
    PortalUniforms, PortalUniformsRaw,
};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    Pointer,
}

impl CursorStyle {
    pub fn as_css(&self) -> &'static str {
        match self {
            CursorStyle::Default => "default",
            CursorStyle::Pointer => "pointer",
        }
    }
}

/// Window size in CSS pixels plus the capped device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            pixel_ratio: capped_pixel_ratio(device_pixel_ratio),
        }
    }

    /// Backing-store size of the render surface.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            ((self.width * self.pixel_ratio) as u32).max(1),
            ((self.height * self.pixel_ratio) as u32).max(1),
        )
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// CSS pixel position → normalized device coordinates, y up.
    pub fn normalize_pointer(&self, client_x: f32, client_y: f32) -> Vec2 {
        Vec2::new(
            client_x / self.width * 2.0 - 1.0,
            -(client_y / self.height) * 2.0 + 1.0,
        )
    }
}

/// Latest pointer position; overwritten on every move, never queued.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub ndc: Vec2,
}

/// Counts of glow preset writes, for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverStats {
    pub applied: u32,
    pub reverted: u32,
}

/// Snapshot handed to the renderer, once per tick.
pub struct FrameData<'a> {
    pub elapsed: f32,
    pub viewport: Viewport,
    pub camera: CameraUniformsRaw,
    pub clear_color: Color,
    pub portal: PortalUniformsRaw,
    pub fireflies: FireflyUniformsRaw,
    pub pole_light: FlatColorRaw,
    pub firefly_field: &'a FireflyField,
    /// `None` until the model has loaded.
    pub scene: Option<&'a SceneGraph>,
}

/// Everything the app needs from its environment.
pub trait FrameHost {
    fn set_cursor(&mut self, cursor: CursorStyle);
    fn dispatch(&mut self, action: &ClickAction);
    fn resize_surface(&mut self, viewport: &Viewport);
    fn render(&mut self, frame: &FrameData<'_>);
}

pub struct PortalApp {
    pub viewport: Viewport,
    pub pointer: PointerState,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub hover: HoverController,
    pub portal: PortalUniforms,
    pub fireflies: FireflyUniforms,
    pub firefly_field: FireflyField,
    pub clear_color: Color,
    pub pole_light_color: Color,
    materials: Vec<loader::MaterialBinding>,
    scene: Option<SceneGraph>,
    stats: HoverStats,
    frames: u64,
}

impl PortalApp {
    pub fn new(config: SceneConfig, viewport: Viewport) -> Self {
        let camera = Camera::new(
            config.camera_position,
            config.orbit_target,
            viewport.aspect(),
        );
        let mut controls = OrbitControls::new(config.orbit_target);
        controls.damping_factor = config.damping_factor;
        Self {
            viewport,
            pointer: PointerState::default(),
            camera,
            controls,
            hover: HoverController::new(config.interactions),
            portal: PortalUniforms {
                palette: config.palette,
                ..Default::default()
            },
            fireflies: FireflyUniforms {
                pixel_ratio: viewport.pixel_ratio,
                size: config.firefly_size,
                ..Default::default()
            },
            firefly_field: FireflyField::generate(config.firefly_count, config.firefly_seed),
            clear_color: config.clear_color,
            pole_light_color: config.pole_light_color,
            materials: config.materials,
            scene: None,
            stats: HoverStats::default(),
            frames: 0,
        }
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn hover_stats(&self) -> HoverStats {
        self.stats
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Apply one event immediately. Normally called from [`PortalApp::tick`].
    pub fn handle_event(&mut self, ev: AppEvent, host: &mut impl FrameHost) {
        match ev {
            AppEvent::Resize {
                width,
                height,
                device_pixel_ratio,
            } => {
                self.viewport = Viewport::new(width, height, device_pixel_ratio);
                self.camera.set_aspect(self.viewport.width, self.viewport.height);
                self.fireflies.pixel_ratio = self.viewport.pixel_ratio;
                host.resize_surface(&self.viewport);
            }
            AppEvent::PointerMove { client_x, client_y } => {
                self.pointer.ndc = self.viewport.normalize_pointer(client_x, client_y);
            }
            AppEvent::PointerDown => {
                if let Some(action) = self.hover.click() {
                    log::info!("[click] {:?}", action);
                    host.dispatch(action);
                }
            }
            AppEvent::OrbitDrag { dx, dy } => {
                self.controls.rotate_by_pixels(dx, dy, self.viewport.height);
            }
            AppEvent::Wheel { delta_y } => self.controls.dolly(delta_y),
            AppEvent::Debug(change) => self.apply_debug(change),
            AppEvent::SceneLoaded(scene) => self.install_scene(*scene),
        }
    }

    /// One animation frame: drain events in arrival order, update hover,
    /// write time uniforms, reconcile the orbit controls and render once.
    pub fn tick(
        &mut self,
        elapsed: f32,
        events: impl IntoIterator<Item = AppEvent>,
        host: &mut impl FrameHost,
    ) -> Transitions {
        for ev in events {
            self.handle_event(ev, host);
        }

        let ray = Ray::from_camera(self.pointer.ndc, &self.camera);
        let transitions = self.hover.evaluate(self.scene.as_ref(), &ray);
        for t in &transitions {
            self.apply_transition(t, host);
        }

        self.portal.time = elapsed;
        self.fireflies.time = elapsed;

        self.controls.update(&mut self.camera);

        let (pw, ph) = self.viewport.physical_size();
        let frame = FrameData {
            elapsed,
            viewport: self.viewport,
            camera: CameraUniformsRaw {
                view_proj: self.camera.view_proj().to_cols_array_2d(),
                view: self.camera.view_matrix().to_cols_array_2d(),
            },
            clear_color: self.clear_color,
            portal: self.portal.to_raw(),
            fireflies: self.fireflies.to_raw([pw as f32, ph as f32]),
            pole_light: FlatColorRaw::from_color(self.pole_light_color),
            firefly_field: &self.firefly_field,
            scene: self.scene.as_ref(),
        };
        host.render(&frame);
        self.frames += 1;
        transitions
    }

    fn apply_transition(&mut self, t: &Transition, host: &mut impl FrameHost) {
        if let Some(node) = t.left() {
            if let Some(p) = self.hover.interaction_for(node).and_then(|i| i.presets) {
                self.portal.glow = p.idle;
                self.stats.reverted += 1;
            }
        }
        if let Some(node) = t.entered() {
            if let Some(p) = self.hover.interaction_for(node).and_then(|i| i.presets) {
                self.portal.glow = p.hovered;
                self.stats.applied += 1;
            }
        }
        match (t.from.is_hovered(), t.to.is_hovered()) {
            (false, true) => host.set_cursor(CursorStyle::Pointer),
            (true, false) => host.set_cursor(CursorStyle::Default),
            _ => {}
        }
    }

    fn apply_debug(&mut self, change: DebugChange) {
        match change {
            DebugChange::PortalColorStart(c) => self.portal.palette.color_start = c,
            DebugChange::PortalColorEnd(c) => self.portal.palette.color_end = c,
            DebugChange::ClearColor(c) => self.clear_color = c,
            DebugChange::CameraX(v) => self.camera.eye.x = v,
            DebugChange::CameraY(v) => self.camera.eye.y = v,
            DebugChange::CameraZ(v) => self.camera.eye.z = v,
            DebugChange::FirefliesSize(v) => self.fireflies.size = v,
        }
    }

    fn install_scene(&mut self, mut scene: SceneGraph) {
        if self.scene.is_some() {
            log::warn!("[assets] scene already loaded; ignoring second load");
            return;
        }
        let applied = loader::assign_materials(&mut scene, &self.materials);
        log::info!(
            "[assets] scene installed: {} nodes, {}/{} materials assigned",
            scene.len(),
            applied,
            self.materials.len()
        );
        self.scene = Some(scene);
    }
}
