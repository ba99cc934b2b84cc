use glam::Vec3;

// Shared scene/effect tuning constants used by the web frontend.

// Scene node names inside the baked model
pub const BAKED_NODE: &str = "baked";
pub const PORTAL_NODE: &str = "portalLight";
pub const POLE_LIGHT_A_NODE: &str = "poleLightA";
pub const POLE_LIGHT_B_NODE: &str = "poleLightB";

// Assets (relative to the page)
pub const BAKED_TEXTURE_PATH: &str = "baked.jpg";
pub const MODEL_PATH: &str = "portal.glb";
pub const CANVAS_SELECTOR: &str = "canvas.webgl";

// Click target
pub const PORTAL_LINK_URL: &str = "https://github.com/willdebras";
pub const LINK_TARGET: &str = "_blank";

// Portal glow presets: (outer glow, sharpness, speed factor)
pub const BASELINE_OUTER_GLOW: f32 = 5.0;
pub const BASELINE_SHARPNESS: f32 = 0.7;
pub const BASELINE_SPEED_FACTOR: f32 = 1.0;
pub const HOVERED_OUTER_GLOW: f32 = 4.0;
pub const HOVERED_SHARPNESS: f32 = 0.6;
pub const HOVERED_SPEED_FACTOR: f32 = 5.0;

// Default palette
pub const PORTAL_COLOR_START: &str = "#9B4CE4";
pub const PORTAL_COLOR_END: &str = "#feecff";
pub const CLEAR_COLOR: &str = "#201919";
pub const POLE_LIGHT_COLOR: &str = "#ffffe5";

// Fireflies
pub const FIREFLY_COUNT: usize = 30;
pub const FIREFLY_SIZE: f32 = 200.0;
pub const FIREFLY_SPREAD_XZ: f32 = 4.0;
pub const FIREFLY_HEIGHT: f32 = 1.5 * 2.5;

// Renderer
pub const MAX_PIXEL_RATIO: f32 = 2.0;

// Camera
pub const CAMERA_FOVY_DEG: f32 = 45.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;
pub const CAMERA_POSITION: Vec3 = Vec3::new(3.0, 2.5, 6.5);
pub const ORBIT_TARGET: Vec3 = Vec3::new(0.0, 0.75, 0.0);
pub const ORBIT_DAMPING_FACTOR: f32 = 0.05;
pub const ORBIT_ZOOM_STEP: f32 = 0.95; // per wheel notch, <1 zooms in

// Debug panel
pub const PANEL_WIDTH_PX: u32 = 400;
pub const CAMERA_SLIDER_MIN: f32 = -20.0;
pub const CAMERA_SLIDER_MAX: f32 = 20.0;
pub const CAMERA_SLIDER_STEP: f32 = 0.0001;
pub const FIREFLY_SIZE_MIN: f32 = 0.0;
pub const FIREFLY_SIZE_MAX: f32 = 500.0;
pub const FIREFLY_SIZE_STEP: f32 = 1.0;
