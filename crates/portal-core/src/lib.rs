pub mod app;
pub mod camera;
pub mod color;
pub mod config;
pub mod constants;
pub mod controls;
pub mod debug;
pub mod events;
pub mod fireflies;
pub mod interaction;
pub mod loader;
pub mod raycast;
pub mod scene;
pub mod uniforms;

pub use app::*;
pub use camera::Camera;
pub use color::Color;
pub use config::SceneConfig;
pub use events::{AppEvent, EventQueue};
pub use interaction::{ClickAction, HoverController, HoverState, InteractionRegistry};
pub use scene::{MaterialSlot, NodeId, SceneGraph};

// Shaders bundled as string constants
pub static BAKED_WGSL: &str = include_str!("../shaders/baked.wgsl");
pub static FLAT_WGSL: &str = include_str!("../shaders/flat.wgsl");
pub static PORTAL_WGSL: &str = include_str!("../shaders/portal.wgsl");
pub static FIREFLIES_WGSL: &str = include_str!("../shaders/fireflies.wgsl");
