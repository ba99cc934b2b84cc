use crate::color::Color;
use crate::constants::{
    BAKED_TEXTURE_PATH, CAMERA_POSITION, CANVAS_SELECTOR, CLEAR_COLOR, FIREFLY_COUNT,
    FIREFLY_SIZE, MODEL_PATH, ORBIT_DAMPING_FACTOR, ORBIT_TARGET, POLE_LIGHT_COLOR,
};
use crate::interaction::InteractionRegistry;
use crate::loader::{MaterialBinding, DEFAULT_BINDINGS};
use crate::uniforms::PortalPalette;
use glam::Vec3;

/// Everything the scene is built from. `Default` reproduces the shipped look.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub canvas_selector: String,
    pub texture_path: String,
    pub model_path: String,
    pub palette: PortalPalette,
    pub clear_color: Color,
    pub pole_light_color: Color,
    pub camera_position: Vec3,
    pub orbit_target: Vec3,
    pub damping_factor: f32,
    pub firefly_count: usize,
    pub firefly_size: f32,
    /// Fixed seed for a reproducible firefly layout; `None` draws from entropy.
    pub firefly_seed: Option<u64>,
    pub show_panel: bool,
    pub materials: Vec<MaterialBinding>,
    pub interactions: InteractionRegistry,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas_selector: CANVAS_SELECTOR.to_string(),
            texture_path: BAKED_TEXTURE_PATH.to_string(),
            model_path: MODEL_PATH.to_string(),
            palette: PortalPalette::default(),
            clear_color: Color::from_hex(CLEAR_COLOR).unwrap_or(Color::new(0.0, 0.0, 0.0)),
            pole_light_color: Color::from_hex(POLE_LIGHT_COLOR).unwrap_or(Color::WHITE),
            camera_position: CAMERA_POSITION,
            orbit_target: ORBIT_TARGET,
            damping_factor: ORBIT_DAMPING_FACTOR,
            firefly_count: FIREFLY_COUNT,
            firefly_size: FIREFLY_SIZE,
            firefly_seed: None,
            show_panel: true,
            materials: DEFAULT_BINDINGS.to_vec(),
            interactions: InteractionRegistry::with_defaults(),
        }
    }
}

impl SceneConfig {
    /// Apply `key=value` overrides from the page URL (`seed`, `panel`).
    /// Unknown keys and unparsable values are ignored.
    pub fn apply_query<'a>(&mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (key, value) in pairs {
            match key {
                "seed" => match value.parse::<u64>() {
                    Ok(seed) => self.firefly_seed = Some(seed),
                    Err(_) => log::warn!("[config] ignoring seed={:?}", value),
                },
                "panel" => self.show_panel = !matches!(value, "0" | "false" | "off"),
                _ => {}
            }
        }
    }
}
