//! Debug panel model: which controls exist and how their raw input values
//! become typed changes. The DOM side only renders these descriptors.

use crate::color::{Color, ColorParseError};
use crate::config::SceneConfig;
use crate::constants::{
    CAMERA_SLIDER_MAX, CAMERA_SLIDER_MIN, CAMERA_SLIDER_STEP, FIREFLY_SIZE_MAX, FIREFLY_SIZE_MIN,
    FIREFLY_SIZE_STEP,
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlId {
    PortalColorStart,
    PortalColorEnd,
    ClearColor,
    CameraX,
    CameraY,
    CameraZ,
    FirefliesSize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlKind {
    Color,
    Slider { min: f32, max: f32, step: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSpec {
    pub id: ControlId,
    pub label: &'static str,
    pub kind: ControlKind,
}

const CAMERA_SLIDER: ControlKind = ControlKind::Slider {
    min: CAMERA_SLIDER_MIN,
    max: CAMERA_SLIDER_MAX,
    step: CAMERA_SLIDER_STEP,
};

pub static CONTROLS: [ControlSpec; 7] = [
    ControlSpec {
        id: ControlId::PortalColorStart,
        label: "portalColorStart",
        kind: ControlKind::Color,
    },
    ControlSpec {
        id: ControlId::PortalColorEnd,
        label: "portalColorEnd",
        kind: ControlKind::Color,
    },
    ControlSpec {
        id: ControlId::FirefliesSize,
        label: "firefliesSize",
        kind: ControlKind::Slider {
            min: FIREFLY_SIZE_MIN,
            max: FIREFLY_SIZE_MAX,
            step: FIREFLY_SIZE_STEP,
        },
    },
    ControlSpec {
        id: ControlId::CameraX,
        label: "camx",
        kind: CAMERA_SLIDER,
    },
    ControlSpec {
        id: ControlId::CameraY,
        label: "camy",
        kind: CAMERA_SLIDER,
    },
    ControlSpec {
        id: ControlId::CameraZ,
        label: "camz",
        kind: CAMERA_SLIDER,
    },
    ControlSpec {
        id: ControlId::ClearColor,
        label: "clearColor",
        kind: ControlKind::Color,
    },
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DebugChange {
    PortalColorStart(Color),
    PortalColorEnd(Color),
    ClearColor(Color),
    CameraX(f32),
    CameraY(f32),
    CameraZ(f32),
    FirefliesSize(f32),
}

#[derive(Debug, Error, PartialEq)]
pub enum DebugInputError {
    #[error("{control:?}: {source}")]
    Color {
        control: ControlId,
        source: ColorParseError,
    },
    #[error("{control:?}: not a number: {raw:?}")]
    NotANumber { control: ControlId, raw: String },
}

impl ControlId {
    pub fn spec(self) -> &'static ControlSpec {
        let i = match self {
            ControlId::PortalColorStart => 0,
            ControlId::PortalColorEnd => 1,
            ControlId::FirefliesSize => 2,
            ControlId::CameraX => 3,
            ControlId::CameraY => 4,
            ControlId::CameraZ => 5,
            ControlId::ClearColor => 6,
        };
        &CONTROLS[i]
    }
}

impl DebugChange {
    /// Convert an `<input>` value. Slider values are clamped to the
    /// control's range; colors must be `#rrggbb`.
    pub fn from_input(id: ControlId, raw: &str) -> Result<Self, DebugInputError> {
        match id.spec().kind {
            ControlKind::Color => {
                let c = Color::from_hex(raw.trim()).map_err(|source| DebugInputError::Color {
                    control: id,
                    source,
                })?;
                Ok(match id {
                    ControlId::PortalColorStart => DebugChange::PortalColorStart(c),
                    ControlId::PortalColorEnd => DebugChange::PortalColorEnd(c),
                    _ => DebugChange::ClearColor(c),
                })
            }
            ControlKind::Slider { min, max, .. } => {
                let v = raw
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DebugInputError::NotANumber {
                        control: id,
                        raw: raw.to_string(),
                    })?
                    .clamp(min, max);
                Ok(match id {
                    ControlId::CameraX => DebugChange::CameraX(v),
                    ControlId::CameraY => DebugChange::CameraY(v),
                    ControlId::CameraZ => DebugChange::CameraZ(v),
                    _ => DebugChange::FirefliesSize(v),
                })
            }
        }
    }
}

/// Starting `<input>` value for a control under `config`.
pub fn initial_value(id: ControlId, config: &SceneConfig) -> String {
    match id {
        ControlId::PortalColorStart => config.palette.color_start.to_hex(),
        ControlId::PortalColorEnd => config.palette.color_end.to_hex(),
        ControlId::ClearColor => config.clear_color.to_hex(),
        ControlId::CameraX => config.camera_position.x.to_string(),
        ControlId::CameraY => config.camera_position.y.to_string(),
        ControlId::CameraZ => config.camera_position.z.to_string(),
        ControlId::FirefliesSize => config.firefly_size.to_string(),
    }
}
