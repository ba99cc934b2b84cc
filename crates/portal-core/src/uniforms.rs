//! Effect uniforms for the portal and firefly materials.
//!
//! Each material's uniform set is split by writer: the frame loop owns
//! `time`, the hover controller owns the portal's [`GlowPreset`], the debug
//! panel owns the palette and firefly size, and resize owns the pixel ratio.
//! The `*Raw` structs are the std140-compatible GPU images of these sets.

use crate::color::Color;
use crate::constants::{
    BASELINE_OUTER_GLOW, BASELINE_SHARPNESS, BASELINE_SPEED_FACTOR, FIREFLY_SIZE,
    HOVERED_OUTER_GLOW, HOVERED_SHARPNESS, HOVERED_SPEED_FACTOR, MAX_PIXEL_RATIO,
    PORTAL_COLOR_END, PORTAL_COLOR_START,
};

/// Bundle of the three portal parameters switched on hover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowPreset {
    pub outer_glow: f32,
    pub sharpness: f32,
    pub speed_factor: f32,
}

impl GlowPreset {
    pub const BASELINE: GlowPreset = GlowPreset {
        outer_glow: BASELINE_OUTER_GLOW,
        sharpness: BASELINE_SHARPNESS,
        speed_factor: BASELINE_SPEED_FACTOR,
    };
    pub const HOVERED: GlowPreset = GlowPreset {
        outer_glow: HOVERED_OUTER_GLOW,
        sharpness: HOVERED_SHARPNESS,
        speed_factor: HOVERED_SPEED_FACTOR,
    };
}

impl Default for GlowPreset {
    fn default() -> Self {
        Self::BASELINE
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortalPalette {
    pub color_start: Color,
    pub color_end: Color,
}

impl Default for PortalPalette {
    fn default() -> Self {
        Self {
            color_start: Color::from_hex(PORTAL_COLOR_START).unwrap_or(Color::WHITE),
            color_end: Color::from_hex(PORTAL_COLOR_END).unwrap_or(Color::WHITE),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortalUniforms {
    pub time: f32,
    pub glow: GlowPreset,
    pub palette: PortalPalette,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FireflyUniforms {
    pub time: f32,
    pub pixel_ratio: f32,
    pub size: f32,
}

impl Default for FireflyUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            pixel_ratio: 1.0,
            size: FIREFLY_SIZE,
        }
    }
}

/// Device pixel ratio as used for rendering: capped to keep fill rate sane
/// on dense displays.
#[inline]
pub fn capped_pixel_ratio(device_pixel_ratio: f64) -> f32 {
    let dpr = device_pixel_ratio as f32;
    if dpr.is_finite() && dpr > 0.0 {
        dpr.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniformsRaw {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PortalUniformsRaw {
    pub color_start: [f32; 3],
    pub time: f32,
    pub color_end: [f32; 3],
    pub outer_glow: f32,
    pub sharpness: f32,
    pub speed_factor: f32,
    pub _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FireflyUniformsRaw {
    pub time: f32,
    pub pixel_ratio: f32,
    pub size: f32,
    pub _pad0: f32,
    pub resolution: [f32; 2],
    pub _pad1: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FlatColorRaw {
    pub color: [f32; 4],
}

impl PortalUniforms {
    pub fn to_raw(&self) -> PortalUniformsRaw {
        PortalUniformsRaw {
            color_start: self.palette.color_start.to_linear(),
            time: self.time,
            color_end: self.palette.color_end.to_linear(),
            outer_glow: self.glow.outer_glow,
            sharpness: self.glow.sharpness,
            speed_factor: self.glow.speed_factor,
            _pad: [0.0; 2],
        }
    }
}

impl FireflyUniforms {
    /// `resolution` is the render surface in physical pixels.
    pub fn to_raw(&self, resolution: [f32; 2]) -> FireflyUniformsRaw {
        FireflyUniformsRaw {
            time: self.time,
            pixel_ratio: self.pixel_ratio,
            size: self.size,
            _pad0: 0.0,
            resolution,
            _pad1: [0.0; 2],
        }
    }
}

impl FlatColorRaw {
    pub fn from_color(c: Color) -> Self {
        let [r, g, b] = c.to_linear();
        Self {
            color: [r, g, b, 1.0],
        }
    }
}
