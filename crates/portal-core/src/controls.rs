//! Damped orbit controls.
//!
//! Drag and wheel input only accumulate a pending spherical delta; the delta
//! is folded into the camera by [`OrbitControls::update`], once per frame,
//! and then decays by the damping factor so motion eases out over several
//! frames. The spherical state is re-derived from the camera on every update,
//! which means the camera can be moved externally (debug sliders) at any time.

use crate::camera::Camera;
use crate::constants::{ORBIT_DAMPING_FACTOR, ORBIT_TARGET, ORBIT_ZOOM_STEP};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

const POLAR_EPS: f32 = 1e-6;
const SETTLE_EPS: f32 = 1e-6;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    delta: Spherical,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(ORBIT_TARGET)
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enable_damping: true,
            damping_factor: ORBIT_DAMPING_FACTOR,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta: Spherical::default(),
            scale: 1.0,
        }
    }

    /// Pointer drag in CSS pixels. A full surface height of horizontal
    /// movement is one turn around the target.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, surface_height: f32) {
        let h = surface_height.max(1.0);
        self.delta.theta -= TAU * dx / h * self.rotate_speed;
        self.delta.phi -= TAU * dy / h * self.rotate_speed;
    }

    /// Wheel input; negative `delta_y` (scroll up) moves the camera closer.
    pub fn dolly(&mut self, delta_y: f32) {
        let step = ORBIT_ZOOM_STEP.powf(self.zoom_speed);
        if delta_y < 0.0 {
            self.scale *= step;
        } else if delta_y > 0.0 {
            self.scale /= step;
        }
    }

    /// True while there is pending rotation still easing out.
    pub fn is_settling(&self) -> bool {
        self.delta.theta.abs() > SETTLE_EPS || self.delta.phi.abs() > SETTLE_EPS
    }

    /// Fold pending input into the camera. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.eye - self.target;
        let mut s = Spherical::from_offset(offset);

        let k = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        s.theta += self.delta.theta * k;
        s.phi += self.delta.phi * k;
        let min_phi = self.min_polar_angle.max(POLAR_EPS);
        let max_phi = self.max_polar_angle.min(PI - POLAR_EPS);
        s.phi = s.phi.clamp(min_phi, max_phi);
        s.radius = (s.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let new_eye = self.target + s.to_offset();
        let moved = new_eye.distance_squared(camera.eye) > SETTLE_EPS * SETTLE_EPS;
        camera.eye = new_eye;
        camera.target = self.target;

        if self.enable_damping {
            self.delta.theta *= 1.0 - self.damping_factor;
            self.delta.phi *= 1.0 - self.damping_factor;
        } else {
            self.delta = Spherical::default();
        }
        self.scale = 1.0;
        moved
    }
}
