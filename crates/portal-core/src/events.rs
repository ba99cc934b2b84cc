//! Host events, queued by DOM callbacks and drained at the start of a tick.

use crate::debug::DebugChange;
use crate::scene::SceneGraph;
use std::collections::VecDeque;

#[derive(Debug)]
pub enum AppEvent {
    /// Window resized; sizes in CSS pixels.
    Resize {
        width: f32,
        height: f32,
        device_pixel_ratio: f64,
    },
    /// Pointer position in CSS pixels relative to the viewport.
    PointerMove { client_x: f32, client_y: f32 },
    /// Primary button press anywhere on the page.
    PointerDown,
    /// Orbit drag on the canvas, in CSS pixels.
    OrbitDrag { dx: f32, dy: f32 },
    Wheel { delta_y: f32 },
    Debug(DebugChange),
    /// The model finished loading; materials are assigned on install.
    SceneLoaded(Box<SceneGraph>),
}

/// FIFO of pending events. Single-threaded; shared between callbacks and
/// the frame loop through `Rc<RefCell<_>>`.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<AppEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ev: AppEvent) {
        self.pending.push_back(ev);
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<AppEvent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
