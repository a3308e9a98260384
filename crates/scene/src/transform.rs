//! Transform panel state
//!
//! Rotation arrives from the UI in degrees and is stored in radians.
//! Scale is always uniform.

use glam::Vec3;
use minipaint_ipc::{Axis, TransformProperties};
use painting::MeshTransform;

/// Mesh placement plus the camera lock toggle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub transform: MeshTransform,
    /// Camera controls locked while true
    pub locked: bool,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            transform: MeshTransform::IDENTITY,
            locked: false,
        }
    }
}

impl TransformState {
    pub fn set_position(&mut self, axis: Axis, value: f32) {
        self.transform.position[axis.index()] = value;
    }

    pub fn set_rotation_degrees(&mut self, axis: Axis, degrees: f32) {
        self.transform.rotation[axis.index()] = degrees.to_radians();
    }

    /// Non-positive or non-finite scales are ignored
    pub fn set_uniform_scale(&mut self, value: f32) -> bool {
        if !(value.is_finite() && value > 0.0) {
            return false;
        }
        self.transform.scale = Vec3::splat(value);
        true
    }

    /// Restore the identity placement. The lock is left alone.
    pub fn reset(&mut self) {
        self.transform = MeshTransform::IDENTITY;
    }

    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        self.locked
    }

    pub fn properties(&self) -> TransformProperties {
        TransformProperties {
            position: self.transform.position.to_array(),
            rotation: self.transform.rotation.to_array(),
            scale: self.transform.scale.to_array(),
            locked: self.locked,
        }
    }
}
