//! Mesh transform commands.

use serde::{Deserialize, Serialize};

use super::Axis;

/// Commands for the mesh transform sliders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransformCommand {
    /// Set position along one axis
    Move { axis: Axis, value: f32 },
    /// Set rotation about one axis, in degrees
    Rotate { axis: Axis, degrees: f32 },
    /// Set the same scale on all axes
    SetUniformScale { value: f32 },
    /// Restore identity transform
    Reset,
    /// Lock or unlock camera controls
    ToggleLock,
}
