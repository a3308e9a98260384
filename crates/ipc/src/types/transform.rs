//! Transform-related types for IPC messages.

use serde::{Deserialize, Serialize};

/// Mesh placement shown by the transform panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformProperties {
    pub position: [f32; 3],
    /// Euler XYZ rotation in radians
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    /// Whether camera controls are locked
    pub locked: bool,
}
