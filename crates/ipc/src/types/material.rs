//! Material-related types for IPC messages.

use serde::{Deserialize, Serialize};

/// Material properties shown by the material panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Base color as `#RRGGBB`
    pub color: String,
    pub metalness: f32,
    pub roughness: f32,
}
