//! Material editing commands.

use serde::{Deserialize, Serialize};

/// Commands for the mesh material sliders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MaterialCommand {
    /// Set base color from a hex string such as `#FFFFFF`
    SetColor { color: String },
    SetMetalness { value: f32 },
    SetRoughness { value: f32 },
    /// Restore material defaults (also resets vertex colors)
    Reset,
}
