//! Pointer events already resolved against the mesh.
//!
//! The host performs ray picking; the engine only sees world-space hits.

use serde::{Deserialize, Serialize};

/// Pointer interaction with the painted mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Button pressed over the mesh at a world-space hit point
    Down { point: [f32; 3] },
    /// Pointer moved over the mesh
    Move { point: [f32; 3] },
    /// Button released
    Up,
    /// Pointer left the mesh
    Leave,
}
