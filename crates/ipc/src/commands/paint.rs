//! Paint command types for the painting system.

use serde::{Deserialize, Serialize};

/// Interaction mode of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditMode {
    /// Pointer drives the camera; painting is off
    #[default]
    Move,
    /// Pointer paints on the mesh; camera controls are disabled
    Paint,
}

/// Commands for controlling the painting system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PaintCommand {
    /// Set brush color (RGB, 0.0-1.0)
    SetBrushColor { color: [f32; 3] },
    /// Set brush radius in mesh-local units
    SetBrushSize { size: f32 },
    /// Set brush opacity (0.0-1.0)
    SetBrushOpacity { opacity: f32 },
    /// Undo last stroke
    Undo,
    /// Redo last undone stroke
    Redo,
    /// Switch between move and paint mode
    SetMode { mode: EditMode },
    /// Flip between move and paint mode
    ToggleMode,
}
