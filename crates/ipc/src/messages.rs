//! Main IPC message enums for communication between the engine and UI.

use serde::{Deserialize, Serialize};

use crate::commands::{EditMode, MaterialCommand, PaintCommand, TransformCommand};
use crate::input::PointerEvent;
use crate::types::{MaterialProperties, TransformProperties};

/// Messages from the engine to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EngineToUi {
    /// Undo/redo availability changed
    HistoryChanged { can_undo: bool, can_redo: bool },

    /// A brush color was just used to paint (for the recent colors palette)
    ColorUsed { color: [f32; 3] },

    /// Brush preview should follow the pointer
    BrushPreviewMoved { position: [f32; 3] },

    /// Viewport mode changed
    ModeChanged { mode: EditMode },

    /// A new mesh is ready to paint
    MeshLoaded { vertex_count: usize, has_colors: bool },

    /// Material property update
    MaterialUpdated(MaterialProperties),

    /// Transform property update
    TransformUpdated(TransformProperties),

    /// Error notification
    Error { code: String, message: String },
}

/// Messages from the UI to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToEngine {
    /// Brush settings, undo/redo, and mode
    PaintCommand(PaintCommand),

    /// Material editing
    MaterialCommand(MaterialCommand),

    /// Mesh transform editing
    TransformCommand(TransformCommand),

    /// Pointer interaction with the mesh
    Pointer(PointerEvent),
}
