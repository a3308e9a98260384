//! Routing of UI messages onto the session

use std::time::Instant;

use glam::Vec3;
use minipaint_ipc::{
    EngineToUi, IpcError, MaterialCommand, PaintCommand, PointerEvent, TransformCommand,
    UiToEngine, from_json,
};
use tracing::{debug, warn};

use crate::session::PaintSession;

/// Error code sent when an incoming message cannot be parsed
const ERROR_INVALID_MESSAGE: &str = "invalid_message";

impl PaintSession {
    /// Apply one UI message
    pub fn handle(&mut self, message: UiToEngine, now: Instant) {
        match message {
            UiToEngine::PaintCommand(command) => self.handle_paint_command(command),
            UiToEngine::MaterialCommand(command) => self.handle_material_command(command),
            UiToEngine::TransformCommand(command) => self.handle_transform_command(command),
            UiToEngine::Pointer(event) => self.handle_pointer(event, now),
        }
    }

    /// Parse and apply a JSON message.
    ///
    /// Parse failures are also queued as an `Error` message for the UI.
    pub fn handle_json(&mut self, json: &str, now: Instant) -> Result<(), IpcError> {
        match from_json::<UiToEngine>(json) {
            Ok(message) => {
                self.handle(message, now);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to parse UI message: {}", e);
                self.send(EngineToUi::Error {
                    code: ERROR_INVALID_MESSAGE.to_string(),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn handle_paint_command(&mut self, command: PaintCommand) {
        debug!("Paint command: {:?}", command);
        match command {
            PaintCommand::SetBrushColor { color } => self.set_brush_color(color),
            PaintCommand::SetBrushSize { size } => self.set_brush_size(size),
            PaintCommand::SetBrushOpacity { opacity } => self.set_brush_opacity(opacity),
            PaintCommand::Undo => {
                self.undo();
            }
            PaintCommand::Redo => {
                self.redo();
            }
            PaintCommand::SetMode { mode } => self.set_mode(mode),
            PaintCommand::ToggleMode => self.toggle_mode(),
        }
    }

    fn handle_material_command(&mut self, command: MaterialCommand) {
        match command {
            // Rejection is already reported to the UI
            MaterialCommand::SetColor { color } => {
                let _ = self.set_material_color(&color);
            }
            MaterialCommand::SetMetalness { value } => self.set_metalness(value),
            MaterialCommand::SetRoughness { value } => self.set_roughness(value),
            MaterialCommand::Reset => self.reset_material(),
        }
    }

    fn handle_transform_command(&mut self, command: TransformCommand) {
        match command {
            TransformCommand::Move { axis, value } => self.move_axis(axis, value),
            TransformCommand::Rotate { axis, degrees } => self.rotate_axis(axis, degrees),
            TransformCommand::SetUniformScale { value } => self.set_uniform_scale(value),
            TransformCommand::Reset => self.reset_transform(),
            TransformCommand::ToggleLock => {
                self.toggle_lock();
            }
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Down { point } => self.pointer_down(Vec3::from(point), now),
            PointerEvent::Move { point } => self.pointer_move(Vec3::from(point), now),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }
}
