//! Host-side glue for minipaint
//!
//! This crate wires the painting engine to a UI host:
//! - [`PaintSession`] owns the engine plus the brush, material, and
//!   transform panels and turns pointer events into strokes
//! - [`PaintThrottle`] rate-limits painting while dragging
//! - [`OutboundUiMessages`] queues [`EngineToUi`] messages for the host to
//!   forward to the webview
//!
//! Ray picking stays with the host; the session only sees world-space hits.

mod brush;
mod dispatch;
mod material;
mod session;
mod throttle;
mod transform;

pub use brush::{BrushState, RecentColors};
pub use material::MaterialState;
pub use session::PaintSession;
pub use throttle::PaintThrottle;
pub use transform::TransformState;

use minipaint_ipc::EngineToUi;

/// Queue of messages waiting to be sent to the UI
/// The host should drain this once per frame and forward to the webview
#[derive(Debug, Default)]
pub struct OutboundUiMessages {
    pub messages: Vec<EngineToUi>,
}

impl OutboundUiMessages {
    /// Queue a message to be sent to the UI
    pub fn send(&mut self, msg: EngineToUi) {
        self.messages.push(msg);
    }

    /// Take all queued messages, leaving the queue empty
    pub fn drain(&mut self) -> Vec<EngineToUi> {
        std::mem::take(&mut self.messages)
    }
}
