//! Type definitions for IPC messages.

mod material;
mod transform;

pub use material::*;
pub use transform::*;
