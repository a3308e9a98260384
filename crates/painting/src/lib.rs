//! minipaint vertex painting engine
//!
//! This crate provides the core of per-vertex mesh painting:
//! - [`spatial`] - Bounding volume hierarchy over vertex positions
//! - [`color_buffer`] - Mutable per-vertex colors with renderer dirty tracking
//! - [`mapper`] - World-to-local mapping through the inverse mesh transform
//! - [`brush`] - Spherical brush with linear falloff blending
//! - [`stroke`] - Per-vertex delta recording for one gesture
//! - [`history`] - Stroke-grouped undo/redo with change observers
//! - [`engine`] - Host-facing facade tying the above together
//! - [`export`] - PLY serialization of the painted mesh

pub mod brush;
pub mod color_buffer;
pub mod constants;
pub mod engine;
pub mod export;
pub mod history;
pub mod mapper;
pub mod spatial;
pub mod stroke;
pub mod types;

pub use brush::*;
pub use color_buffer::*;
pub use constants::*;
pub use engine::*;
pub use export::*;
pub use history::*;
pub use mapper::*;
pub use spatial::*;
pub use stroke::*;
pub use types::*;
