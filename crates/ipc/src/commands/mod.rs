//! Command types for IPC messages.

mod material;
mod paint;
mod transform;

pub use material::*;
pub use paint::*;
pub use transform::*;

use serde::{Deserialize, Serialize};

/// Coordinate axis for per-axis transform sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index (0 = x, 1 = y, 2 = z).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}
