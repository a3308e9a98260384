//! Shared configuration for minipaint
//!
//! This crate provides the single source of truth for brush defaults,
//! material defaults, pointer rate limiting, and history settings shared by
//! the painting engine and the host session.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Environment variable holding the path to a JSON config file
pub const CONFIG_ENV_VAR: &str = "MINIPAINT_CONFIG";

/// Default brush color (red)
pub const DEFAULT_BRUSH_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

/// Default brush radius in mesh-local units
pub const DEFAULT_BRUSH_SIZE: f32 = 0.1;

/// Default brush opacity
pub const DEFAULT_BRUSH_OPACITY: f32 = 0.5;

/// Default material base color (white)
pub const DEFAULT_MATERIAL_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Default material metalness
pub const DEFAULT_METALNESS: f32 = 0.5;

/// Default material roughness
pub const DEFAULT_ROUGHNESS: f32 = 0.5;

/// Minimum interval between two paint calls while dragging
pub const DEFAULT_PAINT_INTERVAL_MS: u64 = 30;

/// Maximum vertex entries per BVH leaf
pub const DEFAULT_BVH_LEAF_SIZE: usize = 8;

/// Number of recently used brush colors remembered
pub const DEFAULT_RECENT_COLORS: usize = 8;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Inclusive range for a slider-style setting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range. NaN falls back to `min`.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }
}

/// Brush defaults and slider ranges
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Initial brush color
    pub color: [f32; 3],
    /// Initial brush radius
    pub size: f32,
    /// Initial brush opacity
    pub opacity: f32,
    /// Allowed brush radius range
    pub size_range: Range,
    /// Allowed opacity range
    pub opacity_range: Range,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_BRUSH_COLOR,
            size: DEFAULT_BRUSH_SIZE,
            opacity: DEFAULT_BRUSH_OPACITY,
            size_range: Range::new(0.1, 5.0),
            opacity_range: Range::new(0.1, 1.0),
        }
    }
}

/// Material defaults restored by a material reset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_MATERIAL_COLOR,
            metalness: DEFAULT_METALNESS,
            roughness: DEFAULT_ROUGHNESS,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct PaintConfig {
    pub brush: BrushConfig,
    pub material: MaterialConfig,
    /// Minimum milliseconds between two paint calls during a drag
    pub paint_interval_ms: u64,
    /// Maximum entries per spatial index leaf
    pub bvh_leaf_size: usize,
    /// Maximum undo levels (None = unbounded)
    pub max_undo_levels: Option<usize>,
    /// Capacity of the recently-used color list
    pub recent_colors: usize,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            brush: BrushConfig::default(),
            material: MaterialConfig::default(),
            paint_interval_ms: DEFAULT_PAINT_INTERVAL_MS,
            bvh_leaf_size: DEFAULT_BVH_LEAF_SIZE,
            max_undo_levels: None,
            recent_colors: DEFAULT_RECENT_COLORS,
        }
    }
}

impl PaintConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Load from the file named by `MINIPAINT_CONFIG`, or use defaults
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config at {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Get the paint interval as a Duration
    pub fn paint_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.paint_interval_ms)
    }

    /// Repair values that would make the engine misbehave.
    pub fn validated(mut self) -> Self {
        if self.bvh_leaf_size == 0 {
            warn!("bvh_leaf_size must be at least 1, using default");
            self.bvh_leaf_size = DEFAULT_BVH_LEAF_SIZE;
        }
        for range in [&mut self.brush.size_range, &mut self.brush.opacity_range] {
            if range.min > range.max {
                warn!("Invalid range {:?}, swapping bounds", range);
                *range = Range::new(range.max, range.min);
            }
        }
        self.brush.opacity_range.min = self.brush.opacity_range.min.max(0.0);
        self.brush.opacity_range.max = self.brush.opacity_range.max.min(1.0);
        self.brush.size = self.brush.size_range.clamp(self.brush.size);
        self.brush.opacity = self.brush.opacity_range.clamp(self.brush.opacity);
        self.material.metalness = self.material.metalness.clamp(0.0, 1.0);
        self.material.roughness = self.material.roughness.clamp(0.0, 1.0);
        self
    }
}
