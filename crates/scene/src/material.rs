//! Material panel state
//!
//! Metalness and roughness only affect shading; the base color also fills
//! meshes that were loaded without vertex colors.

use minipaint_config::MaterialConfig;
use minipaint_ipc::MaterialProperties;
use painting::{ColorParseError, Rgb, parse_hex_color, to_hex_color};

/// Current material values
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialState {
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for MaterialState {
    fn default() -> Self {
        Self::from_config(&MaterialConfig::default())
    }
}

impl MaterialState {
    pub fn from_config(config: &MaterialConfig) -> Self {
        Self {
            color: config.color,
            metalness: config.metalness,
            roughness: config.roughness,
        }
    }

    /// Parse and store a hex base color
    pub fn set_color_hex(&mut self, hex: &str) -> Result<Rgb, ColorParseError> {
        self.color = parse_hex_color(hex)?;
        Ok(self.color)
    }

    pub fn set_metalness(&mut self, value: f32) {
        self.metalness = unit(value);
    }

    pub fn set_roughness(&mut self, value: f32) {
        self.roughness = unit(value);
    }

    pub fn reset(&mut self, config: &MaterialConfig) {
        *self = Self::from_config(config);
    }

    pub fn properties(&self) -> MaterialProperties {
        MaterialProperties {
            color: to_hex_color(self.color),
            metalness: self.metalness,
            roughness: self.roughness,
        }
    }
}

fn unit(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
