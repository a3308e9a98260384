//! Brush panel state and the recently used colors palette

use minipaint_config::BrushConfig;
use painting::{BrushSettings, Rgb};
use tracing::debug;

/// Brush values as edited in the UI, clamped to the configured ranges
#[derive(Debug, Clone)]
pub struct BrushState {
    color: Rgb,
    size: f32,
    opacity: f32,
    config: BrushConfig,
}

impl BrushState {
    pub fn from_config(config: &BrushConfig) -> Self {
        Self {
            color: config.color,
            size: config.size_range.clamp(config.size),
            opacity: config.opacity_range.clamp(config.opacity),
            config: config.clone(),
        }
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) });
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = self.config.size_range.clamp(size);
        debug!("Brush size set to {}", self.size);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = self.config.opacity_range.clamp(opacity);
        debug!("Brush opacity set to {}", self.opacity);
    }

    /// Settings handed to the engine before each paint call
    pub fn settings(&self) -> BrushSettings {
        BrushSettings::new(self.size, self.color, self.opacity)
    }
}

impl Default for BrushState {
    fn default() -> Self {
        Self::from_config(&BrushConfig::default())
    }
}

/// Most recently used brush colors, newest first, without duplicates
#[derive(Debug, Clone)]
pub struct RecentColors {
    colors: Vec<Rgb>,
    capacity: usize,
}

impl RecentColors {
    pub fn new(capacity: usize) -> Self {
        Self {
            colors: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Move `color` to the front. Returns true if the list changed.
    pub fn use_color(&mut self, color: Rgb) -> bool {
        if self.capacity == 0 || self.colors.first() == Some(&color) {
            return false;
        }
        self.colors.retain(|existing| *existing != color);
        self.colors.insert(0, color);
        self.colors.truncate(self.capacity);
        true
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}
