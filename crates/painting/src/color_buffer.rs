//! Per-vertex color storage with a renderer dirty flag

use crate::types::Rgb;

/// Mutable per-vertex RGB colors, parallel to the mesh's position buffer
///
/// The engine is the only writer. The renderer reads [`ColorBuffer::as_slice`]
/// (or [`ColorBuffer::as_bytes`] for GPU upload) once per frame after
/// [`ColorBuffer::take_dirty`] reports a change.
#[derive(Debug, Clone, Default)]
pub struct ColorBuffer {
    colors: Vec<Rgb>,
    dirty: bool,
}

impl ColorBuffer {
    /// Create a buffer of `len` vertices all set to `color`
    pub fn filled(len: usize, color: Rgb) -> Self {
        Self {
            colors: vec![color; len],
            dirty: true,
        }
    }

    /// Wrap existing colors (e.g. shipped with the loaded file)
    pub fn from_colors(colors: Vec<Rgb>) -> Self {
        Self {
            colors,
            dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get a vertex color. Returns None if out of range.
    #[inline]
    pub fn get(&self, index: u32) -> Option<Rgb> {
        self.colors.get(index as usize).copied()
    }

    /// Set a vertex color. Does nothing if out of range.
    #[inline]
    pub fn set(&mut self, index: u32, color: Rgb) {
        if let Some(slot) = self.colors.get_mut(index as usize) {
            *slot = color;
            self.dirty = true;
        }
    }

    /// Set every vertex to one color
    pub fn fill(&mut self, color: Rgb) {
        self.colors.fill(color);
        self.dirty = true;
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.colors
    }

    /// Raw bytes for a vertex buffer upload (tightly packed f32 RGB)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn to_vec(&self) -> Vec<Rgb> {
        self.colors.clone()
    }

    /// Check whether colors changed since the last [`ColorBuffer::take_dirty`]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
