//! Stroke recording: per-vertex color deltas grouped into one undoable action

use std::collections::HashMap;

use tracing::debug;

use crate::types::Rgb;

/// One vertex's color change within a stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorDelta {
    pub vertex: u32,
    /// Color before the stroke first touched the vertex
    pub before: Rgb,
    /// Color after the most recent touch in this stroke
    pub after: Rgb,
}

/// All color changes of one pointer-down to pointer-up gesture
///
/// Deltas are deduplicated per vertex: the first touch captures `before`,
/// every touch overwrites `after`.
#[derive(Debug, Clone, Default)]
pub struct Stroke {
    /// Unique stroke identifier (monotonic per recorder)
    pub id: u64,
    deltas: Vec<ColorDelta>,
    /// vertex index -> slot in `deltas`
    visited: HashMap<u32, usize>,
}

impl Stroke {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            deltas: Vec::new(),
            visited: HashMap::new(),
        }
    }

    /// Record a color change for a vertex.
    pub fn record(&mut self, vertex: u32, before: Rgb, after: Rgb) {
        match self.visited.get(&vertex) {
            Some(&slot) => self.deltas[slot].after = after,
            None => {
                self.visited.insert(vertex, self.deltas.len());
                self.deltas.push(ColorDelta {
                    vertex,
                    before,
                    after,
                });
            }
        }
    }

    pub fn contains(&self, vertex: u32) -> bool {
        self.visited.contains_key(&vertex)
    }

    pub fn deltas(&self) -> &[ColorDelta] {
        &self.deltas
    }

    /// Number of distinct vertices touched
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Tracks the single in-progress stroke
#[derive(Debug, Default)]
pub struct StrokeRecorder {
    active: Option<Stroke>,
    next_id: u64,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a stroke is currently being recorded
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start a fresh stroke.
    ///
    /// Returns false (and keeps the current stroke) if one is already active.
    pub fn begin(&mut self) -> bool {
        if let Some(stroke) = &self.active {
            debug!("begin: stroke {} already active, ignoring", stroke.id);
            return false;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.active = Some(Stroke::new(id));
        true
    }

    /// The stroke that `paint` calls should record into
    pub fn active_mut(&mut self) -> Option<&mut Stroke> {
        self.active.as_mut()
    }

    /// Seal the active stroke.
    ///
    /// Returns the stroke only if it touched at least one vertex.
    pub fn end(&mut self) -> Option<Stroke> {
        let stroke = self.active.take()?;
        if stroke.is_empty() {
            debug!("Discarding empty stroke {}", stroke.id);
            return None;
        }
        Some(stroke)
    }

    /// Drop the active stroke without sealing it
    pub fn cancel(&mut self) {
        if let Some(stroke) = self.active.take() {
            debug!("Cancelled stroke {} ({} deltas)", stroke.id, stroke.len());
        }
    }
}
