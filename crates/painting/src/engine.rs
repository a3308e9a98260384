//! Host-facing vertex painting engine
//!
//! This module ties the pieces together:
//! - Mesh load builds the spatial index and color buffer together
//! - Transform changes refresh the coordinate mapper eagerly
//! - Strokes flow `begin_stroke` -> `paint_at`* -> `end_stroke` into history
//!
//! The engine never draws. The renderer reads [`VertexPaintEngine::colors`]
//! after [`VertexPaintEngine::take_colors_dirty`] reports a change.

use glam::{Mat4, Vec3};
use tracing::{debug, info};

use crate::brush::{BrushEngine, BrushSettings, PaintTarget};
use crate::color_buffer::ColorBuffer;
use crate::constants::DEFAULT_LEAF_SIZE;
use crate::history::{HistoryManager, ObserverId};
use crate::mapper::CoordinateMapper;
use crate::spatial::VertexBvh;
use crate::stroke::StrokeRecorder;
use crate::types::{HistoryState, MeshData, MeshSnapshot, MeshTransform, Rgb, WHITE};

/// Errors reported by the engine.
///
/// Only mesh loading can fail; everything else degrades to a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaintError {
    #[error("Mesh {attribute} count {actual} does not match vertex count {expected}")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Tuning knobs for the engine
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Maximum vertex entries per spatial index leaf
    pub leaf_size: usize,
    /// Maximum undo levels (None = unbounded)
    pub max_undo_levels: Option<usize>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            leaf_size: DEFAULT_LEAF_SIZE,
            max_undo_levels: None,
        }
    }
}

/// Everything created together on mesh load and replaced together
struct LoadedMesh {
    positions: Vec<Vec3>,
    normals: Option<Vec<[f32; 3]>>,
    index: VertexBvh,
    colors: ColorBuffer,
    /// Whether the file carried its own vertex colors
    has_own_colors: bool,
}

/// Vertex painting engine for a single mesh
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct VertexPaintEngine {
    /// Loaded mesh state (None until the first load)
    mesh: Option<LoadedMesh>,
    mapper: CoordinateMapper,
    brush: BrushEngine,
    recorder: StrokeRecorder,
    history: HistoryManager,
    /// Fill color for meshes without their own colors
    base_color: Rgb,
    options: EngineOptions,
}

impl Default for VertexPaintEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexPaintEngine {
    /// Create an engine with no mesh loaded
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            mesh: None,
            mapper: CoordinateMapper::new(),
            brush: BrushEngine::default(),
            recorder: StrokeRecorder::new(),
            history: HistoryManager::with_max_levels(options.max_undo_levels),
            base_color: WHITE,
            options,
        }
    }

    // ------------------------------------------------------------------
    // Mesh lifecycle
    // ------------------------------------------------------------------

    /// Load a mesh from positions and optional per-vertex colors.
    ///
    /// Meshes without colors are filled with the current base color.
    pub fn load_mesh(
        &mut self,
        positions: Vec<[f32; 3]>,
        existing_colors: Option<Vec<Rgb>>,
    ) -> Result<(), PaintError> {
        self.load_mesh_data(MeshData {
            positions,
            colors: existing_colors,
            normals: None,
            base_color: self.base_color,
        })
    }

    /// Load a mesh with all attributes the loader supplies.
    ///
    /// Replaces the spatial index and color buffer wholesale and clears
    /// history. An in-progress stroke is dropped.
    pub fn load_mesh_data(&mut self, data: MeshData) -> Result<(), PaintError> {
        let vertex_count = data.positions.len();
        if let Some(colors) = &data.colors {
            check_length("color", vertex_count, colors.len())?;
        }
        if let Some(normals) = &data.normals {
            check_length("normal", vertex_count, normals.len())?;
        }

        let positions: Vec<Vec3> = data.positions.iter().copied().map(Vec3::from).collect();
        let index = VertexBvh::build_with_leaf_size(&positions, self.options.leaf_size);

        let has_own_colors = data.colors.is_some();
        let colors = match data.colors {
            Some(colors) => ColorBuffer::from_colors(colors),
            None => ColorBuffer::filled(vertex_count, data.base_color),
        };
        self.base_color = data.base_color;

        self.recorder.cancel();
        self.mesh = Some(LoadedMesh {
            positions,
            normals: data.normals,
            index,
            colors,
            has_own_colors,
        });
        self.history.reset();

        info!(
            "Loaded mesh: {} vertices (own colors: {})",
            vertex_count, has_own_colors
        );
        Ok(())
    }

    /// Reset every vertex to `default_color` and clear history.
    ///
    /// `default_color` also becomes the base color for later loads.
    pub fn reset_colors(&mut self, default_color: Rgb) {
        self.recorder.cancel();
        self.base_color = default_color;
        if let Some(mesh) = &mut self.mesh {
            mesh.colors.fill(default_color);
            info!("Reset {} vertex colors", mesh.colors.len());
        }
        self.history.reset();
    }

    /// Change the material base color.
    ///
    /// Meshes loaded without colors are recolored entirely, which also
    /// clears history; meshes with their own colors are left alone.
    pub fn apply_base_color(&mut self, color: Rgb) {
        self.base_color = color;
        let recolor = self.mesh.as_ref().is_some_and(|mesh| !mesh.has_own_colors);
        if recolor {
            self.reset_colors(color);
        }
    }

    pub fn base_color(&self) -> Rgb {
        self.base_color
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, |mesh| mesh.positions.len())
    }

    // ------------------------------------------------------------------
    // Transform and brush
    // ------------------------------------------------------------------

    /// Refresh the world-to-local mapping from the mesh's transform
    pub fn set_transform(&mut self, transform: &MeshTransform) {
        self.mapper.refresh_from_transform(transform);
    }

    /// Refresh the world-to-local mapping from a raw world matrix
    pub fn set_world_matrix(&mut self, world: Mat4) {
        self.mapper.refresh(world);
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn set_brush(&mut self, settings: BrushSettings) {
        self.brush.set_settings(settings);
    }

    pub fn brush(&self) -> &BrushSettings {
        self.brush.settings()
    }

    // ------------------------------------------------------------------
    // Strokes
    // ------------------------------------------------------------------

    /// Start a stroke. Ignored if no mesh is loaded or one is already active.
    ///
    /// A new stroke invalidates redo right away, even if it ends up
    /// touching nothing.
    pub fn begin_stroke(&mut self) -> bool {
        if self.mesh.is_none() {
            debug!("begin_stroke: no mesh loaded, ignoring");
            return false;
        }
        if !self.recorder.begin() {
            return false;
        }
        self.history.clear_redo();
        true
    }

    /// Paint at a world-space hit point.
    ///
    /// Returns the number of vertices touched; zero if no stroke is active.
    pub fn paint_at(&mut self, world_point: Vec3) -> usize {
        let local = self.mapper.to_local(world_point);
        self.paint_at_local(local)
    }

    /// Paint at a point already in mesh-local space
    pub fn paint_at_local(&mut self, local_point: Vec3) -> usize {
        let Some(mesh) = &mut self.mesh else {
            debug!("paint_at: no mesh loaded, ignoring");
            return 0;
        };
        let Some(stroke) = self.recorder.active_mut() else {
            debug!("paint_at: no active stroke, ignoring");
            return 0;
        };

        self.brush.paint(
            PaintTarget {
                index: &mesh.index,
                positions: &mesh.positions,
                colors: &mut mesh.colors,
            },
            local_point,
            stroke,
        )
    }

    /// Seal the active stroke and commit it if it changed anything.
    ///
    /// Returns true if a stroke was committed to history.
    pub fn end_stroke(&mut self) -> bool {
        match self.recorder.end() {
            Some(stroke) => {
                self.history.commit(stroke);
                true
            }
            None => false,
        }
    }

    /// Check if a stroke is currently in progress
    pub fn is_stroking(&self) -> bool {
        self.recorder.is_active()
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Undo the last stroke. Returns true if anything changed.
    ///
    /// An open stroke is sealed and committed first.
    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        match &mut self.mesh {
            Some(mesh) => self.history.undo(&mut mesh.colors),
            None => false,
        }
    }

    /// Redo the last undone stroke. Returns true if anything changed.
    ///
    /// An open stroke is sealed first; if it changed anything, redo is
    /// already gone.
    pub fn redo(&mut self) -> bool {
        self.end_stroke();
        match &mut self.mesh {
            Some(mesh) => self.history.redo(&mut mesh.colors),
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_state(&self) -> HistoryState {
        self.history.state()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Register a callback for `(can_undo, can_redo)` changes
    pub fn on_history_change(
        &mut self,
        callback: impl FnMut(HistoryState) + Send + Sync + 'static,
    ) -> ObserverId {
        self.history.on_change(callback)
    }

    pub fn remove_history_observer(&mut self, id: ObserverId) -> bool {
        self.history.remove_observer(id)
    }

    // ------------------------------------------------------------------
    // Renderer and exporter views
    // ------------------------------------------------------------------

    /// Current vertex colors (empty if no mesh is loaded)
    pub fn colors(&self) -> &[Rgb] {
        self.mesh
            .as_ref()
            .map(|mesh| mesh.colors.as_slice())
            .unwrap_or_default()
    }

    /// Current vertex colors as raw bytes for GPU upload
    pub fn colors_as_bytes(&self) -> &[u8] {
        self.mesh
            .as_ref()
            .map(|mesh| mesh.colors.as_bytes())
            .unwrap_or_default()
    }

    /// Return and clear the color dirty flag (call once per frame)
    pub fn take_colors_dirty(&mut self) -> bool {
        self.mesh
            .as_mut()
            .is_some_and(|mesh| mesh.colors.take_dirty())
    }

    /// Copy of the current color buffer for the exporter
    pub fn export_colors(&self) -> Vec<Rgb> {
        self.colors().to_vec()
    }

    pub fn positions(&self) -> &[Vec3] {
        self.mesh
            .as_ref()
            .map(|mesh| mesh.positions.as_slice())
            .unwrap_or_default()
    }

    /// Borrowed view of geometry and colors for serialization
    pub fn snapshot(&self) -> Option<MeshSnapshot<'_>> {
        self.mesh.as_ref().map(|mesh| MeshSnapshot {
            positions: &mesh.positions,
            colors: mesh.colors.as_slice(),
            normals: mesh.normals.as_deref(),
        })
    }
}

fn check_length(attribute: &'static str, expected: usize, actual: usize) -> Result<(), PaintError> {
    if expected == actual {
        Ok(())
    } else {
        Err(PaintError::AttributeLength {
            attribute,
            expected,
            actual,
        })
    }
}
