//! Paint session
//!
//! Owns the engine and every piece of panel state the UI edits. Pointer
//! events arrive already resolved to world-space hits on the mesh.
//!
//! Stroke lifecycle:
//! - `pointer_down` opens a stroke and paints immediately
//! - `pointer_move` paints through the throttle while the stroke is open
//! - `pointer_up` or `pointer_leave` closes and commits it

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use glam::Vec3;
use minipaint_config::PaintConfig;
use minipaint_ipc::{Axis, EditMode, EngineToUi};
use painting::{ColorParseError, EngineOptions, MeshData, PaintError, VertexPaintEngine};
use tracing::{debug, info, warn};

use crate::OutboundUiMessages;
use crate::brush::{BrushState, RecentColors};
use crate::material::MaterialState;
use crate::throttle::PaintThrottle;
use crate::transform::TransformState;

/// Error code sent when the material color cannot be parsed
pub(crate) const ERROR_INVALID_COLOR: &str = "invalid_color";

/// Interactive painting state for one mesh
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct PaintSession {
    engine: VertexPaintEngine,
    config: PaintConfig,
    mode: EditMode,
    brush: BrushState,
    recent_colors: RecentColors,
    material: MaterialState,
    transform: TransformState,
    throttle: PaintThrottle,
    /// Shared with the engine's history observer
    outbox: Arc<Mutex<OutboundUiMessages>>,
}

impl Default for PaintSession {
    fn default() -> Self {
        Self::new(PaintConfig::default())
    }
}

impl PaintSession {
    pub fn new(config: PaintConfig) -> Self {
        let mut engine = VertexPaintEngine::with_options(EngineOptions {
            leaf_size: config.bvh_leaf_size,
            max_undo_levels: config.max_undo_levels,
        });
        let material = MaterialState::from_config(&config.material);
        engine.apply_base_color(material.color);

        let outbox = Arc::new(Mutex::new(OutboundUiMessages::default()));
        let sink = Arc::clone(&outbox);
        engine.on_history_change(move |state| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .send(EngineToUi::HistoryChanged {
                    can_undo: state.can_undo,
                    can_redo: state.can_redo,
                });
        });

        Self {
            engine,
            brush: BrushState::from_config(&config.brush),
            recent_colors: RecentColors::new(config.recent_colors),
            material,
            transform: TransformState::default(),
            throttle: PaintThrottle::new(config.paint_interval()),
            mode: EditMode::default(),
            outbox,
            config,
        }
    }

    pub fn engine(&self) -> &VertexPaintEngine {
        &self.engine
    }

    /// Mutable engine access for the renderer's dirty-flag polling
    pub fn engine_mut(&mut self) -> &mut VertexPaintEngine {
        &mut self.engine
    }

    pub fn config(&self) -> &PaintConfig {
        &self.config
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn recent_colors(&self) -> &RecentColors {
        &self.recent_colors
    }

    pub fn material(&self) -> &MaterialState {
        &self.material
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Take all queued UI messages
    pub fn drain_messages(&mut self) -> Vec<EngineToUi> {
        self.outbox().drain()
    }

    // ------------------------------------------------------------------
    // Mesh
    // ------------------------------------------------------------------

    /// Load a mesh. Meshes without colors are filled with the material color.
    pub fn load_mesh(&mut self, data: MeshData) -> Result<(), PaintError> {
        self.throttle.reset();
        let has_colors = data.colors.is_some();
        self.engine.load_mesh_data(MeshData {
            base_color: self.material.color,
            ..data
        })?;
        self.engine.set_transform(&self.transform.transform);

        self.send(EngineToUi::MeshLoaded {
            vertex_count: self.engine.vertex_count(),
            has_colors,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mode
    // ------------------------------------------------------------------

    /// Switch mode. Leaving paint mode closes any open stroke.
    pub fn set_mode(&mut self, mode: EditMode) {
        if self.mode == mode {
            return;
        }
        if self.mode == EditMode::Paint {
            self.finish_stroke();
        }
        self.mode = mode;
        info!("Entered {:?} mode", mode);
        self.send(EngineToUi::ModeChanged { mode });
    }

    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            EditMode::Move => EditMode::Paint,
            EditMode::Paint => EditMode::Move,
        };
        self.set_mode(next);
    }

    // ------------------------------------------------------------------
    // Pointer protocol
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, hit: Vec3, now: Instant) {
        if self.mode != EditMode::Paint {
            return;
        }
        if !self.engine.begin_stroke() {
            debug!("pointer_down: stroke not started");
            return;
        }
        self.throttle.reset();
        self.paint(hit);
        self.throttle.mark(now);
    }

    pub fn pointer_move(&mut self, hit: Vec3, now: Instant) {
        if self.mode != EditMode::Paint {
            return;
        }
        self.send(EngineToUi::BrushPreviewMoved {
            position: hit.to_array(),
        });
        if !self.engine.is_stroking() {
            return;
        }
        if let Some(point) = self.throttle.offer(hit, now) {
            self.paint(point);
        }
    }

    /// Deliver a throttled trailing move once its interval has passed
    pub fn tick(&mut self, now: Instant) {
        if !self.engine.is_stroking() {
            return;
        }
        if let Some(point) = self.throttle.poll(now) {
            self.paint(point);
        }
    }

    pub fn pointer_up(&mut self) {
        self.finish_stroke();
    }

    /// Leaving the mesh closes the stroke exactly like releasing the button
    pub fn pointer_leave(&mut self) {
        self.finish_stroke();
    }

    pub fn is_painting(&self) -> bool {
        self.engine.is_stroking()
    }

    fn finish_stroke(&mut self) {
        // A pending move must not land after the stroke is sealed
        self.throttle.reset();
        if self.engine.is_stroking() && !self.engine.end_stroke() {
            debug!("Stroke touched no vertices, nothing committed");
        }
    }

    fn paint(&mut self, point: Vec3) {
        self.engine.set_brush(self.brush.settings());
        let touched = self.engine.paint_at(point);
        if touched == 0 {
            return;
        }
        let color = self.brush.color();
        if self.recent_colors.use_color(color) {
            self.send(EngineToUi::ColorUsed { color });
        }
    }

    // ------------------------------------------------------------------
    // Brush
    // ------------------------------------------------------------------

    pub fn set_brush_color(&mut self, color: [f32; 3]) {
        self.brush.set_color(color);
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.brush.set_size(size);
    }

    pub fn set_brush_opacity(&mut self, opacity: f32) {
        self.brush.set_opacity(opacity);
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Undo the last stroke. An open stroke is committed first.
    pub fn undo(&mut self) -> bool {
        self.finish_stroke();
        self.engine.undo()
    }

    /// Redo the last undone stroke. An open stroke is committed first.
    pub fn redo(&mut self) -> bool {
        self.finish_stroke();
        self.engine.redo()
    }

    // ------------------------------------------------------------------
    // Material
    // ------------------------------------------------------------------

    /// Set the base color from a hex string.
    ///
    /// Meshes loaded without colors are refilled with it.
    pub fn set_material_color(&mut self, hex: &str) -> Result<(), ColorParseError> {
        let color = match self.material.set_color_hex(hex) {
            Ok(color) => color,
            Err(e) => {
                warn!("Rejected material color {:?}: {}", hex, e);
                self.send(EngineToUi::Error {
                    code: ERROR_INVALID_COLOR.to_string(),
                    message: e.to_string(),
                });
                return Err(e);
            }
        };
        self.throttle.reset();
        self.engine.apply_base_color(color);
        self.send_material();
        Ok(())
    }

    pub fn set_metalness(&mut self, value: f32) {
        self.material.set_metalness(value);
        self.send_material();
    }

    pub fn set_roughness(&mut self, value: f32) {
        self.material.set_roughness(value);
        self.send_material();
    }

    /// Restore material defaults, repaint every vertex with the default
    /// color, and clear history
    pub fn reset_material(&mut self) {
        self.material.reset(&self.config.material);
        self.throttle.reset();
        self.engine.reset_colors(self.material.color);
        info!("Material reset");
        self.send_material();
    }

    fn send_material(&mut self) {
        let properties = self.material.properties();
        self.send(EngineToUi::MaterialUpdated(properties));
    }

    // ------------------------------------------------------------------
    // Transform
    // ------------------------------------------------------------------

    pub fn move_axis(&mut self, axis: Axis, value: f32) {
        self.transform.set_position(axis, value);
        self.apply_transform();
    }

    pub fn rotate_axis(&mut self, axis: Axis, degrees: f32) {
        self.transform.set_rotation_degrees(axis, degrees);
        self.apply_transform();
    }

    pub fn set_uniform_scale(&mut self, value: f32) {
        if !self.transform.set_uniform_scale(value) {
            warn!("Ignoring invalid scale {}", value);
            return;
        }
        self.apply_transform();
    }

    pub fn reset_transform(&mut self) {
        self.transform.reset();
        self.apply_transform();
    }

    /// Flip the camera lock. Returns the new state.
    pub fn toggle_lock(&mut self) -> bool {
        let locked = self.transform.toggle_lock();
        info!("Camera controls {}", if locked { "locked" } else { "unlocked" });
        self.send(EngineToUi::TransformUpdated(self.transform.properties()));
        locked
    }

    fn apply_transform(&mut self) {
        self.engine.set_transform(&self.transform.transform);
        self.send(EngineToUi::TransformUpdated(self.transform.properties()));
    }

    // ------------------------------------------------------------------
    // Outbox
    // ------------------------------------------------------------------

    pub(crate) fn send(&self, msg: EngineToUi) {
        self.outbox().send(msg);
    }

    fn outbox(&self) -> MutexGuard<'_, OutboundUiMessages> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use minipaint_ipc::MaterialProperties;
    use painting::WHITE;

    const RED: [f32; 3] = [1.0, 0.0, 0.0];

    /// Four vertices along +X one unit apart, paint mode, brush touching one vertex
    fn painting_session() -> PaintSession {
        let mut session = PaintSession::default();
        session
            .load_mesh(MeshData::from_positions(
                (0..4).map(|i| [i as f32, 0.0, 0.0]).collect(),
                WHITE,
            ))
            .unwrap();
        session.set_mode(EditMode::Paint);
        session.set_brush_size(0.5);
        session.set_brush_opacity(1.0);
        session.drain_messages();
        session
    }

    fn x(value: f32) -> Vec3 {
        Vec3::new(value, 0.0, 0.0)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_move_mode_ignores_pointer() {
        let mut session = painting_session();
        session.set_mode(EditMode::Move);
        session.drain_messages();

        let now = Instant::now();
        session.pointer_down(Vec3::ZERO, now);
        session.pointer_move(x(1.0), now + ms(50));
        session.pointer_up();

        assert_eq!(session.engine().colors(), &[WHITE; 4]);
        assert!(!session.engine().can_undo());
        assert!(session.drain_messages().is_empty());
    }

    #[test]
    fn test_drag_is_one_undo_step() {
        let mut session = painting_session();
        let start = Instant::now();

        session.pointer_down(Vec3::ZERO, start);
        session.pointer_move(x(1.0), start + ms(40));
        session.pointer_move(x(2.0), start + ms(80));
        session.pointer_up();

        assert_eq!(session.engine().colors()[..3], [RED; 3]);
        assert_eq!(session.engine().history().undo_count(), 1);

        assert!(session.undo());
        assert_eq!(session.engine().colors(), &[WHITE; 4]);
    }

    #[test]
    fn test_messages_for_stroke() {
        let mut session = painting_session();
        let start = Instant::now();

        session.pointer_down(Vec3::ZERO, start);
        session.pointer_up();
        session.pointer_down(x(1.0), start + ms(100));
        session.pointer_up();

        // Same color twice only reports once
        assert_eq!(
            session.drain_messages(),
            vec![
                EngineToUi::ColorUsed { color: RED },
                EngineToUi::HistoryChanged {
                    can_undo: true,
                    can_redo: false
                },
                EngineToUi::HistoryChanged {
                    can_undo: true,
                    can_redo: false
                },
            ]
        );
    }

    #[test]
    fn test_throttled_move_delivered_by_tick() {
        let mut session = painting_session();
        let start = Instant::now();

        session.pointer_down(Vec3::ZERO, start);
        session.pointer_move(x(1.0), start + ms(10));
        assert_eq!(session.engine().colors()[1], WHITE);

        session.tick(start + ms(20));
        assert_eq!(session.engine().colors()[1], WHITE);

        session.tick(start + ms(30));
        assert_eq!(session.engine().colors()[1], RED);
        session.pointer_up();
        assert_eq!(session.engine().history().undo_count(), 1);
    }

    #[test]
    fn test_burst_paints_once_per_interval() {
        let mut session = painting_session();
        let start = Instant::now();

        session.pointer_down(Vec3::ZERO, start);
        session.pointer_move(x(1.0), start + ms(5));
        session.pointer_move(x(2.0), start + ms(10));
        session.tick(start + ms(30));

        // Second window: one suppressed move, delivered once it elapses
        session.pointer_move(x(3.0), start + ms(40));
        session.tick(start + ms(50));
        assert_eq!(session.engine().colors()[3], WHITE);
        session.tick(start + ms(60));
        session.pointer_up();

        let colors = session.engine().colors();
        assert_eq!(colors[0], RED);
        // Superseded within the first window, never painted
        assert_eq!(colors[1], WHITE);
        assert_eq!(colors[2], RED);
        assert_eq!(colors[3], RED);
        assert_eq!(session.engine().history().undo_count(), 1);
    }

    #[test]
    fn test_leave_finalizes_and_drops_pending() {
        let mut session = painting_session();
        let start = Instant::now();

        session.pointer_down(Vec3::ZERO, start);
        session.pointer_move(x(1.0), start + ms(5));
        session.pointer_leave();

        assert!(!session.is_painting());
        assert!(session.engine().can_undo());

        // Neither the pending move nor later hovering paints
        session.tick(start + ms(100));
        session.pointer_move(x(2.0), start + ms(200));
        assert_eq!(session.engine().colors()[1..], [WHITE; 3]);
    }

    #[test]
    fn test_up_drops_pending_move() {
        let mut session = painting_session();
        let start = Instant::now();

        session.pointer_down(Vec3::ZERO, start);
        session.pointer_move(x(1.0), start + ms(5));
        session.pointer_up();
        session.tick(start + ms(100));

        assert_eq!(session.engine().colors()[1], WHITE);
        assert_eq!(session.engine().history().undo_count(), 1);
    }

    #[test]
    fn test_hover_emits_preview() {
        let mut session = painting_session();
        session.pointer_move(x(3.0), Instant::now());
        assert_eq!(
            session.drain_messages(),
            vec![EngineToUi::BrushPreviewMoved {
                position: [3.0, 0.0, 0.0]
            }]
        );
        assert_eq!(session.engine().colors(), &[WHITE; 4]);
    }

    #[test]
    fn test_leaving_paint_mode_commits_stroke() {
        let mut session = painting_session();
        session.pointer_down(Vec3::ZERO, Instant::now());
        session.toggle_mode();

        assert_eq!(session.mode(), EditMode::Move);
        assert!(!session.is_painting());
        assert!(session.engine().can_undo());
    }

    #[test]
    fn test_material_reset_clears_colors_and_history() {
        let mut session = painting_session();
        session.pointer_down(Vec3::ZERO, Instant::now());
        session.pointer_up();
        session.set_metalness(0.9);
        session.drain_messages();

        session.reset_material();

        assert_eq!(session.engine().colors(), &[WHITE; 4]);
        assert!(!session.engine().can_undo());
        assert_eq!(
            session.drain_messages(),
            vec![
                EngineToUi::HistoryChanged {
                    can_undo: false,
                    can_redo: false
                },
                EngineToUi::MaterialUpdated(MaterialProperties {
                    color: "#FFFFFF".to_string(),
                    metalness: 0.5,
                    roughness: 0.5,
                }),
            ]
        );
    }

    #[test]
    fn test_material_color_recolors_uncolored_mesh() {
        let mut session = painting_session();
        session.set_material_color("#000000").unwrap();
        assert_eq!(session.engine().colors(), &[[0.0; 3]; 4]);

        assert!(session.set_material_color("zz").is_err());
        let messages = session.drain_messages();
        assert!(matches!(
            messages.last(),
            Some(EngineToUi::Error { code, .. }) if code == ERROR_INVALID_COLOR
        ));
        assert_eq!(session.engine().colors(), &[[0.0; 3]; 4]);
    }

    #[test]
    fn test_paint_follows_transform() {
        let mut session = painting_session();
        session.move_axis(Axis::X, 10.0);
        session.rotate_axis(Axis::Z, 90.0);

        // Local (2, 0, 0) rotated 90 degrees about Z lands at world (10, 2, 0)
        session.pointer_down(Vec3::new(10.0, 2.0, 0.0), Instant::now());
        session.pointer_up();

        let colors = session.engine().colors();
        // Hit lands within float error of vertex 2
        assert!(colors[2][1] < 0.01 && colors[2][2] < 0.01);
        assert_eq!(colors[0], WHITE);
        assert_eq!(colors[1], WHITE);
    }

    #[test]
    fn test_load_mesh_resets_and_reports() {
        let mut session = painting_session();
        session.pointer_down(Vec3::ZERO, Instant::now());

        session
            .load_mesh(MeshData {
                positions: vec![[0.0; 3]; 2],
                colors: Some(vec![RED; 2]),
                ..MeshData::default()
            })
            .unwrap();

        assert!(!session.is_painting());
        assert!(!session.engine().can_undo());
        assert!(session.drain_messages().contains(&EngineToUi::MeshLoaded {
            vertex_count: 2,
            has_colors: true
        }));
    }
}
