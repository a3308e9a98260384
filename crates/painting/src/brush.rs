//! Brush engine for vertex color blending
//!
//! A brush is a sphere in mesh-local space. Painting happens in two phases:
//! a box query against the spatial index gathers candidates cheaply, then an
//! exact distance test keeps only vertices inside the sphere. Survivors are
//! blended toward the brush color with a linear falloff and recorded into the
//! active stroke.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color_buffer::ColorBuffer;
use crate::spatial::{Aabb, VertexBvh};
use crate::stroke::Stroke;
use crate::types::Rgb;

/// Brush parameters sampled at the start of each paint call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    /// Sphere radius in mesh-local units
    pub radius: f32,
    /// Target color
    pub color: Rgb,
    /// Strength at the brush center, 0.0-1.0
    pub opacity: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            radius: 0.1,
            color: [1.0, 0.0, 0.0],
            opacity: 0.5,
        }
    }
}

impl BrushSettings {
    pub fn new(radius: f32, color: Rgb, opacity: f32) -> Self {
        Self {
            radius,
            color,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// Whether this brush can touch any vertex at all
    pub fn is_degenerate(&self) -> bool {
        !(self.radius.is_finite() && self.radius > 0.0)
    }
}

/// Blend weight for a vertex at distance `distance` from the brush center.
///
/// Linear falloff from `opacity` at the center to zero at the edge; zero
/// outside the sphere or for a degenerate radius.
#[inline]
pub fn falloff_weight(distance: f32, radius: f32, opacity: f32) -> f32 {
    let degenerate = !radius.is_finite() || radius <= 0.0;
    if degenerate || distance.is_nan() || distance > radius {
        return 0.0;
    }
    (1.0 - distance / radius) * opacity.clamp(0.0, 1.0)
}

/// Linear interpolation in RGB: `current * (1 - w) + target * w`
#[inline]
pub fn blend(current: Rgb, target: Rgb, weight: f32) -> Rgb {
    let inv = 1.0 - weight;
    [
        current[0] * inv + target[0] * weight,
        current[1] * inv + target[1] * weight,
        current[2] * inv + target[2] * weight,
    ]
}

/// Mesh state a brush operates on
pub struct PaintTarget<'a> {
    pub index: &'a VertexBvh,
    pub positions: &'a [Vec3],
    pub colors: &'a mut ColorBuffer,
}

/// Brush engine that applies brush dabs to vertex colors
#[derive(Debug, Clone, Default)]
pub struct BrushEngine {
    settings: BrushSettings,
}

impl BrushEngine {
    pub fn new(settings: BrushSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: BrushSettings) {
        self.settings = BrushSettings::new(settings.radius, settings.color, settings.opacity);
    }

    /// Paint one dab centered at `local_hit` (mesh-local space).
    ///
    /// Colors are written back immediately, so repeated dabs within a stroke
    /// compound. Returns the number of vertices touched.
    pub fn paint(&self, target: PaintTarget<'_>, local_hit: Vec3, stroke: &mut Stroke) -> usize {
        let BrushSettings {
            radius,
            color,
            opacity,
        } = self.settings;

        if self.settings.is_degenerate() || !local_hit.is_finite() {
            return 0;
        }

        let query = Aabb::from_center_half_extent(local_hit, radius);
        let candidates = target.index.query_aabb(&query);

        let mut touched = 0;
        for vertex in &candidates {
            let vertex = *vertex;
            let Some(position) = target.positions.get(vertex as usize) else {
                continue;
            };
            let Some(current) = target.colors.get(vertex) else {
                continue;
            };

            // The box over-approximates the sphere; this is the exact test.
            let distance = position.distance(local_hit);
            if distance > radius {
                continue;
            }

            let weight = falloff_weight(distance, radius, opacity);
            let blended = blend(current, color, weight);
            target.colors.set(vertex, blended);
            stroke.record(vertex, current, blended);
            touched += 1;
        }

        debug!(
            "paint: hit=({:.3}, {:.3}, {:.3}) radius={:.3} candidates={} touched={}",
            local_hit.x,
            local_hit.y,
            local_hit.z,
            radius,
            candidates.len(),
            touched
        );

        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = [1.0, 1.0, 1.0];
    const RED: Rgb = [1.0, 0.0, 0.0];

    fn assert_rgb_eq(actual: Rgb, expected: Rgb) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 0.01, "expected {expected:?}, got {actual:?}");
        }
    }

    fn five_vertex_mesh() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_falloff_weight() {
        assert_eq!(falloff_weight(0.0, 2.0, 1.0), 1.0);
        assert_eq!(falloff_weight(1.0, 2.0, 1.0), 0.5);
        assert_eq!(falloff_weight(1.0, 2.0, 0.5), 0.25);
        assert_eq!(falloff_weight(2.0, 2.0, 1.0), 0.0);
        assert_eq!(falloff_weight(2.5, 2.0, 1.0), 0.0);
        assert_eq!(falloff_weight(0.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_falloff_non_finite_inputs() {
        assert_eq!(falloff_weight(f32::NAN, 1.0, 1.0), 0.0);
        assert_eq!(falloff_weight(0.5, f32::NAN, 1.0), 0.0);
        assert_eq!(falloff_weight(0.5, f32::INFINITY, 1.0), 0.0);
        assert_eq!(falloff_weight(0.5, -1.0, 1.0), 0.0);
    }

    #[test]
    fn test_falloff_strictly_decreasing() {
        let radius = 1.5;
        let mut last = f32::INFINITY;
        for step in 0..=30 {
            let distance = radius * step as f32 / 30.0;
            let weight = falloff_weight(distance, radius, 0.8);
            assert!(weight < last, "weight did not decrease at d={distance}");
            last = weight;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_blend() {
        assert_eq!(blend(WHITE, RED, 0.0), WHITE);
        assert_eq!(blend(WHITE, RED, 1.0), RED);
        assert_rgb_eq(blend(WHITE, RED, 0.5), [1.0, 0.5, 0.5]);
    }

    #[test]
    fn test_five_vertex_scenario() {
        let positions = five_vertex_mesh();
        let index = VertexBvh::build(&positions);
        let mut colors = ColorBuffer::filled(5, WHITE);
        let brush = BrushEngine::new(BrushSettings::new(1.5, RED, 1.0));
        let mut stroke = Stroke::new(0);

        let touched = brush.paint(
            PaintTarget {
                index: &index,
                positions: &positions,
                colors: &mut colors,
            },
            Vec3::ZERO,
            &mut stroke,
        );

        assert_eq!(touched, 3);
        assert_rgb_eq(colors.get(0).unwrap(), RED);
        assert_rgb_eq(colors.get(1).unwrap(), [1.0, 0.67, 0.67]);
        assert_rgb_eq(colors.get(2).unwrap(), WHITE);
        assert_rgb_eq(colors.get(3).unwrap(), WHITE);
        assert_rgb_eq(colors.get(4).unwrap(), [1.0, 0.67, 0.67]);

        assert_eq!(stroke.len(), 3);
        assert!(!stroke.contains(2));
        assert!(!stroke.contains(3));
    }

    #[test]
    fn test_box_corner_excluded() {
        // Inside the query box but outside the sphere
        let positions = vec![Vec3::new(0.9, 0.9, 0.9)];
        let index = VertexBvh::build(&positions);
        let mut colors = ColorBuffer::filled(1, WHITE);
        let brush = BrushEngine::new(BrushSettings::new(1.0, RED, 1.0));
        let mut stroke = Stroke::new(0);

        let touched = brush.paint(
            PaintTarget {
                index: &index,
                positions: &positions,
                colors: &mut colors,
            },
            Vec3::ZERO,
            &mut stroke,
        );

        assert_eq!(touched, 0);
        assert_eq!(colors.get(0), Some(WHITE));
        assert!(stroke.is_empty());
    }

    #[test]
    fn test_repeated_dabs_compound() {
        let positions = vec![Vec3::ZERO];
        let index = VertexBvh::build(&positions);
        let mut colors = ColorBuffer::filled(1, WHITE);
        let brush = BrushEngine::new(BrushSettings::new(1.0, RED, 0.5));
        let mut stroke = Stroke::new(0);

        for _ in 0..3 {
            brush.paint(
                PaintTarget {
                    index: &index,
                    positions: &positions,
                    colors: &mut colors,
                },
                Vec3::ZERO,
                &mut stroke,
            );
        }

        // 1 -> 0.5 -> 0.25 -> 0.125 on green and blue
        assert_rgb_eq(colors.get(0).unwrap(), [1.0, 0.125, 0.125]);
        let delta = stroke.deltas()[0];
        assert_eq!(delta.before, WHITE);
        assert_rgb_eq(delta.after, [1.0, 0.125, 0.125]);
    }

    #[test]
    fn test_zero_radius_touches_nothing() {
        let positions = vec![Vec3::ZERO];
        let index = VertexBvh::build(&positions);
        let mut colors = ColorBuffer::filled(1, WHITE);
        let brush = BrushEngine::new(BrushSettings::new(0.0, RED, 1.0));
        let mut stroke = Stroke::new(0);

        let touched = brush.paint(
            PaintTarget {
                index: &index,
                positions: &positions,
                colors: &mut colors,
            },
            Vec3::ZERO,
            &mut stroke,
        );

        assert_eq!(touched, 0);
        assert_eq!(colors.get(0), Some(WHITE));
    }

    #[test]
    fn test_opacity_clamped() {
        let settings = BrushSettings::new(1.0, RED, 3.0);
        assert_eq!(settings.opacity, 1.0);
    }
}
