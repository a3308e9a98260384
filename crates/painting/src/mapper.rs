//! World-to-local coordinate mapping for hit points

use glam::{Mat4, Vec3};
use tracing::{debug, warn};

use crate::types::MeshTransform;

/// Caches the inverse of the mesh's world matrix
///
/// Refreshed eagerly on every transform change. A singular or non-finite
/// matrix leaves the last valid inverse in place.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    inverse: Mat4,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self {
            inverse: Mat4::IDENTITY,
        }
    }
}

impl CoordinateMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the cached inverse from a world matrix.
    ///
    /// Returns false if the matrix could not be inverted.
    pub fn refresh(&mut self, world: Mat4) -> bool {
        let determinant = world.determinant();
        if !determinant.is_finite() || determinant == 0.0 {
            warn!(
                "Mesh transform is not invertible (det={}), keeping previous inverse",
                determinant
            );
            return false;
        }

        let inverse = world.inverse();
        if !inverse.is_finite() {
            warn!("Mesh transform inverse is not finite, keeping previous inverse");
            return false;
        }

        debug!("Coordinate mapper refreshed (det={:.4})", determinant);
        self.inverse = inverse;
        true
    }

    /// Recompute the cached inverse from position/rotation/scale
    pub fn refresh_from_transform(&mut self, transform: &MeshTransform) -> bool {
        self.refresh(transform.world_matrix())
    }

    /// Map a world-space point into mesh-local space
    #[inline]
    pub fn to_local(&self, world_point: Vec3) -> Vec3 {
        self.inverse.transform_point3(world_point)
    }

    pub fn inverse(&self) -> Mat4 {
        self.inverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_by_default() {
        let mapper = CoordinateMapper::new();
        let point = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(mapper.to_local(point), point);
    }

    #[test]
    fn test_round_trip_through_transform() {
        let transform = MeshTransform {
            position: Vec3::new(3.0, -1.0, 4.0),
            rotation: Vec3::new(0.3, 1.2, -0.7),
            scale: Vec3::splat(2.5),
        };
        let mut mapper = CoordinateMapper::new();
        assert!(mapper.refresh_from_transform(&transform));

        let local = Vec3::new(0.5, 0.25, -1.0);
        let world = transform.world_matrix().transform_point3(local);
        assert!(mapper.to_local(world).abs_diff_eq(local, 1e-5));
    }

    #[test]
    fn test_tiny_uniform_scale_is_invertible() {
        let transform = MeshTransform {
            scale: Vec3::splat(1e-5),
            ..MeshTransform::IDENTITY
        };
        let mut mapper = CoordinateMapper::new();
        assert!(mapper.refresh_from_transform(&transform));

        let local = Vec3::new(1.0, 2.0, -3.0);
        let world = transform.world_matrix().transform_point3(local);
        assert!(mapper.to_local(world).abs_diff_eq(local, 1e-3));
    }

    #[test]
    fn test_singular_matrix_keeps_previous_inverse() {
        let mut mapper = CoordinateMapper::new();
        let translate = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        assert!(mapper.refresh(translate));

        let collapsed = MeshTransform {
            scale: Vec3::new(1.0, 0.0, 1.0),
            ..MeshTransform::IDENTITY
        };
        assert!(!mapper.refresh_from_transform(&collapsed));

        // Still the inverse of the translation
        let local = mapper.to_local(Vec3::new(6.0, 0.0, 0.0));
        assert!(local.abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn test_non_finite_matrix_rejected() {
        let mut mapper = CoordinateMapper::new();
        let bad = Mat4::from_translation(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(!mapper.refresh(bad));
        assert_eq!(mapper.inverse(), Mat4::IDENTITY);
    }
}
