//! Spatial index over mesh vertices.
//!
//! This module provides a bulk-loaded bounding volume hierarchy for:
//! - Fast candidate lookup for a brush's query box
//! - Tolerating empty and single-vertex meshes without special cases
//!
//! The tree is built once per mesh load and never mutated afterwards. Every
//! entry is a degenerate box at a vertex position, so leaf tests are plain
//! point-in-box checks.

use glam::Vec3;
use tracing::{debug, warn};

use crate::constants::{BVH_NONE, DEFAULT_LEAF_SIZE};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered at `center` with the same half-extent on every axis.
    pub fn from_center_half_extent(center: Vec3, half_extent: f32) -> Self {
        let half = Vec3::splat(half_extent);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Index of the longest axis (0 = x, 1 = y, 2 = z).
    fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }
}

/// A node in the flat BVH array.
///
/// Leaves have `left == right == BVH_NONE` and own `entries[start..start + count]`.
#[derive(Debug, Clone, Copy)]
struct BvhNode {
    bounds: Aabb,
    left: u32,
    right: u32,
    start: u32,
    count: u32,
}

impl BvhNode {
    fn is_leaf(&self) -> bool {
        self.left == BVH_NONE
    }
}

/// An entry stored in the tree: vertex index and position.
#[derive(Debug, Clone, Copy)]
struct BvhEntry {
    vertex: u32,
    position: Vec3,
}

/// Bounding volume hierarchy over vertex positions.
///
/// Used during painting to find every vertex inside a brush's query box
/// without scanning the whole mesh.
#[derive(Debug, Clone, Default)]
pub struct VertexBvh {
    nodes: Vec<BvhNode>,
    entries: Vec<BvhEntry>,
}

impl VertexBvh {
    /// Build a tree over all positions with the default leaf size.
    pub fn build(positions: &[Vec3]) -> Self {
        Self::build_with_leaf_size(positions, DEFAULT_LEAF_SIZE)
    }

    /// Build a tree over all positions.
    ///
    /// Vertex `i` is tagged with index `i`. Non-finite positions are left out
    /// so they can never be returned by a query.
    pub fn build_with_leaf_size(positions: &[Vec3], leaf_size: usize) -> Self {
        let leaf_size = leaf_size.max(1);
        let mut entries: Vec<BvhEntry> = positions
            .iter()
            .enumerate()
            .filter_map(|(i, &position)| {
                if position.is_finite() {
                    Some(BvhEntry {
                        vertex: i as u32,
                        position,
                    })
                } else {
                    None
                }
            })
            .collect();

        let skipped = positions.len() - entries.len();
        if skipped > 0 {
            warn!("Spatial index skipped {} non-finite vertices", skipped);
        }

        let mut nodes = Vec::new();
        if !entries.is_empty() {
            let len = entries.len();
            nodes.reserve(2 * len / leaf_size + 1);
            Self::build_node(&mut nodes, &mut entries, 0, len, leaf_size);
        }

        debug!(
            "Built vertex BVH: {} entries, {} nodes",
            entries.len(),
            nodes.len()
        );

        Self { nodes, entries }
    }

    fn build_node(
        nodes: &mut Vec<BvhNode>,
        entries: &mut [BvhEntry],
        start: usize,
        end: usize,
        leaf_size: usize,
    ) -> u32 {
        let mut bounds = Aabb::empty();
        for entry in &entries[start..end] {
            bounds.include_point(entry.position);
        }

        let count = end - start;
        let node_index = nodes.len() as u32;
        nodes.push(BvhNode {
            bounds,
            left: BVH_NONE,
            right: BVH_NONE,
            start: start as u32,
            count: count as u32,
        });

        if count <= leaf_size {
            return node_index;
        }

        // Median split along the longest axis keeps the tree balanced.
        let axis = bounds.longest_axis();
        let mid = count / 2;
        entries[start..end].select_nth_unstable_by(mid, |a, b| {
            a.position[axis].total_cmp(&b.position[axis])
        });

        let mid = start + mid;
        let left = Self::build_node(nodes, entries, start, mid, leaf_size);
        let right = Self::build_node(nodes, entries, mid, end, leaf_size);

        let node = &mut nodes[node_index as usize];
        node.left = left;
        node.right = right;
        node.count = 0;

        node_index
    }

    /// Query all vertex indices whose position lies inside the (closed) box.
    ///
    /// No ordering is guaranteed.
    pub fn query_aabb(&self, query: &Aabb) -> Vec<u32> {
        let mut results = Vec::new();
        if self.nodes.is_empty() {
            return results;
        }

        let mut stack = vec![0u32];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index as usize];
            if !node.bounds.intersects(query) {
                continue;
            }

            if node.is_leaf() {
                let start = node.start as usize;
                let end = start + node.count as usize;
                results.extend(
                    self.entries[start..end]
                        .iter()
                        .filter(|entry| query.contains_point(entry.position))
                        .map(|entry| entry.vertex),
                );
            } else {
                stack.push(node.left);
                stack.push(node.right);
            }
        }

        results
    }

    /// Bounds of every indexed vertex, or None when empty.
    pub fn bounds(&self) -> Option<Aabb> {
        self.nodes.first().map(|root| root.bounds)
    }

    /// Get the number of indexed vertices.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
