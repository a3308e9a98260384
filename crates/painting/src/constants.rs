/// Default maximum entries per spatial index leaf.
pub const DEFAULT_LEAF_SIZE: usize = 8;

/// Sentinel for "no child" in the flat BVH node array.
pub const BVH_NONE: u32 = u32::MAX;
