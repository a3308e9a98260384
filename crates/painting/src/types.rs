use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Linear RGB color, components nominally in 0..=1
pub type Rgb = [f32; 3];

/// White, the color fresh meshes get when they carry no colors of their own
pub const WHITE: Rgb = [1.0, 1.0, 1.0];

/// Error returned when a hex color string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("Invalid hex color length: expected 3 or 6 digits, got {0}")]
    InvalidLength(usize),
    #[error("Invalid hex digit in color: {0}")]
    InvalidDigit(String),
}

/// Parse `#RRGGBB`, `RRGGBB`, or `#RGB` into an [`Rgb`]
pub fn parse_hex_color(hex: &str) -> Result<Rgb, ColorParseError> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.is_ascii() {
        return Err(ColorParseError::InvalidDigit(hex.to_string()));
    }
    let expanded: String = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        n => return Err(ColorParseError::InvalidLength(n)),
    };

    let mut rgb = [0.0; 3];
    for (channel, chunk) in rgb.iter_mut().zip(expanded.as_bytes().chunks(2)) {
        let text = std::str::from_utf8(chunk)
            .map_err(|_| ColorParseError::InvalidDigit(hex.to_string()))?;
        let byte = u8::from_str_radix(text, 16)
            .map_err(|_| ColorParseError::InvalidDigit(hex.to_string()))?;
        *channel = byte as f32 / 255.0;
    }
    Ok(rgb)
}

/// Format an [`Rgb`] as `#RRGGBB` (components clamped to 0..=1)
pub fn to_hex_color(color: Rgb) -> String {
    let [r, g, b] = color.map(channel_to_byte);
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Convert a 0..=1 channel to a rounded byte
pub fn channel_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// World placement of the painted mesh
///
/// Rotation is Euler XYZ in radians, so the world matrix is
/// `T * Rx * Ry * Rz * S`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl MeshTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Build the mesh's local-to-world matrix
    pub fn world_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// The `(can_undo, can_redo)` pair reported to history observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Mesh attributes handed over by the mesh loader
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions in mesh-local space
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex colors shipped with the file, if any
    pub colors: Option<Vec<Rgb>>,
    /// Per-vertex normals, kept only for export
    pub normals: Option<Vec<[f32; 3]>>,
    /// Fill color used when `colors` is absent
    pub base_color: Rgb,
}

impl MeshData {
    /// Positions only, filled with the given base color
    pub fn from_positions(positions: Vec<[f32; 3]>, base_color: Rgb) -> Self {
        Self {
            positions,
            colors: None,
            normals: None,
            base_color,
        }
    }
}

/// Read-only view of the painted mesh for the exporter
#[derive(Debug, Clone, Copy)]
pub struct MeshSnapshot<'a> {
    pub positions: &'a [Vec3],
    pub colors: &'a [Rgb],
    pub normals: Option<&'a [[f32; 3]]>,
}

impl MeshSnapshot<'_> {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
