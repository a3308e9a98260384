//! PLY serialization of a painted mesh
//!
//! Writes an ASCII PLY 1.0 point list: one vertex per line with position,
//! optional normal, and 8-bit color. Face data is the exporter's concern.

use std::io::Write;

use tracing::info;

use crate::types::{MeshSnapshot, channel_to_byte};

/// Errors that can occur while writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Color count {colors} does not match vertex count {vertices}")]
    ColorCount { vertices: usize, colors: usize },
}

/// Write `snapshot` as ASCII PLY to `out`
pub fn write_ply(snapshot: &MeshSnapshot<'_>, mut out: impl Write) -> Result<(), ExportError> {
    let vertex_count = snapshot.vertex_count();
    if snapshot.colors.len() != vertex_count {
        return Err(ExportError::ColorCount {
            vertices: vertex_count,
            colors: snapshot.colors.len(),
        });
    }
    let normals = snapshot
        .normals
        .filter(|normals| normals.len() == vertex_count);

    writeln!(out, "ply")?;
    writeln!(out, "format ascii 1.0")?;
    writeln!(out, "element vertex {vertex_count}")?;
    writeln!(out, "property float x")?;
    writeln!(out, "property float y")?;
    writeln!(out, "property float z")?;
    if normals.is_some() {
        writeln!(out, "property float nx")?;
        writeln!(out, "property float ny")?;
        writeln!(out, "property float nz")?;
    }
    writeln!(out, "property uchar red")?;
    writeln!(out, "property uchar green")?;
    writeln!(out, "property uchar blue")?;
    writeln!(out, "end_header")?;

    for (i, (position, color)) in snapshot.positions.iter().zip(snapshot.colors).enumerate() {
        write!(out, "{} {} {}", position.x, position.y, position.z)?;
        if let Some(normals) = normals {
            let [nx, ny, nz] = normals[i];
            write!(out, " {nx} {ny} {nz}")?;
        }
        let [r, g, b] = color.map(channel_to_byte);
        writeln!(out, " {r} {g} {b}")?;
    }

    out.flush()?;
    info!("Exported {} vertices as PLY", vertex_count);
    Ok(())
}
