//! Binary STL import/export.
//!
//! STL carries no connectivity, so every facet becomes one triangular cell.
//! That is sufficient for the annotation engine: cell ids are facet indices
//! in file order, which is what authoring tools record.

use std::fs;
use std::path::Path;

use cairn_math::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::SurfaceMesh;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL byte buffer into a [`SurfaceMesh`].
pub fn mesh_from_binary_stl(bytes: &[u8]) -> Result<SurfaceMesh> {
    if bytes.len() < HEADER_LEN + 4 {
        return Err(MeshError::MalformedStl("truncated header".into()));
    }
    if bytes.starts_with(b"solid ") && !looks_binary(bytes) {
        return Err(MeshError::MalformedStl(
            "ascii STL is not supported, convert to binary".into(),
        ));
    }
    let count = u32::from_le_bytes(
        bytes[HEADER_LEN..HEADER_LEN + 4]
            .try_into()
            .expect("4-byte slice"),
    ) as usize;
    let expected = HEADER_LEN + 4 + count * FACET_LEN;
    if bytes.len() < expected {
        return Err(MeshError::MalformedStl(format!(
            "expected {} facets ({} bytes), got {} bytes",
            count,
            expected,
            bytes.len()
        )));
    }

    let mut triangles = Vec::with_capacity(count);
    for i in 0..count {
        let at = HEADER_LEN + 4 + i * FACET_LEN;
        // Skip the normal (12 bytes); recomputed from vertices when needed
        let mut tri = [Point3::origin(); 3];
        for (v, p) in tri.iter_mut().enumerate() {
            let base = at + 12 + v * 12;
            *p = Point3::new(
                read_f32(bytes, base) as f64,
                read_f32(bytes, base + 4) as f64,
                read_f32(bytes, base + 8) as f64,
            );
        }
        triangles.push(tri);
    }

    SurfaceMesh::from_triangles(&triangles)
}

/// Read a binary STL file.
pub fn read_binary_stl(path: &Path) -> Result<SurfaceMesh> {
    let bytes = fs::read(path)?;
    mesh_from_binary_stl(&bytes)
}

/// Serialize a triangle soup as binary STL bytes.
pub fn triangles_to_binary_stl_bytes(triangles: &[[Point3; 3]], header_name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + 4 + triangles.len() * FACET_LEN);

    let mut header = [0u8; HEADER_LEN];
    let name_bytes = header_name.as_bytes();
    let copy_n = name_bytes.len().min(header.len());
    header[..copy_n].copy_from_slice(&name_bytes[..copy_n]);
    out.extend_from_slice(&header);

    out.extend_from_slice(&(triangles.len() as u32).to_le_bytes());

    for tri in triangles {
        let n = facet_normal(tri);
        for c in n {
            out.extend_from_slice(&(c as f32).to_le_bytes());
        }
        for p in tri {
            out.extend_from_slice(&(p.x as f32).to_le_bytes());
            out.extend_from_slice(&(p.y as f32).to_le_bytes());
            out.extend_from_slice(&(p.z as f32).to_le_bytes());
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    out
}

fn facet_normal(tri: &[Point3; 3]) -> [f64; 3] {
    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let n = e1.cross(&e2);
    let len = n.norm();
    if len <= f64::EPSILON {
        return [0.0, 0.0, 0.0];
    }
    [n.x / len, n.y / len, n.z / len]
}

fn read_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes(bytes[at..at + 4].try_into().expect("4-byte slice"))
}

/// Heuristic: a buffer that begins with "solid " may still be binary if its
/// declared facet count matches the byte length.
fn looks_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN + 4 {
        return false;
    }
    let count = u32::from_le_bytes(bytes[HEADER_LEN..HEADER_LEN + 4].try_into().unwrap()) as usize;
    bytes.len() == HEADER_LEN + 4 + count * FACET_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let tris = vec![
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            [
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(0.0, 1.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
            ],
        ];
        let bytes = triangles_to_binary_stl_bytes(&tris, "test");
        assert_eq!(bytes.len(), 84 + 2 * 50);

        let mesh = mesh_from_binary_stl(&bytes).unwrap();
        assert_eq!(mesh.num_cells(), 2);
        assert_eq!(mesh.num_vertices(), 6);
        let p = mesh.cell_points(0).unwrap();
        assert!((p[1].x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_truncated_rejected() {
        let err = mesh_from_binary_stl(&[0u8; 10]);
        assert!(matches!(err, Err(MeshError::MalformedStl(_))));
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let tris = vec![[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]];
        let mut bytes = triangles_to_binary_stl_bytes(&tris, "test");
        bytes.truncate(bytes.len() - 10);
        assert!(matches!(
            mesh_from_binary_stl(&bytes),
            Err(MeshError::MalformedStl(_))
        ));
    }
}
