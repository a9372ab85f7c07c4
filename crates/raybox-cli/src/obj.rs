//! Minimal wavefront OBJ mesh loader.
//!
//! Reads `v` and `f` records, triangulating polygonal faces as fans.
//! Normals, texture coordinates, groups, and materials are ignored.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use raybox_bvh::{Face, Mesh};
use raybox_math::Point3;

/// Load a triangle mesh from an OBJ file.
pub fn load_obj(path: &Path) -> Result<Mesh> {
    let file = File::open(path)?;
    parse_obj(BufReader::new(file))
}

/// Parse OBJ records from any buffered reader.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<Mesh> {
    let mut vertices: Vec<Point3> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0f32; 3];
                for coord in coords.iter_mut() {
                    let token = tokens.next().with_context(|| {
                        format!("line {}: vertex with fewer than 3 coordinates", line_no + 1)
                    })?;
                    *coord = token
                        .parse()
                        .with_context(|| format!("line {}: bad coordinate `{token}`", line_no + 1))?;
                }
                vertices.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let mut indices = Vec::new();
                for token in tokens {
                    let index = parse_face_index(token, vertices.len())
                        .with_context(|| format!("line {}", line_no + 1))?;
                    indices.push(index);
                }
                if indices.len() < 3 {
                    bail!("line {}: face with fewer than 3 vertices", line_no + 1);
                }
                for i in 1..indices.len() - 1 {
                    faces.push(Face::new(indices[0], indices[i], indices[i + 1]));
                }
            }
            _ => {}
        }
    }

    Ok(Mesh::new(vertices, faces)?)
}

/// Face tokens look like `7`, `7/1`, `7//3` or `7/1/3`; indices are
/// 1-based, negative values count back from the latest vertex.
fn parse_face_index(token: &str, num_vertices: usize) -> Result<u32> {
    let first = token.split('/').next().unwrap_or(token);
    let index: i64 = first
        .parse()
        .with_context(|| format!("bad face index `{token}`"))?;
    let resolved = if index < 0 {
        num_vertices as i64 + index
    } else {
        index - 1
    };
    if resolved < 0 || resolved >= num_vertices as i64 {
        bail!("face index `{token}` is out of range for {num_vertices} vertices");
    }
    Ok(resolved as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_triangle() {
        let mesh = parse_obj(Cursor::new("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.faces, vec![Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_quad_fans_into_two_triangles() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = parse_obj(Cursor::new(src)).unwrap();
        assert_eq!(
            mesh.faces,
            vec![Face::new(0, 1, 2), Face::new(0, 2, 3)]
        );
    }

    #[test]
    fn test_slash_and_negative_indices() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2//2 -1\n";
        let mesh = parse_obj(Cursor::new(src)).unwrap();
        assert_eq!(mesh.faces, vec![Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_ignores_other_records() {
        let src = "# comment\nvn 0 0 1\nvt 0 0\no thing\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse_obj(Cursor::new(src)).unwrap();
        assert_eq!(mesh.faces.len(), 1);
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n";
        assert!(parse_obj(Cursor::new(src)).is_err());
    }

    #[test]
    fn test_short_face_fails() {
        let src = "v 0 0 0\nv 1 0 0\nf 1 2\n";
        assert!(parse_obj(Cursor::new(src)).is_err());
    }
}
