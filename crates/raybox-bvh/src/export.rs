//! Leaf bounding boxes as OBJ geometry.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::Bvh;
use raybox_math::Aabb3;

impl Bvh {
    /// Write every leaf's AABB as an eight-vertex box with six quad faces.
    ///
    /// Leaves are visited in a pre-order walk from the root; vertex
    /// indices are 1-based and run across the whole file. A leaf with the
    /// null AABB (the root of a zero-face mesh) has no finite box and is
    /// skipped.
    pub fn write_leaves_obj<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.nodes.is_empty() {
            return Ok(());
        }
        let mut base = 1u32;
        self.write_leaf_boxes(Self::ROOT, out, &mut base)
    }

    /// Write the leaf-box dump to a file.
    pub fn save_leaves_obj(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_leaves_obj(&mut out)
    }

    fn write_leaf_boxes<W: Write>(&self, node: u32, out: &mut W, base: &mut u32) -> io::Result<()> {
        let n = &self.nodes[node as usize];
        if n.is_leaf() && !n.aabb.is_empty() {
            write_box(out, &n.aabb, base)?;
        }
        if let Some(left) = n.left {
            self.write_leaf_boxes(left, out, base)?;
        }
        if let Some(right) = n.right {
            self.write_leaf_boxes(right, out, base)?;
        }
        Ok(())
    }
}

fn write_box<W: Write>(out: &mut W, aabb: &Aabb3, base: &mut u32) -> io::Result<()> {
    let (lo, hi) = (aabb.min, aabb.max);
    writeln!(out, "v {} {} {}", lo.x, lo.y, lo.z)?;
    writeln!(out, "v {} {} {}", hi.x, lo.y, lo.z)?;
    writeln!(out, "v {} {} {}", hi.x, hi.y, lo.z)?;
    writeln!(out, "v {} {} {}", lo.x, hi.y, lo.z)?;
    writeln!(out, "v {} {} {}", lo.x, lo.y, hi.z)?;
    writeln!(out, "v {} {} {}", hi.x, lo.y, hi.z)?;
    writeln!(out, "v {} {} {}", hi.x, hi.y, hi.z)?;
    writeln!(out, "v {} {} {}", lo.x, hi.y, hi.z)?;

    let b = *base;
    writeln!(out, "f {} {} {} {}", b, b + 1, b + 2, b + 3)?; // front
    writeln!(out, "f {} {} {} {}", b + 4, b + 5, b + 6, b + 7)?; // back
    writeln!(out, "f {} {} {} {}", b, b + 1, b + 5, b + 4)?; // bottom
    writeln!(out, "f {} {} {} {}", b + 3, b + 2, b + 6, b + 7)?; // top
    writeln!(out, "f {} {} {} {}", b, b + 4, b + 7, b + 3)?; // left
    writeln!(out, "f {} {} {} {}", b + 1, b + 5, b + 6, b + 2)?; // right

    *base += 8;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mesh;

    fn dump(bvh: &Bvh) -> String {
        let mut out = Vec::new();
        bvh.write_leaves_obj(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_leaf_box() {
        let mesh = Mesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 2.0],
            &[0, 1, 2],
        )
        .unwrap();
        let mut bvh = Bvh::new(mesh);
        bvh.build(0);

        let text = dump(&bvh);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "v 0 0 0");
        assert_eq!(lines[1], "v 1 0 0");
        assert_eq!(lines[6], "v 1 1 2");
        assert_eq!(lines[8], "f 1 2 3 4");
        assert_eq!(lines[9], "f 5 6 7 8");
        assert_eq!(lines[13], "f 2 6 7 3");
    }

    #[test]
    fn test_two_leaves_use_running_indices() {
        let mesh = Mesh::from_raw(
            &[
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0, //
                10.0, 0.0, 0.0, 11.0, 0.0, 0.0, 10.5, 1.0, 0.0,
            ],
            &[0, 1, 2, 3, 4, 5],
        )
        .unwrap();
        let mut bvh = Bvh::new(mesh);
        bvh.build(1);

        let text = dump(&bvh);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 28);
        // Pre-order: left leaf first
        assert_eq!(lines[0], "v 0 0 0");
        assert_eq!(lines[14], "v 10 0 0");
        // Second box faces continue the 1-based vertex numbering
        assert_eq!(lines[22], "f 9 10 11 12");
    }

    #[test]
    fn test_empty_mesh_dumps_nothing() {
        let mut bvh = Bvh::new(Mesh::default());
        bvh.build(5);
        assert!(dump(&bvh).is_empty());
    }
}
