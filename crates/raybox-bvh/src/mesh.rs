//! Triangle mesh container consumed by the builder.

use raybox_math::{Aabb3, Point3};
use thiserror::Error;

/// Errors reported when constructing a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A face references a vertex position that does not exist.
    #[error("face {face} references vertex {index} but the mesh has {num_vertices} vertices")]
    IndexOutOfRange {
        /// Position of the offending face in the face list.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the pool.
        num_vertices: usize,
    },

    /// Flat vertex buffer whose length is not a multiple of 3.
    #[error("vertex buffer length {0} is not a multiple of 3")]
    RaggedVertexBuffer(usize),

    /// Flat index buffer whose length is not a multiple of 3.
    #[error("index buffer length {0} is not a multiple of 3")]
    RaggedIndexBuffer(usize),
}

/// A triangle as three vertex indices into the owning mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// First vertex index.
    pub a: u32,
    /// Second vertex index.
    pub b: u32,
    /// Third vertex index.
    pub c: u32,
}

impl Face {
    /// Create a face from three vertex indices.
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    /// The three vertex indices in order.
    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }
}

/// Vertex pool plus face list.
///
/// Invariant: every face's three indices are valid positions in
/// `vertices`. The constructors validate it; code that mutates the fields
/// directly is responsible for keeping it.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangles indexing into `vertices`.
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Create a mesh, rejecting faces that index past the vertex pool.
    pub fn new(vertices: Vec<Point3>, faces: Vec<Face>) -> Result<Self, MeshError> {
        for (face_no, face) in faces.iter().enumerate() {
            for index in face.indices() {
                if index as usize >= vertices.len() {
                    return Err(MeshError::IndexOutOfRange {
                        face: face_no,
                        index,
                        num_vertices: vertices.len(),
                    });
                }
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Create a mesh from flat buffers: `[x0, y0, z0, x1, ...]` positions
    /// and `[a0, b0, c0, a1, ...]` triangle indices.
    pub fn from_raw(positions: &[f32], indices: &[u32]) -> Result<Self, MeshError> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::RaggedVertexBuffer(positions.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndexBuffer(indices.len()));
        }
        let vertices = positions
            .chunks_exact(3)
            .map(|p| Point3::new(p[0], p[1], p[2]))
            .collect();
        let faces = indices
            .chunks_exact(3)
            .map(|f| Face::new(f[0], f[1], f[2]))
            .collect();
        Self::new(vertices, faces)
    }

    /// Tight bound of every vertex; the null AABB when the pool is empty.
    pub fn bounds(&self) -> Aabb3 {
        let mut aabb = Aabb3::empty();
        for v in &self.vertices {
            aabb.include_point(v);
        }
        aabb
    }

    /// Tight bound of one face's three vertices.
    pub fn face_aabb(&self, face: &Face) -> Aabb3 {
        let mut aabb = Aabb3::empty();
        for index in face.indices() {
            aabb.include_point(&self.vertices[index as usize]);
        }
        aabb
    }
}
