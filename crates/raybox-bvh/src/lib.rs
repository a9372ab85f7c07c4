#![warn(missing_docs)]

//! SAH-built bounding volume hierarchy over triangle meshes.
//!
//! A [`Bvh`] owns a [`Mesh`] and a flat node arena addressed by `u32`
//! indices, root at index 0. Construction is top-down: each node sorts
//! its faces along the dominant axis and scores every candidate split
//! with a surface-area-heuristic cost before partitioning. Queries walk
//! the arena iteratively over a caller-supplied stack and stop at the
//! first leaf whose bounding box the ray enters.
//!
//! # Example
//!
//! ```
//! use raybox_bvh::{Bvh, Face, Mesh};
//! use raybox_math::{Point3, Vec3};
//!
//! let mesh = Mesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![Face::new(0, 1, 2)],
//! )
//! .unwrap();
//!
//! let mut bvh = Bvh::new(mesh);
//! bvh.build(4);
//!
//! let mut stack = vec![0u32; bvh.max_depth()];
//! stack[0] = Bvh::ROOT;
//! let mut stack_len = 1;
//! let hit = bvh.intersect_leaves(
//!     &Point3::new(0.25, 0.25, 5.0),
//!     &Vec3::new(0.0, 0.0, -1.0),
//!     &mut stack_len,
//!     &mut stack,
//! );
//! assert!(hit.is_some());
//! ```

pub mod batch;
mod build;
mod export;
mod mesh;
mod node;
mod traverse;

pub use batch::{BatchError, BatchHits};
pub use build::SplitCost;
pub use mesh::{Face, Mesh, MeshError};
pub use node::BvhNode;
pub use traverse::LeafHit;

use raybox_math::Aabb3;

/// Default cap on tree depth and traversal stack occupancy.
pub const DEFAULT_MAX_DEPTH: usize = 15;

/// A bounding volume hierarchy over a triangle mesh.
///
/// Between [`build`](Self::build) calls the arena is logically read-only:
/// any number of traversals may run against a built tree concurrently as
/// long as each owns its own stack buffer.
#[derive(Debug, Clone)]
pub struct Bvh {
    mesh: Mesh,
    nodes: Vec<BvhNode>,
    max_depth: usize,
}

impl Bvh {
    /// Arena index of the root node.
    pub const ROOT: u32 = 0;

    /// Create an unbuilt BVH owning `mesh`, with the default depth cap.
    pub fn new(mesh: Mesh) -> Self {
        Self::with_max_depth(mesh, DEFAULT_MAX_DEPTH)
    }

    /// Create an unbuilt BVH with an explicit depth cap.
    ///
    /// The cap bounds both the effective build depth and the number of
    /// stack slots a traversal will ever occupy.
    pub fn with_max_depth(mesh: Mesh, max_depth: usize) -> Self {
        Self {
            mesh,
            nodes: Vec::new(),
            max_depth,
        }
    }

    /// The mesh this hierarchy indexes.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The node arena. Empty until the first [`build`](Self::build).
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// The depth/stack cap this hierarchy was created with.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of nodes in the arena.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves (nodes with both children absent).
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Longest path from the root to any leaf; 0 for a single-node tree
    /// or an unbuilt one.
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            0
        } else {
            self.node_depth(Self::ROOT)
        }
    }

    fn node_depth(&self, node: u32) -> usize {
        let n = &self.nodes[node as usize];
        match (n.left, n.right) {
            (Some(left), Some(right)) => 1 + self.node_depth(left).max(self.node_depth(right)),
            (Some(child), None) | (None, Some(child)) => 1 + self.node_depth(child),
            (None, None) => 0,
        }
    }

    /// Bounding box of a node by arena index.
    pub fn bbox(&self, node: u32) -> Aabb3 {
        self.nodes[node as usize].aabb
    }
}
