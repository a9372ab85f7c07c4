//! Top-down SAH construction.

use crate::mesh::Face;
use crate::node::BvhNode;
use crate::Bvh;
use raybox_math::Aabb3;

/// Fixed cost of one traversal step in the SAH model.
const TRAVERSAL_COST: f32 = 1.0;

/// Fixed cost of one triangle intersection in the SAH model.
const TRIANGLE_INTERSECTION_COST: f32 = 1.0;

/// Cost measure used to score candidate splits.
///
/// Both measures bound each candidate partition by the full componentwise
/// union of its faces; they differ only in how a bound is turned into a
/// number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitCost {
    /// Score a bound by its extent along the split axis.
    #[default]
    AxisExtent,
    /// Score a bound by its full surface area.
    SurfaceArea,
}

impl SplitCost {
    fn measure(self, aabb: &Aabb3, axis: usize) -> f32 {
        match self {
            SplitCost::AxisExtent => aabb.extent()[axis],
            SplitCost::SurfaceArea => aabb.surface_area(),
        }
    }
}

impl Bvh {
    /// Build the hierarchy with the default cost measure.
    ///
    /// Resets the arena, seeds the root with the bound of every mesh
    /// vertex and a copy of every face, then splits top-down until the
    /// depth limit (clamped to [`max_depth`](Self::max_depth)) or
    /// single-face leaves. Rebuilding the same mesh with the same limit
    /// reproduces the arena exactly.
    pub fn build(&mut self, depth_limit: usize) {
        self.build_with_cost(depth_limit, SplitCost::default());
    }

    /// Build with an explicit SAH cost measure.
    pub fn build_with_cost(&mut self, depth_limit: usize, cost: SplitCost) {
        self.nodes.clear();

        let mut root = BvhNode::new();
        root.aabb = self.mesh.bounds();
        root.faces = self.mesh.faces.clone();
        self.nodes.push(root);

        // Work stack instead of recursion; call depth stays flat no
        // matter how deep the tree is allowed to grow.
        let limit = depth_limit.min(self.max_depth);
        let mut work = vec![(Self::ROOT, limit)];
        while let Some((node, remaining)) = work.pop() {
            if let Some((left, right)) = self.split_node(node, remaining, cost) {
                work.push((right, remaining - 1));
                work.push((left, remaining - 1));
            }
        }
    }

    /// Split one node into two children, or leave it a leaf.
    ///
    /// Returns the child indices when a split happened.
    fn split_node(&mut self, node_idx: u32, remaining: usize, cost: SplitCost) -> Option<(u32, u32)> {
        if remaining == 0 || self.nodes[node_idx as usize].faces.len() <= 1 {
            return None;
        }

        let parent_aabb = self.nodes[node_idx as usize].aabb;
        let faces = std::mem::take(&mut self.nodes[node_idx as usize].faces);

        // Longest axis, preferring X over Y over Z on ties.
        let size = parent_aabb.extent();
        let mut axis = 0;
        if size.y > size.x && size.y > size.z {
            axis = 1;
        }
        if size.z > size.x && size.z > size.y {
            axis = 2;
        }

        let mut sorted: Vec<(Face, Aabb3)> = faces
            .into_iter()
            .map(|face| {
                let face_aabb = self.mesh.face_aabb(&face);
                (face, face_aabb)
            })
            .collect();
        sorted.sort_by(|x, y| x.1.min[axis].total_cmp(&y.1.min[axis]));

        let count = sorted.len();

        // Prefix/suffix bound sweeps: left_bounds[i] covers sorted[..=i],
        // right_bounds[i] covers sorted[i..].
        let mut left_bounds = Vec::with_capacity(count);
        let mut run = Aabb3::empty();
        for (_, face_aabb) in &sorted {
            run = run.union(face_aabb);
            left_bounds.push(run);
        }
        let mut right_bounds = vec![Aabb3::empty(); count];
        let mut run = Aabb3::empty();
        for i in (0..count).rev() {
            run = run.union(&sorted[i].1);
            right_bounds[i] = run;
        }

        let parent_measure = cost.measure(&parent_aabb, axis);
        let mut best: Option<(f32, usize)> = None;
        for i in 1..count {
            let split_cost = TRAVERSAL_COST
                + cost.measure(&left_bounds[i - 1], axis) / parent_measure
                    * i as f32
                    * TRIANGLE_INTERSECTION_COST
                + cost.measure(&right_bounds[i], axis) / parent_measure
                    * (count - i) as f32
                    * TRIANGLE_INTERSECTION_COST;
            if split_cost.is_finite() && best.map_or(true, |(best_cost, _)| split_cost < best_cost) {
                best = Some((split_cost, i));
            }
        }
        // A flat parent makes every candidate cost non-finite; fall back
        // to the median.
        let split = best.map_or(count / 2, |(_, i)| i);

        let right_faces: Vec<Face> = sorted.split_off(split).into_iter().map(|(f, _)| f).collect();
        let left_faces: Vec<Face> = sorted.into_iter().map(|(f, _)| f).collect();

        let left = BvhNode {
            aabb: left_bounds[split - 1],
            left: None,
            right: None,
            faces: left_faces,
        };
        let right = BvhNode {
            aabb: right_bounds[split],
            left: None,
            right: None,
            faces: right_faces,
        };

        let left_idx = self.nodes.len() as u32;
        let right_idx = left_idx + 1;
        self.nodes.push(left);
        self.nodes.push(right);

        let parent = &mut self.nodes[node_idx as usize];
        parent.left = Some(left_idx);
        parent.right = Some(right_idx);
        Some((left_idx, right_idx))
    }
}
