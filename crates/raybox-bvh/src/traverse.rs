//! Iterative first-hit-leaf traversal.

use crate::Bvh;
use raybox_math::{Point3, Ray, Vec3};

/// The nearest leaf whose bounding box a ray entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafHit {
    /// Arena index of the leaf.
    pub leaf: u32,
    /// Ray parameter at which the leaf box is entered; non-positive when
    /// the ray starts inside the box.
    pub t_enter: f32,
    /// Ray parameter at which the leaf box is exited.
    pub t_exit: f32,
}

impl Bvh {
    /// Walk the tree to the first leaf whose AABB the ray hits.
    ///
    /// `stack` is a caller-owned scratch buffer of node indices holding
    /// `*stack_len` live entries; before the first call for a ray, set
    /// `stack[0] = Bvh::ROOT` and `*stack_len = 1`. The buffer must hold
    /// at least [`max_depth`](Self::max_depth) slots. Pushes beyond that
    /// cap are dropped silently — this is a first-hit query, not an
    /// exhaustive one.
    ///
    /// The stack is mutated in place and left as-is on return, so a
    /// caller can call again to enumerate leaves in near-to-far order,
    /// and a batch driver can suspend and resume individual rays.
    ///
    /// Returns `None` once the stack drains without entering a leaf box.
    pub fn intersect_leaves(
        &self,
        origin: &Point3,
        direction: &Vec3,
        stack_len: &mut usize,
        stack: &mut [u32],
    ) -> Option<LeafHit> {
        let ray = Ray::new(*origin, *direction);
        let cap = self.max_depth.min(stack.len());

        while *stack_len > 0 {
            *stack_len -= 1;
            let idx = stack[*stack_len];
            let node = &self.nodes[idx as usize];

            if node.is_leaf() {
                // The parent's test already hit this box; redo it to
                // recover the entry/exit parameters.
                return ray
                    .intersect_aabb(&node.aabb)
                    .map(|(t_enter, t_exit)| LeafHit { leaf: idx, t_enter, t_exit });
            }

            let (Some(left), Some(right)) = (node.left, node.right) else {
                continue;
            };

            let hit_left = ray.intersect_aabb(&self.nodes[left as usize].aabb);
            let hit_right = ray.intersect_aabb(&self.nodes[right as usize].aabb);

            // Push the farther child first so the nearer pops next; on
            // equal entry the left child stays on top.
            match (hit_left, hit_right) {
                (Some((t_left, _)), Some((t_right, _))) => {
                    if t_left <= t_right {
                        push_capped(stack, stack_len, cap, right);
                        push_capped(stack, stack_len, cap, left);
                    } else {
                        push_capped(stack, stack_len, cap, left);
                        push_capped(stack, stack_len, cap, right);
                    }
                }
                (Some(_), None) => push_capped(stack, stack_len, cap, left),
                (None, Some(_)) => push_capped(stack, stack_len, cap, right),
                (None, None) => {}
            }
        }

        None
    }
}

fn push_capped(stack: &mut [u32], len: &mut usize, cap: usize, node: u32) {
    if *len < cap {
        stack[*len] = node;
        *len += 1;
    }
}
