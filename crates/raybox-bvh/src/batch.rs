//! Array-batch fan-out over the scalar traversal.
//!
//! The batch layer owns no traversal logic: it validates the flat buffer
//! shapes up front, then feeds each ray and its stack row to
//! [`Bvh::intersect_leaves`] and collects the four output columns.

use crate::Bvh;
use raybox_math::{Point3, Vec3};
use thiserror::Error;

/// Errors surfaced by the batch adapter before any ray is traced.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Input buffers disagree on the number of rays or row widths.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The per-ray stacks are narrower than the depth cap requires.
    #[error("stack width {width} is smaller than the required max depth {required}")]
    StackTooSmall {
        /// Slots per ray in the stack buffer.
        width: usize,
        /// The BVH's depth cap.
        required: usize,
    },
}

/// Column-wise results for a batch of rays.
#[derive(Debug, Clone, Default)]
pub struct BatchHits {
    /// Whether each ray entered a leaf box.
    pub hit: Vec<bool>,
    /// Leaf arena index per ray; `-1` when there was no hit.
    pub leaf_index: Vec<i32>,
    /// Entry parameter per ray; `0` when there was no hit.
    pub t_enter: Vec<f32>,
    /// Exit parameter per ray; `0` when there was no hit.
    pub t_exit: Vec<f32>,
}

impl Bvh {
    /// Trace `N` rays given as flat row-major buffers.
    ///
    /// `origins` and `directions` are `N x 3`, `stack_sizes` is `N`, and
    /// `stacks` is `N x stack_width`. Each ray's stack row and size are
    /// consumed in place and written back, so a caller can preload the
    /// root for fresh rays or resume partially walked ones.
    pub fn intersect_leaves_batch(
        &self,
        origins: &[f32],
        directions: &[f32],
        stack_sizes: &mut [i32],
        stacks: &mut [u32],
        stack_width: usize,
    ) -> Result<BatchHits, BatchError> {
        if origins.len() % 3 != 0 {
            return Err(BatchError::ShapeMismatch(format!(
                "origin buffer length {} is not a multiple of 3",
                origins.len()
            )));
        }
        let n_rays = origins.len() / 3;
        if directions.len() != origins.len() {
            return Err(BatchError::ShapeMismatch(format!(
                "direction buffer holds {} values for {} rays",
                directions.len(),
                n_rays
            )));
        }
        if stack_sizes.len() != n_rays {
            return Err(BatchError::ShapeMismatch(format!(
                "stack size buffer holds {} entries for {} rays",
                stack_sizes.len(),
                n_rays
            )));
        }
        if stacks.len() != n_rays * stack_width {
            return Err(BatchError::ShapeMismatch(format!(
                "stack buffer holds {} slots, expected {} rays x {} slots",
                stacks.len(),
                n_rays,
                stack_width
            )));
        }
        if stack_width < self.max_depth {
            return Err(BatchError::StackTooSmall {
                width: stack_width,
                required: self.max_depth,
            });
        }
        for (ray, &size) in stack_sizes.iter().enumerate() {
            if size < 0 || size as usize > stack_width {
                return Err(BatchError::ShapeMismatch(format!(
                    "stack size {size} of ray {ray} does not fit stack width {stack_width}"
                )));
            }
        }

        let mut out = BatchHits {
            hit: Vec::with_capacity(n_rays),
            leaf_index: Vec::with_capacity(n_rays),
            t_enter: Vec::with_capacity(n_rays),
            t_exit: Vec::with_capacity(n_rays),
        };

        for ray in 0..n_rays {
            let origin = Point3::new(origins[3 * ray], origins[3 * ray + 1], origins[3 * ray + 2]);
            let direction = Vec3::new(
                directions[3 * ray],
                directions[3 * ray + 1],
                directions[3 * ray + 2],
            );
            let row = &mut stacks[ray * stack_width..(ray + 1) * stack_width];
            let mut len = stack_sizes[ray] as usize;

            match self.intersect_leaves(&origin, &direction, &mut len, row) {
                Some(hit) => {
                    out.hit.push(true);
                    out.leaf_index.push(hit.leaf as i32);
                    out.t_enter.push(hit.t_enter);
                    out.t_exit.push(hit.t_exit);
                }
                None => {
                    out.hit.push(false);
                    out.leaf_index.push(-1);
                    out.t_enter.push(0.0);
                    out.t_exit.push(0.0);
                }
            }
            stack_sizes[ray] = len as i32;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mesh;

    fn built_pair() -> Bvh {
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
        bvh
    }

    fn preloaded_stacks(n_rays: usize, width: usize) -> (Vec<i32>, Vec<u32>) {
        (vec![1; n_rays], vec![Bvh::ROOT; n_rays * width])
    }

    #[test]
    fn test_batch_matches_scalar() {
        let bvh = built_pair();
        let width = bvh.max_depth();
        // Ray 0 hits the left cluster, ray 1 misses everything, ray 2
        // approaches from the right and hits the right cluster.
        let origins = [5.0, 0.5, 0.0, 0.0, 10.0, 10.0, 20.0, 0.5, 0.0];
        let directions = [-1.0, 0.0, 0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 0.0];
        let (mut sizes, mut stacks) = preloaded_stacks(3, width);

        let hits = bvh
            .intersect_leaves_batch(&origins, &directions, &mut sizes, &mut stacks, width)
            .unwrap();

        assert_eq!(hits.hit, vec![true, false, true]);
        assert_eq!(hits.leaf_index[1], -1);
        assert_eq!(hits.leaf_index[0], 1);
        assert_eq!(hits.leaf_index[2], 2);
        assert!((hits.t_enter[0] - 4.0).abs() < 1e-6);
        assert!((hits.t_enter[2] - 9.0).abs() < 1e-6);
        assert_eq!(hits.t_enter[1], 0.0);
        assert_eq!(hits.t_exit[1], 0.0);
        // Stack sizes are written back; drained rays end at zero.
        assert_eq!(sizes[1], 0);
    }

    #[test]
    fn test_ragged_origins_rejected() {
        let bvh = built_pair();
        let width = bvh.max_depth();
        let (mut sizes, mut stacks) = preloaded_stacks(1, width);
        let err = bvh
            .intersect_leaves_batch(&[0.0, 0.0], &[0.0, 0.0], &mut sizes, &mut stacks, width)
            .unwrap_err();
        assert!(matches!(err, BatchError::ShapeMismatch(_)));
    }

    #[test]
    fn test_mismatched_directions_rejected() {
        let bvh = built_pair();
        let width = bvh.max_depth();
        let (mut sizes, mut stacks) = preloaded_stacks(1, width);
        let err = bvh
            .intersect_leaves_batch(
                &[0.0, 0.0, 0.0],
                &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
                &mut sizes,
                &mut stacks,
                width,
            )
            .unwrap_err();
        assert!(matches!(err, BatchError::ShapeMismatch(_)));
    }

    #[test]
    fn test_narrow_stack_rejected() {
        let bvh = built_pair();
        let width = bvh.max_depth() - 1;
        let (mut sizes, mut stacks) = preloaded_stacks(1, width);
        let err = bvh
            .intersect_leaves_batch(
                &[0.0, 0.0, 0.0],
                &[1.0, 0.0, 0.0],
                &mut sizes,
                &mut stacks,
                width,
            )
            .unwrap_err();
        match err {
            BatchError::StackTooSmall { width: w, required } => {
                assert_eq!(w, width);
                assert_eq!(required, bvh.max_depth());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_oversized_stack_size_rejected() {
        let bvh = built_pair();
        let width = bvh.max_depth();
        let (mut sizes, mut stacks) = preloaded_stacks(1, width);
        sizes[0] = width as i32 + 1;
        let err = bvh
            .intersect_leaves_batch(
                &[0.0, 0.0, 0.0],
                &[1.0, 0.0, 0.0],
                &mut sizes,
                &mut stacks,
                width,
            )
            .unwrap_err();
        assert!(matches!(err, BatchError::ShapeMismatch(_)));
    }

    #[test]
    fn test_empty_batch() {
        let bvh = built_pair();
        let width = bvh.max_depth();
        let hits = bvh
            .intersect_leaves_batch(&[], &[], &mut [], &mut [], width)
            .unwrap();
        assert!(hits.hit.is_empty());
    }
}
