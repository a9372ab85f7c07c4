//! Ray representation and the ray/AABB slab test.

use crate::{Aabb3, Point3, Vec3};

/// A ray in 3D space defined by origin and direction.
///
/// The direction is kept as given — it is not normalized — so all `t`
/// parameters are expressed in units of the direction's length.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray. Must be non-zero.
    pub direction: Vec3,
    /// Precomputed reciprocal of direction components for fast AABB tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
}

impl Ray {
    /// Create a new ray from origin and direction.
    ///
    /// Zero direction components are allowed (the reciprocal becomes ±∞
    /// and the slab test collapses them correctly); an all-zero direction
    /// is not.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let inv = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
        let sign = [
            if inv.x < 0.0 { 1 } else { 0 },
            if inv.y < 0.0 { 1 } else { 0 },
            if inv.z < 0.0 { 1 } else { 0 },
        ];
        Self {
            origin,
            direction,
            inv_direction: inv,
            sign,
        }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f32) -> Point3 {
        self.origin + t * self.direction
    }

    /// Test ray-AABB intersection using the slab method.
    ///
    /// Returns `Some((t_enter, t_exit))` if the ray intersects the box.
    /// `t_enter` is not clamped: a ray whose origin lies inside the box
    /// reports `t_enter <= 0 <= t_exit`. Returns `None` if the box is
    /// missed entirely or lies behind the origin. Empty (inverted) boxes
    /// are never hit.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> Option<(f32, f32)> {
        let bounds = [aabb.min, aabb.max];

        let tx1 = (bounds[self.sign[0]].x - self.origin.x) * self.inv_direction.x;
        let tx2 = (bounds[1 - self.sign[0]].x - self.origin.x) * self.inv_direction.x;

        let mut t_enter = tx1;
        let mut t_exit = tx2;

        let ty1 = (bounds[self.sign[1]].y - self.origin.y) * self.inv_direction.y;
        let ty2 = (bounds[1 - self.sign[1]].y - self.origin.y) * self.inv_direction.y;

        t_enter = t_enter.max(ty1);
        t_exit = t_exit.min(ty2);

        let tz1 = (bounds[self.sign[2]].z - self.origin.z) * self.inv_direction.z;
        let tz2 = (bounds[1 - self.sign[2]].z - self.origin.z) * self.inv_direction.z;

        t_enter = t_enter.max(tz1);
        t_exit = t_exit.min(tz2);

        if t_exit >= t_enter && t_exit >= 0.0 {
            Some((t_enter, t_exit))
        } else {
            None
        }
    }
}
