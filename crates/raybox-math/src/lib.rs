#![warn(missing_docs)]

//! Geometry primitives for the raybox BVH.
//!
//! Thin wrappers around nalgebra providing the types the builder and
//! traversal work in: 3D points and vectors in single precision,
//! axis-aligned bounding boxes, and rays with a slab intersection test.

mod aabb;
mod ray;

pub use aabb::Aabb3;
pub use ray::Ray;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f32>;

/// A vector in 3D space.
pub type Vec3 = nalgebra::Vector3<f32>;
