#![warn(missing_docs)]

//! Math types for the cairn annotation engine.
//!
//! Thin wrappers around nalgebra providing domain-specific types
//! for annotation geometry: points, vectors, directions, orthonormal
//! camera frames, and tolerance constants.

use nalgebra::{Unit, Vector3};

/// A point in 3D world space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// An orthonormal viewing frame: right/up/forward axes plus an origin.
///
/// Used by the camera to express world points in view coordinates for
/// parallel projection. `forward` points from the viewer toward the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Frame origin in world space.
    pub origin: Point3,
    /// Right axis (view +X).
    pub right: Dir3,
    /// Up axis (view +Y).
    pub up: Dir3,
    /// Forward axis (view +Z, into the scene).
    pub forward: Dir3,
}

impl Frame {
    /// Build a frame at `origin` looking along `forward` with the given
    /// approximate up vector.
    ///
    /// `up_hint` is re-orthogonalized against `forward`; it must not be
    /// parallel to it. Returns `None` for degenerate inputs.
    pub fn looking(origin: Point3, forward: Vec3, up_hint: Vec3) -> Option<Self> {
        if forward.norm() < 1e-12 {
            return None;
        }
        let forward = Dir3::new_normalize(forward);
        let right = forward.as_ref().cross(&up_hint);
        if right.norm() < 1e-12 {
            return None;
        }
        let right = Dir3::new_normalize(right);
        let up = Dir3::new_normalize(right.as_ref().cross(forward.as_ref()));
        Some(Self {
            origin,
            right,
            up,
            forward,
        })
    }

    /// Express a world point in this frame's coordinates
    /// `(right, up, forward)`.
    #[inline]
    pub fn to_local(&self, p: &Point3) -> Vec3 {
        let d = p - self.origin;
        Vec3::new(
            d.dot(self.right.as_ref()),
            d.dot(self.up.as_ref()),
            d.dot(self.forward.as_ref()),
        )
    }

    /// Map frame coordinates back to a world point.
    #[inline]
    pub fn to_world(&self, local: &Vec3) -> Point3 {
        self.origin
            + local.x * self.right.as_ref()
            + local.y * self.up.as_ref()
            + local.z * self.forward.as_ref()
    }
}

/// Unweighted center of mass of a point set.
///
/// Returns `None` for an empty set; the caller decides how an empty
/// selection degrades (typically "not visible", never an error).
pub fn center_of_mass(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let mut acc = Vec3::zeros();
    for p in points {
        acc += p.coords;
    }
    Some(Point3::from(acc / points.len() as f64))
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in world units.
    pub linear: f64,
    /// Relative depth tolerance used by occlusion comparisons.
    pub depth: f64,
}

impl Tolerance {
    /// Default tolerances (1e-9 linear, 1e-4 relative depth).
    pub const DEFAULT: Self = Self {
        linear: 1e-9,
        depth: 1e-4,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
