//! Axis-aligned bounding boxes.
//!
//! Used by the locator BVH as a pruning primitive and by the camera to fit
//! orthogonal views around an object.

use cairn_math::{Point3, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Expand this AABB to include another AABB.
    pub fn include_aabb(&mut self, other: &Aabb3) {
        self.include_point(&other.min);
        self.include_point(&other.max);
    }

    /// Expand the AABB by a tolerance in all directions.
    pub fn expand(&mut self, tol: f64) {
        self.min.x -= tol;
        self.min.y -= tol;
        self.min.z -= tol;
        self.max.x += tol;
        self.max.y += tol;
        self.max.z += tol;
    }

    /// Whether the box contains a point (boundary counts as inside).
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        (self.max - self.min).norm()
    }

    /// Whether the box is non-inverted (has been fed at least one point).
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Squared distance from a point to the box (zero if inside).
    pub fn distance2(&self, p: &Point3) -> f64 {
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dy = (self.min.y - p.y).max(0.0).max(p.y - self.max.y);
        let dz = (self.min.z - p.z).max(0.0).max(p.z - self.max.z);
        Vec3::new(dx, dy, dz).norm_squared()
    }
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_and_contains() {
        let mut bb = Aabb3::empty();
        assert!(!bb.is_valid());
        bb.include_point(&Point3::new(0.0, 0.0, 0.0));
        bb.include_point(&Point3::new(2.0, 3.0, 4.0));
        assert!(bb.is_valid());
        assert!(bb.contains(&Point3::new(1.0, 1.0, 1.0)));
        assert!(!bb.contains(&Point3::new(3.0, 1.0, 1.0)));
    }

    #[test]
    fn test_center_and_diagonal() {
        let bb = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 1.0));
        let c = bb.center();
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!((bb.diagonal() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance2() {
        let bb = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        // Inside -> 0
        assert!(bb.distance2(&Point3::new(0.5, 0.5, 0.5)) < 1e-12);
        // 2 units along x from the max face
        assert!((bb.distance2(&Point3::new(3.0, 0.5, 0.5)) - 4.0).abs() < 1e-12);
    }
}
