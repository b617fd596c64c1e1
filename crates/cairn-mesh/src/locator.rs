//! Spatial acceleration for surface queries.
//!
//! [`SurfaceLocator`] is a bounding volume hierarchy over the fan
//! triangulation of a [`SurfaceMesh`]. It answers the two queries the
//! annotation engine needs: nearest point on the surface (for centroid
//! snapping) and first ray intersection (for frustum entry points).
//! Built once per object; read-only afterwards.

use cairn_math::Point3;

use crate::bbox::Aabb3;
use crate::mesh::{CellId, SurfaceMesh};
use crate::ray::{Ray, RayHit};

const LEAF_SIZE: usize = 8;
const SAH_BUCKETS: usize = 12;

/// One triangle of the fan decomposition with its owning cell.
#[derive(Debug, Clone, Copy)]
struct Tri {
    v: [Point3; 3],
    cell: CellId,
}

/// A BVH node - either a leaf with triangle indices or an internal node.
#[derive(Debug, Clone)]
enum Node {
    Leaf {
        aabb: Aabb3,
        tris: Vec<usize>,
    },
    Internal {
        aabb: Aabb3,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn aabb(&self) -> &Aabb3 {
        match self {
            Node::Leaf { aabb, .. } => aabb,
            Node::Internal { aabb, .. } => aabb,
        }
    }
}

/// Result of a nearest-point-on-surface query.
#[derive(Debug, Clone, Copy)]
pub struct ClosestPoint {
    /// The closest point on the surface.
    pub point: Point3,
    /// Cell containing the closest point.
    pub cell: CellId,
    /// Squared distance from the query point.
    pub dist2: f64,
}

/// BVH accelerating nearest-point and ray queries against a surface.
#[derive(Debug, Clone)]
pub struct SurfaceLocator {
    tris: Vec<Tri>,
    root: Option<Node>,
}

impl SurfaceLocator {
    /// Build a locator over a mesh's fan triangulation.
    pub fn build(mesh: &SurfaceMesh) -> Self {
        let tris: Vec<Tri> = mesh
            .triangles()
            .map(|(v, cell)| Tri { v, cell })
            .collect();

        let mut items: Vec<(usize, Aabb3, Point3)> = tris
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut aabb = Aabb3::empty();
                for p in &t.v {
                    aabb.include_point(p);
                }
                (i, aabb, aabb.center())
            })
            .collect();

        let root = if items.is_empty() {
            None
        } else {
            Some(build_node(&mut items))
        };

        Self { tris, root }
    }

    /// Nearest point on the surface to `query`.
    ///
    /// Returns `None` only for a locator over an empty triangle set.
    pub fn closest_point(&self, query: &Point3) -> Option<ClosestPoint> {
        let root = self.root.as_ref()?;
        let mut best: Option<ClosestPoint> = None;
        let mut best_d2 = f64::INFINITY;
        self.closest_in_node(root, query, &mut best, &mut best_d2);
        best
    }

    fn closest_in_node(
        &self,
        node: &Node,
        query: &Point3,
        best: &mut Option<ClosestPoint>,
        best_d2: &mut f64,
    ) {
        match node {
            Node::Leaf { tris, .. } => {
                for &i in tris {
                    let t = &self.tris[i];
                    let p = closest_point_on_triangle(query, &t.v[0], &t.v[1], &t.v[2]);
                    let d2 = (p - query).norm_squared();
                    if d2 < *best_d2 {
                        *best_d2 = d2;
                        *best = Some(ClosestPoint {
                            point: p,
                            cell: t.cell,
                            dist2: d2,
                        });
                    }
                }
            }
            Node::Internal { left, right, .. } => {
                // Visit the nearer child first so the far one can be pruned
                let dl = left.aabb().distance2(query);
                let dr = right.aabb().distance2(query);
                let (first, d_first, second, d_second) = if dl <= dr {
                    (left, dl, right, dr)
                } else {
                    (right, dr, left, dl)
                };
                if d_first < *best_d2 {
                    self.closest_in_node(first, query, best, best_d2);
                }
                if d_second < *best_d2 {
                    self.closest_in_node(second, query, best, best_d2);
                }
            }
        }
    }

    /// First intersection of a ray with the surface (smallest `t`).
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        let root = self.root.as_ref()?;
        let mut closest: Option<RayHit> = None;
        let mut closest_t = f64::INFINITY;
        self.trace_node(root, ray, &mut closest, &mut closest_t);
        closest
    }

    fn trace_node(
        &self,
        node: &Node,
        ray: &Ray,
        closest: &mut Option<RayHit>,
        closest_t: &mut f64,
    ) {
        match node {
            Node::Leaf { aabb, tris } => {
                if let Some((t_min, _)) = ray.intersect_aabb(aabb) {
                    if t_min >= *closest_t {
                        return;
                    }
                    for &i in tris {
                        let tri = &self.tris[i];
                        if let Some(t) = ray.intersect_triangle(&tri.v[0], &tri.v[1], &tri.v[2])
                        {
                            if t < *closest_t {
                                *closest_t = t;
                                *closest = Some(RayHit {
                                    t,
                                    point: ray.at(t),
                                    cell: tri.cell,
                                });
                            }
                        }
                    }
                }
            }
            Node::Internal { aabb, left, right } => {
                if let Some((t_min, _)) = ray.intersect_aabb(aabb) {
                    if t_min >= *closest_t {
                        return;
                    }
                    let lt = ray.intersect_aabb(left.aabb()).map(|(t, _)| t);
                    let rt = ray.intersect_aabb(right.aabb()).map(|(t, _)| t);
                    match (lt, rt) {
                        (Some(l), Some(r)) => {
                            if l < r {
                                self.trace_node(left, ray, closest, closest_t);
                                self.trace_node(right, ray, closest, closest_t);
                            } else {
                                self.trace_node(right, ray, closest, closest_t);
                                self.trace_node(left, ray, closest, closest_t);
                            }
                        }
                        (Some(_), None) => self.trace_node(left, ray, closest, closest_t),
                        (None, Some(_)) => self.trace_node(right, ray, closest, closest_t),
                        (None, None) => {}
                    }
                }
            }
        }
    }

}

/// Build a BVH node recursively using a bucketed SAH split.
fn build_node(items: &mut [(usize, Aabb3, Point3)]) -> Node {
    let mut bounds = Aabb3::empty();
    for (_, aabb, _) in items.iter() {
        bounds.include_aabb(aabb);
    }

    if items.len() <= LEAF_SIZE {
        return Node::Leaf {
            aabb: bounds,
            tris: items.iter().map(|(i, _, _)| *i).collect(),
        };
    }

    let (axis, pos) = find_best_split(items, &bounds);
    let mid = partition(items, axis, pos);

    // Degenerate split: fall back to a median split
    let mid = if mid == 0 || mid == items.len() {
        items.len() / 2
    } else {
        mid
    };

    let (left, right) = items.split_at_mut(mid);
    Node::Internal {
        aabb: bounds,
        left: Box::new(build_node(left)),
        right: Box::new(build_node(right)),
    }
}

fn axis_value(p: &Point3, axis: usize) -> f64 {
    match axis {
        0 => p.x,
        1 => p.y,
        _ => p.z,
    }
}

/// Find the best split axis and position using SAH over fixed buckets.
fn find_best_split(items: &[(usize, Aabb3, Point3)], bounds: &Aabb3) -> (usize, f64) {
    let mut best_cost = f64::INFINITY;
    let mut best_axis = 0;
    let mut best_pos = 0.0;

    for axis in 0..3 {
        let axis_min = axis_value(&bounds.min, axis);
        let extent = axis_value(&bounds.max, axis) - axis_min;
        if extent < 1e-10 {
            continue;
        }

        let mut counts = [0usize; SAH_BUCKETS];
        let mut boxes = [Aabb3::empty(); SAH_BUCKETS];
        for (_, aabb, centroid) in items {
            let b = ((axis_value(centroid, axis) - axis_min) / extent * SAH_BUCKETS as f64)
                as usize;
            let b = b.min(SAH_BUCKETS - 1);
            counts[b] += 1;
            boxes[b].include_aabb(aabb);
        }

        for split in 1..SAH_BUCKETS {
            let mut left_count = 0;
            let mut left_bounds = Aabb3::empty();
            for i in 0..split {
                left_count += counts[i];
                if counts[i] > 0 {
                    left_bounds.include_aabb(&boxes[i]);
                }
            }
            let mut right_count = 0;
            let mut right_bounds = Aabb3::empty();
            for i in split..SAH_BUCKETS {
                right_count += counts[i];
                if counts[i] > 0 {
                    right_bounds.include_aabb(&boxes[i]);
                }
            }
            if left_count == 0 || right_count == 0 {
                continue;
            }

            let total_area = surface_area(bounds);
            let cost = 0.125
                + surface_area(&left_bounds) / total_area * left_count as f64
                + surface_area(&right_bounds) / total_area * right_count as f64;
            if cost < best_cost {
                best_cost = cost;
                best_axis = axis;
                best_pos = axis_min + (split as f64 / SAH_BUCKETS as f64) * extent;
            }
        }
    }

    (best_axis, best_pos)
}

/// Partition triangles by centroid along an axis; returns the split index.
fn partition(items: &mut [(usize, Aabb3, Point3)], axis: usize, pos: f64) -> usize {
    let mut left = 0;
    let mut right = items.len();
    while left < right {
        if axis_value(&items[left].2, axis) < pos {
            left += 1;
        } else {
            right -= 1;
            items.swap(left, right);
        }
    }
    left
}

fn surface_area(aabb: &Aabb3) -> f64 {
    if !aabb.is_valid() {
        return 0.0;
    }
    let d = aabb.max - aabb.min;
    2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
}

/// Closest point on a triangle to a query point (Ericson's method).
///
/// Handles all nine Voronoi regions: interior, three edges, three corners.
fn closest_point_on_triangle(p: &Point3, a: &Point3, b: &Point3, c: &Point3) -> Point3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + v * ab;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + w * ac;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + w * (c - b);
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
