#![warn(missing_docs)]

//! Surface geometry and spatial queries for the cairn annotation engine.
//!
//! This crate provides the geometric substrate that annotation anchoring
//! and visibility testing operate on:
//!
//! - [`SurfaceMesh`] - indexed polygonal surface with stable cell ids
//! - [`SurfaceLocator`] - BVH accelerating nearest-point-on-surface and
//!   ray-intersection queries
//! - [`Frustum`] - six-plane convex region with enclosed-cell extraction
//! - [`stl`] - binary STL import
//!
//! Locators are built once per object and are read-only afterwards; they
//! must not be reused across objects with different geometry.

pub mod bbox;
mod error;
pub mod frustum;
pub mod locator;
mod mesh;
mod ray;
pub mod stl;

pub use bbox::Aabb3;
pub use error::{MeshError, Result};
pub use frustum::{Frustum, FrustumPlane};
pub use locator::{ClosestPoint, SurfaceLocator};
pub use mesh::{CellId, SubMesh, SurfaceMesh};
pub use ray::{Ray, RayHit};
