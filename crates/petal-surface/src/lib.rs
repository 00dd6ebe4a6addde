//! Petal Surface - the mesh flowers grow on
//!
//! Provides:
//! - Procedural surface shapes (torus knot, sphere, torus, box) as triangle soups
//! - Area-weighted random sampling of (point, normal) pairs
//! - Closest-hit ray/surface intersection for pointer picking

mod mesh;
mod ray;
mod sampler;
mod shapes;

pub use mesh::{SurfaceHit, SurfaceMesh};
pub use ray::Ray;
pub use sampler::SurfaceSampler;
pub use shapes::SurfaceShape;

use glam::Vec3;
use rand::Rng;

/// A generated surface with its sampler, rebuilt whenever shape or size changes
pub struct Surface {
    shape: SurfaceShape,
    size: f32,
    mesh: SurfaceMesh,
    sampler: SurfaceSampler,
}

impl Surface {
    pub fn new(shape: SurfaceShape, size: f32) -> Self {
        let mesh = shape.generate(size);
        let sampler = SurfaceSampler::new(&mesh);
        tracing::info!(
            shape = %shape,
            size,
            triangles = mesh.triangle_count(),
            "surface generated"
        );
        Self {
            shape,
            size,
            mesh,
            sampler,
        }
    }

    pub fn shape(&self) -> SurfaceShape {
        self.shape
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    /// Random point on the surface, area-weighted
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SurfaceHit> {
        self.sampler.sample(&self.mesh, rng)
    }

    /// Closest intersection of `ray` with the surface
    pub fn raycast(&self, ray: &Ray) -> Option<SurfaceHit> {
        self.mesh.raycast(ray)
    }

    /// True when `point` lies within `tolerance` of the surface's bounding box
    pub fn bounds_contain(&self, point: Vec3, tolerance: f32) -> bool {
        let (min, max) = self.mesh.bounds();
        point.cmpge(min - Vec3::splat(tolerance)).all()
            && point.cmple(max + Vec3::splat(tolerance)).all()
    }
}
