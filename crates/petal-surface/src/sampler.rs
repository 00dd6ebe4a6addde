//! Area-weighted random sampling of surface points

use crate::mesh::{SurfaceHit, SurfaceMesh};
use rand::Rng;

/// Cumulative triangle-area table for a mesh.
///
/// Picks a triangle with probability proportional to its area, then a uniform
/// point inside it. The normal is interpolated from the vertex normals.
#[derive(Clone, Debug, Default)]
pub struct SurfaceSampler {
    cumulative: Vec<f32>,
    total_area: f32,
}

impl SurfaceSampler {
    pub fn new(mesh: &SurfaceMesh) -> Self {
        let mut cumulative = Vec::with_capacity(mesh.triangle_count());
        let mut total_area = 0.0;
        for tri in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(tri);
            total_area += 0.5 * (b - a).cross(c - a).length();
            cumulative.push(total_area);
        }
        Self {
            cumulative,
            total_area,
        }
    }

    pub fn total_area(&self) -> f32 {
        self.total_area
    }

    /// Draw one sample. Returns `None` for an empty or degenerate mesh.
    pub fn sample<R: Rng + ?Sized>(&self, mesh: &SurfaceMesh, rng: &mut R) -> Option<SurfaceHit> {
        if self.cumulative.is_empty() || self.total_area <= 0.0 {
            return None;
        }

        let target = rng.gen::<f32>() * self.total_area;
        let tri = self
            .cumulative
            .partition_point(|&area| area <= target)
            .min(self.cumulative.len() - 1);

        let mut u = rng.gen::<f32>();
        let mut v = rng.gen::<f32>();
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        let w = 1.0 - u - v;

        let [a, b, c] = mesh.triangle(tri);
        let [na, nb, nc] = mesh.triangle_normals(tri);
        Some(SurfaceHit {
            point: a * u + b * v + c * w,
            normal: (na * u + nb * v + nc * w).normalize_or_zero(),
            distance: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// A small triangle at x in [0, 1] and a 9x larger one at x in [10, 13]
    fn lopsided_mesh() -> SurfaceMesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(13.0, 0.0, 0.0),
            Vec3::new(10.0, 3.0, 0.0),
        ];
        SurfaceMesh {
            normals: vec![Vec3::Z; positions.len()],
            positions,
        }
    }

    #[test]
    fn total_area_sums_triangles() {
        let sampler = SurfaceSampler::new(&lopsided_mesh());
        assert!((sampler.total_area() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn larger_triangles_are_sampled_more() {
        let mesh = lopsided_mesh();
        let sampler = SurfaceSampler::new(&mesh);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut large = 0;
        for _ in 0..2000 {
            let hit = sampler.sample(&mesh, &mut rng).unwrap();
            if hit.point.x >= 10.0 {
                large += 1;
            }
            assert_eq!(hit.normal, Vec3::Z);
        }
        // Expected share is 90%
        assert!(large > 1650 && large < 1950, "large = {large}");
    }

    #[test]
    fn empty_mesh_yields_nothing() {
        let mesh = SurfaceMesh::default();
        let sampler = SurfaceSampler::new(&mesh);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(sampler.sample(&mesh, &mut rng).is_none());
    }
}
