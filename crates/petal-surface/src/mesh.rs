//! Non-indexed triangle mesh with per-vertex normals

use crate::ray::Ray;
use glam::Vec3;

/// Rays closer to parallel than this are treated as misses
const PARALLEL_EPSILON: f32 = 1e-8;

/// A point on the surface with its outward normal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
    /// Distance along the ray; zero for sampled points
    pub distance: f32,
}

/// Triangle soup: every three consecutive vertices form one triangle
#[derive(Clone, Debug, Default)]
pub struct SurfaceMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
}

impl SurfaceMesh {
    /// Expand an indexed mesh into a triangle soup
    pub fn from_indexed(positions: &[Vec3], normals: &[Vec3], indices: &[u32]) -> Self {
        let mut mesh = Self {
            positions: Vec::with_capacity(indices.len()),
            normals: Vec::with_capacity(indices.len()),
        };
        for &i in indices {
            let i = i as usize;
            mesh.positions.push(positions[i]);
            mesh.normals.push(normals[i]);
        }
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Corner positions of triangle `index`
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let base = index * 3;
        [
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        ]
    }

    /// Corner normals of triangle `index`
    pub fn triangle_normals(&self, index: usize) -> [Vec3; 3] {
        let base = index * 3;
        [self.normals[base], self.normals[base + 1], self.normals[base + 2]]
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.positions.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        )
    }

    /// Closest ray hit (Möller–Trumbore, both faces).
    ///
    /// The returned normal is the geometric face normal, flipped if needed so it
    /// agrees with the interpolated vertex normals (outward).
    pub fn raycast(&self, ray: &Ray) -> Option<SurfaceHit> {
        let mut best: Option<(f32, usize)> = None;

        for tri in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(tri);
            let edge1 = b - a;
            let edge2 = c - a;
            let pvec = ray.direction.cross(edge2);
            let det = edge1.dot(pvec);
            if det.abs() < PARALLEL_EPSILON {
                continue;
            }
            let inv_det = 1.0 / det;

            let tvec = ray.origin - a;
            let u = tvec.dot(pvec) * inv_det;
            if !(0.0..=1.0).contains(&u) {
                continue;
            }

            let qvec = tvec.cross(edge1);
            let v = ray.direction.dot(qvec) * inv_det;
            if v < 0.0 || u + v > 1.0 {
                continue;
            }

            let t = edge2.dot(qvec) * inv_det;
            if t <= 0.0 {
                continue;
            }
            if best.map_or(true, |(best_t, _)| t < best_t) {
                best = Some((t, tri));
            }
        }

        let (t, tri) = best?;
        Some(SurfaceHit {
            point: ray.at(t),
            normal: self.face_normal(tri),
            distance: t,
        })
    }

    fn face_normal(&self, tri: usize) -> Vec3 {
        let [a, b, c] = self.triangle(tri);
        let geometric = (b - a).cross(c - a).normalize_or_zero();
        let [na, nb, nc] = self.triangle_normals(tri);
        if geometric.dot(na + nb + nc) < 0.0 {
            -geometric
        } else {
            geometric
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> SurfaceMesh {
        // Two triangles covering [-1, 1]^2 in the z = 0 plane, facing +Z
        let positions = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        let normals = [Vec3::Z; 4];
        SurfaceMesh::from_indexed(&positions, &normals, &[0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn from_indexed_expands_triangles() {
        let mesh = unit_quad();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.positions.len(), 6);
    }

    #[test]
    fn raycast_hits_quad() {
        let mesh = unit_quad();
        let ray = Ray::new(Vec3::new(0.25, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = mesh.raycast(&ray).unwrap();
        assert!((hit.point - Vec3::new(0.25, 0.5, 0.0)).length() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert!((hit.distance - 5.0).abs() < 1e-5);
    }

    #[test]
    fn raycast_misses_outside_and_behind() {
        let mesh = unit_quad();
        let outside = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(mesh.raycast(&outside).is_none());
        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(mesh.raycast(&away).is_none());
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let (min, max) = unit_quad().bounds();
        assert_eq!(min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
    }
}
