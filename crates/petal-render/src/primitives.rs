//! Mesh primitives (cylinder, sphere) for fallback flower geometry

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// A vertex with position, normal, and base color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A mesh with vertices and indices
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Axis-aligned bounds as (min, max); zero for an empty mesh
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.vertices.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| {
                let p = Vec3::from(v.position);
                (min.min(p), max.max(p))
            },
        )
    }

    pub fn height(&self) -> f32 {
        let (min, max) = self.bounds();
        max.y - min.y
    }

    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) + offset).to_array();
        }
    }

    /// Uniform scale about the origin; normals are unchanged
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) * factor).to_array();
        }
    }
}

/// Cylinder along Y, centered on the origin, with capped ends
pub fn create_cylinder_mesh(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    color: [f32; 4],
) -> Mesh {
    let half = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;
    let ring = radial_segments + 1;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side: top row then bottom row
    for (y, radius) in [(half, radius_top), (-half, radius_bottom)] {
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            vertices.push(Vertex {
                position: [radius * sin, y, radius * cos],
                normal: Vec3::new(sin, slope, cos).normalize().to_array(),
                color,
            });
        }
    }
    for x in 0..radial_segments {
        let a = x;
        let b = ring + x;
        let c = ring + x + 1;
        let d = x + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    // Caps
    for (y, radius, normal) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
        let center = vertices.len() as u32;
        vertices.push(Vertex {
            position: [0.0, y, 0.0],
            normal: normal.to_array(),
            color,
        });
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            vertices.push(Vertex {
                position: [radius * sin, y, radius * cos],
                normal: normal.to_array(),
                color,
            });
        }
        for x in 0..radial_segments {
            let first = center + 1 + x;
            if normal.y > 0.0 {
                indices.extend_from_slice(&[center, first, first + 1]);
            } else {
                indices.extend_from_slice(&[center, first + 1, first]);
            }
        }
    }

    Mesh { vertices, indices }
}

/// UV sphere centered on the origin
pub fn create_sphere_mesh(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    color: [f32; 4],
) -> Mesh {
    let mut vertices = Vec::new();
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            vertices.push(Vertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                color,
            });
        }
    }

    let row = width_segments + 1;
    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.indices.chunks(3) {
            let corner = |i: u32| Vec3::from(mesh.vertices[i as usize].position);
            let [a, b, c] = [corner(tri[0]), corner(tri[1]), corner(tri[2])];
            let face = (b - a).cross(c - a);
            if face.length() < 1e-8 {
                continue;
            }
            let normal = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!(face.dot(normal) > 0.0, "inward face at {a:?}");
        }
    }

    #[test]
    fn cylinder_layout() {
        let mesh = create_cylinder_mesh(0.05, 0.1, 2.0, 8, GREEN);
        // Two side rings plus two caps of center + ring
        assert_eq!(mesh.vertex_count(), 9 * 2 + 10 * 2);
        assert_eq!(mesh.index_count(), 8 * 6 + 8 * 3 * 2);
        let (min, max) = mesh.bounds();
        assert!((min.y + 1.0).abs() < 1e-6);
        assert!((max.y - 1.0).abs() < 1e-6);
        assert!((mesh.height() - 2.0).abs() < 1e-6);
        assert_outward(&mesh);
    }

    #[test]
    fn sphere_layout() {
        let mesh = create_sphere_mesh(0.3, 16, 16, GREEN);
        assert_eq!(mesh.vertex_count(), 17 * 17);
        assert_eq!(mesh.index_count(), (16 * 16 * 2 - 2 * 16) * 3);
        for v in &mesh.vertices {
            let radius = Vec3::from(v.position).length();
            assert!((radius - 0.3).abs() < 1e-5);
        }
        assert_outward(&mesh);
    }

    #[test]
    fn transforms() {
        let mut mesh = create_sphere_mesh(1.0, 8, 4, GREEN);
        mesh.translate(Vec3::Y * 2.0);
        mesh.scale(3.0);
        let (min, max) = mesh.bounds();
        assert!((min.y - 3.0).abs() < 1e-5);
        assert!((max.y - 9.0).abs() < 1e-5);
    }

    #[test]
    fn vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
        assert_eq!(Vertex::desc().attributes.len(), 3);
    }
}
