//! Procedural surface shapes

use crate::mesh::SurfaceMesh;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

const KNOT_TUBULAR_SEGMENTS: u32 = 80;
const KNOT_RADIAL_SEGMENTS: u32 = 12;
const KNOT_P: f32 = 2.0;
const KNOT_Q: f32 = 3.0;
const SPHERE_WIDTH_SEGMENTS: u32 = 48;
const SPHERE_HEIGHT_SEGMENTS: u32 = 24;
const TORUS_RADIAL_SEGMENTS: u32 = 12;
const TORUS_TUBULAR_SEGMENTS: u32 = 80;

/// Shape of the surface flowers are spawned on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceShape {
    #[default]
    TorusKnot,
    Sphere,
    Torus,
    Box,
}

impl SurfaceShape {
    pub const ALL: [SurfaceShape; 4] = [
        SurfaceShape::TorusKnot,
        SurfaceShape::Sphere,
        SurfaceShape::Torus,
        SurfaceShape::Box,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SurfaceShape::TorusKnot => "TorusKnot",
            SurfaceShape::Sphere => "Sphere",
            SurfaceShape::Torus => "Torus",
            SurfaceShape::Box => "Box",
        }
    }

    /// Generate the triangle soup for this shape at the given size
    pub fn generate(&self, size: f32) -> SurfaceMesh {
        match self {
            SurfaceShape::TorusKnot => torus_knot(size, size * 0.3),
            SurfaceShape::Sphere => sphere(size),
            SurfaceShape::Torus => torus(size, size * 0.4),
            SurfaceShape::Box => cube(size * 2.0),
        }
    }
}

impl fmt::Display for SurfaceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurfaceShape {
    type Err = petal_core::PetalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "torusknot" | "knot" => Ok(SurfaceShape::TorusKnot),
            "sphere" => Ok(SurfaceShape::Sphere),
            "torus" => Ok(SurfaceShape::Torus),
            "box" | "cube" => Ok(SurfaceShape::Box),
            _ => Err(petal_core::PetalError::InvalidEnumValue {
                value: s.to_string(),
                allowed: Self::ALL.iter().map(|s| s.name().to_string()).collect(),
            }),
        }
    }
}

fn torus_knot_curve(u: f32, radius: f32) -> Vec3 {
    let quo_p = KNOT_Q / KNOT_P * u;
    let cs = quo_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * quo_p.sin() * 0.5,
    )
}

/// (p, q) torus knot tube, swept along the knot curve with a Frenet-like frame
fn torus_knot(radius: f32, tube: f32) -> SurfaceMesh {
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for i in 0..=KNOT_TUBULAR_SEGMENTS {
        let u = i as f32 / KNOT_TUBULAR_SEGMENTS as f32 * KNOT_P * TAU;
        let p1 = torus_knot_curve(u, radius);
        let p2 = torus_knot_curve(u + 0.01, radius);

        let tangent = p2 - p1;
        let binormal = tangent.cross(p2 + p1).normalize_or_zero();
        let normal = binormal.cross(tangent).normalize_or_zero();

        for j in 0..=KNOT_RADIAL_SEGMENTS {
            let v = j as f32 / KNOT_RADIAL_SEGMENTS as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let vertex = p1 + normal * cx + binormal * cy;
            positions.push(vertex);
            normals.push((vertex - p1).normalize_or_zero());
        }
    }

    let ring = KNOT_RADIAL_SEGMENTS + 1;
    let mut indices = Vec::new();
    for j in 1..=KNOT_TUBULAR_SEGMENTS {
        for i in 1..=KNOT_RADIAL_SEGMENTS {
            let a = ring * (j - 1) + (i - 1);
            let b = ring * j + (i - 1);
            let c = ring * j + i;
            let d = ring * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    SurfaceMesh::from_indexed(&positions, &normals, &indices)
}

/// UV sphere
fn sphere(radius: f32) -> SurfaceMesh {
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for iy in 0..=SPHERE_HEIGHT_SEGMENTS {
        let v = iy as f32 / SPHERE_HEIGHT_SEGMENTS as f32;
        for ix in 0..=SPHERE_WIDTH_SEGMENTS {
            let u = ix as f32 / SPHERE_WIDTH_SEGMENTS as f32;
            let vertex = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            positions.push(vertex);
            normals.push(vertex.normalize_or_zero());
        }
    }

    let row = SPHERE_WIDTH_SEGMENTS + 1;
    let mut indices = Vec::new();
    for iy in 0..SPHERE_HEIGHT_SEGMENTS {
        for ix in 0..SPHERE_WIDTH_SEGMENTS {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // Pole rows collapse to a single triangle per quad
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != SPHERE_HEIGHT_SEGMENTS - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    SurfaceMesh::from_indexed(&positions, &normals, &indices)
}

/// Ring torus lying in the XY plane
fn torus(radius: f32, tube: f32) -> SurfaceMesh {
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for j in 0..=TORUS_RADIAL_SEGMENTS {
        for i in 0..=TORUS_TUBULAR_SEGMENTS {
            let u = i as f32 / TORUS_TUBULAR_SEGMENTS as f32 * TAU;
            let v = j as f32 / TORUS_RADIAL_SEGMENTS as f32 * TAU;
            let vertex = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            positions.push(vertex);
            normals.push((vertex - center).normalize_or_zero());
        }
    }

    let row = TORUS_TUBULAR_SEGMENTS + 1;
    let mut indices = Vec::new();
    for j in 1..=TORUS_RADIAL_SEGMENTS {
        for i in 1..=TORUS_TUBULAR_SEGMENTS {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    SurfaceMesh::from_indexed(&positions, &normals, &indices)
}

/// Axis-aligned cube with flat face normals
fn cube(edge: f32) -> SurfaceMesh {
    let half = edge / 2.0;
    // (face normal, in-plane axis); the second axis is normal x first so corners wind CCW
    let faces = [
        (Vec3::X, Vec3::Y),
        (Vec3::NEG_X, Vec3::Y),
        (Vec3::Y, Vec3::Z),
        (Vec3::NEG_Y, Vec3::Z),
        (Vec3::Z, Vec3::X),
        (Vec3::NEG_Z, Vec3::X),
    ];

    let mut mesh = SurfaceMesh::default();
    for (normal, u) in faces {
        let v = normal.cross(u);
        let center = normal * half;
        let corners = [
            center - u * half - v * half,
            center + u * half - v * half,
            center + u * half + v * half,
            center - u * half + v * half,
        ];
        for idx in [0, 1, 2, 0, 2, 3] {
            mesh.positions.push(corners[idx]);
            mesh.normals.push(normal);
        }
    }
    mesh
}
