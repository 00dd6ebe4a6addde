//! Flower model loading: glTF `Stem`/`Blossom` meshes with a primitive fallback

use crate::primitives::{create_cylinder_mesh, create_sphere_mesh, Mesh, Vertex};
use glam::Vec3;
use petal_core::{Color, PetalError, Result};
use std::path::{Path, PathBuf};

const STEM_MESH: &str = "Stem";
const BLOSSOM_MESH: &str = "Blossom";

/// Where a flower model's geometry came from
#[derive(Clone, Debug, PartialEq)]
pub enum ModelSource {
    Gltf(PathBuf),
    Fallback,
}

/// Stem and blossom geometry positioned in model space: the stem's base at
/// y = 0 and the blossom on top of the stem. Not yet scaled.
#[derive(Clone, Debug)]
pub struct FlowerModel {
    pub stem: Mesh,
    pub blossom: Mesh,
    pub source: ModelSource,
}

/// Geometry ready for upload, scaled by the base flower scale
#[derive(Clone, Debug)]
pub struct FlowerMeshes {
    pub stem: Mesh,
    pub blossom: Mesh,
    pub base_scale: f32,
}

impl FlowerModel {
    /// Load the meshes named `Stem` and `Blossom` from a glTF/GLB file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (document, buffers, _images) = gltf::import(path)
            .map_err(|e| PetalError::ImportError(format!("glTF import: {e}")))?;

        let mut stem = None;
        let mut blossom = None;
        for node in document.nodes() {
            let Some(mesh) = node.mesh() else { continue };
            let name = node.name().or_else(|| mesh.name()).unwrap_or_default();
            let slot = match name {
                STEM_MESH => &mut stem,
                BLOSSOM_MESH => &mut blossom,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(read_mesh(&mesh, &buffers));
            }
        }

        let (Some(mut stem), Some(mut blossom)) = (stem, blossom) else {
            return Err(PetalError::ImportError(format!(
                "{} has no '{}' and '{}' meshes",
                path.display(),
                STEM_MESH,
                BLOSSOM_MESH
            )));
        };

        let (stem_min, _) = stem.bounds();
        let stem_height = stem.height();
        stem.translate(Vec3::new(0.0, -stem_min.y, 0.0));
        let (blossom_min, _) = blossom.bounds();
        blossom.translate(Vec3::new(0.0, -blossom_min.y + stem_height, 0.0));

        tracing::info!(
            path = %path.display(),
            stem_vertices = stem.vertex_count(),
            blossom_vertices = blossom.vertex_count(),
            "flower model loaded"
        );
        Ok(Self {
            stem,
            blossom,
            source: ModelSource::Gltf(path.to_path_buf()),
        })
    }

    /// Cylinder stem (height 2) with a sphere blossom centered on its top
    pub fn fallback(stem_color: u32, blossom_color: u32) -> Self {
        let mut stem = create_cylinder_mesh(0.05, 0.1, 2.0, 8, rgba(stem_color));
        stem.translate(Vec3::Y);
        let mut blossom = create_sphere_mesh(0.3, 16, 16, rgba(blossom_color));
        blossom.translate(Vec3::Y * 2.0);
        Self {
            stem,
            blossom,
            source: ModelSource::Fallback,
        }
    }

    /// Load from `path`, or fall back to primitives when there is no path or
    /// the import fails
    pub fn load_or_fallback(path: Option<&Path>, stem_color: u32, blossom_color: u32) -> Self {
        let Some(path) = path else {
            tracing::info!("no flower model given, using fallback geometry");
            return Self::fallback(stem_color, blossom_color);
        };
        match Self::load(path) {
            Ok(model) => model,
            Err(err) => {
                tracing::warn!(%err, "flower model failed to load, using fallback geometry");
                Self::fallback(stem_color, blossom_color)
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ModelSource::Fallback
    }

    /// Scale copies of both meshes by `base_scale`
    pub fn bake(&self, base_scale: f32) -> FlowerMeshes {
        let mut stem = self.stem.clone();
        let mut blossom = self.blossom.clone();
        stem.scale(base_scale);
        blossom.scale(base_scale);
        FlowerMeshes {
            stem,
            blossom,
            base_scale,
        }
    }
}

fn rgba(hex: u32) -> [f32; 4] {
    let [r, g, b] = Color::from_hex(hex).to_array();
    [r, g, b, 1.0]
}

/// Merge every primitive of a glTF mesh into one indexed mesh
fn read_mesh(mesh: &gltf::Mesh<'_>, buffers: &[gltf::buffer::Data]) -> Mesh {
    let mut out = Mesh::default();
    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .map(|iter| iter.collect())
            .unwrap_or_default();

        let normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map(|iter| iter.collect())
            .unwrap_or_default();

        let color = primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor();

        let base = out.vertices.len() as u32;
        for (i, position) in positions.iter().enumerate() {
            out.vertices.push(Vertex {
                position: *position,
                normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                color,
            });
        }

        match reader.read_indices() {
            Some(indices) => out.indices.extend(indices.into_u32().map(|i| base + i)),
            None => out.indices.extend(base..base + positions.len() as u32),
        }
    }
    out
}
