//! GPU-resident flower geometry and instance streams

use crate::model_loader::FlowerMeshes;
use crate::primitives::Mesh;
use petal_flowers::{InstanceBuffer, InstanceColor, InstanceRenderer, InstanceTransform};
use wgpu::util::DeviceExt;

/// A mesh uploaded to vertex and index buffers
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// One instance stream on the GPU: transforms plus optional colors
struct GpuInstanceStream {
    transforms: wgpu::Buffer,
    colors: Option<wgpu::Buffer>,
    count: u32,
}

impl GpuInstanceStream {
    fn new(device: &wgpu::Device, source: &InstanceBuffer) -> Self {
        // Zero-capacity pools still get a valid one-instance buffer
        let capacity = source.capacity().max(1) as wgpu::BufferAddress;
        let usage = wgpu::BufferUsages::VERTEX
            | wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_DST;
        let transforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} transforms", source.label())),
            size: capacity * std::mem::size_of::<InstanceTransform>() as wgpu::BufferAddress,
            usage,
            mapped_at_creation: false,
        });
        let colors = source.has_colors().then(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{} colors", source.label())),
                size: capacity * std::mem::size_of::<InstanceColor>() as wgpu::BufferAddress,
                usage,
                mapped_at_creation: false,
            })
        });
        Self {
            transforms,
            colors,
            count: 0,
        }
    }

    /// Write dirty data. Returns bytes written.
    fn sync(&mut self, queue: &wgpu::Queue, source: &mut InstanceBuffer) -> u64 {
        let mut written = 0;
        if source.transforms_dirty() {
            let bytes = source.transform_bytes();
            if !bytes.is_empty() {
                queue.write_buffer(&self.transforms, 0, bytes);
                written += bytes.len() as u64;
            }
        }
        if source.colors_dirty() {
            if let (Some(buffer), Some(bytes)) = (&self.colors, source.color_bytes()) {
                if !bytes.is_empty() {
                    queue.write_buffer(buffer, 0, bytes);
                    written += bytes.len() as u64;
                }
            }
        }
        self.count = source.count() as u32;
        source.mark_clean();
        written
    }
}

/// Parameters for one instanced draw call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstancedDraw {
    pub index_count: u32,
    pub instance_count: u32,
}

/// What one `sync` call did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadStats {
    pub bytes_written: u64,
    /// GPU buffers were recreated for a new capacity or color mode
    pub recreated: bool,
}

/// GPU copies of the stem and blossom instance buffers.
///
/// Sized to the renderer's capacity and recreated whenever the capacity or
/// color mode changes; only dirty streams are written.
pub struct FlowerInstanceBuffers {
    stem: GpuInstanceStream,
    blossom: GpuInstanceStream,
    capacity: usize,
    colored: bool,
}

impl FlowerInstanceBuffers {
    pub fn new(device: &wgpu::Device, renderer: &InstanceRenderer) -> Self {
        Self {
            stem: GpuInstanceStream::new(device, renderer.stem()),
            blossom: GpuInstanceStream::new(device, renderer.blossom()),
            capacity: renderer.capacity(),
            colored: renderer.is_colored(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Upload whatever changed since the last sync
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        renderer: &mut InstanceRenderer,
    ) -> UploadStats {
        let mut stats = UploadStats::default();
        if renderer.capacity() != self.capacity || renderer.is_colored() != self.colored {
            tracing::debug!(
                from = self.capacity,
                to = renderer.capacity(),
                "recreating instance buffers"
            );
            *self = Self::new(device, renderer);
            stats.recreated = true;
        }

        let (stem, blossom) = renderer.buffers_mut();
        stats.bytes_written += self.stem.sync(queue, stem);
        stats.bytes_written += self.blossom.sync(queue, blossom);
        stats
    }

    pub fn stem_transforms(&self) -> &wgpu::Buffer {
        &self.stem.transforms
    }

    pub fn blossom_transforms(&self) -> &wgpu::Buffer {
        &self.blossom.transforms
    }

    pub fn stem_colors(&self) -> Option<&wgpu::Buffer> {
        self.stem.colors.as_ref()
    }

    pub fn blossom_colors(&self) -> Option<&wgpu::Buffer> {
        self.blossom.colors.as_ref()
    }

    /// The two instanced draws for the uploaded geometry
    pub fn draws(&self, geometry: &GpuFlowerGeometry) -> [InstancedDraw; 2] {
        [
            InstancedDraw {
                index_count: geometry.stem.index_count,
                instance_count: self.stem.count,
            },
            InstancedDraw {
                index_count: geometry.blossom.index_count,
                instance_count: self.blossom.count,
            },
        ]
    }
}

/// Baked stem and blossom meshes on the GPU
pub struct GpuFlowerGeometry {
    pub stem: GpuMesh,
    pub blossom: GpuMesh,
    pub base_scale: f32,
}

impl GpuFlowerGeometry {
    pub fn upload(device: &wgpu::Device, meshes: &FlowerMeshes) -> Self {
        Self {
            stem: GpuMesh::upload(device, &meshes.stem, "Stem"),
            blossom: GpuMesh::upload(device, &meshes.blossom, "Blossom"),
            base_scale: meshes.base_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GpuContext;
    use crate::model_loader::FlowerModel;
    use glam::Vec3;
    use petal_flowers::{FlowerConfig, FlowerPool};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn uploads_only_dirty_streams() {
        // Machines without any adapter skip this test
        let Ok(gpu) = GpuContext::headless_blocking() else {
            return;
        };
        let config = FlowerConfig {
            animate_flowers: false,
            ..FlowerConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pool = FlowerPool::new(4);
        pool.acquire_burst(3, Vec3::ONE, Vec3::Y, &config, &mut rng);
        pool.update(0.05, 2.0, false);

        let mut renderer = InstanceRenderer::new(4, true);
        renderer.rebuild(&pool, Vec3::ZERO, &config, 0.0);
        let mut buffers = FlowerInstanceBuffers::new(&gpu.device, &renderer);

        let first = buffers.sync(&gpu.device, &gpu.queue, &mut renderer);
        assert!(!first.recreated);
        // 3 instances x (64 + 16) bytes x 2 streams
        assert_eq!(first.bytes_written, 3 * 80 * 2);
        let again = buffers.sync(&gpu.device, &gpu.queue, &mut renderer);
        assert_eq!(again.bytes_written, 0);

        let meshes = FlowerModel::fallback(0, 0).bake(4.0);
        let geometry = GpuFlowerGeometry::upload(&gpu.device, &meshes);
        let [stem, blossom] = buffers.draws(&geometry);
        assert_eq!(stem.instance_count, 3);
        assert_eq!(blossom.index_count, geometry.blossom.index_count);

        let mut bigger = InstanceRenderer::new(8, false);
        bigger.rebuild(&pool, Vec3::ZERO, &config, 0.0);
        let stats = buffers.sync(&gpu.device, &gpu.queue, &mut bigger);
        assert!(stats.recreated);
        assert_eq!(buffers.capacity(), 8);
        assert!(buffers.stem_colors().is_none());
    }
}
