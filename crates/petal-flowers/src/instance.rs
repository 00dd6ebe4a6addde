//! Instance buffers: per-frame packing of visible flowers for instanced draws

use crate::config::FlowerConfig;
use crate::pool::FlowerPool;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Flowers at or below this scale are not drawn
pub const MIN_VISIBLE_SCALE: f32 = 0.01;

/// Per-instance model matrix, column-major. Matches WGSL `mat4x4<f32>`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub model: [[f32; 4]; 4],
}

impl InstanceTransform {
    pub fn from_mat4(m: Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

/// Per-instance color, rgb + unused alpha for 16-byte alignment
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceColor {
    pub color: [f32; 4],
}

/// CPU-side instance data for one instanced draw.
///
/// Storage is preallocated to capacity; only `[0, count)` is meaningful.
pub struct InstanceBuffer {
    label: &'static str,
    transforms: Vec<InstanceTransform>,
    colors: Option<Vec<InstanceColor>>,
    count: usize,
    transforms_dirty: bool,
    colors_dirty: bool,
}

impl InstanceBuffer {
    pub fn new(label: &'static str, capacity: usize, colored: bool) -> Self {
        Self {
            label,
            transforms: vec![InstanceTransform::zeroed(); capacity],
            colors: colored.then(|| vec![InstanceColor::zeroed(); capacity]),
            count: 0,
            transforms_dirty: false,
            colors_dirty: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn capacity(&self) -> usize {
        self.transforms.len()
    }

    /// Number of instances to draw
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Live transforms, `[0, count)`
    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms[..self.count]
    }

    /// Live colors, `[0, count)`; `None` for an uncolored buffer
    pub fn colors(&self) -> Option<&[InstanceColor]> {
        self.colors.as_deref().map(|c| &c[..self.count])
    }

    pub fn transform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.transforms())
    }

    pub fn color_bytes(&self) -> Option<&[u8]> {
        self.colors().map(bytemuck::cast_slice)
    }

    pub fn transforms_dirty(&self) -> bool {
        self.transforms_dirty
    }

    pub fn colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    /// Called by the uploader once the dirty ranges are on the GPU
    pub fn mark_clean(&mut self) {
        self.transforms_dirty = false;
        self.colors_dirty = false;
    }

    fn write(&mut self, index: usize, transform: InstanceTransform, color: [f32; 3]) {
        self.transforms[index] = transform;
        if let Some(colors) = &mut self.colors {
            colors[index] = InstanceColor {
                color: [color[0], color[1], color[2], 1.0],
            };
        }
    }

    fn finish(&mut self, count: usize) {
        self.count = count;
        self.transforms_dirty = true;
        self.colors_dirty = self.colors.is_some();
    }
}

/// Packs visible flowers into the stem and blossom instance buffers.
///
/// Whether per-instance colors are written is fixed when the renderer is
/// created; recreate it to change that.
pub struct InstanceRenderer {
    stem: InstanceBuffer,
    blossom: InstanceBuffer,
    colored: bool,
}

impl InstanceRenderer {
    pub fn new(capacity: usize, colored: bool) -> Self {
        tracing::debug!(capacity, colored, "instance buffers allocated");
        Self {
            stem: InstanceBuffer::new("stem_instances", capacity, colored),
            blossom: InstanceBuffer::new("blossom_instances", capacity, colored),
            colored,
        }
    }

    pub fn capacity(&self) -> usize {
        self.stem.capacity()
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn stem(&self) -> &InstanceBuffer {
        &self.stem
    }

    pub fn blossom(&self) -> &InstanceBuffer {
        &self.blossom
    }

    /// Both buffers, for marking clean after upload
    pub fn buffers_mut(&mut self) -> (&mut InstanceBuffer, &mut InstanceBuffer) {
        (&mut self.stem, &mut self.blossom)
    }

    pub fn visible_count(&self) -> usize {
        self.stem.count()
    }

    /// Rebuild both buffers from the pool. Returns the visible count.
    ///
    /// Visible flowers are packed densely from index 0 in slot order; inactive,
    /// sub-visible, and distance-culled slots leave no gaps.
    pub fn rebuild(
        &mut self,
        pool: &FlowerPool,
        camera_position: Vec3,
        config: &FlowerConfig,
        time: f64,
    ) -> usize {
        let capacity = self.capacity();
        let mut visible = 0;

        for slot in pool.slots() {
            if visible == capacity {
                break;
            }
            if !slot.active || slot.current_scale <= MIN_VISIBLE_SCALE {
                continue;
            }
            if config.enable_lod
                && camera_position.distance(slot.position) > config.max_render_distance
            {
                continue;
            }

            let scale = slot.current_scale;
            let mut position = slot.position;
            if config.animate_flowers {
                let phase = time * config.flower_animation_speed as f64 * slot.anim_speed as f64;
                let bob = (phase + slot.anim_phase as f64).sin() as f32 * config.bob_height * scale;
                let sway = (phase * 0.7 + slot.anim_phase as f64).cos() as f32
                    * config.bob_height
                    * 0.3
                    * scale;
                position += slot.rotation * Vec3::Y * bob;
                position += slot.rotation * Vec3::X * sway;
            }

            let model =
                Mat4::from_scale_rotation_translation(Vec3::splat(scale), slot.rotation, position);
            let transform = InstanceTransform::from_mat4(model);
            self.stem.write(visible, transform, slot.stem_color.to_array());
            self.blossom.write(visible, transform, slot.blossom_color.to_array());
            visible += 1;
        }

        self.stem.finish(visible);
        self.blossom.finish(visible);
        visible
    }

    /// Draw nothing until the next rebuild
    pub fn clear(&mut self) {
        self.stem.finish(0);
        self.blossom.finish(0);
    }
}
