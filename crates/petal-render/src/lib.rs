//! Petal Render - the GPU side of flower rendering
//!
//! Provides:
//! - Perspective camera with pointer-to-ray unprojection
//! - Flower geometry: glTF `Stem`/`Blossom` import with a primitive fallback
//! - Headless wgpu device setup
//! - Dirty-tracked upload of the stem/blossom instance streams

pub mod camera;
pub mod context;
pub mod instance_upload;
pub mod model_loader;
pub mod primitives;

pub use camera::Camera;
pub use context::{GpuContext, RenderError};
pub use instance_upload::{
    FlowerInstanceBuffers, GpuFlowerGeometry, GpuMesh, InstancedDraw, UploadStats,
};
pub use model_loader::{FlowerMeshes, FlowerModel, ModelSource};
pub use primitives::{Mesh, Vertex};
