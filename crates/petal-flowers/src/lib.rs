//! Petal Flowers - pooled flower lifecycle with GPU-instanced rendering
//!
//! Provides:
//! - A fixed-capacity flower pool with first-free slot reuse
//! - Growth curve aging with a bounded per-frame update cost
//! - Hover, click, and startup demo spawning gated on model readiness
//! - Dense stem/blossom instance buffers with distance culling
//! - A frame-rate governor that trims capacity under load
//! - Flat named-parameter configuration with presets, applied at tick start

pub mod config;
pub mod curves;
pub mod governor;
pub mod instance;
pub mod palette;
pub mod pool;
pub mod slot;
pub mod spawn;
mod system;

pub use config::{ConfigCommand, ConfigEffect, FlowerConfig, ParamValue, Preset};
pub use governor::PerformanceGovernor;
pub use instance::{InstanceBuffer, InstanceColor, InstanceRenderer, InstanceTransform};
pub use pool::{FlowerPool, UpdateReport};
pub use slot::{FlowerSeed, FlowerSlot};
pub use spawn::SpawnController;
pub use system::{FlowerStats, FlowerSystem, ModelStatus, TickReport, DEFAULT_CAMERA_POSITION};
