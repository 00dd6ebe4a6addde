//! `FlowerSystem`: owns the pool, buffers, surface, and config for one scene

use crate::config::{ConfigCommand, ConfigEffect, FlowerConfig, ParamValue, Preset};
use crate::governor::PerformanceGovernor;
use crate::instance::InstanceRenderer;
use crate::pool::{FlowerPool, UpdateReport};
use crate::spawn::SpawnController;
use glam::Vec3;
use petal_core::Result;
use petal_runtime::{FrameClock, RuntimeSystem, DEFAULT_MAX_DELTA};
use petal_surface::{Ray, Surface};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Default camera position, matching the orbit camera's start
pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(18.0, 18.0, 18.0);

/// Where the flower geometry came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    /// Still loading; every spawn path is a no-op
    Pending,
    Loaded,
    /// Load failed and built-in primitives are in use
    Fallback,
}

/// Snapshot for hosts and test harnesses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FlowerStats {
    pub active_flowers: usize,
    pub max_flowers: usize,
    pub fps: u32,
    pub model_loaded: bool,
}

/// What one tick did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub update: UpdateReport,
    /// Flowers placed by the startup demo this tick
    pub demo_spawned: usize,
    /// Instances written to each buffer
    pub visible: usize,
    /// New capacity if the governor reduced it this tick
    pub capacity_reduced_to: Option<usize>,
}

/// The flower scene: every piece of per-flower state plus the surface it
/// grows on.
///
/// Input handlers (`on_pointer_move`, `on_pointer_click`, `spawn_flower`,
/// `clear_all`) may be called between ticks. Configuration changes are queued
/// and applied together at the start of the next tick.
pub struct FlowerSystem {
    config: FlowerConfig,
    pool: FlowerPool,
    renderer: InstanceRenderer,
    spawner: SpawnController,
    governor: PerformanceGovernor,
    surface: Surface,
    rng: Box<dyn RngCore>,
    pending: Vec<ConfigCommand>,
    model: ModelStatus,
    camera_position: Vec3,
    time: f64,
    rebake_geometry: bool,
}

impl FlowerSystem {
    pub fn new(config: FlowerConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Build with an explicit random source, for reproducible runs
    pub fn with_rng(config: FlowerConfig, rng: impl RngCore + 'static) -> Self {
        let surface = Surface::new(config.surface_type, config.surface_size);
        let pool = FlowerPool::new(config.max_count);
        let renderer = InstanceRenderer::new(config.max_count, config.random_colors);
        Self {
            config,
            pool,
            renderer,
            spawner: SpawnController::new(),
            governor: PerformanceGovernor::new(),
            surface,
            rng: Box::new(rng),
            pending: Vec::new(),
            model: ModelStatus::Pending,
            camera_position: DEFAULT_CAMERA_POSITION,
            time: 0.0,
            rebake_geometry: true,
        }
    }

    /// Skip the startup demo spawns
    pub fn without_demo(mut self) -> Self {
        let ready = self.spawner.is_model_ready();
        self.spawner = SpawnController::without_demo();
        self.spawner.set_model_ready(ready);
        self
    }

    /// Replace the frame-rate governor
    pub fn with_governor(mut self, governor: PerformanceGovernor) -> Self {
        self.governor = governor;
        self
    }

    /// The flower geometry is available. `loaded` is false when the host fell
    /// back to built-in primitives.
    pub fn on_model_ready(&mut self, loaded: bool) {
        self.model = if loaded {
            ModelStatus::Loaded
        } else {
            ModelStatus::Fallback
        };
        self.spawner.set_model_ready(true);
        tracing::info!(status = ?self.model, "flower model ready");
    }

    pub fn model_status(&self) -> ModelStatus {
        self.model
    }

    pub fn set_camera_position(&mut self, position: Vec3) {
        self.camera_position = position;
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    /// Pointer moved; spawns on the surface if the ray hits it and the hover
    /// throttle allows
    pub fn on_pointer_move(&mut self, ray: &Ray, now: f64) -> usize {
        let Some(hit) = self.surface.raycast(ray) else {
            return 0;
        };
        self.spawner.on_hover(
            hit.point,
            hit.normal,
            now,
            &mut self.pool,
            &self.config,
            &mut *self.rng,
        )
    }

    /// Pointer clicked; spawns a burst where the ray hits the surface
    pub fn on_pointer_click(&mut self, ray: &Ray) -> usize {
        let Some(hit) = self.surface.raycast(ray) else {
            return 0;
        };
        self.spawner.on_click(
            hit.point,
            hit.normal,
            &mut self.pool,
            &self.config,
            &mut *self.rng,
        )
    }

    /// Spawn `spawn_burst` flowers at an explicit point
    pub fn spawn_flower(&mut self, point: Vec3, normal: Vec3) -> usize {
        let burst = self.config.spawn_burst as usize;
        self.spawner.spawn_at(
            point,
            normal,
            burst,
            &mut self.pool,
            &self.config,
            &mut *self.rng,
        )
    }

    /// Remove every flower immediately
    pub fn clear_all(&mut self) {
        self.pool.release_all();
        self.renderer.clear();
        tracing::info!("all flowers cleared");
    }

    /// Queue a growth preset by name
    pub fn set_preset(&mut self, name: &str) -> Result<Preset> {
        let preset: Preset = name.parse()?;
        self.queue(ConfigCommand::ApplyPreset(preset));
        Ok(preset)
    }

    /// Validate and queue a parameter change, returning the effect it will
    /// have when applied
    pub fn set_param(&mut self, name: &str, value: ParamValue) -> Result<ConfigEffect> {
        let effect = self.config.clone().set(name, value.clone())?;
        self.queue(ConfigCommand::Set {
            name: name.to_string(),
            value,
        });
        Ok(effect)
    }

    pub fn queue(&mut self, command: ConfigCommand) {
        self.pending.push(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> FlowerStats {
        FlowerStats {
            active_flowers: self.pool.active_count(),
            max_flowers: self.config.max_count,
            fps: self.governor.fps(),
            model_loaded: self.model != ModelStatus::Pending,
        }
    }

    pub fn config(&self) -> &FlowerConfig {
        &self.config
    }

    pub fn pool(&self) -> &FlowerPool {
        &self.pool
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn instances(&self) -> &InstanceRenderer {
        &self.renderer
    }

    pub fn instances_mut(&mut self) -> &mut InstanceRenderer {
        &mut self.renderer
    }

    /// Wall time of the last tick
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Base flower scale to bake geometry at, if it changed since last asked
    pub fn take_geometry_rebake(&mut self) -> Option<f32> {
        std::mem::take(&mut self.rebake_geometry).then_some(self.config.base_flower_scale)
    }

    /// Advance one frame. `delta` is the frame time (clamped to 50 ms) and
    /// `now` the wall time in seconds.
    pub fn tick(&mut self, delta: f64, now: f64) -> TickReport {
        self.apply_pending();
        self.time = now;

        let mut report = TickReport::default();
        if let Some(capacity) = self.governor.record_frame(now, self.config.max_count) {
            self.config.max_count = capacity;
            self.apply_effect(ConfigEffect::ReinitializePool);
            report.capacity_reduced_to = Some(capacity);
        }

        report.demo_spawned = self.spawner.demo_spawn(
            now,
            &self.surface,
            &mut self.pool,
            &self.config,
            &mut *self.rng,
        );

        if self.spawner.is_model_ready() {
            let dt = delta.clamp(0.0, DEFAULT_MAX_DELTA) as f32;
            report.update = self.pool.update(
                dt,
                self.config.speed_multiplier(),
                self.config.instant_growth,
            );
            report.visible = self
                .renderer
                .rebuild(&self.pool, self.camera_position, &self.config, now);
        }
        report
    }

    fn apply_pending(&mut self) {
        for command in std::mem::take(&mut self.pending) {
            let effect = match command {
                ConfigCommand::Set { name, value } => match self.config.set(&name, value) {
                    Ok(effect) => effect,
                    Err(err) => {
                        tracing::warn!(%err, "config change rejected");
                        continue;
                    }
                },
                ConfigCommand::ApplyPreset(preset) => {
                    tracing::info!(%preset, "growth preset applied");
                    self.config.apply_preset(preset)
                }
            };
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: ConfigEffect) {
        match effect {
            ConfigEffect::None => {}
            ConfigEffect::RebuildInstances => {
                self.renderer =
                    InstanceRenderer::new(self.pool.capacity(), self.config.random_colors);
                self.rebake_geometry = true;
            }
            ConfigEffect::ReinitializePool => {
                self.pool.initialize(self.config.max_count);
                self.renderer =
                    InstanceRenderer::new(self.config.max_count, self.config.random_colors);
            }
            ConfigEffect::RebuildSurface => {
                self.surface = Surface::new(self.config.surface_type, self.config.surface_size);
                self.pool.release_all();
                self.renderer.clear();
            }
        }
    }
}

impl RuntimeSystem for FlowerSystem {
    fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            capacity = self.pool.capacity(),
            surface = %self.surface.shape(),
            "flower system initialized"
        );
        Ok(())
    }

    fn update(&mut self, clock: &FrameClock) -> Result<()> {
        self.tick(clock.delta_time, clock.real_time);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.clear_all();
        Ok(())
    }

    fn name(&self) -> &str {
        "flowers"
    }
}
