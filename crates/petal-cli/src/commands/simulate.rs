//! Headless flower session: synthetic pointer input, fixed frame time

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use petal_flowers::{FlowerStats, FlowerSystem, ModelStatus, ParamValue, Preset};
use petal_render::{
    Camera, FlowerInstanceBuffers, FlowerMeshes, FlowerModel, GpuContext, GpuFlowerGeometry,
};
use petal_runtime::{FrameClock, RuntimeSystem};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::Path;

pub struct SimulateArgs {
    pub config: Option<String>,
    pub preset: Option<String>,
    pub shape: Option<String>,
    pub overrides: Vec<String>,
    pub model: Option<String>,
    pub frames: u32,
    pub frame_time: f64,
    pub click_every: u32,
    pub orbit: f32,
    pub seed: Option<u64>,
    pub no_demo: bool,
    pub gpu: bool,
    pub format: String,
}

#[derive(Default, Serialize)]
struct SpawnTotals {
    hover: usize,
    click: usize,
    demo: usize,
}

#[derive(Serialize)]
struct DrawSummary {
    index_count: u32,
    instance_count: u32,
}

#[derive(Serialize)]
struct GpuSummary {
    adapter: String,
    bytes_uploaded: u64,
    buffer_recreations: u32,
    geometry_uploads: u32,
    draws: Vec<DrawSummary>,
}

#[derive(Serialize)]
struct Summary {
    frames: u32,
    simulated_seconds: f64,
    surface: String,
    model: ModelStatus,
    stats: FlowerStats,
    peak_active: usize,
    spawned: SpawnTotals,
    released: usize,
    visible_instances: usize,
    capacity_reductions: Vec<usize>,
    gpu: Option<GpuSummary>,
}

/// Device-side state for `--gpu` runs
struct GpuSession {
    context: GpuContext,
    buffers: FlowerInstanceBuffers,
    geometry: Option<GpuFlowerGeometry>,
    bytes_uploaded: u64,
    buffer_recreations: u32,
    geometry_uploads: u32,
}

impl GpuSession {
    fn new(system: &FlowerSystem) -> Result<Self> {
        let context =
            GpuContext::headless_blocking().context("Failed to create headless GPU context")?;
        let buffers = FlowerInstanceBuffers::new(&context.device, system.instances());
        Ok(Self {
            context,
            buffers,
            geometry: None,
            bytes_uploaded: 0,
            buffer_recreations: 0,
            geometry_uploads: 0,
        })
    }

    fn upload_geometry(&mut self, meshes: &FlowerMeshes) {
        self.geometry = Some(GpuFlowerGeometry::upload(&self.context.device, meshes));
        self.geometry_uploads += 1;
    }

    fn sync(&mut self, system: &mut FlowerSystem) {
        let stats = self.buffers.sync(
            &self.context.device,
            &self.context.queue,
            system.instances_mut(),
        );
        self.bytes_uploaded += stats.bytes_written;
        if stats.recreated {
            self.buffer_recreations += 1;
        }
    }

    fn summary(&self) -> GpuSummary {
        GpuSummary {
            adapter: self.context.adapter_info.name.clone(),
            bytes_uploaded: self.bytes_uploaded,
            buffer_recreations: self.buffer_recreations,
            geometry_uploads: self.geometry_uploads,
            draws: self
                .geometry
                .as_ref()
                .map(|geometry| {
                    self.buffers
                        .draws(geometry)
                        .iter()
                        .map(|draw| DrawSummary {
                            index_count: draw.index_count,
                            instance_count: draw.instance_count,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Pointer position in NDC at time `t`: a slow Lissajous sweep over the
/// middle of the screen
fn pointer_at(t: f32) -> Vec2 {
    Vec2::new((t * 0.7).sin() * 0.6, (t * 1.1).cos() * 0.4)
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let mut config = super::config::load(args.config.as_deref())?;
    if let Some(name) = &args.preset {
        let preset: Preset = name.parse().context("Invalid preset")?;
        config.apply_preset(preset);
    }
    if let Some(shape) = &args.shape {
        config.surface_type = shape.parse().context("Invalid surface shape")?;
    }
    for assignment in &args.overrides {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected NAME=VALUE, got '{}'", assignment))?;
        config
            .set(name.trim(), ParamValue::parse(raw.trim()))
            .with_context(|| format!("Invalid override '{}'", assignment))?;
    }

    let model = FlowerModel::load_or_fallback(
        args.model.as_deref().map(Path::new),
        config.stem_color,
        config.blossom_color,
    );

    let mut system = match args.seed {
        Some(seed) => FlowerSystem::with_rng(config, ChaCha8Rng::seed_from_u64(seed)),
        None => FlowerSystem::new(config),
    };
    if args.no_demo {
        system = system.without_demo();
    }
    system.initialize()?;

    let mut camera = Camera::new();
    system.set_camera_position(camera.position);

    let mut gpu = if args.gpu {
        Some(GpuSession::new(&system)?)
    } else {
        None
    };

    // The host signals readiness once geometry exists, loaded or not
    system.on_model_ready(!model.is_fallback());

    let mut clock = FrameClock::new();
    let mut spawned = SpawnTotals::default();
    let mut released = 0;
    let mut peak_active = 0;
    let mut visible_instances = 0;
    let mut capacity_reductions = Vec::new();

    for frame in 0..args.frames {
        clock.advance(args.frame_time);
        let now = clock.real_time;

        if args.orbit != 0.0 {
            camera.orbit_horizontal(args.orbit.to_radians() * clock.delta_time as f32);
            system.set_camera_position(camera.position);
        }

        let ray = camera.screen_ray(pointer_at(now as f32));
        spawned.hover += system.on_pointer_move(&ray, now);
        if args.click_every > 0 && (frame + 1) % args.click_every == 0 {
            spawned.click += system.on_pointer_click(&ray);
        }

        let report = system.tick(clock.delta_time, now);
        spawned.demo += report.demo_spawned;
        released += report.update.released;
        visible_instances = report.visible;
        peak_active = peak_active.max(system.pool().active_count());
        if let Some(capacity) = report.capacity_reduced_to {
            capacity_reductions.push(capacity);
        }

        if let Some(base_scale) = system.take_geometry_rebake() {
            tracing::debug!(base_scale, "baking flower geometry");
            if let Some(gpu) = gpu.as_mut() {
                gpu.upload_geometry(&model.bake(base_scale));
            }
        }
        if let Some(gpu) = gpu.as_mut() {
            gpu.sync(&mut system);
        }
    }

    let summary = Summary {
        frames: args.frames,
        simulated_seconds: clock.total_time,
        surface: system.surface().shape().to_string(),
        model: system.model_status(),
        stats: system.stats(),
        peak_active,
        spawned,
        released,
        visible_instances,
        capacity_reductions,
        gpu: gpu.as_ref().map(GpuSession::summary),
    };
    system.shutdown()?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text(&summary);
    }
    Ok(())
}

fn print_text(summary: &Summary) {
    println!(
        "Simulated {} frames ({:.2}s) on {}",
        summary.frames, summary.simulated_seconds, summary.surface
    );
    println!("Model: {:?}", summary.model);
    println!(
        "Flowers: {} active / {} max (peak {})",
        summary.stats.active_flowers, summary.stats.max_flowers, summary.peak_active
    );
    println!("FPS: {}", summary.stats.fps);
    println!(
        "Spawned: {} hover, {} click, {} demo",
        summary.spawned.hover, summary.spawned.click, summary.spawned.demo
    );
    println!("Released: {}", summary.released);
    println!("Visible instances: {}", summary.visible_instances);
    if !summary.capacity_reductions.is_empty() {
        println!("Capacity reductions: {:?}", summary.capacity_reductions);
    }
    if let Some(gpu) = &summary.gpu {
        println!("GPU: {}", gpu.adapter);
        println!(
            "  Uploaded {} bytes ({} buffer recreations, {} geometry uploads)",
            gpu.bytes_uploaded, gpu.buffer_recreations, gpu.geometry_uploads
        );
        for (name, draw) in ["stem", "blossom"].iter().zip(&gpu.draws) {
            println!(
                "  {} draw: {} indices x {} instances",
                name, draw.index_count, draw.instance_count
            );
        }
    }
}
