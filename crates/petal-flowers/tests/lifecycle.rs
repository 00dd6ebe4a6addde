use glam::Vec3;
use petal_flowers::{
    FlowerConfig, FlowerPool, FlowerSeed, FlowerSystem, InstanceRenderer, PerformanceGovernor,
    DEFAULT_CAMERA_POSITION,
};
use petal_surface::{Ray, SurfaceShape};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FRAME: f64 = 1.0 / 60.0;

fn sphere_config(max_count: usize) -> FlowerConfig {
    FlowerConfig {
        max_count,
        surface_type: SurfaceShape::Sphere,
        ..FlowerConfig::default()
    }
}

fn ready_system(config: FlowerConfig, seed: u64) -> FlowerSystem {
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let mut flowers = FlowerSystem::with_rng(config, rng).without_demo();
    flowers.on_model_ready(true);
    flowers
}

#[test]
fn flowers_grow_render_and_decay() {
    let mut flowers = ready_system(sphere_config(500), 1);
    let ray = Ray::new(DEFAULT_CAMERA_POSITION, -DEFAULT_CAMERA_POSITION);
    assert_eq!(flowers.on_pointer_click(&ray), 5);

    let mut now = 0.0;
    let mut last_scale = 0.0;
    let mut max_visible = 0;
    for _ in 0..600 {
        now += FRAME;
        let report = flowers.tick(FRAME, now);
        max_visible = max_visible.max(report.visible);
        assert!(report.visible <= flowers.stats().active_flowers);

        if let Some(slot) = flowers.pool().slot(0).filter(|s| s.active) {
            assert!(slot.current_scale >= last_scale - 1e-6);
            last_scale = slot.current_scale;
        }
        if flowers.stats().active_flowers == 0 {
            break;
        }
    }

    // Flowers sit about 26 units from the camera, inside the render distance
    assert!(max_visible > 0);
    // Every flower dies within 10 s
    assert_eq!(flowers.stats().active_flowers, 0);
    let report = flowers.tick(FRAME, now + FRAME);
    assert_eq!(report.visible, 0);
    assert_eq!(flowers.instances().stem().count(), 0);
}

#[test]
fn released_slot_is_reused_with_fresh_fields() {
    let mut pool = FlowerPool::new(4);
    let config = FlowerConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    let first = pool.acquire(Vec3::X, Vec3::X, &config, &mut rng).unwrap();
    pool.acquire(Vec3::Y, Vec3::Y, &config, &mut rng).unwrap();
    assert_eq!(first, 0);

    let mut ticks = 0;
    while pool.slot(0).unwrap().active {
        pool.update(0.05, 2.0, false);
        ticks += 1;
        assert!(ticks < 100);
    }

    let mut seed_rng = ChaCha8Rng::seed_from_u64(99);
    let seed = FlowerSeed::roll(Vec3::Z * 3.0, Vec3::Z, &config, &mut seed_rng);
    let reused = pool.acquire_seed(&seed, false).unwrap();
    assert_eq!(reused, 0);

    let slot = pool.slot(0).unwrap();
    assert!(slot.active);
    assert_eq!(slot.position, seed.position);
    assert_eq!(slot.normal, seed.normal);
    assert_eq!(slot.rotation, seed.rotation);
    assert_eq!(slot.age, 0.0);
    assert_eq!(slot.target_scale, seed.target_scale);
    assert_eq!(slot.current_scale, 0.0);
    assert_eq!(slot.stem_color, seed.stem_color);
    assert_eq!(slot.blossom_color, seed.blossom_color);
    assert_eq!(slot.anim_phase, seed.anim_phase);
    assert_eq!(slot.anim_speed, seed.anim_speed);
    assert_eq!(slot.growth_rate, seed.growth_rate);
}

#[test]
fn active_count_never_exceeds_capacity() {
    let config = FlowerConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut pool = FlowerPool::new(16);

    for round in 0..200 {
        let burst = round % 7;
        pool.acquire_burst(burst, Vec3::ZERO, Vec3::Y, &config, &mut rng);
        assert!(pool.active_count() <= pool.capacity());
        assert_eq!(pool.active_count(), pool.iter_active().count());
        pool.update(0.05, 3.0, round % 3 == 0);
        assert_eq!(pool.active_count(), pool.iter_active().count());
        if round % 50 == 49 {
            pool.release_all();
        }
    }
}

#[test]
fn burst_beyond_capacity_is_dropped() {
    let mut flowers = ready_system(
        FlowerConfig {
            spawn_burst: 10,
            ..sphere_config(500)
        },
        4,
    );
    for _ in 0..60 {
        flowers.spawn_flower(Vec3::ZERO, Vec3::Y);
    }
    assert_eq!(flowers.stats().active_flowers, 500);
    assert_eq!(flowers.spawn_flower(Vec3::ZERO, Vec3::Y), 0);
}

#[test]
fn dense_buffers_skip_culled_slots() {
    let config = FlowerConfig {
        animate_flowers: false,
        ..FlowerConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut pool = FlowerPool::new(10);
    let camera = Vec3::ZERO;
    for i in 0..10 {
        // Odd slots are beyond the 30-unit render distance
        let distance = if i % 2 == 0 { 5.0 } else { 45.0 };
        pool.acquire(Vec3::X * distance, Vec3::Y, &config, &mut rng);
    }
    pool.update(0.05, 2.0, false);

    let mut renderer = InstanceRenderer::new(pool.capacity(), true);
    let visible = renderer.rebuild(&pool, camera, &config, 0.0);
    assert_eq!(visible, 5);
    for transform in renderer.stem().transforms() {
        let distance = transform.translation().distance(camera);
        assert!(distance <= config.max_render_distance);
    }
    assert_eq!(renderer.stem().colors().unwrap().len(), 5);
    assert_eq!(renderer.blossom().transforms().len(), 5);
}

#[test]
fn governor_shrinks_capacity_and_never_grows() {
    let mut flowers = ready_system(sphere_config(1500), 6);
    let mut now = 0.0;

    // Ten frames per second
    let mut reduced = None;
    for _ in 0..15 {
        now += 0.1;
        if let Some(c) = flowers.tick(0.1, now).capacity_reduced_to {
            reduced = Some(c);
        }
    }
    assert_eq!(reduced, Some(1300));
    assert_eq!(flowers.stats().max_flowers, 1300);
    assert_eq!(flowers.pool().capacity(), 1300);
    assert!(flowers.stats().fps < 30);

    // Back to 120 frames per second
    for _ in 0..360 {
        now += 1.0 / 120.0;
        assert_eq!(flowers.tick(1.0 / 120.0, now).capacity_reduced_to, None);
    }
    assert!(flowers.stats().fps >= 60);
    assert_eq!(flowers.stats().max_flowers, 1300);
}

#[test]
fn custom_governor_floor_is_respected() {
    let mut flowers = ready_system(sphere_config(1500), 7)
        .with_governor(PerformanceGovernor::with_floor(1400));
    let mut now = 0.0;
    for _ in 0..40 {
        now += 0.1;
        flowers.tick(0.1, now);
    }
    assert_eq!(flowers.stats().max_flowers, 1400);
}

#[test]
fn demo_fills_surface_after_model_loads() {
    let mut flowers = FlowerSystem::with_rng(sphere_config(500), ChaCha8Rng::seed_from_u64(8));
    let mut now = 0.0;
    let mut spawned = 0;
    for frame in 0..420 {
        now += FRAME;
        if frame == 90 {
            flowers.on_model_ready(false);
        }
        let report = flowers.tick(FRAME, now);
        if frame < 90 {
            assert_eq!(report.demo_spawned, 0);
        }
        spawned += report.demo_spawned;
    }
    assert_eq!(spawned, 10);
}

#[test]
fn clear_all_twice_is_harmless() {
    let mut flowers = ready_system(sphere_config(500), 9);
    flowers.clear_all();
    flowers.clear_all();
    assert_eq!(flowers.stats().active_flowers, 0);
    flowers.spawn_flower(Vec3::ZERO, Vec3::Y);
    flowers.clear_all();
    flowers.clear_all();
    assert_eq!(flowers.stats().active_flowers, 0);
    for slot in flowers.pool().slots() {
        assert!(!slot.active);
        assert_eq!(slot.current_scale, 0.0);
    }
}
