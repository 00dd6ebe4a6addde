//! Spawn controller: hover, click, and demo spawning gated on model readiness

use crate::config::FlowerConfig;
use crate::pool::FlowerPool;
use glam::Vec3;
use petal_surface::Surface;
use rand::Rng;

/// Flowers spawned per click, regardless of `spawn_burst`
pub const CLICK_BURST: usize = 5;
/// Flowers the startup demo places on the surface
pub const DEMO_SPAWN_COUNT: u32 = 10;
/// Seconds between demo spawns
pub const DEMO_SPAWN_INTERVAL: f64 = 0.3;
/// Seconds after startup before the demo first checks for the model
pub const DEMO_START_DELAY: f64 = 1.0;
/// Seconds between readiness checks while the model is still loading
pub const DEMO_READY_POLL: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
enum DemoState {
    Waiting { check_at: f64 },
    Running { next_at: f64, remaining: u32 },
    Done,
}

/// Decides when and where flowers are created
#[derive(Debug)]
pub struct SpawnController {
    model_ready: bool,
    last_hover: Option<f64>,
    demo: DemoState,
}

impl Default for SpawnController {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnController {
    pub fn new() -> Self {
        Self {
            model_ready: false,
            last_hover: None,
            demo: DemoState::Waiting {
                check_at: DEMO_START_DELAY,
            },
        }
    }

    /// A controller that never runs the startup demo
    pub fn without_demo() -> Self {
        Self {
            demo: DemoState::Done,
            ..Self::new()
        }
    }

    pub fn is_model_ready(&self) -> bool {
        self.model_ready
    }

    pub fn set_model_ready(&mut self, ready: bool) {
        self.model_ready = ready;
    }

    /// True while demo spawns are still scheduled
    pub fn demo_pending(&self) -> bool {
        self.demo != DemoState::Done
    }

    /// Spawn `burst` flowers at a point. Returns how many were placed.
    pub fn spawn_at<R: Rng + ?Sized>(
        &mut self,
        point: Vec3,
        normal: Vec3,
        burst: usize,
        pool: &mut FlowerPool,
        config: &FlowerConfig,
        rng: &mut R,
    ) -> usize {
        if !self.model_ready {
            tracing::debug!("model not loaded yet, skipping flower spawn");
            return 0;
        }
        let spawned = pool
            .acquire_burst(burst, point, normal, config, rng)
            .into_iter()
            .flatten()
            .count();
        if spawned > 0 {
            tracing::debug!(spawned, active = pool.active_count(), "spawned flowers");
        }
        spawned
    }

    /// Pointer moved over the surface at wall time `now`.
    ///
    /// Spawns `spawn_burst` flowers if more than `1 / spawn_rate` seconds
    /// have passed since the last hover spawn.
    pub fn on_hover<R: Rng + ?Sized>(
        &mut self,
        point: Vec3,
        normal: Vec3,
        now: f64,
        pool: &mut FlowerPool,
        config: &FlowerConfig,
        rng: &mut R,
    ) -> usize {
        if !self.model_ready {
            return 0;
        }
        if let Some(last) = self.last_hover {
            if now - last <= config.hover_interval() {
                return 0;
            }
        }
        self.last_hover = Some(now);
        let burst = config.spawn_burst as usize;
        self.spawn_at(point, normal, burst, pool, config, rng)
    }

    /// Pointer clicked on the surface; not throttled
    pub fn on_click<R: Rng + ?Sized>(
        &mut self,
        point: Vec3,
        normal: Vec3,
        pool: &mut FlowerPool,
        config: &FlowerConfig,
        rng: &mut R,
    ) -> usize {
        if !self.model_ready {
            return 0;
        }
        self.spawn_at(point, normal, CLICK_BURST, pool, config, rng)
    }

    /// Advance the startup demo to wall time `now`, spawning any due flowers
    /// at random surface points.
    pub fn demo_spawn<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        surface: &Surface,
        pool: &mut FlowerPool,
        config: &FlowerConfig,
        rng: &mut R,
    ) -> usize {
        if let DemoState::Waiting { check_at } = self.demo {
            if now < check_at {
                return 0;
            }
            if !self.model_ready {
                self.demo = DemoState::Waiting {
                    check_at: now + DEMO_READY_POLL,
                };
                return 0;
            }
            tracing::info!("starting demo, spawning initial flowers");
            self.demo = DemoState::Running {
                next_at: now,
                remaining: DEMO_SPAWN_COUNT,
            };
        }

        let DemoState::Running {
            mut next_at,
            mut remaining,
        } = self.demo
        else {
            return 0;
        };

        let mut spawned = 0;
        while remaining > 0 && now >= next_at {
            if let Some(hit) = surface.sample(rng) {
                spawned += self.spawn_at(
                    hit.point,
                    hit.normal,
                    config.spawn_burst as usize,
                    pool,
                    config,
                    rng,
                );
            }
            remaining -= 1;
            next_at += DEMO_SPAWN_INTERVAL;
        }

        self.demo = if remaining == 0 {
            DemoState::Done
        } else {
            DemoState::Running { next_at, remaining }
        };
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petal_surface::SurfaceShape;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixture {
        spawner: SpawnController,
        pool: FlowerPool,
        config: FlowerConfig,
        rng: ChaCha8Rng,
        surface: Surface,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                spawner: SpawnController::new(),
                pool: FlowerPool::new(100),
                config: FlowerConfig::default(),
                rng: ChaCha8Rng::seed_from_u64(5),
                surface: Surface::new(SurfaceShape::Sphere, 5.0),
            }
        }

        fn hover(&mut self, now: f64) -> usize {
            self.spawner.on_hover(
                Vec3::ZERO,
                Vec3::Y,
                now,
                &mut self.pool,
                &self.config,
                &mut self.rng,
            )
        }

        fn click(&mut self) -> usize {
            self.spawner.on_click(
                Vec3::ZERO,
                Vec3::Y,
                &mut self.pool,
                &self.config,
                &mut self.rng,
            )
        }

        fn demo(&mut self, now: f64) -> usize {
            self.spawner.demo_spawn(
                now,
                &self.surface,
                &mut self.pool,
                &self.config,
                &mut self.rng,
            )
        }
    }

    #[test]
    fn nothing_spawns_before_model_ready() {
        let mut f = Fixture::new();
        assert_eq!(f.click(), 0);
        assert_eq!(f.hover(5.0), 0);
        assert_eq!(f.pool.active_count(), 0);
    }

    #[test]
    fn hover_is_rate_limited() {
        let mut f = Fixture::new();
        f.spawner.set_model_ready(true);
        // Default spawn_rate 20 -> 0.05 s interval
        assert_eq!(f.hover(1.0), 1);
        assert_eq!(f.hover(1.03), 0);
        assert_eq!(f.hover(1.06), 1);
        assert_eq!(f.pool.active_count(), 2);
    }

    #[test]
    fn hover_uses_configured_burst() {
        let mut f = Fixture::new();
        f.config.spawn_burst = 4;
        f.spawner.set_model_ready(true);
        assert_eq!(f.hover(0.0), 4);
    }

    #[test]
    fn click_bursts_five_without_throttle() {
        let mut f = Fixture::new();
        f.spawner.set_model_ready(true);
        assert_eq!(f.click(), 5);
        assert_eq!(f.click(), 5);
        assert_eq!(f.pool.active_count(), 10);
    }

    #[test]
    fn demo_waits_for_model_then_spawns_ten() {
        let mut f = Fixture::new();

        // Before the start delay and while the model is loading: nothing
        assert_eq!(f.demo(0.5), 0);
        assert_eq!(f.demo(1.2), 0);
        assert!(f.spawner.demo_pending());

        f.spawner.set_model_ready(true);
        // First spawn happens as soon as readiness is seen
        assert_eq!(f.demo(1.4), 1);
        // Two more are due by 2.05 s
        assert_eq!(f.demo(2.05), 2);
        // Far in the future the rest arrive at once
        assert_eq!(f.demo(10.0), 7);
        assert!(!f.spawner.demo_pending());
        assert_eq!(f.demo(20.0), 0);
        assert_eq!(f.pool.active_count(), 10);

        for (_, slot) in f.pool.iter_active() {
            assert!((slot.position.length() - 5.0).abs() < 0.1);
        }
    }

    #[test]
    fn demo_can_be_disabled() {
        let mut f = Fixture {
            spawner: SpawnController::without_demo(),
            surface: Surface::new(SurfaceShape::Box, 2.0),
            ..Fixture::new()
        };
        f.spawner.set_model_ready(true);
        assert_eq!(f.demo(5.0), 0);
    }
}
