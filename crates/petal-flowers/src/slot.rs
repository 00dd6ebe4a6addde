//! Flower slots: per-flower state and the attributes rolled at spawn time

use crate::config::FlowerConfig;
use crate::palette;
use glam::{Quat, Vec3};
use petal_core::Color;
use rand::Rng;
use std::f32::consts::TAU;

/// One reusable record in the flower pool
#[derive(Clone, Debug, PartialEq)]
pub struct FlowerSlot {
    pub active: bool,
    /// World-space anchor on the surface
    pub position: Vec3,
    pub normal: Vec3,
    pub rotation: Quat,
    /// Normalized lifetime progress in [0, 1)
    pub age: f32,
    pub target_scale: f32,
    pub current_scale: f32,
    pub stem_color: Color,
    pub blossom_color: Color,
    pub anim_phase: f32,
    pub anim_speed: f32,
    pub growth_rate: f32,
    /// Pool growth clock value this slot has been aged up to
    pub(crate) aged_until: f64,
}

impl FlowerSlot {
    pub fn empty() -> Self {
        Self {
            active: false,
            position: Vec3::ZERO,
            normal: Vec3::Y,
            rotation: Quat::IDENTITY,
            age: 0.0,
            target_scale: 0.0,
            current_scale: 0.0,
            stem_color: Color::WHITE,
            blossom_color: Color::WHITE,
            anim_phase: 0.0,
            anim_speed: 1.0,
            growth_rate: 1.0,
            aged_until: 0.0,
        }
    }

    /// Overwrite every spawn-time field from `seed` and mark the slot active
    pub(crate) fn occupy(&mut self, seed: &FlowerSeed, initial_scale: f32, clock: f64) {
        self.active = true;
        self.position = seed.position;
        self.normal = seed.normal;
        self.rotation = seed.rotation;
        self.age = 0.0;
        self.target_scale = seed.target_scale;
        self.current_scale = initial_scale * seed.target_scale;
        self.stem_color = seed.stem_color;
        self.blossom_color = seed.blossom_color;
        self.anim_phase = seed.anim_phase;
        self.anim_speed = seed.anim_speed;
        self.growth_rate = seed.growth_rate;
        self.aged_until = clock;
    }
}

impl Default for FlowerSlot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Placement and visual attributes for one spawn, rolled before the slot is chosen
#[derive(Clone, Debug, PartialEq)]
pub struct FlowerSeed {
    pub position: Vec3,
    pub normal: Vec3,
    pub rotation: Quat,
    pub target_scale: f32,
    pub stem_color: Color,
    pub blossom_color: Color,
    pub anim_phase: f32,
    pub anim_speed: f32,
    pub growth_rate: f32,
}

impl FlowerSeed {
    pub fn roll<R: Rng + ?Sized>(
        position: Vec3,
        normal: Vec3,
        config: &FlowerConfig,
        rng: &mut R,
    ) -> Self {
        let normal = normal.try_normalize().unwrap_or(Vec3::Y);

        let target_scale = (config.flower_scale
            + (rng.gen::<f32>() - 0.5) * config.flower_scale_variation)
            .max(0.0);

        let (stem_color, blossom_color) = if config.random_colors {
            palette::random_pair(config.color_variation, rng)
        } else {
            (
                Color::from_hex(config.stem_color),
                Color::from_hex(config.blossom_color),
            )
        };

        let rotation = if config.align_to_surface {
            let align = Quat::from_rotation_arc(Vec3::Y, normal);
            if config.random_rotation {
                align * Quat::from_rotation_y(rng.gen::<f32>() * TAU)
            } else {
                align
            }
        } else {
            Quat::IDENTITY
        };

        Self {
            position,
            normal,
            rotation,
            target_scale,
            stem_color,
            blossom_color,
            anim_phase: rng.gen::<f32>() * TAU,
            anim_speed: 0.5 + rng.gen::<f32>(),
            growth_rate: 1.0 + rng.gen::<f32>() * 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rolled_attributes_stay_in_range() {
        let config = FlowerConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..500 {
            let seed = FlowerSeed::roll(Vec3::ZERO, Vec3::X, &config, &mut rng);
            assert!((0.0..TAU).contains(&seed.anim_phase));
            assert!((0.5..1.5).contains(&seed.anim_speed));
            assert!((1.0..1.3).contains(&seed.growth_rate));
            assert!((1.75..=2.25).contains(&seed.target_scale));
        }
    }

    #[test]
    fn aligned_rotation_maps_up_to_normal() {
        let config = FlowerConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let seed = FlowerSeed::roll(Vec3::ZERO, normal, &config, &mut rng);
        assert!((seed.rotation * Vec3::Y - normal).length() < 1e-5);
    }

    #[test]
    fn random_yaw_keeps_up_axis() {
        let config = FlowerConfig {
            random_rotation: true,
            ..FlowerConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let seed = FlowerSeed::roll(Vec3::ZERO, Vec3::Z, &config, &mut rng);
        assert!((seed.rotation * Vec3::Y - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn unaligned_and_flat_colors() {
        let config = FlowerConfig {
            align_to_surface: false,
            random_colors: false,
            ..FlowerConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let seed = FlowerSeed::roll(Vec3::ONE, Vec3::NEG_Y, &config, &mut rng);
        assert_eq!(seed.rotation, Quat::IDENTITY);
        assert_eq!(seed.stem_color.to_hex(), 0x228B22);
        assert_eq!(seed.blossom_color.to_hex(), 0xFF69B4);
    }

    #[test]
    fn scale_never_negative() {
        let config = FlowerConfig {
            flower_scale: 0.1,
            flower_scale_variation: 2.0,
            ..FlowerConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(25);
        for _ in 0..200 {
            let seed = FlowerSeed::roll(Vec3::ZERO, Vec3::Y, &config, &mut rng);
            assert!(seed.target_scale >= 0.0);
        }
    }
}
