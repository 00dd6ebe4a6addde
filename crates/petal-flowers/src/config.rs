//! Flower configuration: named parameters, presets, and queued changes

use petal_core::{PetalError, Result};
use petal_surface::SurfaceShape;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Flat parameter set shared by the spawn, update, and render paths.
///
/// Every field is optional in TOML; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    pub max_count: usize,
    pub align_to_surface: bool,
    pub random_rotation: bool,
    pub flower_scale: f32,
    pub flower_scale_variation: f32,
    pub base_flower_scale: f32,
    pub stem_color: u32,
    pub blossom_color: u32,
    pub random_colors: bool,
    pub color_variation: f32,
    pub growth_speed: f32,
    pub instant_growth: bool,
    pub spawn_rate: f32,
    pub spawn_burst: u32,
    pub animate_flowers: bool,
    pub flower_animation_speed: f32,
    pub bob_height: f32,
    pub surface_type: SurfaceShape,
    pub surface_size: f32,
    pub enable_lod: bool,
    pub max_render_distance: f32,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            max_count: 1500,
            align_to_surface: true,
            random_rotation: false,
            flower_scale: 2.0,
            flower_scale_variation: 0.5,
            base_flower_scale: 4.0,
            stem_color: 0x228B22,
            blossom_color: 0xFF69B4,
            random_colors: true,
            color_variation: 0.4,
            growth_speed: 20.0,
            instant_growth: false,
            spawn_rate: 20.0,
            spawn_burst: 1,
            animate_flowers: true,
            flower_animation_speed: 1.2,
            bob_height: 0.3,
            surface_type: SurfaceShape::TorusKnot,
            surface_size: 5.0,
            enable_lod: true,
            max_render_distance: 30.0,
        }
    }
}

/// A value for a named parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Parse a command-line style value: `true`/`false`, decimal, `0x` hex, or text
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "true" | "on" => return ParamValue::Bool(true),
            "false" | "off" => return ParamValue::Bool(false),
            _ => {}
        }
        if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix('#')) {
            if let Ok(n) = u32::from_str_radix(hex, 16) {
                return ParamValue::Number(n as f64);
            }
        }
        match raw.parse::<f64>() {
            Ok(n) => ParamValue::Number(n),
            Err(_) => ParamValue::Text(raw.to_string()),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

/// What a configuration change requires of the running system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigEffect {
    /// Takes effect on the next tick with no transition
    #[default]
    None,
    /// Instance buffers (and baked flower geometry) must be recreated
    RebuildInstances,
    /// Pool and instance buffers must be reinitialized at the new capacity
    ReinitializePool,
    /// Surface mesh must be regenerated; existing flowers are cleared
    RebuildSurface,
}

/// Bundled growth-speed, spawn-rate, and scale settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Slow,
    Normal,
    Fast,
    Instant,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Slow, Preset::Normal, Preset::Fast, Preset::Instant];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Slow => "slow",
            Preset::Normal => "normal",
            Preset::Fast => "fast",
            Preset::Instant => "instant",
        }
    }

    /// (growth_speed, spawn_rate, instant_growth, flower_scale, base_flower_scale)
    pub fn values(&self) -> (f32, f32, bool, f32, f32) {
        match self {
            Preset::Slow => (5.0, 10.0, false, 1.0, 2.0),
            Preset::Normal => (15.0, 20.0, false, 2.0, 4.0),
            Preset::Fast => (30.0, 40.0, false, 3.0, 5.0),
            Preset::Instant => (60.0, 80.0, true, 4.0, 6.0),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = PetalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(Preset::Slow),
            "normal" => Ok(Preset::Normal),
            "fast" => Ok(Preset::Fast),
            "instant" => Ok(Preset::Instant),
            _ => Err(PetalError::InvalidEnumValue {
                value: s.to_string(),
                allowed: Preset::ALL.iter().map(|p| p.name().to_string()).collect(),
            }),
        }
    }
}

/// A configuration change queued for the start of the next tick
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigCommand {
    Set { name: String, value: ParamValue },
    ApplyPreset(Preset),
}

/// Every parameter name accepted by [`FlowerConfig::set`]
pub const PARAMETERS: [&str; 21] = [
    "max_count",
    "align_to_surface",
    "random_rotation",
    "flower_scale",
    "flower_scale_variation",
    "base_flower_scale",
    "stem_color",
    "blossom_color",
    "random_colors",
    "color_variation",
    "growth_speed",
    "instant_growth",
    "spawn_rate",
    "spawn_burst",
    "animate_flowers",
    "flower_animation_speed",
    "bob_height",
    "surface_type",
    "surface_size",
    "enable_lod",
    "max_render_distance",
];

impl FlowerConfig {
    /// Parse from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Per-second aging multiplier derived from `growth_speed`
    pub fn speed_multiplier(&self) -> f32 {
        self.growth_speed / 10.0
    }

    /// Minimum seconds between hover spawns
    pub fn hover_interval(&self) -> f64 {
        1.0 / self.spawn_rate.max(f32::EPSILON) as f64
    }

    pub fn apply_preset(&mut self, preset: Preset) -> ConfigEffect {
        let (growth_speed, spawn_rate, instant, flower_scale, base_scale) = preset.values();
        self.growth_speed = growth_speed;
        self.spawn_rate = spawn_rate;
        self.instant_growth = instant;
        self.flower_scale = flower_scale;
        self.base_flower_scale = base_scale;
        ConfigEffect::RebuildInstances
    }

    /// Set a named parameter, validating its type and range
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<ConfigEffect> {
        match name {
            "max_count" => {
                self.max_count = number(name, &value, 500.0, 3000.0)? as usize;
                Ok(ConfigEffect::ReinitializePool)
            }
            "align_to_surface" => {
                self.align_to_surface = boolean(name, &value)?;
                Ok(ConfigEffect::None)
            }
            "random_rotation" => {
                self.random_rotation = boolean(name, &value)?;
                Ok(ConfigEffect::None)
            }
            "flower_scale" => {
                self.flower_scale = number(name, &value, 0.1, 10.0)? as f32;
                Ok(ConfigEffect::None)
            }
            "flower_scale_variation" => {
                self.flower_scale_variation = number(name, &value, 0.0, 2.0)? as f32;
                Ok(ConfigEffect::None)
            }
            "base_flower_scale" => {
                self.base_flower_scale = number(name, &value, 1.0, 10.0)? as f32;
                Ok(ConfigEffect::RebuildInstances)
            }
            "stem_color" => {
                self.stem_color = number(name, &value, 0.0, 0xFF_FFFF as f64)? as u32;
                Ok(ConfigEffect::None)
            }
            "blossom_color" => {
                self.blossom_color = number(name, &value, 0.0, 0xFF_FFFF as f64)? as u32;
                Ok(ConfigEffect::None)
            }
            "random_colors" => {
                self.random_colors = boolean(name, &value)?;
                Ok(ConfigEffect::RebuildInstances)
            }
            "color_variation" => {
                self.color_variation = number(name, &value, 0.0, 1.0)? as f32;
                Ok(ConfigEffect::None)
            }
            "growth_speed" => {
                self.growth_speed = number(name, &value, 1.0, 60.0)? as f32;
                Ok(ConfigEffect::None)
            }
            "instant_growth" => {
                self.instant_growth = boolean(name, &value)?;
                Ok(ConfigEffect::None)
            }
            "spawn_rate" => {
                self.spawn_rate = number(name, &value, 1.0, 80.0)? as f32;
                Ok(ConfigEffect::None)
            }
            "spawn_burst" => {
                self.spawn_burst = number(name, &value, 1.0, 10.0)? as u32;
                Ok(ConfigEffect::None)
            }
            "animate_flowers" => {
                self.animate_flowers = boolean(name, &value)?;
                Ok(ConfigEffect::None)
            }
            "flower_animation_speed" => {
                self.flower_animation_speed = number(name, &value, 0.1, 5.0)? as f32;
                Ok(ConfigEffect::None)
            }
            "bob_height" => {
                self.bob_height = number(name, &value, 0.0, 1.0)? as f32;
                Ok(ConfigEffect::None)
            }
            "surface_type" => {
                self.surface_type = match &value {
                    ParamValue::Text(s) => s.parse()?,
                    _ => return Err(wrong_type(name, "shape name")),
                };
                Ok(ConfigEffect::RebuildSurface)
            }
            "surface_size" => {
                self.surface_size = number(name, &value, 1.0, 15.0)? as f32;
                Ok(ConfigEffect::RebuildSurface)
            }
            "enable_lod" => {
                self.enable_lod = boolean(name, &value)?;
                Ok(ConfigEffect::None)
            }
            "max_render_distance" => {
                self.max_render_distance = number(name, &value, 10.0, 50.0)? as f32;
                Ok(ConfigEffect::None)
            }
            _ => Err(PetalError::UnknownParameter(name.to_string())),
        }
    }

    /// Current value of a named parameter
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        let value = match name {
            "max_count" => ParamValue::Number(self.max_count as f64),
            "align_to_surface" => ParamValue::Bool(self.align_to_surface),
            "random_rotation" => ParamValue::Bool(self.random_rotation),
            "flower_scale" => self.flower_scale.into(),
            "flower_scale_variation" => self.flower_scale_variation.into(),
            "base_flower_scale" => self.base_flower_scale.into(),
            "stem_color" => ParamValue::Number(self.stem_color as f64),
            "blossom_color" => ParamValue::Number(self.blossom_color as f64),
            "random_colors" => ParamValue::Bool(self.random_colors),
            "color_variation" => self.color_variation.into(),
            "growth_speed" => self.growth_speed.into(),
            "instant_growth" => ParamValue::Bool(self.instant_growth),
            "spawn_rate" => self.spawn_rate.into(),
            "spawn_burst" => ParamValue::Number(self.spawn_burst as f64),
            "animate_flowers" => ParamValue::Bool(self.animate_flowers),
            "flower_animation_speed" => self.flower_animation_speed.into(),
            "bob_height" => self.bob_height.into(),
            "surface_type" => ParamValue::Text(self.surface_type.name().to_string()),
            "surface_size" => self.surface_size.into(),
            "enable_lod" => ParamValue::Bool(self.enable_lod),
            "max_render_distance" => self.max_render_distance.into(),
            _ => return None,
        };
        Some(value)
    }
}

fn wrong_type(name: &str, expected: &str) -> PetalError {
    PetalError::InvalidValueType {
        name: name.to_string(),
        expected: expected.to_string(),
    }
}

fn number(name: &str, value: &ParamValue, min: f64, max: f64) -> Result<f64> {
    let ParamValue::Number(n) = value else {
        return Err(wrong_type(name, "number"));
    };
    if !(min..=max).contains(n) {
        return Err(PetalError::ValueOutOfRange {
            field: name.to_string(),
            min,
            max,
            value: *n,
        });
    }
    Ok(*n)
}

fn boolean(name: &str, value: &ParamValue) -> Result<bool> {
    match value {
        ParamValue::Bool(b) => Ok(*b),
        _ => Err(wrong_type(name, "bool")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = FlowerConfig::default();
        assert_eq!(config.max_count, 1500);
        assert!((config.speed_multiplier() - 2.0).abs() < 1e-6);
        assert!((config.hover_interval() - 0.05).abs() < 1e-6);
        assert_eq!(config.surface_type, SurfaceShape::TorusKnot);
    }

    #[test]
    fn parse_from_toml() {
        let toml_str = r#"
max_count = 800
growth_speed = 30
stem_color = 0x00FF00
random_colors = false
surface_type = "Sphere"
"#;
        let config = FlowerConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.max_count, 800);
        assert!((config.growth_speed - 30.0).abs() < 1e-6);
        assert_eq!(config.stem_color, 0x00FF00);
        assert!(!config.random_colors);
        assert_eq!(config.surface_type, SurfaceShape::Sphere);
        // Untouched fields keep defaults
        assert_eq!(config.spawn_burst, 1);
    }

    #[test]
    fn toml_round_trip_of_defaults() {
        let config = FlowerConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(FlowerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn set_reports_effects() {
        let mut config = FlowerConfig::default();
        let effect = config.set("max_count", 1000.0f64.into()).unwrap();
        assert_eq!(effect, ConfigEffect::ReinitializePool);
        assert_eq!(config.max_count, 1000);

        let effect = config.set("surface_type", "torus".into()).unwrap();
        assert_eq!(effect, ConfigEffect::RebuildSurface);
        assert_eq!(config.surface_type, SurfaceShape::Torus);

        let effect = config.set("enable_lod", false.into()).unwrap();
        assert_eq!(effect, ConfigEffect::None);
        assert!(!config.enable_lod);

        let effect = config.set("random_colors", false.into()).unwrap();
        assert_eq!(effect, ConfigEffect::RebuildInstances);
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut config = FlowerConfig::default();
        assert!(matches!(
            config.set("petal_count", 3.0f64.into()),
            Err(PetalError::UnknownParameter(_))
        ));
        assert!(matches!(
            config.set("spawn_rate", 500.0f64.into()),
            Err(PetalError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            config.set("enable_lod", 1.0f64.into()),
            Err(PetalError::InvalidValueType { .. })
        ));
        // Failed sets leave the config untouched
        assert_eq!(config, FlowerConfig::default());
    }

    #[test]
    fn every_parameter_round_trips_through_get() {
        let mut config = FlowerConfig::default();
        for name in PARAMETERS {
            let value = config.get(name).unwrap();
            config.set(name, value).unwrap();
        }
        assert_eq!(config, FlowerConfig::default());
    }

    #[test]
    fn presets_bundle_settings() {
        let mut config = FlowerConfig::default();
        let effect = config.apply_preset(Preset::Instant);
        assert_eq!(effect, ConfigEffect::RebuildInstances);
        assert!(config.instant_growth);
        assert!((config.growth_speed - 60.0).abs() < 1e-6);
        assert!((config.base_flower_scale - 6.0).abs() < 1e-6);
        config.apply_preset(Preset::Slow);
        assert!(!config.instant_growth);
        assert!((config.spawn_rate - 10.0).abs() < 1e-6);
        assert_eq!("FAST".parse::<Preset>().unwrap(), Preset::Fast);
        assert!("turbo".parse::<Preset>().is_err());
    }

    #[test]
    fn param_value_parsing() {
        assert_eq!(ParamValue::parse("true"), ParamValue::Bool(true));
        assert_eq!(ParamValue::parse("2.5"), ParamValue::Number(2.5));
        assert_eq!(
            ParamValue::parse("0xFF69B4"),
            ParamValue::Number(0xFF69B4 as f64)
        );
        assert_eq!(
            ParamValue::parse("Sphere"),
            ParamValue::Text("Sphere".into())
        );
    }
}
