//! List the growth presets

use anyhow::Result;
use petal_flowers::Preset;
use serde::Serialize;

#[derive(Serialize)]
struct PresetRow {
    name: &'static str,
    growth_speed: f32,
    spawn_rate: f32,
    instant_growth: bool,
    flower_scale: f32,
    base_flower_scale: f32,
}

impl From<Preset> for PresetRow {
    fn from(preset: Preset) -> Self {
        let (growth_speed, spawn_rate, instant_growth, flower_scale, base_flower_scale) =
            preset.values();
        Self {
            name: preset.name(),
            growth_speed,
            spawn_rate,
            instant_growth,
            flower_scale,
            base_flower_scale,
        }
    }
}

pub fn run(format: &str) -> Result<()> {
    let rows: Vec<PresetRow> = Preset::ALL.into_iter().map(PresetRow::from).collect();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<10} {:>7} {:>6} {:>8} {:>6} {:>6}",
        "preset", "growth", "spawn", "instant", "scale", "base"
    );
    for row in &rows {
        println!(
            "{:<10} {:>7} {:>6} {:>8} {:>6} {:>6}",
            row.name,
            row.growth_speed,
            row.spawn_rate,
            row.instant_growth,
            row.flower_scale,
            row.base_flower_scale
        );
    }
    Ok(())
}
