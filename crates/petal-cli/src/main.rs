//! Petal CLI - headless driver for the flower system

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, presets, simulate};

#[derive(Parser)]
#[command(name = "petal")]
#[command(about = "Flowers that grow and fade on procedural surfaces", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless flower session and report stats
    Simulate {
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,

        /// Growth preset (slow, normal, fast, instant)
        #[arg(long)]
        preset: Option<String>,

        /// Surface shape (torus-knot, sphere, torus, box)
        #[arg(long)]
        shape: Option<String>,

        /// Parameter override, repeatable (e.g. --set spawn_burst=3)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        overrides: Vec<String>,

        /// Path to a glTF/GLB model with `Stem` and `Blossom` meshes
        #[arg(long)]
        model: Option<String>,

        /// Number of frames to run
        #[arg(long, default_value = "600")]
        frames: u32,

        /// Seconds per frame
        #[arg(long, default_value = "0.0166667")]
        frame_time: f64,

        /// Click every N frames (0 disables clicking)
        #[arg(long, default_value = "45")]
        click_every: u32,

        /// Camera orbit speed in degrees per second
        #[arg(long, default_value = "0")]
        orbit: f32,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the startup demo spawns
        #[arg(long)]
        no_demo: bool,

        /// Upload instance buffers to a headless GPU device every frame
        #[arg(long)]
        gpu: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// Print a flower configuration as TOML
    Config {
        /// Start from this TOML file instead of the defaults
        #[arg(long)]
        file: Option<String>,

        /// Apply a growth preset first
        #[arg(long)]
        preset: Option<String>,

        /// Print only this parameter's value
        #[arg(long)]
        param: Option<String>,
    },

    /// List the growth presets
    Presets {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            preset,
            shape,
            overrides,
            model,
            frames,
            frame_time,
            click_every,
            orbit,
            seed,
            no_demo,
            gpu,
            format,
        } => simulate::run(simulate::SimulateArgs {
            config,
            preset,
            shape,
            overrides,
            model,
            frames,
            frame_time,
            click_every,
            orbit,
            seed,
            no_demo,
            gpu,
            format,
        }),
        Commands::Config { file, preset, param } => config::run(file, preset, param),
        Commands::Presets { format } => presets::run(&format),
    }
}
