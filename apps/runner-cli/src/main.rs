use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use runner_common::Transform;
use runner_kernel::{World, WorldEvent};
use runner_stream::{LevelFile, StreamConfig, StreamController};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Level used when no `--config` is given.
const BUILTIN_LEVEL: &str = include_str!("../levels/endless.yaml");

#[derive(Parser)]
#[command(name = "runner-cli", about = "Headless endless-runner level streamer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the default stream config
    Info,
    /// Stream a level with a player moving at constant speed
    Run {
        /// Level file (YAML). Uses the built-in level when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Player speed along the travel axis, units per second
        #[arg(short, long, default_value = "12.0")]
        speed: f32,
        /// Frame time in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// RNG seed for segment picks
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load and validate a level file without running it
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    frames: u64,
    final_player_z: f32,
    final_frontier: f32,
    segments_spawned: u64,
    segments_retired: u64,
    peak_active: usize,
    drained_at_stop: usize,
    live_entities_after_stop: usize,
    world_events: usize,
}

fn load_level(path: Option<&PathBuf>) -> Result<LevelFile> {
    match path {
        Some(p) => {
            LevelFile::load(p).with_context(|| format!("failed to load level {}", p.display()))
        }
        None => LevelFile::from_yaml(BUILTIN_LEVEL).context("built-in level is malformed"),
    }
}

fn run(level: &LevelFile, frames: u64, speed: f32, dt: f32, seed: u64) -> Result<RunSummary> {
    let setup = level.to_setup().context("failed to resolve level templates")?;
    let mut controller = StreamController::new(setup, World::new(), Pcg32::seed_from_u64(seed));
    controller.start().context("level session did not start")?;

    let Some(player) = controller.player().copied() else {
        anyhow::bail!("controller running without a player");
    };
    let mut z = player.transform.travel();
    let mut peak_active = controller.active_segment_count();
    let mut world_events = 0;

    for _ in 0..frames {
        z += speed * dt;
        let world = controller.factory_mut();
        world.set_transform(
            player.id,
            Transform::from_position(Vec3::new(
                player.transform.position.x,
                player.transform.position.y,
                z,
            )),
        );
        world.step();

        let report = controller.tick(z);
        peak_active = peak_active.max(controller.active_segment_count());
        if let Some(seg) = report.spawned {
            tracing::debug!(
                template = level.template_name(seg.template).unwrap_or("?"),
                at = seg.position,
                "segment streamed in"
            );
        }
        world_events += controller.factory_mut().drain_events().len();
    }

    let stats = *controller.stats();
    let final_frontier = controller.frontier_position();
    let drained = controller.stop();
    let world = controller.into_factory();
    let despawned = world
        .events()
        .iter()
        .filter(|e| matches!(e, WorldEvent::Despawned { .. }))
        .count();
    tracing::debug!(despawned, "teardown events");

    Ok(RunSummary {
        seed,
        frames,
        final_player_z: z,
        final_frontier,
        segments_spawned: stats.segments_spawned,
        segments_retired: stats.segments_retired,
        peak_active,
        drained_at_stop: drained,
        live_entities_after_stop: world.entity_count(),
        world_events: world_events + world.events().len(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("runner-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("stream: {}", runner_stream::crate_info());
            let config = StreamConfig::default();
            println!(
                "default config: segment_length={}, segments_to_keep={}, pre_generation_distance={}",
                config.segment_length, config.segments_to_keep, config.pre_generation_distance
            );
        }
        Commands::Run {
            config,
            frames,
            speed,
            dt,
            seed,
            json,
        } => {
            let level = load_level(config.as_ref())?;
            let summary = run(&level, frames, speed, dt, seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Streamed {frames} frames (seed={seed})");
                println!(
                    "  player z={:.2} frontier={:.2} peak active={}",
                    summary.final_player_z, summary.final_frontier, summary.peak_active
                );
                println!(
                    "  spawned={} retired={} drained at stop={}",
                    summary.segments_spawned, summary.segments_retired, summary.drained_at_stop
                );
                println!(
                    "  live entities after stop={} (world events: {})",
                    summary.live_entities_after_stop, summary.world_events
                );
            }
        }
        Commands::Validate { config } => {
            let level = load_level(Some(&config))?;
            let setup = level.to_setup()?;
            setup
                .validate()
                .with_context(|| format!("{} is not a playable level", config.display()))?;
            println!(
                "{}: OK ({} segment templates, keep {})",
                config.display(),
                setup.segment_templates.len(),
                setup.config.segments_to_keep
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_level_is_valid() {
        let level = load_level(None).unwrap();
        assert!(level.to_setup().unwrap().validate().is_ok());
    }

    #[test]
    fn run_keeps_window_bounded_and_cleans_up() {
        let level = load_level(None).unwrap();
        let summary = run(&level, 600, 12.0, 1.0 / 60.0, 42).unwrap();
        assert!(summary.peak_active <= level.stream.segments_to_keep);
        assert_eq!(summary.drained_at_stop, level.stream.segments_to_keep);
        assert_eq!(summary.live_entities_after_stop, 0);
        assert_eq!(
            summary.segments_spawned,
            summary.segments_retired + summary.drained_at_stop as u64
        );
    }

    #[test]
    fn broken_level_fails_to_start() {
        let level = LevelFile::from_yaml("templates: [p]\nplayer: p\n").unwrap();
        assert!(run(&level, 10, 1.0, 0.1, 1).is_err());
    }
}
