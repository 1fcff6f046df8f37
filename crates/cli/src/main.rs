#![deny(unsafe_code)]
//! CLI binary for the particle-systems simulator.
//!
//! Subcommands:
//! - `render`: run a scenario or config file for N ticks, write one PNG per
//!   tick in both projections, optionally the animated GIFs
//! - `list`: print available scenarios and field types

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use particle_systems_core::{Engine, FieldKind, ParticleSystem, SystemConfig};
use particle_systems_engines::pixel::{render_frame, Frame, FrameSpec, Projection, DEFAULT_EXTENT};
use particle_systems_engines::snapshot::{write_gif, write_png, DEFAULT_FRAME_DELAY_MS};
use particle_systems_engines::Scenario;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "particle-systems", about = "Particle ensembles under pluggable force fields")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation and write one frame per tick.
    Render {
        /// Scenario name (mixed, brownian, spherical).
        #[arg(long, conflicts_with = "config")]
        scenario: Option<String>,

        /// JSON configuration file with field profiles and particle groups.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of frames (ticks) to produce.
        #[arg(short, long, default_value_t = 20)]
        steps: usize,

        /// PRNG seed; overrides the seed in a config file.
        #[arg(long)]
        seed: Option<u64>,

        /// Frame width in pixels.
        #[arg(short = 'W', long, default_value_t = 512)]
        width: usize,

        /// Frame height in pixels.
        #[arg(short = 'H', long, default_value_t = 512)]
        height: usize,

        /// Half-width of the visible world square.
        #[arg(long, default_value_t = DEFAULT_EXTENT)]
        extent: f64,

        /// Output directory.
        #[arg(short, long, default_value = "results")]
        out: PathBuf,

        /// Also write plots.gif and plots3d.gif.
        #[arg(long)]
        gif: bool,

        /// Worker threads for the per-tick fan-out (default: all cores).
        #[arg(long)]
        threads: Option<usize>,
    },
    /// List available scenarios and field types.
    List,
}

/// Everything `render` needs once arguments are resolved.
struct RenderJob {
    label: String,
    config: SystemConfig,
    steps: usize,
    spec: FrameSpec,
    out: PathBuf,
    gif: bool,
}

fn load_config(
    scenario: Option<String>,
    config: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<(String, SystemConfig), CliError> {
    match (scenario, config) {
        (_, Some(path)) => {
            let text = fs::read_to_string(&path).map_err(|e| CliError::io(&path, e))?;
            let mut cfg = SystemConfig::from_json_str(&text)?;
            if let Some(seed) = seed {
                cfg.seed = seed;
            }
            let label = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "config".to_string());
            Ok((label, cfg))
        }
        (Some(name), None) => {
            let scenario = Scenario::from_name(&name)?;
            let seed = seed.unwrap_or(particle_systems_core::config::DEFAULT_SEED);
            Ok((name, scenario.config(seed)))
        }
        (None, None) => Err(CliError::Input(
            "render needs --scenario NAME or --config FILE".into(),
        )),
    }
}

fn render(job: RenderJob) -> Result<serde_json::Value, CliError> {
    fs::create_dir_all(&job.out).map_err(|e| CliError::io(&job.out, e))?;

    let mut system = ParticleSystem::new(job.config)?;
    let mut frames = Vec::new();
    let mut frames3d = Vec::new();

    // Each frame shows the state before the tick that follows it.
    for i in 0..job.steps {
        let snapshot = system.snapshot();
        let frame = render_frame(&snapshot, &job.spec, Projection::Planar);
        let frame3d = render_frame(&snapshot, &job.spec, Projection::Oblique);
        write_png(&frame, &job.out.join(format!("frame_{i}.png")))?;
        write_png(&frame3d, &job.out.join(format!("frame3d_{i}.png")))?;
        if job.gif {
            frames.push(frame);
            frames3d.push(frame3d);
        }
        system.step()?;
    }

    if job.gif && frames.is_empty() {
        log::warn!("--gif with zero steps: no animation written");
    } else if job.gif {
        write_animation(&frames, &job.out.join("plots.gif"))?;
        write_animation(&frames3d, &job.out.join("plots3d.gif"))?;
    }

    log::info!(
        "rendered {} ({} particles, {} ticks) -> {}",
        job.label,
        system.particles().len(),
        system.tick(),
        job.out.display()
    );

    Ok(serde_json::json!({
        "run": job.label,
        "steps": job.steps,
        "width": job.spec.width(),
        "height": job.spec.height(),
        "output": job.out.display().to_string(),
        "system": system.params(),
    }))
}

fn write_animation(frames: &[Frame], path: &Path) -> Result<(), CliError> {
    write_gif(frames, path, DEFAULT_FRAME_DELAY_MS)?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let scenarios = Scenario::list_scenarios();
            let fields: Vec<&str> = FieldKind::ALL.iter().map(|k| k.identifier()).collect();
            if cli.json {
                let details: Vec<serde_json::Value> = scenarios
                    .iter()
                    .map(|name| Scenario::from_name(name).map(Scenario::describe))
                    .collect::<Result<_, _>>()?;
                let info = serde_json::json!({
                    "scenarios": details,
                    "field_types": fields,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Scenarios:");
                for name in scenarios {
                    println!("  {name}");
                }
                println!("Field types:");
                for kind in FieldKind::ALL {
                    println!("  {:<32} (alias: {})", kind.identifier(), kind.alias());
                }
            }
        }
        Command::Render {
            scenario,
            config,
            steps,
            seed,
            width,
            height,
            extent,
            out,
            gif,
            threads,
        } => {
            if let Some(n) = threads {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build_global()
                    .map_err(|e| CliError::Input(format!("invalid --threads: {e}")))?;
            }
            let (label, config) = load_config(scenario, config, seed)?;
            let spec = FrameSpec::new(width, height, extent)?;
            let summary = render(RenderJob {
                label,
                config,
                steps,
                spec,
                out,
                gif,
            })?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
