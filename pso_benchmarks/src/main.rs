use std::{
    fs,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use pso_benchmarks::prelude::*;
use ring_pso::prelude::*;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pso_benchmarks")]
#[command(about = "Minimize standard test functions with a ring-topology particle swarm", long_about = None)]
struct Cli {
    /// Functions to minimize (sphere, rastrigin, rosenbrock); all of them when omitted
    #[arg(value_name = "FUNCTION")]
    functions: Vec<Benchmark>,

    /// How to report each run
    #[arg(short, long, value_enum, default_value_t = OutputMode::Text)]
    mode: OutputMode,

    /// Stop once the norm of the per-dimension position variances drops to this value
    #[arg(short, long, default_value_t = BENCHMARK_TOLERANCE)]
    tolerance: f64,

    /// JSON file with swarm settings; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of particles in the ring
    #[arg(short = 'n', long)]
    particles: Option<usize>,

    /// Epoch cap
    #[arg(long)]
    max_epochs: Option<u64>,

    /// Seed of the swarm's random number generator
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    /// Print a summary of each run
    Text,
    /// Write the swarm state after every epoch as one JSON object per line
    Frames,
    /// Locate a template cut from a built-in synthetic scene; ignores FUNCTION and --tolerance
    Detect,
}

/// One line of `frames` output.
#[derive(Serialize)]
struct Frame<'a> {
    function: &'a str,
    #[serde(flatten)]
    snapshot: EpochSnapshot,
}

impl Cli {
    fn swarm_config(&self) -> anyhow::Result<SwarmConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing swarm config {}", path.display()))?
            }
            None => SwarmConfig::default(),
        };
        if let Some(n_particles) = self.particles {
            config = config.with_n_particles(n_particles);
        }
        if let Some(max_epochs) = self.max_epochs {
            config = config.with_max_epochs(max_epochs);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

fn run_text(benchmark: Benchmark, tolerance: f64, config: SwarmConfig) -> anyhow::Result<()> {
    let info = benchmark.info();
    let mut swarm = Swarm::with_config(&info.bounds, &benchmark, tolerance, config)?;

    println!("\n{} function", capitalize(info.name));
    let report = swarm.minimize()?;
    println!("{report}");
    println!(
        "Known minimum: {:.6e} at {:?}",
        info.min_value, info.min_point
    );
    Ok(())
}

fn run_frames(
    benchmark: Benchmark,
    tolerance: f64,
    config: SwarmConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let info = benchmark.info();
    let mut swarm = Swarm::with_config(&info.bounds, &benchmark, tolerance, config)?;

    for snapshot in swarm.epochs() {
        let frame = Frame {
            function: info.name,
            snapshot: snapshot?,
        };
        serde_json::to_writer(&mut *out, &frame)?;
        writeln!(out)?;
    }
    Ok(())
}

fn run_detect(config: SwarmConfig) -> anyhow::Result<()> {
    let (row, col, rows, cols) = (12, 28, 10, 12);
    let target = synthetic_scene(40, 60, (17.0, 34.0));
    println!(
        "\nSynthetic scene ({}x{}), model {}x{} cut at x={}, y={}",
        target.ncols(),
        target.nrows(),
        cols,
        rows,
        col,
        row
    );

    let problem = TemplateMatch::from_window(target, row, col, rows, cols)?;
    let report = detect(&problem, config)?;
    println!("{report}");
    println!(
        "Model located at x={}, y={}",
        report.minimum.position[0].floor(),
        report.minimum.position[1].floor()
    );
    Ok(())
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.swarm_config()?;
    let functions = if cli.functions.is_empty() {
        Benchmark::ALL.to_vec()
    } else {
        cli.functions.clone()
    };
    info!(?functions, mode = ?cli.mode, ?config, "starting benchmark runs");

    match cli.mode {
        OutputMode::Text => {
            for benchmark in functions {
                run_text(benchmark, cli.tolerance, config.clone())?;
            }
            println!();
        }
        OutputMode::Frames => {
            let mut out = BufWriter::new(io::stdout().lock());
            for benchmark in functions {
                run_frames(benchmark, cli.tolerance, config.clone(), &mut out)?;
            }
            out.flush()?;
        }
        OutputMode::Detect => {
            run_detect(config)?;
            println!();
        }
    }

    Ok(())
}
