use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use driving_world::{
    controller::{parse_action, PROMPT},
    visualizer::render,
    EnvironmentConfig, Simulator,
};

/// Drive the car interactively, one action per line.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON configuration file. Missing fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed of the episode generator, overriding the configuration.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Do not draw the world after each step.
    #[arg(long)]
    no_render: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => EnvironmentConfig::from_json_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => EnvironmentConfig::default(),
    };
    config.seed = cli.seed.or(config.seed);

    let mut simulator = Simulator::new(config).context("failed to create simulator")?;
    info!(seed = simulator.seed(), "simulator ready");

    let mut stdout = io::stdout().lock();
    if !cli.no_render {
        writeln!(stdout, "{}", render(&simulator.view()))?;
    }
    prompt(&mut stdout)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read action")?;
        match parse_action(&line) {
            Ok(action) => {
                let step = simulator.step(&action)?;
                if !cli.no_render {
                    writeln!(stdout, "{}", render(&simulator.view()))?;
                }
                writeln!(stdout, "reward: {}, done: {}", step.reward, step.done)?;
                if step.done || step.info.truncated {
                    simulator.reset();
                }
            }
            Err(error) => warn!(%error, input = %line, "skipping action"),
        }
        prompt(&mut stdout)?;
    }

    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "{PROMPT}")?;
    out.flush()
}
