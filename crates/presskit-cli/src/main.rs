//! Presskit CLI - replay pointer traces and inspect gesture configuration.

#![allow(
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

mod trace;

use clap::{Parser, Subcommand};
use presskit_core::{ConfigError, GestureConfiguration};
use std::path::{Path, PathBuf};
use thiserror::Error;
use trace::{Trace, TraceError};

#[derive(Parser)]
#[command(name = "presskit")]
#[command(about = "Press gesture state machine toolkit")]
#[command(version)]
struct Cli {
    /// Log state machine transitions (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded pointer trace and print the emitted gesture events
    Replay {
        /// Path to trace file (YAML or JSON)
        trace: PathBuf,

        /// Gesture configuration file (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the effective gesture configuration
    Config {
        /// Gesture configuration file (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (yaml, toml)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Check a gesture configuration file
    Check {
        /// Path to configuration file
        #[arg(default_value = "presskit.yaml")]
        config: PathBuf,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to load trace: {0}")]
    Trace(#[from] TraceError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown output format {0:?}")]
    UnknownFormat(String),
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Replay {
            trace,
            config,
            format,
        } => replay(&trace, config.as_deref(), &format),
        Commands::Config { config, format } => print_config(config.as_deref(), &format),
        Commands::Check { config } => check_config(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<GestureConfiguration, ConfigError> {
    path.map_or_else(|| Ok(GestureConfiguration::default()), GestureConfiguration::load)
}

fn replay(trace_path: &Path, config: Option<&Path>, format: &str) -> Result<(), CliError> {
    let config = load_config(config)?;
    let trace = Trace::load(trace_path)?;
    let emitted = trace::replay(&trace, config);

    match format {
        "text" => {
            for e in &emitted {
                println!("{:>8.3}s  {}", e.time.as_secs_f64(), e.event);
            }
        }
        "json" => println!("{}", serde_json::to_string_pretty(&emitted)?),
        other => return Err(CliError::UnknownFormat(other.to_string())),
    }
    Ok(())
}

fn print_config(config: Option<&Path>, format: &str) -> Result<(), CliError> {
    let config = load_config(config)?;
    let rendered = match format {
        "yaml" => config.to_yaml_string()?,
        "toml" => config.to_toml_string()?,
        other => return Err(CliError::UnknownFormat(other.to_string())),
    };
    print!("{}", rendered);
    Ok(())
}

fn check_config(path: &Path) -> Result<(), CliError> {
    let config = GestureConfiguration::load(path)?;
    println!("Configuration OK: {}", path.display());
    println!("  Long press: {:.3}s", config.long_press_delay.as_secs_f64());
    println!("  Double tap window: {:.3}s", config.double_tap_window.as_secs_f64());
    println!(
        "  Repeat: after {:.3}s, every {:.3}s",
        config.repeat_start_delay.as_secs_f64(),
        config.repeat_interval.as_secs_f64()
    );
    match config.cancel_delay {
        Some(delay) => println!("  Stuck cancel: after {:.3}s", delay.as_secs_f64()),
        None => println!("  Stuck cancel: disabled"),
    }
    if config.long_press_max_drag_distance.is_finite() {
        println!(
            "  Long press max drag: {:.1}",
            config.long_press_max_drag_distance
        );
    }
    Ok(())
}
