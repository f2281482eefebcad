//! Maintlytics - Activity Pattern Analytics Tool
//!
//! A CLI tool for tracking user activity patterns and predicting optimal
//! maintenance windows. Records timestamped action events into a bounded
//! local log and recommends low-activity time spans for taking a system
//! offline.

// Module declarations
mod clock;
mod config;
mod display;
mod error;
mod export;
mod heatmap;
mod helpers;
mod models;
mod recommender;
mod storage;
mod tracker;

// Core dependencies
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Config, OutputFormat};
use display::{
    display_heatmap, display_heatmap_json, display_logs_json, display_logs_table,
    display_metrics_enhanced, display_metrics_json, display_metrics_table,
    display_windows_enhanced, display_windows_json, display_windows_table, print_error,
    print_info, print_warning,
};
use export::{export_logs_to_csv, export_patterns_to_csv};
use serde_json::{Map, Value};
use std::path::PathBuf;
use storage::FileStore;
use tracker::ActivityTracker;

#[derive(Parser)]
#[command(name = "maintlytics")]
#[command(about = "Activity pattern analytics - track user actions and predict maintenance windows")]
#[command(version)]
#[command(
    long_about = "Maintlytics records user-activity events into a bounded local log, derives hourly and daily activity patterns, and recommends low-activity maintenance windows.

EXAMPLES:
  maintlytics log file_upload --user alice --meta fileName=q3.xlsx
  maintlytics windows                   # Top maintenance window recommendations
  maintlytics windows --duration 4      # Windows for a 4-hour maintenance
  maintlytics metrics --json            # Current metrics as JSON
  maintlytics heatmap                   # Hourly/daily activity heatmap
  maintlytics logs --limit 20           # Most recent events
  maintlytics export --logs -o events.csv
  maintlytics clear --yes               # Discard all tracked data

GLOBAL FLAGS:
  Global flags like --json and --classic work with any report command:
  maintlytics --json windows            # Recommendations as JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Output reports as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Output reports as classic ASCII tables
    #[arg(long, global = true)]
    classic: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record an activity event
    Log {
        /// Action category (e.g. file_upload, login, chart_generation)
        action: String,
        /// User identifier (defaults to anonymous)
        #[arg(short, long)]
        user: Option<String>,
        /// Metadata entries as key=value pairs
        #[arg(short, long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
    },
    /// Show the retained activity log
    Logs {
        /// Only show the most recent N events
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show current activity metrics
    Metrics,
    /// Recommend low-activity maintenance windows
    Windows {
        /// Maintenance duration in hours (1-24)
        #[arg(short, long)]
        duration: Option<u32>,
    },
    /// Show the hourly/daily activity heatmap
    Heatmap,
    /// Export tracked data to CSV
    Export {
        /// Export the raw event log
        #[arg(long)]
        logs: bool,
        /// Export the hourly/daily patterns
        #[arg(long)]
        patterns: bool,
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show or modify configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the data directory
        #[arg(long, value_name = "PATH")]
        set_data_dir: Option<PathBuf>,
        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
    /// Discard the persisted log and metrics
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        print_warning(&format!("failed to load config, using defaults: {}", e));
        Config::default()
    });

    let format = resolve_output_format(&config, cli.json, cli.classic);

    let data_dir = config
        .resolved_data_dir()
        .context("could not resolve data directory")?;
    let mut tracker = ActivityTracker::new(FileStore::new(data_dir));

    match cli.command {
        Some(Commands::Log { action, user, meta }) => {
            let metadata = parse_metadata(&meta)?;
            match tracker.log_activity(&action, user.as_deref(), metadata) {
                Some(event) => print_info(&format!("recorded '{}' ({})", event.action, event.id)),
                None => print_warning("activity was not recorded; storage is unavailable"),
            }
        }
        Some(Commands::Logs { limit }) => {
            let mut events = tracker.activity_logs();
            if let Some(limit) = limit {
                let skip = events.len().saturating_sub(limit);
                events.drain(..skip);
            }
            match format {
                OutputFormat::Json => display_logs_json(&events),
                _ => display_logs_table(&events, &config.date_format),
            }
        }
        Some(Commands::Metrics) => match tracker.metrics() {
            Some(metrics) => match format {
                OutputFormat::Json => display_metrics_json(&metrics),
                OutputFormat::Table => display_metrics_table(&metrics, &config.date_format),
                OutputFormat::Enhanced => display_metrics_enhanced(&metrics, &config.date_format),
            },
            None => print_info("no activity recorded yet"),
        },
        Some(Commands::Windows { duration }) => {
            let duration = duration.unwrap_or(config.default_window_hours);
            run_windows(&tracker, duration, &format)?;
        }
        None => {
            run_windows(&tracker, config.default_window_hours, &format)?;
        }
        Some(Commands::Heatmap) => match tracker.heatmap_data() {
            Some(heatmap) => match format {
                OutputFormat::Json => display_heatmap_json(&heatmap),
                _ => display_heatmap(&heatmap),
            },
            None => print_info("no activity recorded yet"),
        },
        Some(Commands::Export {
            logs,
            patterns,
            output,
        }) => {
            if logs == patterns {
                anyhow::bail!("specify exactly one of --logs or --patterns");
            }
            if logs {
                let events = tracker.activity_logs();
                export_logs_to_csv(&events, &output)
                    .with_context(|| format!("failed to export logs to {}", output.display()))?;
                print_info(&format!(
                    "exported {} events to {}",
                    events.len(),
                    output.display()
                ));
            } else {
                match tracker.metrics() {
                    Some(metrics) => {
                        export_patterns_to_csv(&metrics, &output).with_context(|| {
                            format!("failed to export patterns to {}", output.display())
                        })?;
                        print_info(&format!("exported patterns to {}", output.display()));
                    }
                    None => print_info("no activity recorded yet; nothing to export"),
                }
            }
        }
        Some(Commands::Config {
            show,
            set_data_dir,
            reset,
        }) => {
            let mut config = config;
            let changed = reset || set_data_dir.is_some();
            if reset {
                config.reset();
                config.save().context("failed to save config")?;
                print_info("configuration reset to defaults");
            }
            if let Some(dir) = set_data_dir {
                config.set_data_dir(dir);
                config.save().context("failed to save config")?;
                print_info("data directory updated");
            }
            if show || !changed {
                println!("{}", serde_yaml::to_string(&config)?);
            }
        }
        Some(Commands::Clear { yes }) => {
            if !yes {
                print_info("this discards the activity log and metrics; re-run with --yes to confirm");
            } else {
                tracker.clear_data();
                print_info("activity data cleared");
            }
        }
    }

    Ok(())
}

fn run_windows<S: storage::ActivityStore, C: clock::Clock>(
    tracker: &ActivityTracker<S, C>,
    duration: u32,
    format: &OutputFormat,
) -> Result<()> {
    match tracker.predict_optimal_windows(duration) {
        Ok(windows) => {
            match format {
                OutputFormat::Json => display_windows_json(&windows),
                OutputFormat::Table => display_windows_table(&windows),
                OutputFormat::Enhanced => display_windows_enhanced(&windows),
            }
            Ok(())
        }
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// CLI flags take precedence over the configured default format
fn resolve_output_format(config: &Config, json: bool, classic: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if classic {
        OutputFormat::Table
    } else {
        config.default_output_format.clone()
    }
}

/// Parse `key=value` pairs into a JSON metadata object
///
/// Values that parse as JSON scalars (numbers, booleans) are stored typed;
/// everything else is stored as a string.
fn parse_metadata(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut metadata = Map::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("invalid metadata entry '{}' (expected KEY=VALUE)", pair))?;
        let value = match serde_json::from_str::<Value>(value) {
            Ok(v @ (Value::Number(_) | Value::Bool(_))) => v,
            _ => Value::from(value),
        };
        metadata.insert(key.to_string(), value);
    }
    Ok(metadata)
}
