//! Folio CLI
//!
//! Run headless portfolio page sessions and inspect configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_app::{Page, PageConfig, PageSnapshot};
use folio_motion::MemorySink;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless portfolio page animation runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted page session and print the resulting state
    Simulate {
        /// Config file (defaults to ./folio.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Scroll to this offset after loading; repeat to script a path
        #[arg(long = "scroll", allow_negative_numbers = true)]
        scroll: Vec<f32>,

        /// Seconds to run before the first scroll
        #[arg(short, long, default_value = "6.0")]
        seconds: f32,

        /// Seconds to settle after each scroll
        #[arg(long, default_value = "1.5")]
        settle: f32,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Config file (defaults to ./folio.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            scroll,
            seconds,
            settle,
            json,
        } => cmd_simulate(config.as_deref(), &scroll, seconds, settle, json),

        Commands::Config { config } => cmd_config(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<PageConfig> {
    let config = match path {
        Some(path) => PageConfig::load(path),
        None => PageConfig::load_from_dir(Path::new(".")),
    };
    config.context("Failed to load configuration")
}

fn cmd_simulate(
    config: Option<&Path>,
    scroll: &[f32],
    seconds: f32,
    settle: f32,
    json: bool,
) -> Result<()> {
    let config = load_config(config)?;
    let sink = Rc::new(MemorySink::new());
    let mut page = Page::new(config)?.with_sink(sink.clone());

    page.mount()?;
    info!("Simulating {:.1}s of page load", seconds);
    page.advance(seconds)?;

    for &y in scroll {
        let applied = page.scroll_to(y);
        info!("Scrolled to {}", applied);
        page.advance(settle)?;
    }

    let snapshot = page.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_summary(&snapshot);
    }

    let leaked = page.navigate_away();
    if leaked > 0 {
        anyhow::bail!("{} scroll observers leaked past teardown", leaked);
    }
    Ok(())
}

fn print_summary(snapshot: &PageSnapshot) {
    println!(
        "t={:.2}s frames={} scroll_y={} loading={}%{}",
        snapshot.elapsed,
        snapshot.frames,
        snapshot.scroll_y,
        snapshot.loading_percent,
        if snapshot.loading_complete { " (done)" } else { "" }
    );
    println!(
        "timelines: {} ({} active)  listeners: {}  scroll observers: {}",
        snapshot.timelines, snapshot.active_timelines, snapshot.listeners, snapshot.scroll_observers
    );
    for region in &snapshot.regions {
        if !region.mounted {
            println!("  {:<12} unmounted", region.name);
            continue;
        }
        println!(
            "  {:<12} {} elements, {} resources",
            region.name,
            region.elements.len(),
            region.resources
        );
        for element in region.elements.iter().filter(|e| !e.visual.is_empty()) {
            let props: Vec<String> = element
                .visual
                .iter()
                .map(|(name, value)| format!("{}={:.2}", name, value))
                .collect();
            println!("    {:<24} {}", element.label, props.join(" "));
        }
    }
}

fn cmd_config(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
