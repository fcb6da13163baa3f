//! Typed Input Scenario Runner
//!
//! Command-line front end for the typed-input library. It loads a scenario
//! (an input asset, façade instances and a list of steps), runs it against the
//! simulated input framework and prints what client callbacks and queries saw.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

mod callbacks;
mod config;
mod events;
mod report;
mod state;

/// Typed Input - run input scenarios against typed actions
#[derive(Parser, Debug)]
#[command(name = "typed-input-cli")]
#[command(about = "Run typed input action scenarios", long_about = None)]
#[command(version)]
struct Args {
    /// Path to scenario file (scenario.toml)
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Txt)]
    format: ReportFormat,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Txt,
    Json,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Typed Input CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using typed-input library v{}", typed_input::VERSION);

    match &args.scenario {
        Some(path) => run_scenario(path, &args),
        None => {
            // No arguments - show help
            println!("Typed Input - No scenario specified");
            println!("\nQuick Start:");
            println!("  typed-input-cli --scenario scenario.toml");
            println!("  typed-input-cli --scenario scenario.toml --format json --output report.json");
            println!("\nUse --help for more options");
            Ok(())
        }
    }
}

/// Load, run and report one scenario
fn run_scenario(path: &Path, args: &Args) -> Result<()> {
    log::info!("Loading scenario from: {:?}", path);
    let scenario = config::load_scenario(path)?;
    log::debug!(
        "Scenario loaded: {} instances, {} steps",
        scenario.instances.len(),
        scenario.steps.len()
    );

    let mut runner = state::ScenarioRunner::new(&scenario)?;
    runner.run(&scenario.steps)?;

    let report = report::Report {
        asset: runner.asset_name().to_string(),
        steps: scenario.steps.len(),
        instances: runner.instance_summaries(),
        journal: runner.journal().entries(),
    };

    let rendered = match args.format {
        ReportFormat::Txt => report.to_text(),
        ReportFormat::Json => report.to_json()?,
    };

    match &args.output {
        Some(output) => {
            fs::write(output, rendered)?;
            log::info!("Report written to: {:?}", output);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
