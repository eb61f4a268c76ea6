use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use defect_metrics::config::{loader, validator, RunConfig};
use defect_metrics::metrics::ResolutionTimeMode;
use defect_metrics::{pipeline, report};

/// Exit code for a completed run whose release gate failed under --strict
const NOT_APPROVED_EXIT: u8 = 2;

/// Testing quality metrics and release exit criteria from a defect log
#[derive(Parser, Debug)]
#[command(name = "defect_metrics", version, about)]
struct Cli {
    /// Defect log: CSV with date, severity and status columns
    defects: PathBuf,

    /// Run configuration file (.json or .toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for the JSON summary and HTML dashboard
    #[arg(long)]
    out: Option<PathBuf>,

    /// Test cases executed
    #[arg(long)]
    executed: Option<u32>,

    /// Test cases planned
    #[arg(long)]
    total: Option<u32>,

    /// Defects found before production
    #[arg(long)]
    pre_prod: Option<u32>,

    /// Defects found in production
    #[arg(long)]
    prod: Option<u32>,

    /// Trend window in days
    #[arg(long)]
    window: Option<u32>,

    /// Resolution time source: auto, recorded or simulated
    #[arg(long)]
    resolution: Option<ResolutionTimeMode>,

    /// Seed for the simulated resolution time
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the HTML dashboard
    #[arg(long)]
    no_html: bool,

    /// Also append log lines to a run log in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,

    /// Exit with code 2 when the release is not approved
    #[arg(long)]
    strict: bool,
}

impl Cli {
    /// File configuration (or defaults) with command line overrides applied.
    fn resolve_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => loader::load_config_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        if let Some(executed) = self.executed {
            config.executed_cases = executed;
        }
        if let Some(total) = self.total {
            config.total_cases = total;
        }
        if let Some(pre_prod) = self.pre_prod {
            config.pre_production_defects = pre_prod;
        }
        if let Some(prod) = self.prod {
            config.production_defects = prod;
        }
        if let Some(window) = self.window {
            config.trend_window_days = window;
        }
        if let Some(mode) = self.resolution {
            config.resolution_time = mode;
        }
        if let Some(seed) = self.seed {
            config.resolution_seed = seed;
        }
        if self.no_html {
            config.html_report = false;
        }

        validator::validate_config(&config).context("Invalid run configuration")?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = cli.resolve_config()?;

    let (outcome, artifacts) = pipeline::run(&cli.defects, &config)
        .with_context(|| format!("Metrics run over {} failed", cli.defects.display()))?;

    println!("{}", report::render_console(&outcome.snapshot, &outcome.exit_criteria));
    println!("✓ JSON summary saved: {}", artifacts.summary_path.display());
    if let Some(path) = &artifacts.dashboard_path {
        println!("✓ Dashboard generated: {}", path.display());
    }
    if outcome.resolution_source.is_simulated() {
        println!("⚠ Average resolution time is simulated (no resolved dates in the log)");
    }

    if cli.strict && !outcome.exit_criteria.overall_pass {
        return Ok(ExitCode::from(NOT_APPROVED_EXIT));
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging first, so config loading is already logged
    match defect_metrics::initialize_logging(cli.verbose, cli.log_dir.as_deref()) {
        Ok(Some(path)) => log::info!("[Main] Run log: {}", path.display()),
        Ok(None) => {}
        Err(e) => eprintln!("[Main] WARNING: {}", e),
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[Main] ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
