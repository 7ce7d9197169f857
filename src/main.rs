use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use dfmon::config::Config;
use dfmon::notify::Pushover;
use dfmon::pipeline::{self, VolumeOutcome};
use dfmon::util::human::fmt_bytes;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dfmon", about = "cron-friendly disk free-space monitor with Pushover alerts", version)]
struct Cli {
    /// Path to the settings file (default: ~/.config/dfmon/dfmon.toml)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    config: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "dfmon", &mut io::stdout());
        return Ok(());
    }

    let settings_path = cli
        .settings
        .or_else(Config::default_path)
        .context("no settings path available; pass --settings")?;
    let config = Config::load(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;

    if cli.config {
        print_config(&config, &settings_path);
        return Ok(());
    }

    run_once(&config)
}

fn run_once(config: &Config) -> Result<()> {
    let notifier = Pushover::new(&config.pushover_token, &config.pushover_user)?;

    println!("Checking disk space on {} volume(s)…", config.volumes.len());
    let report = pipeline::run(config, &notifier, Local::now().date_naive());

    for vol in &report.volumes {
        match &vol.outcome {
            VolumeOutcome::Checked { space, below_threshold, notified, suppressed } => {
                println!(
                    "{}: {} free ({:.1}%) of {} [threshold: {}]",
                    vol.path,
                    fmt_bytes(space.avail_bytes),
                    space.free_pct(),
                    fmt_bytes(space.total_bytes),
                    fmt_bytes(vol.minimum_free_bytes),
                );
                if *notified {
                    println!("  ALERT: below threshold — notification sent");
                } else if *suppressed {
                    println!("  ALERT: below threshold — notification suppressed (daily limit reached)");
                } else if *below_threshold {
                    println!("  ALERT: below threshold — notification could not be sent");
                }
            }
            VolumeOutcome::Unreadable(err) => {
                println!("{}: skipped — {err}", vol.path);
            }
        }
    }

    println!(
        "\nCheck complete: {} volume(s) checked, {} failed.",
        report.processed(),
        report.failed()
    );

    if report.all_failed() {
        bail!("no volume could be processed");
    }
    Ok(())
}

fn print_config(config: &Config, settings_path: &Path) {
    println!("Settings: {}", settings_path.display());
    println!();
    println!("[pushover]");
    println!("  token = (configured)");
    println!("  user  = (configured)");
    println!();
    println!("[notifications]");
    match config.max_per_day {
        Some(n) => println!("  max_per_day = {n}"),
        None    => println!("  max_per_day = (unlimited)"),
    }
    println!();
    println!("[storage]");
    println!("  data_dir = {}", config.data_dir.display());
    println!();
    println!("[[volumes]]");
    for vol in &config.volumes {
        println!("  {} (minimum free: {})", vol.path, fmt_bytes(vol.minimum_free_bytes));
    }
}
