use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use touch_overlay::commands::replay::{replay_file, write_records, ReplayMode, ReplayOptions};
use touch_overlay::overlay::{Compatibility, Environment, OverlayConfig};

#[derive(Debug, Parser)]
#[command(name = "touch-replay")]
#[command(about = "Replay a recorded touch trace and print the indicators that would be drawn")]
struct Cli {
    /// Trace file (JSON)
    trace: PathBuf,

    /// Write frame records here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Overlay configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with indicators disabled (manual mode)
    #[arg(long, conflicts_with = "auto")]
    disabled: bool,

    /// Drive the enable flag from capture entries in the trace
    #[arg(long)]
    auto: bool,

    /// Initial capture status in automatic mode
    #[arg(long, requires = "auto")]
    captured: bool,

    /// Run as on a simulator: automatic mode always shows indicators
    #[arg(long)]
    simulator: bool,

    /// Use the compatibility shim profile
    #[arg(long)]
    shim: bool,

    /// Wait between entries according to their timestamps
    #[arg(long)]
    realtime: bool,
}

impl Cli {
    fn options(&self) -> Result<ReplayOptions> {
        let mut config = match &self.config {
            Some(path) => OverlayConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => OverlayConfig::default(),
        };
        if self.simulator {
            config.environment = Environment::Simulator;
        }
        if self.shim {
            config.compatibility = Compatibility::Shim;
        }

        let mode = if self.auto {
            ReplayMode::Automatic {
                captured: self.captured,
            }
        } else {
            ReplayMode::Manual {
                enabled: !self.disabled,
            }
        };

        Ok(ReplayOptions {
            mode,
            config,
            realtime: self.realtime,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    touch_overlay::init_tracing();

    let cli = Cli::parse();
    tracing::info!("Starting touch-replay v{}", env!("CARGO_PKG_VERSION"));

    let options = cli.options()?;
    let records = replay_file(&cli.trace, &options)
        .await
        .with_context(|| format!("failed to replay {}", cli.trace.display()))?;

    match &cli.output {
        Some(path) => write_records(path, &records)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", serde_json::to_string_pretty(&records)?),
    }

    Ok(())
}
