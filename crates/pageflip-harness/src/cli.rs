use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use pageflip_core::{FlipConfig, Orientation};

use crate::error::{HarnessError, Result};
use crate::replay::replay;
use crate::trace::{read_trace, read_trace_from};

#[derive(Debug, Parser)]
#[command(
    name = "pageflip-harness",
    about = "Replay pointer traces against the pageflip controller",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSONL trace and print one JSON snapshot per input.
    Replay(ReplayArgs),

    /// Print the default configuration as JSON.
    #[command(name = "print-config")]
    PrintConfig(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// TOML or JSON config file (chosen by extension).
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub orientation: Option<Orientation>,

    #[arg(long = "start-page")]
    pub start_page: Option<usize>,

    #[arg(long = "loop-forever")]
    pub loop_forever: bool,

    #[arg(long = "flip-on-leave")]
    pub flip_on_leave: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Trace file, or `-` for stdin.
    pub trace: PathBuf,

    #[arg(long, default_value_t = 3)]
    pub pages: usize,

    /// Print a summary line after the snapshots.
    #[arg(long)]
    pub summary: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ConfigArgs {
    /// Load the config file, if any, then apply command-line overrides.
    pub fn resolve(&self) -> Result<FlipConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => FlipConfig::default(),
        };
        if let Some(orientation) = self.orientation {
            config = config.with_orientation(orientation);
        }
        if let Some(start) = self.start_page {
            config = config.with_start_page(start);
        }
        if self.loop_forever {
            config = config.with_loop_forever(true);
        }
        if self.flip_on_leave {
            config = config.with_flip_on_leave(true);
        }
        config.validate()?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<FlipConfig> {
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => FlipConfig::from_json_file(path)?,
        Some("toml") => FlipConfig::from_toml_file(path)?,
        _ => {
            return Err(HarnessError::invalid(format!(
                "config file must end in .toml or .json: {}",
                path.display()
            )));
        }
    };
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli, &mut io::stdout().lock())
}

pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => run_replay(&args, out),
        Commands::PrintConfig(args) => {
            let config = args.resolve()?;
            writeln!(out, "{}", config.to_json_string()?)?;
            Ok(())
        }
    }
}

fn run_replay(args: &ReplayArgs, out: &mut impl Write) -> Result<()> {
    let config = args.config.resolve()?;
    let records = if args.trace.as_os_str() == "-" {
        read_trace_from(io::stdin().lock())?
    } else {
        read_trace(&args.trace)?
    };
    let summary = replay(config, args.pages, &records, out)?;
    if args.summary {
        serde_json::to_writer(&mut *out, &summary)?;
        writeln!(out)?;
    }
    Ok(())
}
