//! CLI entrypoint for conclave
//!
//! A thin consumer of decision records: it loads configuration, replays
//! collected ballot sets through the voting aggregation, and inspects
//! configuration. Live participant wiring is an integration concern and
//! deliberately not part of this binary.

mod replay;
mod report;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use conclave_domain::{Domain, ThresholdPolicy};
use conclave_infrastructure::ConfigLoader;
use report::{ConsoleReport, OutputFormat};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conclave", version, about)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore every configuration file and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Re-run the voting aggregation over a collected ballot file
    Replay {
        /// JSON ballot file (see `replay` module docs for the format)
        #[arg(long)]
        ballots: PathBuf,

        /// The question the ballots answered
        #[arg(long, default_value = "replayed decision")]
        question: String,

        /// Domain tag of the question
        #[arg(long, default_value = "general")]
        domain: String,

        /// Threshold policy; defaults to the configured one
        #[arg(long)]
        policy: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "full")]
        output: OutputFormat,
    },

    /// Show configuration sources and validation issues
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    match cli.command {
        Command::Replay {
            ballots,
            question,
            domain,
            policy,
            output,
        } => {
            let domain: Domain = domain.parse()?;
            let policy: ThresholdPolicy = match policy {
                Some(s) => s
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?,
                None => config.voting.parse_policy(),
            };

            info!(
                "Replaying {} against a roster of {}",
                ballots.display(),
                config.roster.participants.len()
            );

            let roster = config.to_roster();
            let record = replay::replay(&question, domain, policy, &roster, &ballots)?;

            let rendered = match output {
                OutputFormat::Full => ConsoleReport::format(&record),
                OutputFormat::Json => ConsoleReport::format_json(&record),
            };
            println!("{}", rendered);
        }

        Command::Config => {
            ConfigLoader::print_config_sources();

            let issues = config.validate();
            if issues.is_empty() {
                println!("\nConfiguration is valid.");
            } else {
                println!("\n{} issue(s) found:", issues.len());
                for issue in &issues {
                    let tag = if issue.is_error() { "ERROR" } else { "WARN " };
                    println!("  [{}] {}", tag, issue.message);
                }
                if issues.iter().any(|i| i.is_error()) {
                    bail!("configuration has errors");
                }
            }
        }
    }

    Ok(())
}
