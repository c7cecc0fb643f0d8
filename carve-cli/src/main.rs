use anyhow::{Context, Result};
use carve_core::{plan_day, FreeTime};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

mod config;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(name = "carve", version, about = "Carve a day's free time into goal sessions")]
struct Cli {
    /// Config file (default: ~/.carve/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one scheduling pass over a JSON day request
    Plan {
        /// Path to the day request
        #[arg(long)]
        input: PathBuf,

        /// Print the full outcome as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Show the factor breakdown of every allocation
        #[arg(long)]
        explain: bool,
    },

    /// Validate a day request and print its normalized free time
    Validate {
        #[arg(long)]
        input: PathBuf,
    },

    /// Scoring configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CARVE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Plan {
            input,
            json,
            explain,
        } => {
            let config_path = config::config_path(cli.config.as_deref())?;
            plan(&input, &config_path, json, explain)?;
        }

        Command::Validate { input } => {
            let request = state::read_day_request(&input)?;
            let pass = request
                .into_pass()
                .with_context(|| format!("validate {}", input.display()))?;
            let ft = FreeTime::normalize(pass.bounds, &pass.free, &pass.free_during_work);
            print!("{}", render::render_free_time(&ft));
            println!("\n{} goals valid", pass.goals.len());
        }

        Command::Config { command } => {
            let config_path = config::config_path(cli.config.as_deref())?;
            match command {
                ConfigCommand::Init => config::init_config(&config_path)?,
                ConfigCommand::Show => {
                    let cfg = config::load_config(&config_path)?;
                    println!("# {}", config_path.display());
                    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                }
            }
        }
    }

    Ok(())
}

fn plan(input: &Path, config_path: &Path, json: bool, explain: bool) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    debug!(config = %config_path.display(), "loaded scoring weights");

    let request = state::read_day_request(input)?;
    let outcome = plan_day(request, cfg.scoring)
        .with_context(|| format!("plan {}", input.display()))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("serialize outcome")?
        );
    } else {
        print!("{}", render::render_outcome(&outcome, explain));
    }
    Ok(())
}
