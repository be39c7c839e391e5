// ABOUTME: Entry point for the kubeform CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use kubeform::config::{self, Config};
use kubeform::error::Result;
use kubeform::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init {
            services,
            registry,
            force,
        } => {
            config::init_config(&cwd, &services, registry.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Verify => {
            let config = load_config(&cwd, cli.stack.as_deref())?;
            commands::verify(config, output)
        }
        Commands::Up { dry_run, exports } => {
            let config = load_config(&cwd, cli.stack.as_deref())?;
            commands::up(config, dry_run, exports.as_deref(), output.clone()).await
        }
        Commands::Status => {
            let config = load_config(&cwd, cli.stack.as_deref())?;
            commands::status(&config, output)
        }
    }
}

fn load_config(dir: &std::path::Path, stack: Option<&str>) -> Result<Config> {
    let config = Config::discover(dir)?;
    match stack {
        Some(name) => config.for_stack(name),
        None => Ok(config),
    }
}
