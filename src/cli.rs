// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kubeform")]
#[command(about = "Provision a Kubernetes cluster and deploy per-service manifests to it")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Stack overrides to apply (defined in config)
    #[arg(short, long, global = true)]
    pub stack: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new kubeform.yml configuration file
    Init {
        /// Service to include (repeatable)
        #[arg(long = "service")]
        services: Vec<String>,

        /// Container registry to push built images to
        #[arg(long)]
        registry: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Check which services have manifests
    Verify,

    /// Provision, build, transform and deploy
    Up {
        /// Render units to disk instead of applying them
        #[arg(long)]
        dry_run: bool,

        /// Write exported values to this JSON file
        #[arg(long, value_name = "FILE")]
        exports: Option<PathBuf>,
    },

    /// Show the resolved configuration
    Status,
}
