use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Cirrus ensemble convection analysis.
#[derive(Parser)]
#[command(
    name = "cirrus",
    version,
    about = "Cloud objects, radial distribution functions and coarse-grained ensemble statistics"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the ensemble statistics sweep and write the result file.
    Compute(ComputeArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(clap::Args)]
pub struct ComputeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "cirrus.toml")]
    pub config: PathBuf,

    /// Override output NetCDF path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override first initialisation date (YYYYMMDDHH).
    #[arg(long = "date-start")]
    pub date_start: Option<String>,

    /// Override last initialisation date (YYYYMMDDHH).
    #[arg(long = "date-end")]
    pub date_end: Option<String>,
}
