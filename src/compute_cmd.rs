//! Compute command: run the ensemble sweep over a NetCDF archive.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cirrus_ensemble::run_sweep;
use cirrus_io::{NetcdfFieldSource, NetcdfStore, ResultStore};

use crate::cli::ComputeArgs;
use crate::config::CirrusConfig;
use crate::convert;

/// Run the full sweep pipeline.
pub fn run(args: ComputeArgs) -> Result<()> {
    let _cmd = info_span!("compute").entered();
    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: CirrusConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    // 2. Build crate configs
    let sweep = convert::build_sweep_config(
        &config,
        args.date_start.as_deref(),
        args.date_end.as_deref(),
    )?;
    let source = NetcdfFieldSource::new(convert::build_source_config(&config.io, &config.domain))
        .context("invalid [io] section")?;

    // 3. Open output
    let output = args
        .output
        .as_ref()
        .or(config.io.output.as_ref())
        .ok_or_else(|| anyhow::anyhow!("no output path: set [io].output in config or use --output"))?;
    let mut store = NetcdfStore::create(output)
        .with_context(|| format!("failed to create output: {}", output.display()))?;
    store.set_attribute(
        "log",
        &format!(
            "cirrus {}; config {}; created {}",
            env!("CARGO_PKG_VERSION"),
            args.config.display(),
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
        ),
    )?;

    // 4. Sweep
    info!(
        root = %config.io.root.display(),
        output = %output.display(),
        kind = %sweep.kind(),
        "starting compute"
    );
    let summary = run_sweep(&sweep, &source, &mut store)
        .with_context(|| format!("sweep failed, output {}", output.display()))?;

    info!(
        steps = summary.steps,
        steps_skipped = summary.steps_skipped,
        members_used = summary.members_used,
        members_dropped = summary.members_dropped,
        path = %output.display(),
        "results written"
    );
    Ok(())
}
