//! Assay scenario runner.
//!
//! Seeds tracked batches of fresh fuel, then for each step splits a piece off
//! every batch, pairs the pieces up, pours them into a common blend, advances
//! the clock and ages every tracked material. Prints a JSON summary of the
//! ledger on stdout.

use std::process;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use assay_core::constants::{DEFAULT_STEP_SECONDS, U235, U238};
use assay_core::record::MemoryRecorder;
use assay_core::{CompMap, Composition, ObjId, SimTime};
use assay_material::{Context, DecayMode, Material, SimConfig};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, error, info};

/// Conserved material exchange simulation.
#[derive(Parser, Debug)]
#[command(
    name = "assay-sim",
    version,
    about = "Split, merge and decay tracked material and report the ledger"
)]
struct Args {
    /// Number of time steps to run
    #[arg(long, default_value_t = 12)]
    steps: u32,

    /// Number of seed batches
    #[arg(long, default_value_t = 4)]
    batches: usize,

    /// Mass of each seed batch in kg
    #[arg(long, default_value_t = 1_000.0)]
    batch_kg: f64,

    /// Mass split off every batch per step in kg
    #[arg(long, default_value_t = 10.0)]
    split_kg: f64,

    /// Decay mode ("manual" or "never")
    #[arg(long, default_value_t = DecayMode::Manual)]
    decay_mode: DecayMode,

    /// Seconds per time step
    #[arg(long, default_value_t = DEFAULT_STEP_SECONDS)]
    step_seconds: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Print every recorded datum as a JSON line before the summary
    #[arg(long)]
    record: bool,
}

impl Args {
    fn to_config(&self) -> SimConfig {
        SimConfig {
            step_seconds: self.step_seconds,
            decay_mode: self.decay_mode,
            log_level: self.log_level.clone(),
            ..SimConfig::default()
        }
    }
}

#[derive(Serialize, Debug)]
struct Summary {
    config: SimConfig,
    decay_engine: String,
    steps: u32,
    final_time: SimTime,
    mass_before_kg: f64,
    mass_after_kg: f64,
    live_lineages: usize,
    retired_lineages: usize,
    nodes: usize,
    events_applied: u64,
    registered: usize,
    blend_kg: f64,
    blend_u235_mass_fraction: f64,
    blend_origins: Vec<ObjId>,
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level, &args.log_format);

    info!("Assay simulator v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("simulation failed: {e:#}");
        process::exit(1);
    }
}

fn fresh_fuel() -> Result<Composition> {
    let v: CompMap = [(U235, 0.045), (U238, 0.955)].into_iter().collect();
    Composition::from_mass(v).context("building fresh fuel composition")
}

fn run(args: &Args) -> Result<()> {
    if args.batches == 0 {
        bail!("--batches must be at least 1");
    }

    let config = args.to_config();
    let recorder = Arc::new(MemoryRecorder::new());
    let mut builder = Context::builder().config(config.clone());
    if args.record {
        builder = builder.recorder(recorder.clone());
    }
    let ctx = builder.build();
    info!(
        steps = args.steps,
        batches = args.batches,
        decay = ctx.decay_calculator().name(),
        mode = %config.decay_mode,
        "starting simulation"
    );

    let fuel = fresh_fuel()?;
    let mut batches = (0..args.batches)
        .map(|_| Material::create(&ctx, args.batch_kg, fuel.clone()))
        .collect::<Result<Vec<_>, _>>()
        .context("seeding batches")?;
    let mass_before: f64 = batches.iter().map(Material::quantity).sum();
    let mut blend: Option<Material> = None;

    for step in 1..=args.steps {
        let mut pieces = batches
            .iter_mut()
            .map(|b| b.extract_qty(args.split_kg))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("step {step}: splitting batches"))?;

        for pair in pieces.chunks_mut(2) {
            if let [a, b] = pair {
                a.absorb(b)
                    .with_context(|| format!("step {step}: pairing pieces"))?;
            }
        }

        for mut piece in pieces.into_iter().filter(Material::is_tracked) {
            if let Some(blend) = blend.as_mut() {
                blend
                    .absorb(&mut piece)
                    .with_context(|| format!("step {step}: pouring into blend"))?;
            } else {
                blend = Some(piece);
            }
        }

        let now = ctx.advance(1);
        let swept = ctx
            .decay_all()
            .with_context(|| format!("step {step}: decay sweep"))?;
        debug!(step, now, swept, "step complete");
    }

    if args.record {
        for datum in recorder.drain() {
            println!("{}", serde_json::to_string(&datum)?);
        }
    }

    let blend_kg = blend.as_ref().map_or(0.0, Material::quantity);
    let mass_after = batches.iter().map(Material::quantity).sum::<f64>() + blend_kg;
    let blend_u235_mass_fraction = blend
        .as_ref()
        .and_then(|b| b.comp().mass().get(&U235).copied())
        .unwrap_or(0.0);
    let blend_origins = match blend.as_ref().and_then(Material::obj_id) {
        Some(obj) => ctx
            .with_tracker(|t| t.origins_of(obj))
            .context("querying blend origins")?
            .into_iter()
            .collect(),
        None => Vec::new(),
    };

    let (live_lineages, retired_lineages, nodes, events_applied) = ctx.with_tracker(|t| {
        (t.live_count(), t.retired_count(), t.node_count(), t.events_applied())
    });
    let summary = Summary {
        decay_engine: ctx.decay_calculator().name().to_string(),
        config,
        steps: args.steps,
        final_time: ctx.time(),
        mass_before_kg: mass_before,
        mass_after_kg: mass_after,
        live_lineages,
        retired_lineages,
        nodes,
        events_applied,
        registered: ctx.registry().len(),
        blend_kg,
        blend_u235_mass_fraction,
        blend_origins,
    };
    info!(
        mass_before = summary.mass_before_kg,
        mass_after = summary.mass_after_kg,
        nodes = summary.nodes,
        "simulation finished"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text. Logs go to stderr so stdout stays JSON.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
