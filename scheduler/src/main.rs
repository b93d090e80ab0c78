use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scheduler::domain::entities::{day_span, PrescheduleBinding};
use scheduler::infrastructure::config::Settings;
use scheduler::infrastructure::io;
use scheduler::presentation;
use scheduler::solver::{self, ModelInput};

/// Builds the monthly surgery roster from the joined worker records, the
/// preschedule and the run configuration.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Pre-joined worker records (JSON)
    workers: PathBuf,
    /// Preschedule entries (JSON)
    preschedule: PathBuf,
    /// Run configuration (JSON)
    config: PathBuf,
    /// Output path for the schedule table
    #[arg(long, default_value = "schedule.csv")]
    schedule_out: PathBuf,
    /// Output path for the statistics table
    #[arg(long, default_value = "stats.csv")]
    stats_out: PathBuf,
    /// Worker-order permutation seed; random when omitted. Different
    /// permutations explore different optima of the same objective.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scheduler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let settings = Settings::load(&args.config).context("loading configuration")?;
    let days = day_span(settings.start_date, settings.end_date)?;
    if let (Some(first), Some(last)) = (days.first(), days.last()) {
        tracing::info!(from = %first, to = %last, "generating the roster");
    }

    let mut workers = io::load_workers(&args.workers, days.len())?;
    let preschedule = io::load_preschedule(&args.preschedule)?;

    // The optimum is heavily degenerate; the worker order decides which of
    // the equally good schedules comes out.
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(seed, workers = workers.len(), "permuting the worker order");
    workers.shuffle(&mut StdRng::seed_from_u64(seed));

    let binding = PrescheduleBinding::resolve(&preschedule, &workers, &days)?;
    let report = solver::precheck::run(&workers, &days, &binding, &settings)?;
    if !report.warnings.is_empty() {
        tracing::warn!(
            warnings = report.warnings.len(),
            "feasibility concerns found; the solver has the final word"
        );
    }

    let input = ModelInput {
        workers: &workers,
        days: &days,
        binding: &binding,
        settings: &settings,
    };
    let model = solver::build(&input)?;
    let outcome = solver::solve(model, &input)?;

    let schedule = presentation::schedule_table(&days, &workers, &binding, &outcome.roster);
    presentation::write_table(&args.schedule_out, &schedule)
        .with_context(|| format!("writing {}", args.schedule_out.display()))?;
    let stats = presentation::stats_table(&workers, &outcome.roster);
    presentation::write_table(&args.stats_out, &stats)
        .with_context(|| format!("writing {}", args.stats_out.display()))?;

    presentation::log_summary(&workers, &outcome);

    Ok(())
}
