use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cricket_stats::CricketStats;
use cricket_stats::competition::Scope;
use cricket_stats::config::Config;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let scope = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<Scope>().context("invalid scope argument")?,
        None => Scope::All(config.gender),
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.warm_parallelism)
        .build()
        .context("failed to build warm pool")?;
    let stats = CricketStats::new(config);

    let started = Instant::now();
    let built = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    for ct in scope.competition_types() {
        let ids = stats.matches().match_ids(ct)?;
        pool.install(|| {
            ids.par_iter()
                .for_each(|id| match stats.scorecard(ct, id) {
                    Ok(_) => {
                        built.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(err) => {
                        warn!(match_id = %id, competition = %ct, error = %err, "scorecard failed");
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                });
        });
        println!("{ct}: {} matches", ids.len());
    }

    println!(
        "Warm complete: {} scorecards, {} failures in {:.1}s",
        built.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
