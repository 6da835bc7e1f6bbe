use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cricket_stats::CricketStats;
use cricket_stats::competition::CompetitionType;
use cricket_stats::config::Config;

const USAGE: &str = "usage: cricket_stats <players | innings | player <name> | match <type> <id>>";

fn main() -> Result<()> {
    init_tracing();
    let config = Config::from_env();
    let stats = CricketStats::new(config);

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some(command) = args.first() else {
        return Err(anyhow!(USAGE));
    };

    match command.as_str() {
        "players" => print_json(&stats.player_names()?),
        "innings" => print_json(&stats.innings_stats()?),
        "player" => {
            let name = args[1..].join(" ");
            if name.trim().is_empty() {
                return Err(anyhow!("missing player name\n{USAGE}"));
            }
            let profile = stats
                .player_profile(name.trim())
                .with_context(|| format!("player profile for {name}"))?;
            print_json(&profile)
        }
        "match" => {
            let (Some(ct), Some(id)) = (args.get(1), args.get(2)) else {
                return Err(anyhow!("missing competition type or match id\n{USAGE}"));
            };
            let ct: CompetitionType = ct.parse()?;
            let card = stats
                .scorecard(ct, id)
                .with_context(|| format!("scorecard {ct}/{id}"))?;
            print_json(&card)
        }
        other => Err(anyhow!("unknown command {other:?}\n{USAGE}")),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
