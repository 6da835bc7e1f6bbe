use serde::{Deserialize, Serialize};

use crate::competition::{Competition, CompetitionType, Gender, PerCompetition};
use crate::error::{Result, StatsError};
use crate::matches::MatchStore;
use crate::scorecard::InningsScorecard;

/// One team innings, flattened for distribution charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningsStats {
    pub runs: u32,
    pub wickets: Option<u32>,
    pub overs: f64,
    pub balls: u32,
    pub centuries: u32,
    pub fifers: u32,
    pub highest_score: u32,
    // `None` when nobody batted.
    pub lowest_score: Option<u32>,
    pub max_wickets: u32,
    // `None` when nobody bowled.
    pub min_wickets: Option<u32>,
    pub total_extras: u32,
    pub total_boundaries: u32,
    // `None` when no overs were bowled.
    pub runs_per_over: Option<f64>,
}

impl InningsStats {
    pub fn from_scorecard(innings: &InningsScorecard) -> Self {
        let runs_per_over = if innings.total_overs > 0.0 {
            Some(f64::from(innings.total_runs) / innings.total_overs)
        } else {
            None
        };
        Self {
            runs: innings.total_runs,
            wickets: innings.total_wickets,
            overs: innings.total_overs,
            balls: innings.total_balls,
            centuries: innings.batsmen.iter().filter(|b| b.runs >= 100).count() as u32,
            fifers: innings.bowlers.iter().filter(|b| b.wickets >= 5).count() as u32,
            highest_score: innings.batsmen.iter().map(|b| b.runs).max().unwrap_or(0),
            lowest_score: innings.batsmen.iter().map(|b| b.runs).min(),
            max_wickets: innings.bowlers.iter().map(|b| b.wickets).max().unwrap_or(0),
            min_wickets: innings.bowlers.iter().map(|b| b.wickets).min(),
            total_extras: innings.total_extras,
            total_boundaries: innings.batsmen.iter().map(|b| b.fours + b.sixes).sum(),
            runs_per_over,
        }
    }

    pub fn checked_runs_per_over(&self) -> Result<f64> {
        self.runs_per_over
            .ok_or(StatsError::UndefinedStatistic("runs per over with zero overs"))
    }
}

/// Innings rows of one partition, in walk order.
pub fn innings_for(matches: &MatchStore, ct: CompetitionType) -> Result<Vec<InningsStats>> {
    let mut rows = Vec::new();
    matches.for_each_match(ct, |card| {
        rows.extend(card.innings.iter().map(InningsStats::from_scorecard));
    })?;
    Ok(rows)
}

/// Recomputed on every call; only the underlying scorecards are cached.
pub fn innings_stats(matches: &MatchStore, gender: Gender) -> Result<PerCompetition<Vec<InningsStats>>> {
    let mut out: PerCompetition<Vec<InningsStats>> = PerCompetition::default();
    for competition in Competition::ALL {
        let rows = innings_for(matches, CompetitionType::new(competition, gender))?;
        *out.get_mut(competition) = rows;
    }
    out.all = Competition::ALL
        .iter()
        .flat_map(|c| out.get(*c).iter().cloned())
        .collect();
    Ok(out)
}
