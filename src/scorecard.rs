use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::raw::{Delivery, Innings, RawMatch};
use crate::store::Versioned;

/// Bump whenever the persisted scorecard shape or its derivation changes.
pub const SCORECARD_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScorecard {
    pub version: u32,
    pub winner: String,
    pub toss_winner: String,
    pub toss_decision: String,
    pub city: String,
    pub match_type: String,
    pub match_result: String,
    pub innings: Vec<InningsScorecard>,
}

impl Versioned for MatchScorecard {
    const VERSION: u32 = SCORECARD_VERSION;

    fn version(&self) -> u32 {
        self.version
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningsScorecard {
    pub team: String,
    pub batsmen: Vec<BatsmanScorecard>,
    pub bowlers: Vec<BowlerScorecard>,
    pub total_runs: u32,
    // Not derived from wicket events yet; always `None`.
    pub total_wickets: Option<u32>,
    pub total_overs: f64,
    pub total_balls: u32,
    pub total_extras: u32,
}

impl InningsScorecard {
    pub fn batsman(&self, name: &str) -> Option<&BatsmanScorecard> {
        self.batsmen.iter().find(|b| b.name == name)
    }

    pub fn bowler(&self, name: &str) -> Option<&BowlerScorecard> {
        self.bowlers.iter().find(|b| b.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatsmanScorecard {
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlerScorecard {
    pub name: String,
    pub balls: u32,
    pub overs: f64,
    // Maiden detection is not implemented; `None` means "not computed".
    pub maidens: Option<u32>,
    pub runs: u32,
    pub wickets: u32,
}

/// Cricket overs notation as a decimal: 15 balls at 6 per over is `2.3`.
pub fn overs_from_balls(balls: u32, balls_per_over: u32) -> f64 {
    let per_over = balls_per_over.max(1);
    f64::from(balls / per_over) + f64::from(balls % per_over) / 10.0
}

/// Runs per 100 balls; zero when no balls were faced.
pub fn strike_rate(runs: u32, balls: u32) -> f64 {
    if balls == 0 {
        return 0.0;
    }
    (f64::from(runs) / f64::from(balls)) * 100.0
}

pub fn build_scorecard(raw: &RawMatch) -> MatchScorecard {
    let info = &raw.info;
    let balls_per_over = info.balls_per_over();

    let innings = raw
        .innings
        .iter()
        .map(|inn| build_innings(inn, balls_per_over))
        .collect();

    let outcome = info.outcome.as_ref();
    let winner = outcome
        .and_then(|o| o.winner.clone())
        .unwrap_or_default();
    let match_result = if winner.is_empty() {
        String::new()
    } else {
        let runs = outcome
            .and_then(|o| o.by.as_ref())
            .and_then(|by| by.runs)
            .unwrap_or(0);
        format!("{winner} won by {runs} runs")
    };
    let toss = info.toss.as_ref();

    MatchScorecard {
        version: SCORECARD_VERSION,
        winner,
        toss_winner: toss.and_then(|t| t.winner.clone()).unwrap_or_default(),
        toss_decision: toss.and_then(|t| t.decision.clone()).unwrap_or_default(),
        city: info.city.clone().unwrap_or_default(),
        match_type: info.match_type.clone().unwrap_or_default(),
        match_result,
        innings,
    }
}

#[derive(Default)]
struct InningsTally {
    batsmen: Vec<BatsmanScorecard>,
    batsman_idx: HashMap<String, usize>,
    bowlers: Vec<BowlerScorecard>,
    bowler_idx: HashMap<String, usize>,
    runs: u32,
    extras: u32,
    balls: u32,
}

impl InningsTally {
    fn record(&mut self, delivery: &Delivery, balls_per_over: u32) {
        let runs = delivery.runs;
        self.runs += runs.total;
        self.extras += runs.extras;
        self.balls += 1;

        let batsman = slot(
            &mut self.batsmen,
            &mut self.batsman_idx,
            &delivery.batter,
            |name| BatsmanScorecard {
                name,
                runs: 0,
                balls: 0,
                fours: 0,
                sixes: 0,
                strike_rate: 0.0,
            },
        );
        batsman.runs += runs.batter;
        batsman.balls += 1;
        match runs.batter {
            4 => batsman.fours += 1,
            6 => batsman.sixes += 1,
            _ => {}
        }

        let bowler = slot(
            &mut self.bowlers,
            &mut self.bowler_idx,
            &delivery.bowler,
            |name| BowlerScorecard {
                name,
                balls: 0,
                overs: 0.0,
                maidens: None,
                runs: 0,
                wickets: 0,
            },
        );
        bowler.runs += runs.total;
        bowler.balls += 1;
        bowler.overs = overs_from_balls(bowler.balls, balls_per_over);
        bowler.wickets += delivery
            .wickets
            .iter()
            .filter(|w| w.credited_to_bowler())
            .count() as u32;
    }

    fn finish(mut self, team: &str, balls_per_over: u32) -> InningsScorecard {
        for batsman in &mut self.batsmen {
            batsman.strike_rate = strike_rate(batsman.runs, batsman.balls);
        }
        InningsScorecard {
            team: team.to_string(),
            batsmen: self.batsmen,
            bowlers: self.bowlers,
            total_runs: self.runs,
            total_wickets: None,
            total_overs: overs_from_balls(self.balls, balls_per_over),
            total_balls: self.balls,
            total_extras: self.extras,
        }
    }
}

fn build_innings(innings: &Innings, balls_per_over: u32) -> InningsScorecard {
    let mut tally = InningsTally::default();
    for over in &innings.overs {
        for delivery in &over.deliveries {
            tally.record(delivery, balls_per_over);
        }
    }
    tally.finish(&innings.team, balls_per_over)
}

fn slot<'a, T>(
    rows: &'a mut Vec<T>,
    index: &mut HashMap<String, usize>,
    name: &str,
    make: impl FnOnce(String) -> T,
) -> &'a mut T {
    let idx = match index.get(name) {
        Some(idx) => *idx,
        None => {
            rows.push(make(name.to_string()));
            index.insert(name.to_string(), rows.len() - 1);
            rows.len() - 1
        }
    };
    &mut rows[idx]
}
