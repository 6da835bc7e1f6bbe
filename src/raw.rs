//! Raw ball-by-ball match records as they appear in the dataset.
//!
//! Every field the builder does not strictly need is optional and defaults to
//! empty or zero, so partially populated records still decode.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

pub const DEFAULT_BALLS_PER_OVER: u32 = 6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMatch {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub innings: Vec<Innings>,
}

impl RawMatch {
    pub fn from_json_str(raw: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| StatsError::parse(origin, err))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| StatsError::io(path, err))?;
        Self::from_json_str(&raw, path)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub data_version: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub revision: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub balls_per_over: Option<u32>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub match_type: Option<String>,
    #[serde(default)]
    pub match_type_number: Option<u32>,
    #[serde(default)]
    pub event: Option<Event>,
    #[serde(default)]
    pub officials: Officials,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub overs: Option<u32>,
    #[serde(default)]
    pub player_of_match: Vec<String>,
    #[serde(default)]
    pub players: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub season: Option<serde_json::Value>,
    #[serde(default)]
    pub team_type: Option<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub toss: Option<Toss>,
}

impl Info {
    pub fn balls_per_over(&self) -> u32 {
        match self.balls_per_over {
            Some(n) if n > 0 => n,
            _ => DEFAULT_BALLS_PER_OVER,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub match_number: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Officials {
    #[serde(default)]
    pub match_referees: Vec<String>,
    #[serde(default)]
    pub reserve_umpires: Vec<String>,
    #[serde(default)]
    pub tv_umpires: Vec<String>,
    #[serde(default)]
    pub umpires: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub by: Option<Margin>,
    // "tie", "no result", "draw"
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Margin {
    #[serde(default)]
    pub runs: Option<u32>,
    #[serde(default)]
    pub wickets: Option<u32>,
    #[serde(default)]
    pub innings: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Toss {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub decision: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Innings {
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub overs: Vec<Over>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Over {
    #[serde(default)]
    pub over: u32,
    #[serde(default)]
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(default)]
    pub batter: String,
    #[serde(default)]
    pub bowler: String,
    #[serde(default)]
    pub non_striker: String,
    #[serde(default)]
    pub runs: DeliveryRuns,
    #[serde(default)]
    pub extras: Option<ExtrasBreakdown>,
    #[serde(default)]
    pub wickets: Vec<Wicket>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeliveryRuns {
    #[serde(default)]
    pub batter: u32,
    #[serde(default)]
    pub extras: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExtrasBreakdown {
    #[serde(default)]
    pub wides: u32,
    #[serde(default)]
    pub noballs: u32,
    #[serde(default)]
    pub byes: u32,
    #[serde(default)]
    pub legbyes: u32,
    #[serde(default)]
    pub penalty: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wicket {
    #[serde(default)]
    pub player_out: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub fielders: Vec<Fielder>,
}

impl Wicket {
    /// Dismissals a bowler is credited with under the Laws of Cricket.
    pub fn credited_to_bowler(&self) -> bool {
        matches!(
            self.kind.trim().to_ascii_lowercase().as_str(),
            "bowled" | "caught" | "caught and bowled" | "lbw" | "stumped" | "hit wicket"
        )
    }
}

/// Fielders appear either as bare names or as `{ "name": .., "substitute": .. }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fielder {
    Name(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        substitute: bool,
    },
}

impl Fielder {
    pub fn name(&self) -> Option<&str> {
        match self {
            Fielder::Name(name) => Some(name),
            Fielder::Detailed { name, .. } => name.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_record_decodes_with_defaults() {
        let raw = r#"{"info":{},"innings":[{"team":"X"}]}"#;
        let m = RawMatch::from_json_str(raw, Path::new("sparse.json")).unwrap();
        assert_eq!(m.info.balls_per_over(), 6);
        assert_eq!(m.innings.len(), 1);
        assert!(m.innings[0].overs.is_empty());
        assert!(m.info.outcome.is_none());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = RawMatch::from_json_str("{not json", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, StatsError::Parse { .. }));
    }

    #[test]
    fn fielders_accept_both_shapes() {
        let raw = r#"{"player_out":"A","kind":"caught","fielders":["F1",{"name":"F2","substitute":true}]}"#;
        let w: Wicket = serde_json::from_str(raw).unwrap();
        let names: Vec<_> = w.fielders.iter().filter_map(|f| f.name()).collect();
        assert_eq!(names, vec!["F1", "F2"]);
        assert!(w.credited_to_bowler());
    }

    #[test]
    fn run_outs_are_not_bowler_wickets() {
        let w = Wicket {
            player_out: "A".into(),
            kind: "run out".into(),
            fielders: Vec::new(),
        };
        assert!(!w.credited_to_bowler());
        let w = Wicket {
            kind: "retired hurt".into(),
            ..w
        };
        assert!(!w.credited_to_bowler());
    }

    #[test]
    fn zero_balls_per_over_falls_back() {
        let info = Info {
            balls_per_over: Some(0),
            ..Info::default()
        };
        assert_eq!(info.balls_per_over(), DEFAULT_BALLS_PER_OVER);
    }
}
