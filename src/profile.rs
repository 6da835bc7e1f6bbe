use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::competition::{Competition, CompetitionType, Gender, PerCompetition};
use crate::error::{Result, StatsError};
use crate::locks::KeyedLocks;
use crate::matches::MatchStore;
use crate::scorecard::MatchScorecard;
use crate::store::{JsonStore, Versioned, file_stem};

pub const PROFILE_VERSION: u32 = 1;

const CENTURY: u32 = 100;
const FIFER: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub runs: Vec<u32>,
    pub centuries: u32,
    pub wickets: Vec<u32>,
    pub fifers: u32,
    // `None` while any bowling innings lacks a maiden count.
    pub maidens: Option<u32>,
    // `None` when there are no batting innings to average over.
    pub average: Option<f64>,
    pub total_runs: u32,
    pub total_wickets: u32,
}

impl PlayerStats {
    pub fn record_batting(&mut self, runs: u32) {
        self.runs.push(runs);
        if runs >= CENTURY {
            self.centuries += 1;
        }
    }

    pub fn record_bowling(&mut self, wickets: u32, maidens: Option<u32>) {
        let first = self.wickets.is_empty();
        self.wickets.push(wickets);
        if wickets >= FIFER {
            self.fifers += 1;
        }
        self.maidens = match (first, self.maidens, maidens) {
            (true, _, m) => m,
            (false, Some(a), Some(b)) => Some(a + b),
            _ => None,
        };
    }

    /// Folds every innings of `card` in which `player` batted or bowled.
    pub fn absorb(&mut self, card: &MatchScorecard, player: &str) {
        for innings in &card.innings {
            if let Some(batsman) = innings.batsman(player) {
                self.record_batting(batsman.runs);
            }
            if let Some(bowler) = innings.bowler(player) {
                self.record_bowling(bowler.wickets, bowler.maidens);
            }
        }
    }

    /// Derives totals and the average from the recorded sequences.
    pub fn finalize(&mut self) {
        self.total_runs = self.runs.iter().sum();
        self.total_wickets = self.wickets.iter().sum();
        self.average = if self.runs.is_empty() {
            None
        } else {
            Some(f64::from(self.total_runs) / self.runs.len() as f64)
        };
        if self.wickets.is_empty() {
            self.maidens = Some(0);
        }
    }

    /// Concatenation of several blocks, re-derived as one.
    pub fn merged<'a>(parts: impl IntoIterator<Item = &'a PlayerStats>) -> PlayerStats {
        let mut out = PlayerStats {
            maidens: Some(0),
            ..PlayerStats::default()
        };
        for part in parts {
            out.runs.extend_from_slice(&part.runs);
            out.wickets.extend_from_slice(&part.wickets);
            out.centuries += part.centuries;
            out.fifers += part.fifers;
            if !part.wickets.is_empty() {
                out.maidens = match (out.maidens, part.maidens) {
                    (Some(a), Some(b)) => Some(a + b),
                    _ => None,
                };
            }
        }
        out.finalize();
        out
    }

    pub fn checked_average(&self) -> Result<f64> {
        self.average
            .ok_or(StatsError::UndefinedStatistic("batting average over zero innings"))
    }

    pub fn innings_batted(&self) -> usize {
        self.runs.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub version: u32,
    pub name: String,
    pub gender: Gender,
    pub generated_at: String,
    pub stats: PerCompetition<PlayerStats>,
}

impl Versioned for PlayerProfile {
    const VERSION: u32 = PROFILE_VERSION;

    fn version(&self) -> u32 {
        self.version
    }
}

impl PlayerProfile {
    pub fn competition(&self, competition: Competition) -> &PlayerStats {
        self.stats.get(competition)
    }

    pub fn all(&self) -> &PlayerStats {
        &self.stats.all
    }
}

/// Walks every partition of `gender` and folds the player's innings.
pub fn build_profile(matches: &MatchStore, name: &str, gender: Gender) -> Result<PlayerProfile> {
    let mut stats: PerCompetition<PlayerStats> = PerCompetition::default();
    for ct in CompetitionType::all_for(gender) {
        let block = stats.get_mut(ct.competition);
        matches.for_each_match(ct, |card| block.absorb(card, name))?;
        block.finalize();
    }
    stats.all = PlayerStats::merged(Competition::ALL.iter().map(|c| stats.get(*c)));

    Ok(PlayerProfile {
        version: PROFILE_VERSION,
        name: name.to_string(),
        gender,
        generated_at: Utc::now().to_rfc3339(),
        stats,
    })
}

pub struct ProfileStore {
    store: JsonStore,
    locks: KeyedLocks,
}

impl ProfileStore {
    pub fn new(store: JsonStore) -> Self {
        Self {
            store,
            locks: KeyedLocks::new(),
        }
    }

    pub fn profile_path(name: &str) -> PathBuf {
        PathBuf::from("players").join(format!("{}.json", file_stem(name)))
    }

    pub fn load(&self, name: &str, gender: Gender) -> Result<Option<PlayerProfile>> {
        let Some(profile) = self.store.get::<PlayerProfile>(&Self::profile_path(name))? else {
            return Ok(None);
        };
        if profile.name != name || profile.gender != gender {
            warn!(
                player = name,
                cached_gender = profile.gender.as_str(),
                "cached profile belongs to another player/gender, rebuilding"
            );
            return Ok(None);
        }
        Ok(Some(profile))
    }

    pub fn get_or_build(
        &self,
        matches: &MatchStore,
        name: &str,
        gender: Gender,
    ) -> Result<PlayerProfile> {
        self.locks.with(name, || {
            if let Some(profile) = self.load(name, gender)? {
                return Ok(profile);
            }
            let started = Instant::now();
            let profile = build_profile(matches, name, gender)?;
            let path = self.store.put(&Self::profile_path(name), &profile)?;
            info!(
                player = name,
                path = %path.display(),
                innings = profile.all().innings_batted(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "built player profile"
            );
            Ok(profile)
        })
    }
}
