//! The three queries an HTTP layer serves, plus single-scorecard lookup.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::competition::{CompetitionType, Gender, PerCompetition};
use crate::config::Config;
use crate::error::{Result, StatsError};
use crate::innings::{InningsStats, innings_stats};
use crate::matches::MatchStore;
use crate::profile::{PlayerProfile, ProfileStore};
use crate::registry::PlayerRegistry;
use crate::scorecard::MatchScorecard;
use crate::source::{DatasetDir, MatchSource};
use crate::store::JsonStore;

pub struct CricketStats {
    config: Config,
    matches: MatchStore,
    profiles: ProfileStore,
    registry: PlayerRegistry,
    names: OnceCell<Vec<String>>,
}

impl CricketStats {
    pub fn new(config: Config) -> Self {
        let source = Arc::new(DatasetDir::new(config.dataset_dir.clone()));
        Self::with_source(config, source)
    }

    pub fn with_source(config: Config, source: Arc<dyn MatchSource>) -> Self {
        let store = JsonStore::new(config.processed_dir.clone());
        Self {
            matches: MatchStore::new(source, store.clone(), config.walk_policy),
            profiles: ProfileStore::new(store.clone()),
            registry: PlayerRegistry::new(store),
            names: OnceCell::new(),
            config,
        }
    }

    pub fn matches(&self) -> &MatchStore {
        &self.matches
    }

    pub fn player_names(&self) -> Result<&[String]> {
        self.names
            .get_or_try_init(|| self.registry.get_or_build(&self.matches))
            .map(Vec::as_slice)
    }

    /// Rebuilds the name list from the corpus, e.g. after new matches were added.
    pub fn refresh_player_names(&mut self) -> Result<&[String]> {
        self.registry.invalidate()?;
        self.names.take();
        self.player_names()
    }

    pub fn player_profile(&self, name: &str) -> Result<PlayerProfile> {
        self.player_profile_for(name, self.config.gender)
    }

    /// Fails with `NotFound` when the name never appears in the corpus.
    ///
    /// Profiles of both genders share `players/<name>.json`, so alternating
    /// genders for one name rebuilds the profile (a walk over four partitions)
    /// on every switch.
    pub fn player_profile_for(&self, name: &str, gender: Gender) -> Result<PlayerProfile> {
        if let Some(profile) = self.profiles.load(name, gender)? {
            return Ok(profile);
        }
        if !self.player_names()?.iter().any(|n| n == name) {
            return Err(StatsError::NotFound(format!("player {name}")));
        }
        self.profiles.get_or_build(&self.matches, name, gender)
    }

    pub fn innings_stats(&self) -> Result<PerCompetition<Vec<InningsStats>>> {
        innings_stats(&self.matches, self.config.gender)
    }

    pub fn scorecard(&self, ct: CompetitionType, match_id: &str) -> Result<MatchScorecard> {
        self.matches.get_or_build(ct, match_id)
    }
}
