use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::competition::{CompetitionType, Gender};
use crate::error::Result;
use crate::locks::KeyedLocks;
use crate::matches::MatchStore;
use crate::scorecard::MatchScorecard;
use crate::store::JsonStore;

pub const REGISTRY_FILE: &str = "all_players.json";

/// Distinct names in first-encounter order.
#[derive(Debug, Default)]
pub struct NameSet {
    seen: HashSet<String>,
    names: Vec<String>,
}

impl NameSet {
    pub fn insert(&mut self, name: &str) {
        if name.is_empty() || self.seen.contains(name) {
            return;
        }
        self.seen.insert(name.to_string());
        self.names.push(name.to_string());
    }

    pub fn absorb(&mut self, card: &MatchScorecard) {
        for innings in &card.innings {
            for batsman in &innings.batsmen {
                self.insert(&batsman.name);
            }
            for bowler in &innings.bowlers {
                self.insert(&bowler.name);
            }
        }
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// Every partition of every gender, so the registry spans the whole corpus.
pub fn registry_partitions() -> Vec<CompetitionType> {
    [Gender::Male, Gender::Female]
        .into_iter()
        .flat_map(CompetitionType::all_for)
        .collect()
}

pub fn collect_player_names(matches: &MatchStore) -> Result<Vec<String>> {
    let mut names = NameSet::default();
    for ct in registry_partitions() {
        matches.for_each_match(ct, |card| names.absorb(card))?;
    }
    Ok(names.into_names())
}

pub struct PlayerRegistry {
    store: JsonStore,
    lock: KeyedLocks,
}

impl PlayerRegistry {
    pub fn new(store: JsonStore) -> Self {
        Self {
            store,
            lock: KeyedLocks::new(),
        }
    }

    pub fn get_or_build(&self, matches: &MatchStore) -> Result<Vec<String>> {
        let rel = Path::new(REGISTRY_FILE);
        self.lock.with(REGISTRY_FILE, || {
            if let Some(names) = self.store.get_plain::<Vec<String>>(rel)? {
                return Ok(names);
            }
            let started = Instant::now();
            let names = collect_player_names(matches)?;
            let path = self.store.put(rel, &names)?;
            info!(
                players = names.len(),
                path = %path.display(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "built player registry"
            );
            Ok(names)
        })
    }

    /// Drops the persisted list so the next lookup rebuilds it.
    pub fn invalidate(&self) -> Result<bool> {
        self.store.remove(Path::new(REGISTRY_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_set_keeps_first_encounter_order() {
        let mut set = NameSet::default();
        for name in ["B1", "P1", "B1", "", "P2", "P1"] {
            set.insert(name);
        }
        assert_eq!(set.into_names(), vec!["B1", "P1", "P2"]);
    }

    #[test]
    fn partitions_cover_both_genders() {
        let parts = registry_partitions();
        assert_eq!(parts.len(), 8);
        assert_eq!(parts[0].key(), "tests_male");
        assert_eq!(parts[7].key(), "ipl_female");
    }
}
