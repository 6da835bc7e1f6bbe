//! Per-match scorecard cache and the corpus walker built on it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::competition::CompetitionType;
use crate::config::WalkPolicy;
use crate::error::Result;
use crate::locks::KeyedLocks;
use crate::scorecard::{MatchScorecard, build_scorecard};
use crate::source::MatchSource;
use crate::store::{JsonStore, file_stem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub visited: usize,
    pub skipped: usize,
}

pub struct MatchStore {
    source: Arc<dyn MatchSource>,
    store: JsonStore,
    locks: KeyedLocks,
    policy: WalkPolicy,
}

impl MatchStore {
    pub fn new(source: Arc<dyn MatchSource>, store: JsonStore, policy: WalkPolicy) -> Self {
        Self {
            source,
            store,
            locks: KeyedLocks::new(),
            policy,
        }
    }

    pub fn scorecard_path(ct: CompetitionType, match_id: &str) -> PathBuf {
        PathBuf::from("matches")
            .join(ct.key())
            .join(format!("{}.json", file_stem(match_id)))
    }

    /// Cached scorecard for the match, building and persisting it on a miss.
    pub fn get_or_build(&self, ct: CompetitionType, match_id: &str) -> Result<MatchScorecard> {
        let rel = Self::scorecard_path(ct, match_id);
        let key = format!("{}/{}", ct.key(), match_id);
        self.locks.with(&key, || {
            if let Some(card) = self.store.get::<MatchScorecard>(&rel)? {
                return Ok(card);
            }
            let started = Instant::now();
            let raw = self.source.read_match(ct, match_id)?;
            let card = build_scorecard(&raw);
            let path = self.store.put(&rel, &card)?;
            debug!(
                match_id,
                competition = %ct,
                path = %path.display(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "built scorecard"
            );
            Ok(card)
        })
    }

    /// Ids of a partition; a partition that is absent from the dataset is empty.
    pub fn match_ids(&self, ct: CompetitionType) -> Result<Vec<String>> {
        match self.source.list_match_ids(ct) {
            Ok(ids) => Ok(ids),
            Err(err) if err.is_not_found() => {
                warn!(competition = %ct, "dataset partition missing, treating as empty");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Visits every scorecard of the partition, sequentially, in listing order.
    pub fn for_each_match(
        &self,
        ct: CompetitionType,
        mut visitor: impl FnMut(&MatchScorecard),
    ) -> Result<WalkSummary> {
        let started = Instant::now();
        let mut summary = WalkSummary::default();
        for match_id in self.match_ids(ct)? {
            match self.get_or_build(ct, &match_id) {
                Ok(card) => {
                    visitor(&card);
                    summary.visited += 1;
                }
                Err(err) if self.policy == WalkPolicy::Skip => {
                    warn!(match_id = %match_id, competition = %ct, error = %err, "skipping match");
                    summary.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        info!(
            competition = %ct,
            visited = summary.visited,
            skipped = summary.skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "walked partition"
        );
        Ok(summary)
    }
}
