use std::fs;
use std::path::PathBuf;

use crate::competition::CompetitionType;
use crate::error::{Result, StatsError};
use crate::raw::RawMatch;

/// Where raw match records come from.
pub trait MatchSource: Send + Sync {
    /// Match ids of a partition, in a fixed order (not match-date order).
    fn list_match_ids(&self, ct: CompetitionType) -> Result<Vec<String>>;

    fn read_match(&self, ct: CompetitionType, match_id: &str) -> Result<RawMatch>;
}

/// The unpacked dataset: `<root>/<competition>_<gender>_json/<match_id>.json`.
#[derive(Debug, Clone)]
pub struct DatasetDir {
    root: PathBuf,
}

impl DatasetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn partition_dir(&self, ct: CompetitionType) -> PathBuf {
        self.root.join(format!("{}_json", ct.key()))
    }

    pub fn match_path(&self, ct: CompetitionType, match_id: &str) -> PathBuf {
        self.partition_dir(ct).join(format!("{match_id}.json"))
    }
}

impl MatchSource for DatasetDir {
    fn list_match_ids(&self, ct: CompetitionType) -> Result<Vec<String>> {
        let dir = self.partition_dir(ct);
        let entries = fs::read_dir(&dir).map_err(|err| StatsError::io(&dir, err))?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| StatsError::io(&dir, err))?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        // read_dir order is platform dependent; sort so walks are reproducible.
        ids.sort();
        Ok(ids)
    }

    fn read_match(&self, ct: CompetitionType, match_id: &str) -> Result<RawMatch> {
        RawMatch::read(&self.match_path(ct, match_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::{Competition, Gender};
    use tempfile::TempDir;

    #[test]
    fn lists_only_json_files_sorted() {
        let dir = TempDir::new().unwrap();
        let ct = CompetitionType::new(Competition::Odis, Gender::Male);
        let src = DatasetDir::new(dir.path());
        let part = src.partition_dir(ct);
        fs::create_dir_all(&part).unwrap();
        for name in ["300.json", "1000.json", "README.txt", "200.json"] {
            fs::write(part.join(name), "{}").unwrap();
        }
        fs::create_dir_all(part.join("nested.json")).unwrap();

        let ids = src.list_match_ids(ct).unwrap();
        assert_eq!(ids, vec!["1000", "200", "300"]);
    }

    #[test]
    fn missing_partition_is_not_found() {
        let dir = TempDir::new().unwrap();
        let src = DatasetDir::new(dir.path());
        let ct = CompetitionType::new(Competition::Ipl, Gender::Female);
        assert!(src.list_match_ids(ct).unwrap_err().is_not_found());
        assert!(src.read_match(ct, "1").unwrap_err().is_not_found());
    }
}
