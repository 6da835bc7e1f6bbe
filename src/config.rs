use std::env;
use std::path::{Path, PathBuf};

use crate::competition::Gender;

const DEFAULT_DATASET_DIR: &str = "./datasets/cricket";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkPolicy {
    /// Stop the walk at the first match that fails to load or build.
    #[default]
    Abort,
    /// Log the failure and carry on; reported totals then exclude that match.
    Skip,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dataset_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub gender: Gender,
    pub walk_policy: WalkPolicy,
    pub warm_parallelism: usize,
}

impl Config {
    pub fn new(dataset_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset_dir: dataset_dir.into(),
            processed_dir: processed_dir.into(),
            gender: Gender::Male,
            walk_policy: WalkPolicy::Abort,
            warm_parallelism: 6,
        }
    }

    /// Reads `.env.local`/`.env` (if present) and then the `CRICKET_*` variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let dataset_dir = env::var("CRICKET_DATASET_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_DIR));
        let processed_dir = env::var("CRICKET_PROCESSED_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_processed_dir(&dataset_dir));
        let gender = env::var("CRICKET_GENDER")
            .ok()
            .and_then(|v| v.parse::<Gender>().ok())
            .unwrap_or_default();
        let walk_policy = if env_flag("CRICKET_SKIP_BAD_MATCHES") {
            WalkPolicy::Skip
        } else {
            WalkPolicy::Abort
        };
        let warm_parallelism = env::var("CRICKET_WARM_PARALLELISM")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(6)
            .clamp(1, 32);

        Self {
            dataset_dir,
            processed_dir,
            gender,
            walk_policy,
            warm_parallelism,
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_walk_policy(mut self, policy: WalkPolicy) -> Self {
        self.walk_policy = policy;
        self
    }
}

fn default_processed_dir(dataset_dir: &Path) -> PathBuf {
    dataset_dir.join("processed")
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
