use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cricket_stats::competition::{Competition, CompetitionType, Gender};
use cricket_stats::config::WalkPolicy;
use cricket_stats::error::{Result, StatsError};
use cricket_stats::innings::innings_for;
use cricket_stats::matches::{MatchStore, WalkSummary};
use cricket_stats::raw::RawMatch;
use cricket_stats::scorecard::MatchScorecard;
use cricket_stats::source::{DatasetDir, MatchSource};
use cricket_stats::store::JsonStore;
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn tests_male() -> CompetitionType {
    CompetitionType::new(Competition::Tests, Gender::Male)
}

struct CountingSource {
    inner: DatasetDir,
    reads: AtomicUsize,
}

impl CountingSource {
    fn new(root: &Path) -> Self {
        Self {
            inner: DatasetDir::new(root),
            reads: AtomicUsize::new(0),
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl MatchSource for CountingSource {
    fn list_match_ids(&self, ct: CompetitionType) -> Result<Vec<String>> {
        self.inner.list_match_ids(ct)
    }

    fn read_match(&self, ct: CompetitionType, match_id: &str) -> Result<RawMatch> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_match(ct, match_id)
    }
}

fn seed(root: &Path, ct: CompetitionType, files: &[(&str, String)]) {
    let dir = DatasetDir::new(root).partition_dir(ct);
    fs::create_dir_all(&dir).unwrap();
    for (id, body) in files {
        fs::write(dir.join(format!("{id}.json")), body).unwrap();
    }
}

fn store_over(source: Arc<dyn MatchSource>, processed: &Path, policy: WalkPolicy) -> MatchStore {
    MatchStore::new(source, JsonStore::new(processed), policy)
}

#[test]
fn second_lookup_is_served_from_cache() {
    let data = TempDir::new().unwrap();
    let processed = TempDir::new().unwrap();
    seed(data.path(), tests_male(), &[("1001", fixture("t20_sample.json"))]);

    let source = Arc::new(CountingSource::new(data.path()));
    let store = store_over(source.clone(), processed.path(), WalkPolicy::Abort);

    let first = store.get_or_build(tests_male(), "1001").unwrap();
    assert_eq!(source.reads(), 1);
    let cached = processed.path().join("matches/tests_male/1001.json");
    assert!(cached.exists());
    let bytes_after_first = fs::read(&cached).unwrap();

    let second = store.get_or_build(tests_male(), "1001").unwrap();
    assert_eq!(source.reads(), 1, "cache hit must not touch the raw file");
    assert_eq!(first, second);
    assert_eq!(fs::read(&cached).unwrap(), bytes_after_first);
}

#[test]
fn stale_scorecard_version_is_rebuilt() {
    let data = TempDir::new().unwrap();
    let processed = TempDir::new().unwrap();
    seed(data.path(), tests_male(), &[("7", fixture("match_a.json"))]);

    let source = Arc::new(CountingSource::new(data.path()));
    let store = store_over(source.clone(), processed.path(), WalkPolicy::Abort);
    let card = store.get_or_build(tests_male(), "7").unwrap();

    let path = processed.path().join("matches/tests_male/7.json");
    let mut stale: MatchScorecard = card.clone();
    stale.version = 1;
    stale.city = "stale".to_string();
    fs::write(&path, serde_json::to_string(&stale).unwrap()).unwrap();

    let rebuilt = store.get_or_build(tests_male(), "7").unwrap();
    assert_eq!(source.reads(), 2);
    assert_eq!(rebuilt, card);
}

#[test]
fn missing_match_is_not_found() {
    let data = TempDir::new().unwrap();
    let processed = TempDir::new().unwrap();
    seed(data.path(), tests_male(), &[]);
    let store = store_over(
        Arc::new(DatasetDir::new(data.path())),
        processed.path(),
        WalkPolicy::Abort,
    );
    let err = store.get_or_build(tests_male(), "404").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.http_status(), 404);
}

#[test]
fn malformed_match_aborts_walk_by_default() {
    let data = TempDir::new().unwrap();
    let processed = TempDir::new().unwrap();
    seed(
        data.path(),
        tests_male(),
        &[
            ("1", fixture("match_a.json")),
            ("2", "{ broken".to_string()),
            ("3", fixture("match_b.json")),
        ],
    );
    let store = store_over(
        Arc::new(DatasetDir::new(data.path())),
        processed.path(),
        WalkPolicy::Abort,
    );
    let mut seen = 0;
    let err = store.for_each_match(tests_male(), |_| seen += 1).unwrap_err();
    assert!(matches!(err, StatsError::Parse { .. }));
    assert_eq!(seen, 1);
}

#[test]
fn skip_policy_reports_skipped_matches() {
    let data = TempDir::new().unwrap();
    let processed = TempDir::new().unwrap();
    seed(
        data.path(),
        tests_male(),
        &[
            ("1", fixture("match_a.json")),
            ("2", "{ broken".to_string()),
            ("3", fixture("match_b.json")),
        ],
    );
    let store = store_over(
        Arc::new(DatasetDir::new(data.path())),
        processed.path(),
        WalkPolicy::Skip,
    );
    let mut teams = Vec::new();
    let summary = store
        .for_each_match(tests_male(), |card| teams.push(card.innings[0].team.clone()))
        .unwrap();
    assert_eq!(
        summary,
        WalkSummary {
            visited: 2,
            skipped: 1
        }
    );
    assert_eq!(teams, vec!["X", "X"]);
}

#[test]
fn missing_partition_walks_as_empty() {
    let data = TempDir::new().unwrap();
    let processed = TempDir::new().unwrap();
    let store = store_over(
        Arc::new(DatasetDir::new(data.path())),
        processed.path(),
        WalkPolicy::Abort,
    );
    let ct = CompetitionType::new(Competition::Ipl, Gender::Male);
    let summary = store.for_each_match(ct, |_| panic!("nothing to visit")).unwrap();
    assert_eq!(summary, WalkSummary::default());
}

#[test]
fn repeated_walks_yield_identical_innings_rows() {
    let data = TempDir::new().unwrap();
    let processed = TempDir::new().unwrap();
    seed(
        data.path(),
        tests_male(),
        &[
            ("20", fixture("t20_sample.json")),
            ("10", fixture("match_a.json")),
            ("30", fixture("match_b.json")),
        ],
    );
    let store = store_over(
        Arc::new(DatasetDir::new(data.path())),
        processed.path(),
        WalkPolicy::Abort,
    );

    let cold = innings_for(&store, tests_male()).unwrap();
    let warm = innings_for(&store, tests_male()).unwrap();
    assert_eq!(cold, warm);
    // ids 10, 20, 30: one innings, two innings, one innings.
    let runs: Vec<_> = cold.iter().map(|row| row.runs).collect();
    assert_eq!(runs, vec![6, 19, 5, 4]);
}

#[test]
fn concurrent_builds_of_one_match_read_raw_once() {
    let data = TempDir::new().unwrap();
    let processed = TempDir::new().unwrap();
    seed(data.path(), tests_male(), &[("55", fixture("t20_sample.json"))]);

    let source = Arc::new(CountingSource::new(data.path()));
    let store = Arc::new(store_over(source.clone(), processed.path(), WalkPolicy::Abort));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.get_or_build(tests_male(), "55").unwrap())
        })
        .collect();
    let cards: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(cards.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(source.reads(), 1);
}
