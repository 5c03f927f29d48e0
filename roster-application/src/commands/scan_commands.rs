// One reconciliation pass over the console log, bounded by the watermark.

use chrono::NaiveDateTime;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use roster_domain::{
    apply_observations, current_log_time, extract_line, LogEvent, MergeStats, Observation,
    SteamId, Watermark,
};

use crate::{AppError, AppState};

/// Outcome summary of a single reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Lines folded by this pass (the watermark boundary line is excluded).
    pub lines_scanned: u64,
    /// Qualifying joins staged for the merge step.
    pub observations: usize,
    pub stats: MergeStats,
    /// Whether the pass stopped early at a line newer than the watermark.
    pub stopped_at_watermark: bool,
}

/// Drive one scan: load stores, stream the log from the start, stage
/// observations, merge, persist. Re-invocation over an unchanged log is a
/// no-op on the roster. Any error leaves both stores exactly as loaded.
pub async fn run_scan_once(state: &AppState) -> Result<ScanReport, AppError> {
    let mut roster = state.roster_repo.load().await.map_err(AppError::Store)?;
    let loaded = state.watermark_repo.load().await.map_err(AppError::Store)?;
    // A brand-new deployment starts from "now": the first pass folds the
    // whole existing log and later passes only the delta.
    let watermark = loaded
        .map(|mark| mark.last_check_time)
        .unwrap_or_else(current_log_time);

    let file = File::open(&state.config.log_path)
        .await
        .map_err(|source| AppError::LogRead {
            path: state.config.log_path.clone(),
            source,
        })?;
    let mut lines = BufReader::new(file).lines();

    let mut report = ScanReport::default();
    let mut staged: Vec<Observation> = Vec::new();
    let mut pending: Option<SteamId> = None;
    let mut line_time: Option<NaiveDateTime> = None;

    while let Some(line) = lines.next_line().await.map_err(|source| AppError::LogRead {
        path: state.config.log_path.clone(),
        source,
    })? {
        let parsed = extract_line(&line);
        if let Some(timestamp) = parsed.timestamp {
            // Content at or past the watermark belongs to a later cycle;
            // log timestamps only grow, so stop instead of skipping.
            if timestamp >= watermark {
                report.stopped_at_watermark = true;
                break;
            }
            line_time = Some(timestamp);
        }
        report.lines_scanned += 1;

        match parsed.event {
            Some(LogEvent::IdentitySighting { steam_id }) => {
                if !steam_id.has_canonical_form() {
                    warn!(token = %steam_id, "identity token is not a 17-digit steam id, kept verbatim");
                }
                pending = Some(steam_id);
            }
            Some(LogEvent::CharacterJoin { character_name }) => {
                let Some(steam_id) = pending.take() else {
                    warn!(character = %character_name, "join without a preceding identity sighting, dropped");
                    continue;
                };
                let display_name = state.resolver.resolve(&steam_id).await?;
                staged.push(Observation {
                    steam_id,
                    display_name,
                    character_name,
                    timestamp: line_time.unwrap_or(watermark),
                });
            }
            None => {}
        }
    }

    report.observations = staged.len();
    report.stats = apply_observations(&mut roster, &staged);

    state
        .roster_repo
        .save(&roster)
        .await
        .map_err(AppError::Store)?;
    state
        .watermark_repo
        .save(&Watermark::now())
        .await
        .map_err(AppError::Store)?;

    state.metrics.record_scan(&report.stats);
    Ok(report)
}

/// Shutdown-time watermark flush; the roster itself is only committed at the
/// end of a completed scan and needs no extra write here.
pub async fn flush_watermark(state: &AppState) -> Result<(), AppError> {
    state
        .watermark_repo
        .save(&Watermark::now())
        .await
        .map_err(AppError::Store)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tempfile::NamedTempFile;

    use roster_domain::{
        parse_log_time, LookupError, NicknameResolver, Roster, RosterRepository, RuntimeConfig,
        WatermarkRepository,
    };

    use crate::Metrics;

    use super::*;

    const STEAM_ID: &str = "12345678901234567";

    #[derive(Default)]
    struct MemoryRosterRepository {
        stored: Mutex<Roster>,
        saves: AtomicUsize,
    }

    #[async_trait]
    impl RosterRepository for MemoryRosterRepository {
        async fn load(&self) -> anyhow::Result<Roster> {
            Ok(self.stored.lock().expect("roster lock").clone())
        }

        async fn save(&self, roster: &Roster) -> anyhow::Result<()> {
            *self.stored.lock().expect("roster lock") = roster.clone();
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryWatermarkRepository {
        stored: Mutex<Option<Watermark>>,
        saves: AtomicUsize,
    }

    #[async_trait]
    impl WatermarkRepository for MemoryWatermarkRepository {
        async fn load(&self) -> anyhow::Result<Option<Watermark>> {
            Ok(*self.stored.lock().expect("watermark lock"))
        }

        async fn save(&self, watermark: &Watermark) -> anyhow::Result<()> {
            *self.stored.lock().expect("watermark lock") = Some(*watermark);
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FakeResolver {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeResolver {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl NicknameResolver for FakeResolver {
        async fn resolve(&self, steam_id: &SteamId) -> Result<String, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LookupError::Transport("connection refused".to_string()));
            }
            Ok(format!("nick-{steam_id}"))
        }
    }

    struct Harness {
        state: AppState,
        roster_repo: Arc<MemoryRosterRepository>,
        watermark_repo: Arc<MemoryWatermarkRepository>,
        resolver: Arc<FakeResolver>,
        _log: NamedTempFile,
    }

    fn harness(log_content: &str, resolver: FakeResolver) -> Harness {
        let mut log = NamedTempFile::new().expect("log file");
        log.write_all(log_content.as_bytes()).expect("write log");
        log.flush().expect("flush log");

        let roster_repo = Arc::new(MemoryRosterRepository::default());
        let watermark_repo = Arc::new(MemoryWatermarkRepository::default());
        let resolver = Arc::new(resolver);
        let state = AppState {
            config: RuntimeConfig {
                log_path: log.path().to_string_lossy().to_string(),
                roster_path: String::new(),
                watermark_path: String::new(),
                steam_api_url: String::new(),
                steam_api_key: None,
                scan_interval_seconds: 600,
                request_timeout_seconds: 15,
            },
            roster_repo: roster_repo.clone(),
            watermark_repo: watermark_repo.clone(),
            resolver: resolver.clone(),
            metrics: Arc::new(Metrics::default()),
        };

        Harness {
            state,
            roster_repo,
            watermark_repo,
            resolver,
            _log: log,
        }
    }

    fn sighting(timestamp: &str, steam_id: &str) -> String {
        format!("[{timestamp}] Session ... received local Platform ID Steam_{steam_id} for peer\n")
    }

    fn join(timestamp: &str, character: &str) -> String {
        format!("[{timestamp}] Got character ZDOID from {character} : 123456:1\n")
    }

    fn stored_roster(harness: &Harness) -> Roster {
        harness.roster_repo.stored.lock().expect("roster lock").clone()
    }

    #[tokio::test]
    async fn single_sighting_and_join_creates_one_record() {
        let log = [
            sighting("01/01/2024 10:00:00", STEAM_ID),
            join("01/01/2024 10:00:00", "Erik"),
        ]
        .concat();
        let harness = harness(&log, FakeResolver::ok());

        let report = run_scan_once(&harness.state).await.expect("scan");

        assert_eq!(report.observations, 1);
        assert_eq!(report.stats.created, 1);
        let roster = stored_roster(&harness);
        assert_eq!(roster.len(), 1);
        let record = roster.get(&SteamId::new(STEAM_ID)).expect("record");
        assert!(record.character_names.contains("Erik"));
        assert!(record.display_names.contains(&format!("nick-{STEAM_ID}")));
        assert_eq!(record.session_count, 1);
        assert_eq!(
            record.last_seen,
            parse_log_time("01/01/2024 10:00:00").expect("timestamp")
        );
        assert_eq!(harness.watermark_repo.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn two_joins_at_distinct_timestamps_count_two_sessions() {
        let log = [
            sighting("01/01/2024 10:00:00", STEAM_ID),
            join("01/01/2024 10:00:05", "Erik"),
            sighting("01/01/2024 18:00:00", STEAM_ID),
            join("01/01/2024 18:00:05", "Erik"),
        ]
        .concat();
        let harness = harness(&log, FakeResolver::ok());

        run_scan_once(&harness.state).await.expect("scan");

        let roster = stored_roster(&harness);
        let record = roster.get(&SteamId::new(STEAM_ID)).expect("record");
        assert_eq!(record.session_count, 2);
        assert_eq!(record.character_names.len(), 1);
        // Both lookups resolved to the same nickname, absorbed by the set.
        assert_eq!(record.display_names.len(), 1);
        assert_eq!(harness.resolver.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn join_without_sighting_is_dropped() {
        let harness = harness(&join("01/01/2024 10:00:00", "Erik"), FakeResolver::ok());

        let report = run_scan_once(&harness.state).await.expect("scan");

        assert_eq!(report.observations, 0);
        assert!(stored_roster(&harness).is_empty());
        assert_eq!(harness.resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_join_without_new_sighting_is_an_orphan() {
        let log = [
            sighting("01/01/2024 10:00:00", STEAM_ID),
            join("01/01/2024 10:00:05", "Erik"),
            join("01/01/2024 10:20:00", "Erik"),
        ]
        .concat();
        let harness = harness(&log, FakeResolver::ok());

        let report = run_scan_once(&harness.state).await.expect("scan");

        assert_eq!(report.observations, 1);
        let roster = stored_roster(&harness);
        let record = roster.get(&SteamId::new(STEAM_ID)).expect("record");
        assert_eq!(record.session_count, 1);
    }

    #[tokio::test]
    async fn lookup_failure_aborts_without_touching_stores() {
        let log = [
            sighting("01/01/2024 10:00:00", STEAM_ID),
            join("01/01/2024 10:00:05", "Erik"),
        ]
        .concat();
        let harness = harness(&log, FakeResolver::failing());

        let err = run_scan_once(&harness.state).await.expect_err("must fail");

        assert!(matches!(err, AppError::Lookup(_)));
        assert_eq!(harness.roster_repo.saves.load(Ordering::SeqCst), 0);
        assert_eq!(harness.watermark_repo.saves.load(Ordering::SeqCst), 0);
        assert!(harness
            .watermark_repo
            .stored
            .lock()
            .expect("watermark lock")
            .is_none());
    }

    #[tokio::test]
    async fn lines_at_or_past_the_watermark_wait_for_a_later_scan() {
        let log = [
            sighting("01/01/2024 10:00:00", STEAM_ID),
            join("01/01/2024 10:00:05", "Erik"),
        ]
        .concat();
        let harness = harness(&log, FakeResolver::ok());
        *harness
            .watermark_repo
            .stored
            .lock()
            .expect("watermark lock") = Some(Watermark::new(
            parse_log_time("01/01/2024 10:00:00").expect("timestamp"),
        ));

        let report = run_scan_once(&harness.state).await.expect("scan");
        assert!(report.stopped_at_watermark);
        assert_eq!(report.observations, 0);
        assert!(stored_roster(&harness).is_empty());

        // The completed pass advanced the watermark past both lines, so the
        // next pass folds them.
        let report = run_scan_once(&harness.state).await.expect("scan");
        assert_eq!(report.stats.created, 1);
    }

    #[tokio::test]
    async fn rescanning_an_unchanged_log_mutates_nothing() {
        let log = [
            sighting("01/01/2024 10:00:00", STEAM_ID),
            join("01/01/2024 10:00:05", "Erik"),
            sighting("01/01/2024 18:00:00", STEAM_ID),
            join("01/01/2024 18:00:05", "Freya"),
        ]
        .concat();
        let harness = harness(&log, FakeResolver::ok());

        run_scan_once(&harness.state).await.expect("first scan");
        let after_first = stored_roster(&harness);

        let report = run_scan_once(&harness.state).await.expect("second scan");

        assert_eq!(stored_roster(&harness), after_first);
        assert_eq!(report.stats.created, 0);
        assert_eq!(report.stats.sessions_counted, 0);
    }

    #[tokio::test]
    async fn timestamp_less_lines_are_still_folded() {
        let log = format!(
            "received local Platform ID Steam_{STEAM_ID}\nGot character ZDOID from Erik : 1:1\n"
        );
        let harness = harness(&log, FakeResolver::ok());

        let report = run_scan_once(&harness.state).await.expect("scan");

        assert!(!report.stopped_at_watermark);
        assert_eq!(report.stats.created, 1);
    }

    #[tokio::test]
    async fn join_inherits_the_most_recent_line_timestamp() {
        let log = [
            sighting("01/01/2024 10:00:00", STEAM_ID),
            "Got character ZDOID from Erik : 1:1\n".to_string(),
        ]
        .concat();
        let harness = harness(&log, FakeResolver::ok());

        run_scan_once(&harness.state).await.expect("scan");

        let roster = stored_roster(&harness);
        let record = roster.get(&SteamId::new(STEAM_ID)).expect("record");
        assert_eq!(
            record.last_seen,
            parse_log_time("01/01/2024 10:00:00").expect("timestamp")
        );
    }

    #[tokio::test]
    async fn short_identity_token_is_kept_verbatim() {
        let log = [
            "[01/01/2024 10:00:00] received local Platform ID Steam_123\n".to_string(),
            join("01/01/2024 10:00:01", "Erik"),
        ]
        .concat();
        let harness = harness(&log, FakeResolver::ok());

        run_scan_once(&harness.state).await.expect("scan");

        let roster = stored_roster(&harness);
        assert!(roster.get(&SteamId::new("123")).is_some());
    }

    #[tokio::test]
    async fn missing_log_file_is_a_recoverable_error() {
        let harness = harness("", FakeResolver::ok());
        let mut state = harness.state.clone();
        state.config.log_path = "/nonexistent/roster-daemon-test.log".to_string();

        let err = run_scan_once(&state).await.expect_err("must fail");

        assert!(matches!(err, AppError::LogRead { .. }));
        assert_eq!(harness.watermark_repo.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn flush_watermark_writes_a_current_mark() {
        let harness = harness("", FakeResolver::ok());

        flush_watermark(&harness.state).await.expect("flush");

        assert!(harness
            .watermark_repo
            .stored
            .lock()
            .expect("watermark lock")
            .is_some());
    }
}
