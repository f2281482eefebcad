use crate::clock::{Clock, SystemClock};
use crate::display::print_warning;
use crate::helpers::{argmax_first, argmin_first};
use crate::models::{ActivityEvent, ActivityMetrics};
use crate::storage::{ACTIVITY_LOGS_KEY, ACTIVITY_METRICS_KEY, ActivityStore};
use chrono::Duration;
use serde_json::{Map, Value};

/// Trailing retention of the event log, enforced on every append
const RETENTION_DAYS: i64 = 30;

/// Records activity events into a bounded log and keeps the derived
/// metrics document up to date
///
/// Tracking is best-effort by contract: a storage or serialization failure
/// is swallowed (warned and counted), never surfaced to the feature that
/// triggered the log call.
pub struct ActivityTracker<S: ActivityStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    dropped_writes: u64,
}

impl<S: ActivityStore> ActivityTracker<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: ActivityStore, C: Clock> ActivityTracker<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            dropped_writes: 0,
        }
    }

    /// Record that `action` happened now, pruning the log to the trailing
    /// 30 days and recomputing the metrics document
    ///
    /// Returns the stored event, or `None` when the write was dropped
    /// because the backend failed.
    pub fn log_activity(
        &mut self,
        action: &str,
        user_id: Option<&str>,
        metadata: Map<String, Value>,
    ) -> Option<ActivityEvent> {
        let now = self.clock.now();
        let mut logs = self.activity_logs();

        let event = ActivityEvent::record(action, user_id, metadata, now);
        logs.push(event.clone());

        let cutoff = now.timestamp_millis() - Duration::days(RETENTION_DAYS).num_milliseconds();
        logs.retain(|entry| entry.timestamp > cutoff);

        if let Err(err) = self.persist_logs(&logs) {
            print_warning(&format!("failed to log activity: {}", err));
            self.dropped_writes += 1;
            return None;
        }

        self.update_metrics();
        Some(event)
    }

    /// The full retained log; corrupt or missing storage degrades to empty
    pub fn activity_logs(&self) -> Vec<ActivityEvent> {
        match self.store.read(ACTIVITY_LOGS_KEY) {
            Ok(Some(content)) => serde_json::from_str(&content).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Recompute the metrics document from the current log
    ///
    /// The hourly/daily patterns only count events within the trailing
    /// 7 days. Persistence failures leave the previously stored document
    /// stale; the freshly computed value is still returned.
    pub fn update_metrics(&mut self) -> ActivityMetrics {
        let logs = self.activity_logs();
        let now_ms = self.clock.now().timestamp_millis();
        let one_day_ago = now_ms - Duration::hours(24).num_milliseconds();
        let one_week_ago = now_ms - Duration::days(7).num_milliseconds();

        let mut hourly_pattern = [0u64; 24];
        let mut daily_pattern = [0u64; 7];
        for entry in &logs {
            if entry.timestamp > one_week_ago {
                if let Some(slot) = hourly_pattern.get_mut(entry.hour_of_day as usize) {
                    *slot += 1;
                }
                if let Some(slot) = daily_pattern.get_mut(entry.day_of_week as usize) {
                    *slot += 1;
                }
            }
        }

        let metrics = ActivityMetrics {
            total_activities: logs.len() as u64,
            last_24_hours: logs.iter().filter(|e| e.timestamp > one_day_ago).count() as u64,
            last_7_days: logs.iter().filter(|e| e.timestamp > one_week_ago).count() as u64,
            hourly_pattern,
            daily_pattern,
            peak_hour: argmax_first(&hourly_pattern) as u32,
            low_activity_hour: argmin_first(&hourly_pattern) as u32,
            last_updated: now_ms,
        };

        if let Err(err) = self.persist_metrics(&metrics) {
            print_warning(&format!("failed to persist activity metrics: {}", err));
            self.dropped_writes += 1;
        }

        metrics
    }

    /// Last persisted metrics document, `None` when absent or corrupt
    pub fn metrics(&self) -> Option<ActivityMetrics> {
        match self.store.read(ACTIVITY_METRICS_KEY) {
            Ok(Some(content)) => serde_json::from_str(&content).ok(),
            _ => None,
        }
    }

    /// Discard the persisted log and metrics; safe to call when already empty
    pub fn clear_data(&mut self) {
        for key in [ACTIVITY_LOGS_KEY, ACTIVITY_METRICS_KEY] {
            if let Err(err) = self.store.remove(key) {
                print_warning(&format!("failed to clear '{}': {}", key, err));
            }
        }
    }

    /// Rank low-activity maintenance windows of `duration_hours` against
    /// the current metrics document
    pub fn predict_optimal_windows(
        &self,
        duration_hours: u32,
    ) -> crate::error::Result<Vec<crate::models::MaintenanceWindow>> {
        crate::recommender::predict_optimal_windows(self.metrics().as_ref(), duration_hours)
    }

    /// Normalized heatmap view of the current metrics document
    pub fn heatmap_data(&self) -> Option<crate::heatmap::HeatmapData> {
        crate::heatmap::heatmap_data(self.metrics().as_ref())
    }

    /// Number of writes swallowed because the backend failed
    #[allow(dead_code)]
    pub fn dropped_writes(&self) -> u64 {
        self.dropped_writes
    }

    fn persist_logs(&mut self, logs: &[ActivityEvent]) -> crate::error::Result<()> {
        let content = serde_json::to_string(logs)?;
        self.store.write(ACTIVITY_LOGS_KEY, &content)
    }

    fn persist_metrics(&mut self, metrics: &ActivityMetrics) -> crate::error::Result<()> {
        let content = serde_json::to_string(metrics)?;
        self.store.write(ACTIVITY_METRICS_KEY, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::{MaintlyticsError, Result};
    use crate::storage::MemoryStore;
    use chrono::{DateTime, Local, TimeZone};

    fn manual_clock(hour: u32) -> ManualClock {
        ManualClock::starting_at(at_hour(hour))
    }

    fn at_hour(hour: u32) -> DateTime<Local> {
        // 2026-03-11 is a Wednesday
        Local.with_ymd_and_hms(2026, 3, 11, hour, 0, 0).unwrap()
    }

    /// Store whose writes can be made to fail, for the best-effort contract
    struct FailingStore {
        inner: MemoryStore,
        fail_writes: bool,
    }

    impl ActivityStore for FailingStore {
        fn read(&self, key: &str) -> Result<Option<String>> {
            self.inner.read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(MaintlyticsError::storage_error(key, "simulated failure"));
            }
            self.inner.write(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_log_activity_appends_and_returns_event() {
        let clock = manual_clock(14);
        let mut tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);

        let event = tracker
            .log_activity("file_upload", Some("u1"), Map::new())
            .unwrap();
        assert_eq!(event.action, "file_upload");
        assert_eq!(event.hour_of_day, 14);

        let logs = tracker.activity_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0], event);
    }

    #[test]
    fn test_retention_prunes_entries_older_than_30_days() {
        let clock = manual_clock(2);
        let mut tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);

        tracker.log_activity("login", None, Map::new()).unwrap();
        clock.advance(Duration::days(31));
        tracker.log_activity("login", None, Map::new()).unwrap();

        let logs = tracker.activity_logs();
        assert_eq!(logs.len(), 1);
        let cutoff = clock.now().timestamp_millis() - Duration::days(30).num_milliseconds();
        assert!(logs.iter().all(|e| e.timestamp > cutoff));
    }

    #[test]
    fn test_retention_prunes_exact_boundary() {
        let clock = manual_clock(2);
        let mut tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);

        tracker.log_activity("login", None, Map::new()).unwrap();
        // An entry aged exactly 30 days is pruned, not retained
        clock.advance(Duration::days(30));
        tracker.log_activity("login", None, Map::new()).unwrap();

        assert_eq!(tracker.activity_logs().len(), 1);
    }

    #[test]
    fn test_metrics_derivation_matches_log() {
        let clock = manual_clock(2);
        let mut tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);

        tracker.log_activity("file_upload", None, Map::new()).unwrap();
        tracker.log_activity("file_upload", None, Map::new()).unwrap();
        clock.set(at_hour(14));
        tracker.log_activity("chart_generation", None, Map::new()).unwrap();

        let metrics = tracker.metrics().unwrap();
        assert_eq!(metrics.hourly_pattern[2], 2);
        assert_eq!(metrics.hourly_pattern[14], 1);
        for hour in (0..24).filter(|&h| h != 2 && h != 14) {
            assert_eq!(metrics.hourly_pattern[hour], 0, "hour {}", hour);
        }
        // All three events fell on a Wednesday
        assert_eq!(metrics.daily_pattern[3], 3);
        assert_eq!(metrics.total_activities, 3);
        assert_eq!(metrics.last_24_hours, 3);
        assert_eq!(metrics.last_7_days, 3);
        assert_eq!(metrics.peak_hour, 2);
    }

    #[test]
    fn test_pattern_windows_exclude_older_events() {
        let clock = manual_clock(2);
        let mut tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);

        tracker.log_activity("login", None, Map::new()).unwrap();
        clock.advance(Duration::days(10));
        tracker.log_activity("login", None, Map::new()).unwrap();
        clock.advance(Duration::hours(25));
        tracker.log_activity("login", None, Map::new()).unwrap();

        let metrics = tracker.metrics().unwrap();
        // First event is 10+ days old: retained in the log but outside
        // the 7-day pattern window
        assert_eq!(metrics.total_activities, 3);
        assert_eq!(metrics.last_7_days, 2);
        assert_eq!(metrics.last_24_hours, 1);
        assert_eq!(metrics.hourly_pattern.iter().sum::<u64>(), 2);
    }

    #[test]
    fn test_peak_and_low_hours_break_ties_at_first_index() {
        let clock = manual_clock(5);
        let mut tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);

        tracker.log_activity("login", None, Map::new()).unwrap();
        clock.set(at_hour(9));
        tracker.log_activity("login", None, Map::new()).unwrap();

        let metrics = tracker.metrics().unwrap();
        // Hours 5 and 9 tie at 1; hour 0 is the first zero bucket
        assert_eq!(metrics.peak_hour, 5);
        assert_eq!(metrics.low_activity_hour, 0);
    }

    #[test]
    fn test_corrupt_log_degrades_to_empty() {
        let clock = manual_clock(2);
        let mut store = MemoryStore::new();
        store.write(ACTIVITY_LOGS_KEY, "not json at all").unwrap();
        store.write(ACTIVITY_METRICS_KEY, "{broken").unwrap();

        let tracker = ActivityTracker::with_clock(store, &clock);
        assert!(tracker.activity_logs().is_empty());
        assert!(tracker.metrics().is_none());
    }

    #[test]
    fn test_logging_over_corrupt_log_starts_fresh() {
        let clock = manual_clock(2);
        let mut store = MemoryStore::new();
        store.write(ACTIVITY_LOGS_KEY, "[[[").unwrap();

        let mut tracker = ActivityTracker::with_clock(store, &clock);
        assert!(tracker.log_activity("login", None, Map::new()).is_some());
        assert_eq!(tracker.activity_logs().len(), 1);
    }

    #[test]
    fn test_storage_failure_is_swallowed_and_counted() {
        let clock = manual_clock(2);
        let store = FailingStore {
            inner: MemoryStore::new(),
            fail_writes: true,
        };
        let mut tracker = ActivityTracker::with_clock(store, &clock);

        assert!(tracker.log_activity("login", None, Map::new()).is_none());
        assert_eq!(tracker.dropped_writes(), 1);
        assert!(tracker.activity_logs().is_empty());
    }

    #[test]
    fn test_clear_data_is_idempotent() {
        let clock = manual_clock(2);
        let mut tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);

        tracker.log_activity("login", None, Map::new()).unwrap();
        assert!(tracker.metrics().is_some());

        tracker.clear_data();
        assert!(tracker.activity_logs().is_empty());
        assert!(tracker.metrics().is_none());

        tracker.clear_data();
        assert!(tracker.activity_logs().is_empty());
        assert!(tracker.metrics().is_none());
    }

    #[test]
    fn test_predict_windows_before_any_activity_returns_defaults() {
        let clock = manual_clock(2);
        let tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);

        let windows = tracker.predict_optimal_windows(2).unwrap();
        let starts: Vec<u32> = windows.iter().map(|w| w.start_hour).collect();
        assert_eq!(starts, vec![2, 3, 1]);
        let confidences: Vec<f64> = windows.iter().map(|w| w.confidence).collect();
        assert_eq!(confidences, vec![70.0, 65.0, 60.0]);
    }

    #[test]
    fn test_predict_windows_end_to_end() {
        let clock = manual_clock(2);
        let mut tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);

        tracker.log_activity("file_upload", None, Map::new()).unwrap();
        tracker.log_activity("file_upload", None, Map::new()).unwrap();
        clock.set(at_hour(14));
        tracker.log_activity("chart_generation", None, Map::new()).unwrap();

        let windows = tracker.predict_optimal_windows(2).unwrap();
        assert_eq!(windows.len(), 5);
        for window in &windows {
            let hours = [window.start_hour, (window.start_hour + 1) % 24];
            assert!(!hours.contains(&2));
            assert!(!hours.contains(&14));
            assert_eq!(window.estimated_activity, 0);
            assert_eq!(window.confidence, 100.0);
        }

        let heatmap = tracker.heatmap_data().unwrap();
        assert_eq!(heatmap.hourly[2].intensity, 100.0);
        assert_eq!(heatmap.hourly[14].intensity, 50.0);
    }

    #[test]
    fn test_heatmap_absent_before_any_activity() {
        let clock = manual_clock(2);
        let tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);
        assert!(tracker.heatmap_data().is_none());
    }

    #[test]
    fn test_metadata_round_trips_through_storage() {
        let clock = manual_clock(10);
        let mut tracker = ActivityTracker::with_clock(MemoryStore::new(), &clock);

        let mut metadata = Map::new();
        metadata.insert("fileName".to_string(), Value::from("q3.xlsx"));
        metadata.insert("fileSize".to_string(), Value::from(10_240));
        tracker.log_activity("file_upload", Some("u7"), metadata).unwrap();

        let logs = tracker.activity_logs();
        assert_eq!(logs[0].metadata.get("fileName"), Some(&Value::from("q3.xlsx")));
        assert_eq!(logs[0].metadata.get("fileSize"), Some(&Value::from(10_240)));
    }
}
