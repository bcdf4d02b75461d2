//! Session statistics store.
//!
//! Completed work sessions are accumulated per local calendar day. Only the
//! trailing 30 days are kept: older records are dropped on every write.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::{debug, warn};

use crate::storage::KeyValueStore;
use crate::types::DailyStatRecord;

/// Storage key of the statistics record.
pub const STATS_KEY: &str = "pomodoro-stats";

/// Number of days retained, counting today.
pub const RETENTION_DAYS: i64 = 30;

/// Aggregates over the retained records, for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSummary {
    /// Completed work sessions
    pub total_sessions: u32,
    /// Focus time in minutes
    pub total_minutes: u32,
    /// Sessions per recorded day, rounded to one decimal
    pub average_sessions_per_day: f64,
    /// Number of days with at least one record
    pub days_recorded: usize,
}

/// Owns the daily statistics and their persisted record.
pub struct StatsStore {
    storage: Arc<dyn KeyValueStore>,
    records: Vec<DailyStatRecord>,
}

impl StatsStore {
    /// Loads the statistics from `storage`. Malformed entries are skipped.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let records = match storage.get(STATS_KEY) {
            Ok(Some(raw)) => parse_records(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load statistics: {}", e);
                Vec::new()
            }
        };
        Self { storage, records }
    }

    /// Records a completed work session for the local current day.
    pub fn record_work_session(&mut self, duration_seconds: u32) -> DailyStatRecord {
        self.record_work_session_on(Local::now().date_naive(), duration_seconds)
    }

    /// Records a completed work session for `today` and returns the day's
    /// updated record.
    ///
    /// The session adds its duration, rounded to whole minutes, to the
    /// day's record. Records older than the retention window are dropped
    /// before the result is persisted.
    pub fn record_work_session_on(
        &mut self,
        today: NaiveDate,
        duration_seconds: u32,
    ) -> DailyStatRecord {
        let minutes = round_to_minutes(duration_seconds);

        let record = match self.records.iter_mut().find(|r| r.date == today) {
            Some(record) => {
                record.work_sessions = record.work_sessions.saturating_add(1);
                record.total_focus_minutes = record.total_focus_minutes.saturating_add(minutes);
                record.clone()
            }
            None => {
                let record = DailyStatRecord::first(today, minutes);
                self.records.push(record.clone());
                record
            }
        };
        debug!("Recorded work session on {} ({} min)", today, minutes);

        self.prune(today);
        self.persist();
        record
    }

    /// Returns the retained records in insertion order.
    pub fn records(&self) -> &[DailyStatRecord] {
        &self.records
    }

    /// Returns the record for `date`, if any.
    pub fn record_for(&self, date: NaiveDate) -> Option<&DailyStatRecord> {
        self.records.iter().find(|r| r.date == date)
    }

    /// Computes totals over the retained records.
    pub fn summary(&self) -> StatsSummary {
        // Stored counts are untrusted; totals saturate instead of overflowing.
        let total_sessions = self
            .records
            .iter()
            .fold(0u32, |acc, r| acc.saturating_add(r.work_sessions));
        let total_minutes = self
            .records
            .iter()
            .fold(0u32, |acc, r| acc.saturating_add(r.total_focus_minutes));
        let days_recorded = self.records.len();
        let average_sessions_per_day = if days_recorded == 0 {
            0.0
        } else {
            (f64::from(total_sessions) / days_recorded as f64 * 10.0).round() / 10.0
        };

        StatsSummary {
            total_sessions,
            total_minutes,
            average_sessions_per_day,
            days_recorded,
        }
    }

    fn prune(&mut self, today: NaiveDate) {
        let before = self.records.len();
        self.records
            .retain(|r| (today - r.date).num_days() < RETENTION_DAYS);
        let dropped = before - self.records.len();
        if dropped > 0 {
            debug!("Dropped {} expired statistics records", dropped);
        }
    }

    fn persist(&self) -> bool {
        let json = match serde_json::to_string(&self.records) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize statistics: {}", e);
                return false;
            }
        };
        match self.storage.set(STATS_KEY, &json) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save statistics: {} ({})", e, e.suggestion());
                false
            }
        }
    }
}

impl std::fmt::Debug for StatsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsStore")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

/// Rounds seconds to the nearest whole minute, halves rounding up.
fn round_to_minutes(seconds: u32) -> u32 {
    seconds.saturating_add(30) / 60
}

/// Parses the stored array, skipping malformed entries and folding
/// duplicate days into one record.
fn parse_records(raw: &str) -> Vec<DailyStatRecord> {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("Stored statistics are not an array, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!("Stored statistics are not valid JSON, starting empty: {}", e);
            return Vec::new();
        }
    };

    let mut records: Vec<DailyStatRecord> = Vec::with_capacity(entries.len());
    for entry in entries {
        let record: DailyStatRecord = match serde_json::from_value(entry) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping malformed statistics entry: {}", e);
                continue;
            }
        };
        match records.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => {
                existing.work_sessions =
                    existing.work_sessions.saturating_add(record.work_sessions);
                existing.total_focus_minutes = existing
                    .total_focus_minutes
                    .saturating_add(record.total_focus_minutes);
            }
            None => records.push(record),
        }
    }
    records
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stored(storage: &MemoryStore) -> Vec<DailyStatRecord> {
        serde_json::from_str(&storage.raw(STATS_KEY).unwrap()).unwrap()
    }

    // ------------------------------------------------------------------------
    // Recording Tests
    // ------------------------------------------------------------------------

    mod recording_tests {
        use super::*;

        #[test]
        fn test_same_day_sessions_accumulate() {
            let storage = Arc::new(MemoryStore::new());
            let mut stats = StatsStore::load(storage.clone());
            let today = date(2024, 5, 10);

            stats.record_work_session_on(today, 1500);
            let record = stats.record_work_session_on(today, 1500);

            assert_eq!(record.work_sessions, 2);
            assert_eq!(record.total_focus_minutes, 50);
            assert_eq!(stats.records().len(), 1);
            assert_eq!(stored(&storage), vec![record]);
        }

        #[test]
        fn test_new_day_appends_record() {
            let mut stats = StatsStore::load(Arc::new(MemoryStore::new()));

            stats.record_work_session_on(date(2024, 5, 10), 1500);
            stats.record_work_session_on(date(2024, 5, 11), 3000);

            assert_eq!(stats.records().len(), 2);
            assert_eq!(stats.record_for(date(2024, 5, 11)).unwrap().total_focus_minutes, 50);
        }

        #[test]
        fn test_minutes_are_rounded() {
            assert_eq!(round_to_minutes(0), 0);
            assert_eq!(round_to_minutes(29), 0);
            assert_eq!(round_to_minutes(30), 1);
            assert_eq!(round_to_minutes(89), 1);
            assert_eq!(round_to_minutes(90), 2);
            assert_eq!(round_to_minutes(1500), 25);
        }

        #[test]
        fn test_write_failure_keeps_in_memory_records() {
            let storage = Arc::new(MemoryStore::new());
            storage.set_fail_writes(true);
            let mut stats = StatsStore::load(storage.clone());

            stats.record_work_session_on(date(2024, 5, 10), 1500);

            assert_eq!(stats.records().len(), 1);
            assert_eq!(storage.raw(STATS_KEY), None);
        }
    }

    // ------------------------------------------------------------------------
    // Retention Tests
    // ------------------------------------------------------------------------

    mod retention_tests {
        use super::*;

        #[test]
        fn test_old_records_dropped_on_write() {
            let raw = r#"[
                {"date":"2024-04-01","workSessions":3,"totalFocusTime":75},
                {"date":"2024-04-20","workSessions":1,"totalFocusTime":25}
            ]"#;
            let storage = Arc::new(MemoryStore::with_value(STATS_KEY, raw));
            let mut stats = StatsStore::load(storage.clone());
            assert_eq!(stats.records().len(), 2);

            stats.record_work_session_on(date(2024, 5, 10), 1500);

            let dates: Vec<NaiveDate> = stored(&storage).iter().map(|r| r.date).collect();
            assert_eq!(dates, vec![date(2024, 4, 20), date(2024, 5, 10)]);
        }

        #[test]
        fn test_window_boundary() {
            let raw = r#"[
                {"date":"2024-04-10","workSessions":1,"totalFocusTime":25},
                {"date":"2024-04-11","workSessions":1,"totalFocusTime":25}
            ]"#;
            let mut stats =
                StatsStore::load(Arc::new(MemoryStore::with_value(STATS_KEY, raw)));

            // 2024-04-10 is 30 days before 2024-05-10; 2024-04-11 is 29.
            stats.record_work_session_on(date(2024, 5, 10), 60);

            assert!(stats.record_for(date(2024, 4, 10)).is_none());
            assert!(stats.record_for(date(2024, 4, 11)).is_some());
        }
    }

    // ------------------------------------------------------------------------
    // Load Tests
    // ------------------------------------------------------------------------

    mod load_tests {
        use super::*;

        #[test]
        fn test_malformed_entries_skipped() {
            let raw = r#"[
                {"date":"2024-05-01","workSessions":2,"totalFocusTime":50},
                {"date":"yesterday","workSessions":1,"totalFocusTime":25},
                {"workSessions":1},
                42
            ]"#;
            let stats = StatsStore::load(Arc::new(MemoryStore::with_value(STATS_KEY, raw)));
            assert_eq!(stats.records().len(), 1);
        }

        #[test]
        fn test_duplicate_days_are_folded() {
            let raw = r#"[
                {"date":"2024-05-01","workSessions":2,"totalFocusTime":50},
                {"date":"2024-05-01","workSessions":1,"totalFocusTime":25}
            ]"#;
            let stats = StatsStore::load(Arc::new(MemoryStore::with_value(STATS_KEY, raw)));

            assert_eq!(stats.records().len(), 1);
            assert_eq!(stats.records()[0].work_sessions, 3);
            assert_eq!(stats.records()[0].total_focus_minutes, 75);
        }

        #[test]
        fn test_huge_counts_saturate() {
            let raw = r#"[
                {"date":"2024-05-01","workSessions":4294967295,"totalFocusTime":4294967295},
                {"date":"2024-05-01","workSessions":1,"totalFocusTime":25},
                {"date":"2024-05-02","workSessions":1,"totalFocusTime":25}
            ]"#;
            let mut stats = StatsStore::load(Arc::new(MemoryStore::with_value(STATS_KEY, raw)));

            assert_eq!(stats.records()[0].work_sessions, u32::MAX);
            let summary = stats.summary();
            assert_eq!(summary.total_sessions, u32::MAX);
            assert_eq!(summary.total_minutes, u32::MAX);

            let record = stats.record_work_session_on(date(2024, 5, 1), 1500);
            assert_eq!(record.work_sessions, u32::MAX);
            assert_eq!(record.total_focus_minutes, u32::MAX);
        }

        #[test]
        fn test_garbage_starts_empty() {
            let stats =
                StatsStore::load(Arc::new(MemoryStore::with_value(STATS_KEY, "{oops")));
            assert!(stats.records().is_empty());
        }
    }

    // ------------------------------------------------------------------------
    // Summary Tests
    // ------------------------------------------------------------------------

    mod summary_tests {
        use super::*;

        #[test]
        fn test_empty_summary() {
            let stats = StatsStore::load(Arc::new(MemoryStore::new()));
            let summary = stats.summary();
            assert_eq!(summary.total_sessions, 0);
            assert_eq!(summary.total_minutes, 0);
            assert_eq!(summary.average_sessions_per_day, 0.0);
            assert_eq!(summary.days_recorded, 0);
        }

        #[test]
        fn test_summary_totals_and_average() {
            let mut stats = StatsStore::load(Arc::new(MemoryStore::new()));
            stats.record_work_session_on(date(2024, 5, 8), 1500);
            stats.record_work_session_on(date(2024, 5, 9), 1500);
            stats.record_work_session_on(date(2024, 5, 9), 1500);
            stats.record_work_session_on(date(2024, 5, 10), 1500);
            stats.record_work_session_on(date(2024, 5, 10), 1500);
            stats.record_work_session_on(date(2024, 5, 10), 1500);
            stats.record_work_session_on(date(2024, 5, 10), 1500);

            let summary = stats.summary();
            assert_eq!(summary.total_sessions, 7);
            assert_eq!(summary.total_minutes, 175);
            assert_eq!(summary.days_recorded, 3);
            assert_eq!(summary.average_sessions_per_day, 2.3);
        }
    }
}
