//! Progress tracking for long-running tasks.
//!
//! [`ProgressState`] is a plain value: every transition mutates it in memory
//! and never touches storage. Callers persist the result explicitly (see
//! `ProgressRepo::save_state` in `ports_db`).
//!
//! The status machine is advisory. `Waiting -> Started -> Finished | Failed`
//! is the expected path and `reset` returns to `Waiting` from anywhere, but no
//! transition is rejected.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Status ID type matching the SMALLINT column and the `progress_statuses`
/// lookup table.
pub type StatusId = i16;

/// Milliseconds per minute, used to express ETAs in minutes.
const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Work units of a freshly created or reset record.
pub const INITIAL_TOTAL_WORK: i32 = 1;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Execution status of a progress record.
///
/// Discriminants match the seed order of the `progress_statuses` table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Waiting = 1,
    Started = 2,
    Finished = 3,
    Failed = 4,
}

impl ProgressStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Resolve a database status ID.
    pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
        match id {
            1 => Ok(Self::Waiting),
            2 => Ok(Self::Started),
            3 => Ok(Self::Finished),
            4 => Ok(Self::Failed),
            other => Err(CoreError::Internal(format!(
                "Unknown progress status id {other}"
            ))),
        }
    }

    /// Display label, identical to the `name` column of `progress_statuses`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::Started => "Started",
            Self::Finished => "Finished",
            Self::Failed => "Failed",
        }
    }
}

impl From<ProgressStatus> for StatusId {
    fn from(value: ProgressStatus) -> Self {
        value as StatusId
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// In-memory execution state of one progress record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressState {
    pub status: ProgressStatus,
    pub created_at: Timestamp,
    pub total_work: i32,
    pub current_work: i32,
    pub success: bool,
    pub running: bool,
    pub errors: Vec<serde_json::Value>,
}

impl ProgressState {
    /// A new record in `Waiting` with one unit of total work.
    pub fn new(now: Timestamp) -> Self {
        Self {
            status: ProgressStatus::Waiting,
            created_at: now,
            total_work: INITIAL_TOTAL_WORK,
            current_work: 0,
            success: false,
            running: true,
            errors: Vec::new(),
        }
    }

    /// Completion percentage, `current_work / total_work * 100`.
    ///
    /// Returns 0 when `total_work` is 0. The value is not clamped, so a caller
    /// reporting more work than the total gets more than 100.
    pub fn get_progress(&self) -> f64 {
        if self.total_work == 0 {
            return 0.0;
        }
        f64::from(self.current_work) / f64::from(self.total_work) * 100.0
    }

    /// Remaining minutes, linearly extrapolated from the throughput observed
    /// since `created_at`.
    ///
    /// Returns `None` while no work has been recorded, or when no time has
    /// elapsed yet (no rate can be observed).
    pub fn estimate_duration(&self, now: Timestamp) -> Option<f64> {
        if self.current_work == 0 {
            return None;
        }
        let elapsed_minutes = (now - self.created_at).num_milliseconds() as f64 / MILLIS_PER_MINUTE;
        if elapsed_minutes <= 0.0 {
            return None;
        }
        let speed = f64::from(self.current_work) / elapsed_minutes;
        Some(f64::from(self.total_work - self.current_work) / speed)
    }

    /// Mark the work as started.
    pub fn start(&mut self) {
        self.status = ProgressStatus::Started;
        self.running = true;
    }

    /// Overwrite the work counters.
    pub fn set_work(&mut self, current_work: i32, total_work: i32) {
        self.current_work = current_work;
        self.total_work = total_work;
    }

    /// Add `amount` finished work units.
    pub fn advance(&mut self, amount: i32) {
        self.current_work = self.current_work.saturating_add(amount);
    }

    /// Append an entry to the error list.
    pub fn push_error(&mut self, entry: serde_json::Value) {
        self.errors.push(entry);
    }

    /// Finish successfully. Forces `current_work` up to `total_work`.
    pub fn set_success(&mut self) {
        self.status = ProgressStatus::Finished;
        self.current_work = self.total_work;
        self.success = true;
        self.running = false;
    }

    /// Finish with a failure. Work counters and errors are kept as they are.
    pub fn set_failed(&mut self) {
        self.status = ProgressStatus::Failed;
        self.success = false;
        self.running = false;
    }

    /// Return to the initial `Waiting` state with a fresh timestamp.
    pub fn reset(&mut self, now: Timestamp) {
        *self = Self::new(now);
    }
}

/// Validate work counters supplied by a caller.
pub fn validate_work(current_work: i32, total_work: i32) -> Result<(), CoreError> {
    if current_work < 0 || total_work < 0 {
        return Err(CoreError::Validation(format!(
            "Work counters must not be negative (current_work={current_work}, total_work={total_work})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    // -- construction --

    #[test]
    fn new_record_is_waiting_with_one_unit() {
        let state = ProgressState::new(t0());
        assert_eq!(state.status, ProgressStatus::Waiting);
        assert_eq!(state.total_work, 1);
        assert_eq!(state.current_work, 0);
        assert!(!state.success);
        assert!(state.running);
        assert!(state.errors.is_empty());
    }

    // -- get_progress --

    #[test]
    fn progress_zero_when_no_work_done() {
        let state = ProgressState::new(t0());
        assert_eq!(state.get_progress(), 0.0);
    }

    #[test]
    fn progress_zero_when_total_is_zero() {
        let mut state = ProgressState::new(t0());
        state.set_work(5, 0);
        assert_eq!(state.get_progress(), 0.0);
    }

    #[test]
    fn progress_is_ratio_times_hundred() {
        let mut state = ProgressState::new(t0());
        state.set_work(1, 4);
        assert_eq!(state.get_progress(), 25.0);
    }

    #[test]
    fn progress_is_not_clamped() {
        let mut state = ProgressState::new(t0());
        state.set_work(3, 2);
        assert_eq!(state.get_progress(), 150.0);
    }

    #[test]
    fn progress_hundred_after_success() {
        let mut state = ProgressState::new(t0());
        state.set_work(0, 1);
        assert_eq!(state.get_progress(), 0.0);
        state.set_success();
        assert_eq!(state.get_progress(), 100.0);
    }

    // -- estimate_duration --

    #[test]
    fn estimate_none_without_work() {
        let state = ProgressState::new(t0());
        assert_eq!(state.estimate_duration(t0() + Duration::minutes(10)), None);
    }

    #[test]
    fn estimate_none_without_elapsed_time() {
        let mut state = ProgressState::new(t0());
        state.set_work(1, 10);
        assert_eq!(state.estimate_duration(t0()), None);
    }

    #[test]
    fn estimate_extrapolates_linearly() {
        let mut state = ProgressState::new(t0());
        // 2 of 10 units in 4 minutes -> 0.5 units/min -> 8 units need 16 minutes.
        state.set_work(2, 10);
        let eta = state.estimate_duration(t0() + Duration::minutes(4)).unwrap();
        assert!((eta - 16.0).abs() < 1e-9, "unexpected eta {eta}");
    }

    #[test]
    fn estimate_positive_and_finite_under_constant_throughput() {
        let mut state = ProgressState::new(t0());
        for minute in 1..10 {
            state.set_work(minute, 10);
            let eta = state
                .estimate_duration(t0() + Duration::minutes(i64::from(minute)))
                .unwrap();
            assert!(eta.is_finite() && eta > 0.0);
            assert!((eta - f64::from(10 - minute)).abs() < 1e-9);
        }
    }

    #[test]
    fn estimate_zero_once_all_work_done() {
        let mut state = ProgressState::new(t0());
        state.set_work(10, 10);
        assert_eq!(state.estimate_duration(t0() + Duration::minutes(3)), Some(0.0));
    }

    // -- transitions --

    #[test]
    fn start_moves_to_started() {
        let mut state = ProgressState::new(t0());
        state.start();
        assert_eq!(state.status, ProgressStatus::Started);
        assert!(state.running);
    }

    #[test]
    fn advance_adds_work() {
        let mut state = ProgressState::new(t0());
        state.set_work(0, 5);
        state.advance(2);
        state.advance(1);
        assert_eq!(state.current_work, 3);
    }

    #[test]
    fn success_forces_current_to_total() {
        let mut state = ProgressState::new(t0());
        state.set_work(3, 7);
        state.set_success();
        assert_eq!(state.status, ProgressStatus::Finished);
        assert_eq!(state.current_work, 7);
        assert!(state.success);
        assert!(!state.running);
    }

    #[test]
    fn failed_keeps_counters_and_errors() {
        let mut state = ProgressState::new(t0());
        state.set_work(3, 7);
        state.push_error(serde_json::json!({"message": "solver diverged"}));
        state.set_failed();
        assert_eq!(state.status, ProgressStatus::Failed);
        assert_eq!(state.current_work, 3);
        assert_eq!(state.total_work, 7);
        assert_eq!(state.errors.len(), 1);
        assert!(!state.success);
        assert!(!state.running);
    }

    #[test]
    fn reset_returns_to_initial_state_from_any_status() {
        let later = t0() + Duration::hours(1);
        for finish in [ProgressState::set_success, ProgressState::set_failed] {
            let mut state = ProgressState::new(t0());
            state.set_work(4, 9);
            state.push_error(serde_json::json!("boom"));
            finish(&mut state);
            state.reset(later);
            assert_eq!(state, ProgressState::new(later));
        }
    }

    #[test]
    fn transitions_are_not_validated() {
        let mut state = ProgressState::new(t0());
        state.set_success();
        state.start();
        assert_eq!(state.status, ProgressStatus::Started);
    }

    // -- status ids --

    #[test]
    fn status_ids_round_trip() {
        for status in [
            ProgressStatus::Waiting,
            ProgressStatus::Started,
            ProgressStatus::Finished,
            ProgressStatus::Failed,
        ] {
            assert_eq!(ProgressStatus::from_id(status.id()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_id_is_rejected() {
        assert_matches!(ProgressStatus::from_id(9), Err(CoreError::Internal(_)));
    }

    #[test]
    fn negative_work_is_rejected() {
        assert!(validate_work(0, 1).is_ok());
        assert_matches!(validate_work(-1, 1), Err(CoreError::Validation(_)));
        assert_matches!(validate_work(1, -1), Err(CoreError::Validation(_)));
    }
}
