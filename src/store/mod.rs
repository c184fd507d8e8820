//! Storage repositories consumed by the scheduling core.
//!
//! One trait per owned entity. Implementations must report a duplicate natural
//! key on insert as [`StoreError::DuplicateKey`] so the core can turn it into a
//! conflict instead of a generic failure.
//!
//! Shift overlap, assignment overlap and the shift-in-use guard are enforced
//! only by in-process locks in the scheduling core, with no storage
//! constraint behind them. Run a single instance of the service against a
//! given database. Attendance is the exception: the `uq_attendance_day`
//! unique key still rejects a second clock-in written by another process.

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;

use crate::model::assignment::{Assignment, NewAssignment};
use crate::model::attendance::{AttendanceKey, AttendanceRecord, NewAttendance};
use crate::model::shift::{NewShift, Shift};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub use mysql::{MySqlEmployeeDirectory, MySqlStore};

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "duplicate key: {}", _0)]
    DuplicateKey(String),

    #[display(fmt = "record not found")]
    NotFound,

    #[display(fmt = "database error: {}", _0)]
    Backend(String),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            // 23000 = integrity constraint violation (duplicate entry)
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23000") => {
                StoreError::DuplicateKey(db_err.message().to_string())
            }
            _ => StoreError::Backend(e.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Default)]
pub struct ShiftFilter {
    /// Leave this shift out of the result (used when re-validating an update)
    pub exclude_id: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub employee_id: Option<u64>,
    pub shift_id: Option<u64>,
    /// Only assignments whose end date is on or after this day
    pub active_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub employee_id: Option<u64>,
    pub shift_id: Option<u64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[async_trait]
pub trait ShiftRepository: Send + Sync {
    async fn find(&self, id: u64) -> StoreResult<Option<Shift>>;

    async fn insert(&self, shift: NewShift) -> StoreResult<Shift>;

    async fn update(&self, shift: &Shift) -> StoreResult<()>;

    async fn delete(&self, id: u64) -> StoreResult<()>;

    /// Shifts ordered by start time
    async fn query(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn find(&self, id: u64) -> StoreResult<Option<Assignment>>;

    async fn insert(&self, assignment: NewAssignment) -> StoreResult<Assignment>;

    async fn delete(&self, id: u64) -> StoreResult<()>;

    /// Assignments ordered by start date
    async fn query(&self, filter: &AssignmentFilter) -> StoreResult<Vec<Assignment>>;
}

/// Attendance rows are never deleted and are keyed by
/// (employee, shift, work date), which must be unique in the backing store.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find(&self, key: &AttendanceKey) -> StoreResult<Option<AttendanceRecord>>;

    async fn insert(&self, record: NewAttendance) -> StoreResult<AttendanceRecord>;

    async fn update(&self, record: &AttendanceRecord) -> StoreResult<()>;

    /// Records ordered by work date, then shift
    async fn query(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>>;
}
