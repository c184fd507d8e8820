//! Daily attendance per (employee, shift).
//!
//! ```text
//! NoRecord --clock_in--> ClockedIn --clock_out--> ClockedOut
//! ```
//!
//! The day is the UTC date of the injected clock. Clocking in again on the
//! same day is refused in either later state, and so is a second clock-out;
//! the first clock-out timestamp is kept.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

use crate::model::attendance::{
    AttendanceKey, AttendanceRecord, AttendanceState, AttendanceStatus, NewAttendance,
};
use crate::scheduling::clock::Clock;
use crate::scheduling::error::{ConflictKind, NotFoundKind, SchedulingError, SchedulingResult};
use crate::scheduling::locks::KeyedLocks;
use crate::store::{AttendanceFilter, AttendanceRepository, StoreError};

#[async_trait]
pub trait AttendanceTracker: Send + Sync {
    async fn clock_in(&self, employee_id: u64, shift_id: u64) -> SchedulingResult<AttendanceRecord>;

    async fn clock_out(&self, employee_id: u64, shift_id: u64)
    -> SchedulingResult<AttendanceRecord>;

    async fn attendance_on(
        &self,
        employee_id: u64,
        shift_id: u64,
        date: NaiveDate,
    ) -> SchedulingResult<Option<AttendanceRecord>>;

    /// All of an employee's records with `from <= work_date <= to`
    async fn attendance_between(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> SchedulingResult<Vec<AttendanceRecord>>;
}

pub struct AttendanceTrackerService {
    records: Arc<dyn AttendanceRepository>,
    clock: Arc<dyn Clock>,
    locks: KeyedLocks<AttendanceKey>,
}

impl AttendanceTrackerService {
    pub fn new(records: Arc<dyn AttendanceRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records,
            clock,
            locks: KeyedLocks::new(),
        }
    }
}

#[async_trait]
impl AttendanceTracker for AttendanceTrackerService {
    async fn clock_in(&self, employee_id: u64, shift_id: u64) -> SchedulingResult<AttendanceRecord> {
        let now = self.clock.now();
        let key = AttendanceKey {
            employee_id,
            shift_id,
            work_date: now.date_naive(),
        };

        let _guard = self.locks.acquire(key).await;

        let existing = self.records.find(&key).await?;
        if AttendanceState::of(existing.as_ref()) != AttendanceState::NoRecord {
            return Err(SchedulingError::Conflict(ConflictKind::AlreadyClockedIn));
        }

        let record = self
            .records
            .insert(NewAttendance {
                key,
                clock_in: now,
                status: AttendanceStatus::Present,
            })
            .await
            .map_err(|e| match e {
                // another process won the race on the unique key
                StoreError::DuplicateKey(_) => {
                    SchedulingError::Conflict(ConflictKind::AlreadyClockedIn)
                }
                other => SchedulingError::Storage(other),
            })?;

        info!(
            employee_id,
            shift_id,
            work_date = %key.work_date,
            "Clocked in"
        );
        Ok(record)
    }

    async fn clock_out(
        &self,
        employee_id: u64,
        shift_id: u64,
    ) -> SchedulingResult<AttendanceRecord> {
        let now = self.clock.now();
        let key = AttendanceKey {
            employee_id,
            shift_id,
            work_date: now.date_naive(),
        };
        let no_open_clock_in = NotFoundKind::NoOpenClockIn {
            employee_id,
            shift_id,
            date: key.work_date,
        };

        let _guard = self.locks.acquire(key).await;

        let mut record = match self.records.find(&key).await? {
            Some(r) => r,
            None => return Err(SchedulingError::NotFound(no_open_clock_in)),
        };
        if record.state() == AttendanceState::ClockedOut {
            return Err(SchedulingError::Conflict(ConflictKind::AlreadyClockedOut));
        }

        let clock_out = if now < record.clock_in {
            warn!(
                employee_id,
                shift_id,
                clock_in = %record.clock_in,
                now = %now,
                "Clock-out precedes clock-in, clamping to clock-in"
            );
            record.clock_in
        } else {
            now
        };
        record.clock_out = Some(clock_out);

        self.records
            .update(&record)
            .await
            .map_err(SchedulingError::missing(no_open_clock_in))?;

        info!(
            employee_id,
            shift_id,
            work_date = %key.work_date,
            "Clocked out"
        );
        Ok(record)
    }

    async fn attendance_on(
        &self,
        employee_id: u64,
        shift_id: u64,
        date: NaiveDate,
    ) -> SchedulingResult<Option<AttendanceRecord>> {
        let key = AttendanceKey {
            employee_id,
            shift_id,
            work_date: date,
        };
        Ok(self.records.find(&key).await?)
    }

    async fn attendance_between(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> SchedulingResult<Vec<AttendanceRecord>> {
        if from > to {
            return Err(SchedulingError::Validation(format!(
                "from {from} is after to {to}"
            )));
        }
        let filter = AttendanceFilter {
            employee_id: Some(employee_id),
            shift_id: None,
            from: Some(from),
            to: Some(to),
        };
        Ok(self.records.query(&filter).await?)
    }
}
