//! Interval arithmetic behind the two overlap invariants.
//!
//! Shift windows are time-of-day and half-open: a shift ending at 16:00 does
//! not clash with one starting at 16:00. Assignment spans are calendar days and
//! closed: both the first and the last day are worked, so sharing a boundary
//! day is a clash.

use chrono::{NaiveDate, NaiveTime};

use crate::scheduling::error::{SchedulingError, SchedulingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl ShiftWindow {
    /// Windows must not wrap past midnight.
    pub fn new(start: NaiveTime, end: NaiveTime) -> SchedulingResult<Self> {
        if start >= end {
            return Err(SchedulingError::Validation(format!(
                "shift start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Wraps a window that was validated when it was stored.
    pub(crate) fn from_stored(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &ShiftWindow) -> bool {
        self.start < other.end && self.end > other.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> SchedulingResult<Self> {
        if start > end {
            return Err(SchedulingError::Validation(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub(crate) fn from_stored(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}
