use chrono::NaiveDate;
use derive_more::Display;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum NotFoundKind {
    #[display(fmt = "shift {}", _0)]
    Shift(u64),

    #[display(fmt = "employee {}", _0)]
    Employee(u64),

    #[display(fmt = "assignment {}", _0)]
    Assignment(u64),

    #[display(
        fmt = "clock-in for employee {} on shift {} ({})",
        employee_id,
        shift_id,
        date
    )]
    NoOpenClockIn {
        employee_id: u64,
        shift_id: u64,
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ConflictKind {
    #[display(fmt = "shift window overlaps shift {}", with)]
    ShiftOverlap { with: u64 },

    #[display(fmt = "date range overlaps assignment {}", with)]
    AssignmentOverlap { with: u64 },

    #[display(fmt = "already clocked in for this shift today")]
    AlreadyClockedIn,

    #[display(fmt = "already clocked out for this shift today")]
    AlreadyClockedOut,

    #[display(fmt = "shift still has {} active assignment(s)", active)]
    ShiftInUse { active: usize },
}

/// Every failure a scheduling operation can report to its caller.
#[derive(Debug, Display)]
pub enum SchedulingError {
    #[display(fmt = "invalid request: {}", _0)]
    Validation(String),

    #[display(fmt = "{} not found", _0)]
    NotFound(NotFoundKind),

    #[display(fmt = "conflict: {}", _0)]
    Conflict(ConflictKind),

    #[display(fmt = "storage failure: {}", _0)]
    Storage(StoreError),
}

impl std::error::Error for SchedulingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchedulingError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for SchedulingError {
    fn from(e: StoreError) -> Self {
        SchedulingError::Storage(e)
    }
}

impl SchedulingError {
    /// Stable machine-readable code, used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            SchedulingError::Validation(_) => "validation_error",
            SchedulingError::NotFound(NotFoundKind::NoOpenClockIn { .. }) => "no_open_clock_in",
            SchedulingError::NotFound(_) => "not_found",
            SchedulingError::Conflict(kind) => match kind {
                ConflictKind::ShiftOverlap { .. } => "shift_overlap",
                ConflictKind::AssignmentOverlap { .. } => "assignment_overlap",
                ConflictKind::AlreadyClockedIn => "already_clocked_in",
                ConflictKind::AlreadyClockedOut => "already_clocked_out",
                ConflictKind::ShiftInUse { .. } => "shift_in_use",
            },
            SchedulingError::Storage(_) => "storage_error",
        }
    }

    /// A missing row becomes `kind`; any other storage failure passes through.
    pub(crate) fn missing(kind: NotFoundKind) -> impl FnOnce(StoreError) -> SchedulingError {
        move |e| match e {
            StoreError::NotFound => SchedulingError::NotFound(kind),
            other => SchedulingError::Storage(other),
        }
    }
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;
