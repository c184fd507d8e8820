use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

/// Only `Present` is written by clock-in; the others are set by HR processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    OnLeave,
}

impl TryFrom<String> for AttendanceStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 5)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub shift_id: u64,

    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub work_date: NaiveDate,

    #[schema(example = "2024-03-01T08:01:12Z", value_type = String, format = "date-time")]
    pub clock_in: DateTime<Utc>,

    #[schema(example = "2024-03-01T16:03:40Z", value_type = Option<String>, format = "date-time")]
    pub clock_out: Option<DateTime<Utc>>,

    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
}

/// Where a (employee, shift, day) key sits in the clock-in/clock-out cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceState {
    NoRecord,
    ClockedIn,
    ClockedOut,
}

impl AttendanceState {
    pub fn of(record: Option<&AttendanceRecord>) -> Self {
        match record {
            None => AttendanceState::NoRecord,
            Some(r) if r.clock_out.is_none() => AttendanceState::ClockedIn,
            Some(_) => AttendanceState::ClockedOut,
        }
    }
}

impl AttendanceRecord {
    pub fn key(&self) -> AttendanceKey {
        AttendanceKey {
            employee_id: self.employee_id,
            shift_id: self.shift_id,
            work_date: self.work_date,
        }
    }

    pub fn state(&self) -> AttendanceState {
        AttendanceState::of(Some(self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttendanceKey {
    pub employee_id: u64,
    pub shift_id: u64,
    pub work_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub key: AttendanceKey,
    pub clock_in: DateTime<Utc>,
    pub status: AttendanceStatus,
}
