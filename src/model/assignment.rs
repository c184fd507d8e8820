use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::scheduling::window::DateSpan;

/// Binding of one employee to one shift for a closed range of calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Assignment {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 5)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub shift_id: u64,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "2023-12-20T09:30:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    pub fn span(&self) -> DateSpan {
        DateSpan::from_stored(self.start_date, self.end_date)
    }

    /// Still in force on `day` (its last day has not passed yet)
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.end_date >= day
    }
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub employee_id: u64,
    pub shift_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
