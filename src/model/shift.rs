use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::scheduling::window::ShiftWindow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Morning",
        "start_time": "08:00:00",
        "end_time": "16:00:00"
    })
)]
pub struct Shift {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Morning")]
    pub name: String,

    #[schema(example = "08:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,

    #[schema(example = "16:00:00", value_type = String, format = "time")]
    pub end_time: NaiveTime,
}

impl Shift {
    pub fn window(&self) -> ShiftWindow {
        ShiftWindow::from_stored(self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone)]
pub struct NewShift {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Replacement window for an existing shift; `None` keeps the current name.
#[derive(Debug, Clone)]
pub struct ShiftUpdate {
    pub name: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}
