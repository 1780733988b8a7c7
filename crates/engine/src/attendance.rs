//! Daily attendance primitives.
//!
//! One row per employee per calendar day. The day's `ClockState` is never
//! stored; it is derived from which clock fields are set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status stored on a row opened by a clock-in.
pub const STATUS_PRESENT: &str = "Present";

/// Where an employee's day stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    NotStarted,
    ClockedIn,
    Completed,
}

impl ClockState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::ClockedIn => "clocked_in",
            Self::Completed => "completed",
        }
    }
}

/// A single employee-day attendance record.
///
/// `date` is `YYYY-MM-DD`; the clock fields are `HH:MM:SS`. Both are kept as
/// plain strings end to end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDay {
    pub id: i64,
    pub employee_code: String,
    pub date: String,
    pub clock_in: Option<String>,
    pub clock_out: Option<String>,
    pub work_log: Option<String>,
    pub status: String,
    pub ip_address: Option<String>,
}

impl AttendanceDay {
    /// State of an existing row: closed rows are `Completed`, open ones
    /// `ClockedIn`. A missing row is `NotStarted` (handled by the caller).
    pub fn state(&self) -> ClockState {
        if self.clock_out.is_some() {
            ClockState::Completed
        } else {
            ClockState::ClockedIn
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub employee_code: String,
    pub date: String,
    pub clock_in: Option<String>,
    pub clock_out: Option<String>,
    pub work_log: Option<String>,
    pub status: String,
    pub ip_address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeCode",
        to = "super::employees::Column::EmployeeCode"
    )]
    Employee,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AttendanceDay {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            employee_code: model.employee_code,
            date: model.date,
            clock_in: model.clock_in,
            clock_out: model.clock_out,
            work_log: model.work_log,
            status: model.status,
            ip_address: model.ip_address,
        }
    }
}
