//! Leave request primitives.
//!
//! A `LeaveRequest` enters the workflow as `Pending` and is moved to
//! `Approved` or `Rejected` by a reviewer. The stored `leave_type` is free
//! text; [`LeaveKind`] only classifies the three types that carry a balance.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl TryFrom<&str> for LeaveStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(EngineError::InvalidAction(format!(
                "invalid leave status: {other}"
            ))),
        }
    }
}

/// A reviewer's decision. Anything but the two exact strings is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaveAction {
    Approved,
    Rejected,
}

impl LeaveAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// The status a decided request ends up in.
    pub fn status(self) -> LeaveStatus {
        match self {
            Self::Approved => LeaveStatus::Approved,
            Self::Rejected => LeaveStatus::Rejected,
        }
    }
}

impl TryFrom<&str> for LeaveAction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(EngineError::InvalidAction(other.to_string())),
        }
    }
}

/// The three leave types backed by a balance column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveKind {
    Sick,
    Casual,
    Privilege,
}

impl LeaveKind {
    /// Exact-case match, used when booking a decided request against the
    /// balance. Any other spelling means the type carries no balance.
    pub fn from_exact(value: &str) -> Option<Self> {
        match value {
            "Sick" => Some(Self::Sick),
            "Casual" => Some(Self::Casual),
            "Privilege" => Some(Self::Privilege),
            _ => None,
        }
    }

    /// Case-insensitive match, used by the apply-time exhaustion gate.
    pub fn from_loose(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "sick" => Some(Self::Sick),
            "casual" => Some(Self::Casual),
            "privilege" => Some(Self::Privilege),
            _ => None,
        }
    }

    /// Title-case label used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sick => "Sick",
            Self::Casual => "Casual",
            Self::Privilege => "Privilege",
        }
    }

    /// The `leave_balances` counter column this kind books into.
    pub fn used_column(self) -> &'static str {
        match self {
            Self::Sick => "sick_used",
            Self::Casual => "casual_used",
            Self::Privilege => "privilege_used",
        }
    }
}

/// A leave request as the workflow sees it.
///
/// `start_date`/`end_date` are `YYYY-MM-DD` strings taken at face value;
/// parsing only happens where a count of days is needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_code: String,
    pub start_date: String,
    pub end_date: String,
    pub leave_type: String,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub rejection_reason: Option<String>,
    pub applied_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Inclusive day count of the requested span.
    ///
    /// Spans with an endpoint that does not parse as `YYYY-MM-DD` book a
    /// single day.
    pub fn booked_days(&self) -> i64 {
        let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
        match (parse(&self.start_date), parse(&self.end_date)) {
            (Some(start), Some(end)) => end.signed_duration_since(start).num_days() + 1,
            _ => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "leaves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub employee_code: String,
    pub start_date: String,
    pub end_date: String,
    pub leave_type: String,
    pub reason: Option<String>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub applied_at: DateTimeUtc,
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

impl TryFrom<Model> for LeaveRequest {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            employee_code: model.employee_code,
            start_date: model.start_date,
            end_date: model.end_date,
            leave_type: model.leave_type,
            reason: model.reason,
            status: LeaveStatus::try_from(model.status.as_str())?,
            rejection_reason: model.rejection_reason,
            applied_at: model.applied_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str) -> LeaveRequest {
        LeaveRequest {
            id: 1,
            employee_code: "EMP001".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            leave_type: "Casual".to_string(),
            reason: None,
            status: LeaveStatus::Pending,
            rejection_reason: None,
            applied_at: Utc::now(),
        }
    }

    #[test]
    fn booked_days_is_inclusive() {
        assert_eq!(request("2024-04-10", "2024-04-12").booked_days(), 3);
        assert_eq!(request("2024-04-10", "2024-04-10").booked_days(), 1);
    }

    #[test]
    fn booked_days_defaults_to_one_on_bad_dates() {
        assert_eq!(request("next monday", "2024-04-12").booked_days(), 1);
        assert_eq!(request("2024-04-10", "").booked_days(), 1);
    }

    #[test]
    fn kind_matching_is_exact_for_booking_and_loose_for_the_gate() {
        assert_eq!(LeaveKind::from_exact("Casual"), Some(LeaveKind::Casual));
        assert_eq!(LeaveKind::from_exact("casual"), None);
        assert_eq!(LeaveKind::from_loose("CASUAL"), Some(LeaveKind::Casual));
        assert_eq!(LeaveKind::from_loose("Paternity"), None);
    }

    #[test]
    fn action_parsing_rejects_anything_else() {
        assert_eq!(LeaveAction::try_from("Approved"), Ok(LeaveAction::Approved));
        assert_eq!(
            LeaveAction::try_from("approved"),
            Err(EngineError::InvalidAction("approved".to_string()))
        );
    }
}
