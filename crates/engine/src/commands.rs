//! Command structs for engine operations.
//!
//! These types group parameters for write operations (clock in/out, apply,
//! decide), keeping call sites readable and avoiding long argument lists.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::users::Role;

/// Open an employee's day.
#[derive(Clone, Debug)]
pub struct ClockInCmd {
    pub employee_code: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub ip_address: Option<String>,
}

impl ClockInCmd {
    #[must_use]
    pub fn new(employee_code: impl Into<String>, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            employee_code: employee_code.into(),
            date,
            time,
            ip_address: None,
        }
    }

    #[must_use]
    pub fn ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }
}

/// Close an employee's day.
#[derive(Clone, Debug)]
pub struct ClockOutCmd {
    pub employee_code: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub work_log: Option<String>,
}

impl ClockOutCmd {
    #[must_use]
    pub fn new(employee_code: impl Into<String>, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            employee_code: employee_code.into(),
            date,
            time,
            work_log: None,
        }
    }

    #[must_use]
    pub fn work_log(mut self, work_log: impl Into<String>) -> Self {
        self.work_log = Some(work_log.into());
        self
    }
}

/// File a leave request.
///
/// `year` selects the balance sheet the request counts against (the
/// application year, not the year of the requested dates).
#[derive(Clone, Debug)]
pub struct ApplyLeaveCmd {
    pub employee_code: String,
    pub year: i32,
    pub start_date: String,
    pub end_date: String,
    pub leave_type: String,
    pub reason: Option<String>,
    pub applied_at: DateTime<Utc>,
}

impl ApplyLeaveCmd {
    #[must_use]
    pub fn new(
        employee_code: impl Into<String>,
        year: i32,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        leave_type: impl Into<String>,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self {
            employee_code: employee_code.into(),
            year,
            start_date: start_date.into(),
            end_date: end_date.into(),
            leave_type: leave_type.into(),
            reason: None,
            applied_at,
        }
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Decide a pending leave request.
///
/// `action` is the raw wire string; anything but `Approved`/`Rejected` is
/// rejected before any gate runs. `actor_code` is the reviewer's own
/// employee code when they have one.
#[derive(Clone, Debug)]
pub struct DecideLeaveCmd {
    pub leave_id: i64,
    pub action: String,
    pub rejection_reason: Option<String>,
    pub actor_role: Role,
    pub actor_code: Option<String>,
}

impl DecideLeaveCmd {
    #[must_use]
    pub fn new(leave_id: i64, action: impl Into<String>, actor_role: Role) -> Self {
        Self {
            leave_id,
            action: action.into(),
            rejection_reason: None,
            actor_role,
            actor_code: None,
        }
    }

    #[must_use]
    pub fn rejection_reason(mut self, reason: impl Into<String>) -> Self {
        self.rejection_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn actor_code(mut self, actor_code: impl Into<String>) -> Self {
        self.actor_code = Some(actor_code.into());
        self
    }
}
