use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod session {
    use super::*;

    /// System role of a login principal.
    ///
    /// The server treats roles as:
    /// - `Admin`: full access, may decide any leave request.
    /// - `HR`: reviewer; their own requests escalate to an administrator.
    /// - `Management`: reviewer.
    /// - `Employee`: self-service only.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Role {
        Admin,
        #[serde(rename = "HR")]
        Hr,
        Management,
        Employee,
    }

    impl Role {
        /// Returns the canonical role string stored by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Admin => "Admin",
                Self::Hr => "HR",
                Self::Management => "Management",
                Self::Employee => "Employee",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub username: String,
        pub password: String,
    }

    /// The authenticated principal, as echoed by `/session/me`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionUser {
        pub username: String,
        pub employee_code: Option<String>,
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        /// Opaque bearer token for the `Authorization` header.
        pub token: String,
        pub expires_at: DateTime<Utc>,
        pub user: SessionUser,
    }
}

pub mod attendance {
    use super::*;

    /// Where today's attendance row stands.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DayState {
        NotStarted,
        ClockedIn,
        Completed,
    }

    /// One attendance row, times as stored (`HH:MM:SS`, server-local).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttendanceRecord {
        pub id: i64,
        pub employee_code: String,
        /// `YYYY-MM-DD`.
        pub date: String,
        pub clock_in: Option<String>,
        pub clock_out: Option<String>,
        pub work_log: Option<String>,
        pub status: String,
        pub ip_address: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusResponse {
        pub state: DayState,
        pub record: Option<AttendanceRecord>,
    }

    /// Request body for clocking out.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClockOut {
        pub work_log: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryResponse {
        pub records: Vec<AttendanceRecord>,
    }

    /// Query for the per-day log; `date` defaults to today on the server.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyQuery {
        pub date: Option<String>,
    }

    /// One employee's row in the daily log, joined with the directory.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyLogRow {
        pub employee_name: String,
        pub designation: Option<String>,
        pub record: AttendanceRecord,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyLogResponse {
        pub date: String,
        pub entries: Vec<DailyLogRow>,
    }
}

pub mod leave {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum LeaveStatus {
        Pending,
        Approved,
        Rejected,
    }

    /// Request body for applying for leave. Dates are `YYYY-MM-DD`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeaveApply {
        pub start_date: String,
        pub end_date: String,
        pub leave_type: String,
        pub reason: Option<String>,
    }

    /// Request body for deciding a pending request.
    ///
    /// `action` is validated server-side; anything other than `Approved` or
    /// `Rejected` is a 400.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeaveAction {
        pub action: String,
        pub rejection_reason: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeaveView {
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MyLeavesResponse {
        pub leaves: Vec<LeaveView>,
    }

    /// A pending request with the applicant's display name, when the
    /// directory knows them.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PendingLeaveRow {
        pub employee_name: Option<String>,
        pub request: LeaveView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PendingLeavesResponse {
        pub leaves: Vec<PendingLeaveRow>,
    }

    /// Per-year counters; `used` may exceed `total` after retroactive
    /// approvals.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub year: i32,
        pub sick_used: i32,
        pub sick_total: i32,
        pub casual_used: i32,
        pub casual_total: i32,
        pub privilege_used: i32,
        pub privilege_total: i32,
    }
}

pub mod summary {
    use super::*;

    /// Reconciled mark for one calendar day.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DayMark {
        Present,
        Leave,
        Weekend,
        Absent,
    }

    /// Month totals. Weekend days are not counted anywhere.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthStats {
        pub present: u32,
        pub leave: u32,
        pub absent: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EmployeeMonth {
        pub employee_code: String,
        pub employee_name: String,
        /// Index 0 is the 1st of the month.
        pub days: Vec<DayMark>,
        pub stats: MonthStats,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryQuery {
        pub year: i32,
        pub month: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummaryResponse {
        pub year: i32,
        pub month: u32,
        pub employees: Vec<EmployeeMonth>,
    }
}
