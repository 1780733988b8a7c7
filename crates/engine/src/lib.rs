//! Attendance and leave management engine.
//!
//! The engine owns the domain rules on top of a SQLite database reached
//! through `sea-orm`:
//!
//! - the daily attendance ledger (clock in, clock out, history, daily log);
//! - leave balances, created lazily per employee and year;
//! - the leave approval workflow (apply, list, approve/reject);
//! - the monthly reconciliation summary;
//! - read-only lookups against the employee directory.
//!
//! All operations run inside database transactions; construct an [`Engine`]
//! with [`Engine::builder`] and an open [`sea_orm::DatabaseConnection`].

mod attendance;
mod commands;
mod employees;
mod error;
mod leave_balances;
mod leaves;
mod ops;
mod sessions;
mod users;

pub use attendance::{AttendanceDay, ClockState};
pub use commands::{ApplyLeaveCmd, ClockInCmd, ClockOutCmd, DecideLeaveCmd};
pub use employees::Employee;
pub use error::EngineError;
pub use leave_balances::LeaveBalance;
pub use leaves::{LeaveAction, LeaveKind, LeaveRequest, LeaveStatus};
pub use ops::{
    DailyLogEntry, DayMark, DayStatus, EmployeeMonthlySummary, Engine, EngineBuilder, MonthStats,
    PendingLeave,
};
pub use users::{Role, hash_password, verify_password};

/// Entity modules the server layer queries directly (auth plumbing).
pub mod entities {
    pub mod employees {
        pub use crate::employees::{ActiveModel, Column, Entity, Model, STATUS_ACTIVE};
    }
    pub mod sessions {
        pub use crate::sessions::{ActiveModel, Column, Entity, Model};
    }
    pub mod users {
        pub use crate::users::{ActiveModel, Column, Entity, Model};
    }
}

pub type ResultEngine<T> = Result<T, EngineError>;
