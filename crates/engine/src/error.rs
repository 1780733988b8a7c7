//! The module contains the error the engine can throw.
//!
//! Most variants are caller-recoverable domain errors with user-facing
//! messages, for example:
//!
//! - [`AlreadyClockedIn`] thrown on a second clock-in for the same day.
//! - [`InsufficientBalance`] thrown when a leave type is exhausted.
//!
//!  [`AlreadyClockedIn`]: EngineError::AlreadyClockedIn
//!  [`InsufficientBalance`]: EngineError::InsufficientBalance
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Already clocked in for today")]
    AlreadyClockedIn,
    #[error("No attendance record found for today. Please clock in first.")]
    NoAttendanceRecord,
    #[error("Already clocked out.")]
    AlreadyClockedOut,
    #[error("Insufficient {0} Leave balance")]
    InsufficientBalance(String),
    #[error("Leave request not found")]
    LeaveNotFound,
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("You cannot approve your own leave request.")]
    SelfApprovalForbidden,
    #[error("HR leave requests can only be approved by an Administrator.")]
    HierarchyViolation,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AlreadyClockedIn, Self::AlreadyClockedIn)
            | (Self::NoAttendanceRecord, Self::NoAttendanceRecord)
            | (Self::AlreadyClockedOut, Self::AlreadyClockedOut)
            | (Self::LeaveNotFound, Self::LeaveNotFound)
            | (Self::SelfApprovalForbidden, Self::SelfApprovalForbidden)
            | (Self::HierarchyViolation, Self::HierarchyViolation) => true,
            (Self::InsufficientBalance(a), Self::InsufficientBalance(b)) => a == b,
            (Self::InvalidAction(a), Self::InvalidAction(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
