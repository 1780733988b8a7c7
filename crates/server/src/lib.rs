use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener};

mod attendance;
mod leaves;
mod server;
mod session;
mod summary;

pub mod types {
    pub mod session {
        pub use api_types::session::{LoginRequest, LoginResponse, Role, SessionUser};
    }

    pub mod attendance {
        pub use api_types::attendance::{
            AttendanceRecord, ClockOut, DailyLogResponse, DailyLogRow, DailyQuery, DayState,
            HistoryResponse, StatusResponse,
        };
    }

    pub mod leave {
        pub use api_types::leave::{
            BalanceView, LeaveAction, LeaveApply, LeaveStatus, LeaveView, MyLeavesResponse,
            PendingLeaveRow, PendingLeavesResponse,
        };
    }

    pub mod summary {
        pub use api_types::summary::{
            DayMark, EmployeeMonth, MonthStats, MonthlySummaryResponse, SummaryQuery,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Unauthorized(String),
    Forbidden(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::AlreadyClockedIn
        | EngineError::NoAttendanceRecord
        | EngineError::AlreadyClockedOut
        | EngineError::InsufficientBalance(_)
        | EngineError::InvalidAction(_) => StatusCode::BAD_REQUEST,
        EngineError::LeaveNotFound => StatusCode::NOT_FOUND,
        EngineError::SelfApprovalForbidden | EngineError::HierarchyViolation => {
            StatusCode::FORBIDDEN
        }
        EngineError::InvalidDate(_) | EngineError::InvalidRole(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err),
            ServerError::Forbidden(err) => (StatusCode::FORBIDDEN, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<sea_orm::DbErr> for ServerError {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Engine(EngineError::Database(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_state_errors_map_to_400() {
        let res = ServerError::from(EngineError::AlreadyClockedIn).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = ServerError::from(EngineError::AlreadyClockedOut).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = ServerError::from(EngineError::NoAttendanceRecord).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn balance_and_action_errors_map_to_400() {
        let res =
            ServerError::from(EngineError::InsufficientBalance("Casual".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = ServerError::from(EngineError::InvalidAction("Maybe".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_leave_maps_to_404() {
        let res = ServerError::from(EngineError::LeaveNotFound).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn approval_gates_map_to_403() {
        let res = ServerError::from(EngineError::SelfApprovalForbidden).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let res = ServerError::from(EngineError::HierarchyViolation).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn invalid_date_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidDate("2024-13".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn database_errors_map_to_500() {
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "boom".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_variants_map_to_401_and_403() {
        let res = ServerError::Unauthorized("no".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let res = ServerError::Forbidden("no".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
