//! Leave API endpoints

use api_types::leave::{
    BalanceView, LeaveAction, LeaveApply, LeaveStatus as ApiStatus, LeaveView, MyLeavesResponse,
    PendingLeaveRow, PendingLeavesResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{Datelike, Utc};

use crate::{
    ServerError,
    server::{Principal, ServerState, require_employee_code, require_reviewer},
};
use engine::{ApplyLeaveCmd, DecideLeaveCmd};

fn status_view(status: engine::LeaveStatus) -> ApiStatus {
    match status {
        engine::LeaveStatus::Pending => ApiStatus::Pending,
        engine::LeaveStatus::Approved => ApiStatus::Approved,
        engine::LeaveStatus::Rejected => ApiStatus::Rejected,
    }
}

fn leave_view(request: engine::LeaveRequest) -> LeaveView {
    LeaveView {
        id: request.id,
        employee_code: request.employee_code,
        start_date: request.start_date,
        end_date: request.end_date,
        leave_type: request.leave_type,
        reason: request.reason,
        status: status_view(request.status),
        rejection_reason: request.rejection_reason,
        applied_at: request.applied_at,
    }
}

fn balance_view(balance: engine::LeaveBalance) -> BalanceView {
    BalanceView {
        year: balance.year,
        sick_used: balance.sick_used,
        sick_total: balance.sick_total,
        casual_used: balance.casual_used,
        casual_total: balance.casual_total,
        privilege_used: balance.privilege_used,
        privilege_total: balance.privilege_total,
    }
}

/// The caller's balance sheet for the current year, created on first touch.
pub async fn balance(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceView>, ServerError> {
    let code = require_employee_code(&principal)?;
    let balance = state.engine.leave_balance(&code, Utc::now().year()).await?;
    Ok(Json(balance_view(balance)))
}

pub async fn apply(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<LeaveApply>,
) -> Result<(StatusCode, Json<LeaveView>), ServerError> {
    let code = require_employee_code(&principal)?;
    // The application year keys the balance sheet the request counts against.
    let applied_at = Utc::now();

    let mut cmd = ApplyLeaveCmd::new(
        code,
        applied_at.year(),
        payload.start_date,
        payload.end_date,
        payload.leave_type,
        applied_at,
    );
    if let Some(reason) = payload.reason {
        cmd = cmd.reason(reason);
    }
    let leave = state.engine.apply_leave(cmd).await?;
    Ok((StatusCode::CREATED, Json(leave_view(leave))))
}

pub async fn mine(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<MyLeavesResponse>, ServerError> {
    let code = require_employee_code(&principal)?;
    let leaves = state.engine.my_leaves(&code).await?;
    Ok(Json(MyLeavesResponse {
        leaves: leaves.into_iter().map(leave_view).collect(),
    }))
}

pub async fn pending(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<PendingLeavesResponse>, ServerError> {
    require_reviewer(&principal)?;
    let rows = state.engine.pending_leaves().await?;
    Ok(Json(PendingLeavesResponse {
        leaves: rows
            .into_iter()
            .map(|row| PendingLeaveRow {
                employee_name: row.employee_name,
                request: leave_view(row.request),
            })
            .collect(),
    }))
}

pub async fn action(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(leave_id): Path<i64>,
    Json(payload): Json<LeaveAction>,
) -> Result<Json<LeaveView>, ServerError> {
    require_reviewer(&principal)?;

    let mut cmd = DecideLeaveCmd::new(leave_id, payload.action, principal.role);
    if let Some(reason) = payload.rejection_reason {
        cmd = cmd.rejection_reason(reason);
    }
    if let Some(code) = principal.employee_code {
        cmd = cmd.actor_code(code);
    }
    let leave = state.engine.decide_leave(cmd).await?;
    Ok(Json(leave_view(leave)))
}
