//! Attendance API endpoints

use api_types::attendance::{
    AttendanceRecord, ClockOut, DailyLogResponse, DailyLogRow, DailyQuery, DayState,
    HistoryResponse, StatusResponse,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{Local, NaiveDate};

use crate::{
    ServerError,
    server::{Principal, ServerState, require_employee_code, require_reviewer},
};
use engine::{ClockInCmd, ClockOutCmd};

const HISTORY_LIMIT: u64 = 30;

fn state_view(state: engine::ClockState) -> DayState {
    match state {
        engine::ClockState::NotStarted => DayState::NotStarted,
        engine::ClockState::ClockedIn => DayState::ClockedIn,
        engine::ClockState::Completed => DayState::Completed,
    }
}

fn record_view(day: engine::AttendanceDay) -> AttendanceRecord {
    AttendanceRecord {
        id: day.id,
        employee_code: day.employee_code,
        date: day.date,
        clock_in: day.clock_in,
        clock_out: day.clock_out,
        work_log: day.work_log,
        status: day.status,
        ip_address: day.ip_address,
    }
}

pub async fn status(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<StatusResponse>, ServerError> {
    let code = require_employee_code(&principal)?;
    let status = state
        .engine
        .day_status(&code, Local::now().date_naive())
        .await?;
    Ok(Json(StatusResponse {
        state: state_view(status.state),
        record: status.record.map(record_view),
    }))
}

pub async fn clock_in(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<(StatusCode, Json<AttendanceRecord>), ServerError> {
    let code = require_employee_code(&principal)?;
    let now = Local::now();

    let mut cmd = ClockInCmd::new(code, now.date_naive(), now.time());
    if let Some(addr) = principal.peer_addr {
        cmd = cmd.ip_address(addr.ip().to_string());
    }
    let day = state.engine.clock_in(cmd).await?;
    Ok((StatusCode::CREATED, Json(record_view(day))))
}

pub async fn clock_out(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<ClockOut>,
) -> Result<Json<AttendanceRecord>, ServerError> {
    let code = require_employee_code(&principal)?;
    let now = Local::now();

    let mut cmd = ClockOutCmd::new(code, now.date_naive(), now.time());
    if let Some(work_log) = payload.work_log {
        cmd = cmd.work_log(work_log);
    }
    let day = state.engine.clock_out(cmd).await?;
    Ok(Json(record_view(day)))
}

pub async fn history(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let code = require_employee_code(&principal)?;
    let records = state.engine.history(&code, HISTORY_LIMIT).await?;
    Ok(Json(HistoryResponse {
        records: records.into_iter().map(record_view).collect(),
    }))
}

pub async fn daily(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailyLogResponse>, ServerError> {
    require_reviewer(&principal)?;
    let date = match query.date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| ServerError::Generic(format!("invalid date: {raw}")))?,
        None => Local::now().date_naive(),
    };

    let entries = state.engine.daily_log(date).await?;
    Ok(Json(DailyLogResponse {
        date: date.format("%Y-%m-%d").to_string(),
        entries: entries
            .into_iter()
            .map(|entry| DailyLogRow {
                employee_name: entry.employee_name,
                designation: entry.designation,
                record: record_view(entry.record),
            })
            .collect(),
    }))
}
