//! Monthly summary API endpoints

use api_types::summary::{
    DayMark, EmployeeMonth, MonthStats, MonthlySummaryResponse, SummaryQuery,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{
    ServerError,
    server::{Principal, ServerState, require_reviewer},
};

fn mark_view(mark: engine::DayMark) -> DayMark {
    match mark {
        engine::DayMark::Present => DayMark::Present,
        engine::DayMark::Leave => DayMark::Leave,
        engine::DayMark::Weekend => DayMark::Weekend,
        engine::DayMark::Absent => DayMark::Absent,
    }
}

fn employee_month_view(summary: engine::EmployeeMonthlySummary) -> EmployeeMonth {
    EmployeeMonth {
        employee_code: summary.employee_code,
        employee_name: summary.employee_name,
        days: summary.days.into_iter().map(mark_view).collect(),
        stats: MonthStats {
            present: summary.stats.present,
            leave: summary.stats.leave,
            absent: summary.stats.absent,
        },
    }
}

pub async fn monthly(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<MonthlySummaryResponse>, ServerError> {
    require_reviewer(&principal)?;
    let employees = state.engine.monthly_summary(query.year, query.month).await?;
    Ok(Json(MonthlySummaryResponse {
        year: query.year,
        month: query.month,
        employees: employees.into_iter().map(employee_month_view).collect(),
    }))
}
