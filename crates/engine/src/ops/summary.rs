//! Monthly reconciliation.
//!
//! Materializes a per-employee calendar for one month. Each day takes the
//! highest-priority mark that applies: Present > Leave > Weekend > Absent.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use sea_orm::{Condition, QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, attendance, leaves};

use super::{Engine, fmt_date, parse_date, with_tx};

/// Classification of one calendar day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMark {
    Present,
    Leave,
    Weekend,
    Absent,
}

impl DayMark {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Leave => "leave",
            Self::Weekend => "weekend",
            Self::Absent => "absent",
        }
    }
}

/// Month totals. Weekend days count toward none of these.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthStats {
    pub present: u32,
    pub leave: u32,
    pub absent: u32,
}

/// One active employee's month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeMonthlySummary {
    pub employee_code: String,
    pub employee_name: String,
    /// One mark per day of the month, index 0 being the 1st.
    pub days: Vec<DayMark>,
    pub stats: MonthStats,
}

/// First day of the month plus its length.
fn month_span(year: i32, month: u32) -> ResultEngine<(NaiveDate, u32)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidDate(format!("{year}-{month:02}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| EngineError::InvalidDate(format!("{year}-{month:02}")))?;
    let day_count = next.signed_duration_since(first).num_days() as u32;
    Ok((first, day_count))
}

impl Engine {
    /// Reconcile one month for every active employee, name ascending.
    ///
    /// Approved leaves are picked up when either endpoint falls inside the
    /// month and are clipped to it; stored dates that fail to parse make the
    /// leave invisible here rather than erroring.
    pub async fn monthly_summary(
        &self,
        year: i32,
        month: u32,
    ) -> ResultEngine<Vec<EmployeeMonthlySummary>> {
        let (first, day_count) = month_span(year, month)?;
        let last = first + Days::new(u64::from(day_count) - 1);
        let start = fmt_date(first);
        let end = fmt_date(last);

        with_tx!(self, |db_tx| {
            let staff = self.active_employees_tx(&db_tx).await?;

            let mut present_days: HashMap<String, HashSet<String>> = HashMap::new();
            let attendance_rows = attendance::Entity::find()
                .filter(attendance::Column::Date.between(start.clone(), end.clone()))
                .all(&db_tx)
                .await?;
            for row in attendance_rows {
                present_days
                    .entry(row.employee_code)
                    .or_default()
                    .insert(row.date);
            }

            let mut leave_days: HashMap<String, HashSet<String>> = HashMap::new();
            let leave_rows = leaves::Entity::find()
                .filter(leaves::Column::Status.eq(leaves::LeaveStatus::Approved.as_str()))
                .filter(
                    Condition::any()
                        .add(leaves::Column::StartDate.between(start.clone(), end.clone()))
                        .add(leaves::Column::EndDate.between(start.clone(), end.clone())),
                )
                .all(&db_tx)
                .await?;
            for row in leave_rows {
                let (Some(leave_start), Some(leave_end)) =
                    (parse_date(&row.start_date), parse_date(&row.end_date))
                else {
                    continue;
                };
                let from = leave_start.max(first);
                let to = leave_end.min(last);
                let marked = leave_days.entry(row.employee_code).or_default();
                for day in from.iter_days().take_while(|d| *d <= to) {
                    marked.insert(fmt_date(day));
                }
            }

            let empty = HashSet::new();
            let mut out = Vec::with_capacity(staff.len());
            for employee in staff {
                let present = present_days.get(&employee.employee_code).unwrap_or(&empty);
                let on_leave = leave_days.get(&employee.employee_code).unwrap_or(&empty);

                let mut days = Vec::with_capacity(day_count as usize);
                let mut stats = MonthStats::default();
                for day in first.iter_days().take(day_count as usize) {
                    let key = fmt_date(day);
                    let mark = if present.contains(&key) {
                        DayMark::Present
                    } else if on_leave.contains(&key) {
                        DayMark::Leave
                    } else if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                        DayMark::Weekend
                    } else {
                        DayMark::Absent
                    };
                    match mark {
                        DayMark::Present => stats.present += 1,
                        DayMark::Leave => stats.leave += 1,
                        DayMark::Absent => stats.absent += 1,
                        DayMark::Weekend => {}
                    }
                    days.push(mark);
                }

                out.push(EmployeeMonthlySummary {
                    employee_code: employee.employee_code,
                    employee_name: employee.name,
                    days,
                    stats,
                });
            }
            Ok(out)
        })
    }
}
