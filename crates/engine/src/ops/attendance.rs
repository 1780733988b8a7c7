//! Attendance ledger operations.
//!
//! A day moves `NotStarted -> ClockedIn -> Completed` and never back; the
//! unique `(employee_code, date)` index is what makes clock-in race-safe.

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{ClockInCmd, ClockOutCmd, EngineError, ResultEngine, attendance, employees};

use super::{Engine, fmt_date, fmt_time, normalize_optional_text, with_tx};

/// Snapshot of one employee's day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    pub state: attendance::ClockState,
    /// The backing row; `None` until the first clock-in of the day.
    pub record: Option<attendance::AttendanceDay>,
}

/// A daily-log row enriched with directory data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLogEntry {
    pub record: attendance::AttendanceDay,
    pub employee_name: String,
    pub designation: Option<String>,
}

impl Engine {
    pub(super) async fn find_day(
        &self,
        db: &DatabaseTransaction,
        employee_code: &str,
        date: &str,
    ) -> ResultEngine<Option<attendance::Model>> {
        attendance::Entity::find()
            .filter(attendance::Column::EmployeeCode.eq(employee_code))
            .filter(attendance::Column::Date.eq(date))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Where `employee_code`'s day stands on `date`.
    pub async fn day_status(
        &self,
        employee_code: &str,
        date: NaiveDate,
    ) -> ResultEngine<DayStatus> {
        with_tx!(self, |db_tx| {
            let model = self.find_day(&db_tx, employee_code, &fmt_date(date)).await?;
            let status = match model {
                None => DayStatus {
                    state: attendance::ClockState::NotStarted,
                    record: None,
                },
                Some(model) => {
                    let day = attendance::AttendanceDay::from(model);
                    DayStatus {
                        state: day.state(),
                        record: Some(day),
                    }
                }
            };
            Ok(status)
        })
    }

    /// Open the day with a single atomic insert.
    ///
    /// A concurrent duplicate trips the unique `(employee_code, date)` index
    /// and surfaces as `AlreadyClockedIn`, so no check-then-insert window
    /// exists.
    pub async fn clock_in(&self, cmd: ClockInCmd) -> ResultEngine<attendance::AttendanceDay> {
        let ClockInCmd {
            employee_code,
            date,
            time,
            ip_address,
        } = cmd;
        with_tx!(self, |db_tx| {
            let row = attendance::ActiveModel {
                id: ActiveValue::NotSet,
                employee_code: ActiveValue::Set(employee_code),
                date: ActiveValue::Set(fmt_date(date)),
                clock_in: ActiveValue::Set(Some(fmt_time(time))),
                clock_out: ActiveValue::Set(None),
                work_log: ActiveValue::Set(None),
                status: ActiveValue::Set(attendance::STATUS_PRESENT.to_string()),
                ip_address: ActiveValue::Set(ip_address),
            };
            match row.insert(&db_tx).await {
                Ok(model) => Ok(attendance::AttendanceDay::from(model)),
                Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    Err(EngineError::AlreadyClockedIn)
                }
                Err(err) => Err(err.into()),
            }
        })
    }

    /// Close the day. The row must exist and still be open; `status` is left
    /// untouched.
    pub async fn clock_out(&self, cmd: ClockOutCmd) -> ResultEngine<attendance::AttendanceDay> {
        let ClockOutCmd {
            employee_code,
            date,
            time,
            work_log,
        } = cmd;
        with_tx!(self, |db_tx| {
            let model = self
                .find_day(&db_tx, &employee_code, &fmt_date(date))
                .await?
                .ok_or(EngineError::NoAttendanceRecord)?;
            if model.clock_out.is_some() {
                return Err(EngineError::AlreadyClockedOut);
            }

            let mut active: attendance::ActiveModel = model.into();
            active.clock_out = ActiveValue::Set(Some(fmt_time(time)));
            active.work_log = ActiveValue::Set(normalize_optional_text(work_log.as_deref()));
            let updated = active.update(&db_tx).await?;
            Ok(attendance::AttendanceDay::from(updated))
        })
    }

    /// Most recent days first.
    pub async fn history(
        &self,
        employee_code: &str,
        limit: u64,
    ) -> ResultEngine<Vec<attendance::AttendanceDay>> {
        with_tx!(self, |db_tx| {
            let models = attendance::Entity::find()
                .filter(attendance::Column::EmployeeCode.eq(employee_code))
                .order_by_desc(attendance::Column::Date)
                .limit(limit)
                .all(&db_tx)
                .await?;
            Ok(models
                .into_iter()
                .map(attendance::AttendanceDay::from)
                .collect())
        })
    }

    /// Every attendance row for `date`, joined with the directory and sorted
    /// by employee name. Rows whose code is missing from the directory are
    /// dropped.
    pub async fn daily_log(&self, date: NaiveDate) -> ResultEngine<Vec<DailyLogEntry>> {
        with_tx!(self, |db_tx| {
            let rows = attendance::Entity::find()
                .filter(attendance::Column::Date.eq(fmt_date(date)))
                .find_also_related(employees::Entity)
                .order_by_asc(employees::Column::Name)
                .all(&db_tx)
                .await?;
            let mut out = Vec::with_capacity(rows.len());
            for (model, employee) in rows {
                let Some(employee) = employee else { continue };
                out.push(DailyLogEntry {
                    record: attendance::AttendanceDay::from(model),
                    employee_name: employee.name,
                    designation: employee.designation,
                });
            }
            Ok(out)
        })
    }
}
