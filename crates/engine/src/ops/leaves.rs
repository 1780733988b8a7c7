//! Leave balances and the approval workflow.

use chrono::Datelike;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, SqlErr, Statement,
    TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    ApplyLeaveCmd, DecideLeaveCmd, EngineError, ResultEngine, employees, leave_balances, leaves,
    users,
};

use super::{Engine, normalize_optional_text, with_tx};

/// A pending request paired with the applicant's display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLeave {
    pub request: leaves::LeaveRequest,
    /// `None` when the applicant has no directory row.
    pub employee_name: Option<String>,
}

impl Engine {
    async fn find_balance(
        &self,
        db: &DatabaseTransaction,
        employee_code: &str,
        year: i32,
    ) -> ResultEngine<Option<leave_balances::Model>> {
        leave_balances::Entity::find()
            .filter(leave_balances::Column::EmployeeCode.eq(employee_code))
            .filter(leave_balances::Column::Year.eq(year))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Get-or-create the year's balance row with the default allowances.
    ///
    /// A racing insert loses on the unique `(employee_code, year)` index and
    /// falls back to rereading the winner's row.
    async fn ensure_balance(
        &self,
        db: &DatabaseTransaction,
        employee_code: &str,
        year: i32,
    ) -> ResultEngine<leave_balances::Model> {
        if let Some(model) = self.find_balance(db, employee_code, year).await? {
            return Ok(model);
        }

        let row = leave_balances::ActiveModel {
            id: ActiveValue::NotSet,
            employee_code: ActiveValue::Set(employee_code.to_string()),
            year: ActiveValue::Set(year),
            sick_used: ActiveValue::Set(0),
            sick_total: ActiveValue::Set(leave_balances::DEFAULT_SICK_TOTAL),
            casual_used: ActiveValue::Set(0),
            casual_total: ActiveValue::Set(leave_balances::DEFAULT_CASUAL_TOTAL),
            privilege_used: ActiveValue::Set(0),
            privilege_total: ActiveValue::Set(leave_balances::DEFAULT_PRIVILEGE_TOTAL),
        };
        match row.insert(db).await {
            Ok(model) => Ok(model),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => self
                .find_balance(db, employee_code, year)
                .await?
                .ok_or(EngineError::Database(err)),
            Err(err) => Err(err.into()),
        }
    }

    /// The employee's balance sheet for `year`, created on first touch.
    pub async fn leave_balance(
        &self,
        employee_code: &str,
        year: i32,
    ) -> ResultEngine<leave_balances::LeaveBalance> {
        with_tx!(self, |db_tx| {
            let model = self.ensure_balance(&db_tx, employee_code, year).await?;
            Ok(leave_balances::LeaveBalance::from(model))
        })
    }

    /// File a request as `Pending`.
    ///
    /// The only balance check is exhaustion of the requested type: the span
    /// length is never compared against the remaining allowance, and the
    /// date range itself is stored as given.
    pub async fn apply_leave(&self, cmd: ApplyLeaveCmd) -> ResultEngine<leaves::LeaveRequest> {
        let ApplyLeaveCmd {
            employee_code,
            year,
            start_date,
            end_date,
            leave_type,
            reason,
            applied_at,
        } = cmd;
        with_tx!(self, |db_tx| {
            let balance = self.ensure_balance(&db_tx, &employee_code, year).await?;
            if let Some(kind) = leaves::LeaveKind::from_loose(&leave_type)
                && balance.used_for(kind) >= balance.total_for(kind)
            {
                return Err(EngineError::InsufficientBalance(kind.label().to_string()));
            }

            let row = leaves::ActiveModel {
                id: ActiveValue::NotSet,
                employee_code: ActiveValue::Set(employee_code),
                start_date: ActiveValue::Set(start_date),
                end_date: ActiveValue::Set(end_date),
                leave_type: ActiveValue::Set(leave_type),
                reason: ActiveValue::Set(normalize_optional_text(reason.as_deref())),
                status: ActiveValue::Set(leaves::LeaveStatus::Pending.as_str().to_string()),
                rejection_reason: ActiveValue::Set(None),
                applied_at: ActiveValue::Set(applied_at),
            };
            let model = row.insert(&db_tx).await?;
            leaves::LeaveRequest::try_from(model)
        })
    }

    /// The employee's own requests, newest application first.
    pub async fn my_leaves(&self, employee_code: &str) -> ResultEngine<Vec<leaves::LeaveRequest>> {
        with_tx!(self, |db_tx| {
            let models = leaves::Entity::find()
                .filter(leaves::Column::EmployeeCode.eq(employee_code))
                .order_by_desc(leaves::Column::AppliedAt)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(leaves::LeaveRequest::try_from)
                .collect()
        })
    }

    /// Everything still `Pending`, oldest application first, with the
    /// applicant's display name for the review queue.
    pub async fn pending_leaves(&self) -> ResultEngine<Vec<PendingLeave>> {
        with_tx!(self, |db_tx| {
            let rows = leaves::Entity::find()
                .filter(leaves::Column::Status.eq(leaves::LeaveStatus::Pending.as_str()))
                .find_also_related(employees::Entity)
                .order_by_asc(leaves::Column::AppliedAt)
                .all(&db_tx)
                .await?;
            let mut out = Vec::with_capacity(rows.len());
            for (model, employee) in rows {
                out.push(PendingLeave {
                    request: leaves::LeaveRequest::try_from(model)?,
                    employee_name: employee.map(|e| e.name),
                });
            }
            Ok(out)
        })
    }

    /// Decide a request. Gates run in a fixed order:
    ///
    /// 1. the request must exist;
    /// 2. reviewers never decide their own requests;
    /// 3. requests from HR staff need an Administrator;
    ///
    /// then status and rejection reason are persisted unconditionally, and an
    /// approval books the span against the application year's balance. The
    /// status write and the balance write share one transaction.
    pub async fn decide_leave(&self, cmd: DecideLeaveCmd) -> ResultEngine<leaves::LeaveRequest> {
        let DecideLeaveCmd {
            leave_id,
            action,
            rejection_reason,
            actor_role,
            actor_code,
        } = cmd;
        let action = leaves::LeaveAction::try_from(action.as_str())?;
        with_tx!(self, |db_tx| {
            let model = leaves::Entity::find_by_id(leave_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::LeaveNotFound)?;

            if let Some(code) = actor_code.as_deref()
                && code == model.employee_code
            {
                return Err(EngineError::SelfApprovalForbidden);
            }
            if self.system_role_tx(&db_tx, &model.employee_code).await? == Some(users::Role::Hr)
                && actor_role != users::Role::Admin
            {
                return Err(EngineError::HierarchyViolation);
            }

            let employee_code = model.employee_code.clone();
            let applied_year = model.applied_at.year();

            let mut active: leaves::ActiveModel = model.into();
            active.status = ActiveValue::Set(action.status().as_str().to_string());
            active.rejection_reason =
                ActiveValue::Set(normalize_optional_text(rejection_reason.as_deref()));
            let updated = active.update(&db_tx).await?;
            let request = leaves::LeaveRequest::try_from(updated)?;

            if action == leaves::LeaveAction::Approved
                && let Some(kind) = leaves::LeaveKind::from_exact(&request.leave_type)
            {
                self.book_leave_days(
                    &db_tx,
                    &employee_code,
                    applied_year,
                    kind,
                    request.booked_days(),
                )
                .await?;
            }

            Ok(request)
        })
    }

    /// Unconditional counter bump, scoped to one `(employee_code, year)` row.
    /// `used` may end up above `total`; nothing clamps it.
    async fn book_leave_days(
        &self,
        db: &DatabaseTransaction,
        employee_code: &str,
        year: i32,
        kind: leaves::LeaveKind,
        days: i64,
    ) -> ResultEngine<()> {
        let backend = self.database.get_database_backend();
        let column = kind.used_column();
        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "UPDATE leave_balances SET {column} = {column} + ? \
                 WHERE employee_code = ? AND year = ?"
            ),
            vec![days.into(), employee_code.into(), year.into()],
        );
        db.execute(stmt).await?;
        Ok(())
    }
}
