//! Read-only lookups against the employee directory.

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{ResultEngine, employees, users};

use super::{Engine, with_tx};

impl Engine {
    pub(super) async fn find_employee(
        &self,
        db: &DatabaseTransaction,
        employee_code: &str,
    ) -> ResultEngine<Option<employees::Model>> {
        employees::Entity::find()
            .filter(employees::Column::EmployeeCode.eq(employee_code))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// System role of the user account tied to `employee_code`, if any.
    pub(super) async fn system_role_tx(
        &self,
        db: &DatabaseTransaction,
        employee_code: &str,
    ) -> ResultEngine<Option<users::Role>> {
        let row = users::Entity::find()
            .filter(users::Column::EmployeeCode.eq(employee_code))
            .one(db)
            .await?;
        row.as_ref()
            .map(|u| users::Role::try_from(u.role.as_str()))
            .transpose()
    }

    async fn manager_name_tx(
        &self,
        db: &DatabaseTransaction,
        employee_code: &str,
    ) -> ResultEngine<Option<String>> {
        let Some(employee) = self.find_employee(db, employee_code).await? else {
            return Ok(None);
        };
        let Some(manager_code) = employee.reporting_manager else {
            return Ok(None);
        };
        Ok(self.find_employee(db, &manager_code).await?.map(|m| m.name))
    }

    pub(super) async fn active_employees_tx(
        &self,
        db: &DatabaseTransaction,
    ) -> ResultEngine<Vec<employees::Model>> {
        employees::Entity::find()
            .filter(employees::Column::EmploymentStatus.eq(employees::STATUS_ACTIVE))
            .order_by_asc(employees::Column::Name)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Directory display name, `None` for unknown codes.
    pub async fn display_name(&self, employee_code: &str) -> ResultEngine<Option<String>> {
        with_tx!(self, |db_tx| {
            let name = self
                .find_employee(&db_tx, employee_code)
                .await?
                .map(|e| e.name);
            Ok(name)
        })
    }

    /// Display name of the employee's reporting manager: a two-hop lookup
    /// through the manager's own directory row.
    pub async fn reporting_manager_name(
        &self,
        employee_code: &str,
    ) -> ResultEngine<Option<String>> {
        with_tx!(self, |db_tx| {
            self.manager_name_tx(&db_tx, employee_code).await
        })
    }

    /// Role of the matching user account, `None` when the employee cannot
    /// log in.
    pub async fn system_role(&self, employee_code: &str) -> ResultEngine<Option<users::Role>> {
        with_tx!(self, |db_tx| {
            self.system_role_tx(&db_tx, employee_code).await
        })
    }

    /// Active staff, name ascending.
    pub async fn active_employees(&self) -> ResultEngine<Vec<employees::Employee>> {
        with_tx!(self, |db_tx| {
            let models = self.active_employees_tx(&db_tx).await?;
            Ok(models.into_iter().map(employees::Employee::from).collect())
        })
    }

    /// Full directory row for `employee_code`.
    pub async fn employee(&self, employee_code: &str) -> ResultEngine<Option<employees::Employee>> {
        with_tx!(self, |db_tx| {
            let model = self.find_employee(&db_tx, employee_code).await?;
            Ok(model.map(employees::Employee::from))
        })
    }
}
