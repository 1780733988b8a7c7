//! The employee directory.
//!
//! Rows are provisioned by HR tooling outside this engine; everything here
//! treats the table as read-only reference data.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `employment_status` value for staff included in reconciliation.
pub const STATUS_ACTIVE: &str = "Active";

/// A directory entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_code: String,
    pub name: String,
    pub designation: Option<String>,
    /// Employee code of the reporting manager, when one is set.
    pub reporting_manager: Option<String>,
    pub employment_status: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub employee_code: String,
    pub name: String,
    pub designation: Option<String>,
    pub reporting_manager: Option<String>,
    pub employment_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Employee {
    fn from(model: Model) -> Self {
        Self {
            employee_code: model.employee_code,
            name: model.name,
            designation: model.designation,
            reporting_manager: model.reporting_manager,
            employment_status: model.employment_status,
        }
    }
}
