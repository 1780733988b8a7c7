//! Per-year leave balance counters.
//!
//! One row per `(employee_code, year)`, created lazily the first time the
//! year is touched. Counters only grow; nothing clamps `used` to `total`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::leaves::LeaveKind;

pub const DEFAULT_SICK_TOTAL: i32 = 10;
pub const DEFAULT_CASUAL_TOTAL: i32 = 12;
pub const DEFAULT_PRIVILEGE_TOTAL: i32 = 15;

/// An employee's balance sheet for one year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub year: i32,
    pub sick_used: i32,
    pub sick_total: i32,
    pub casual_used: i32,
    pub casual_total: i32,
    pub privilege_used: i32,
    pub privilege_total: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "leave_balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub employee_code: String,
    pub year: i32,
    pub sick_used: i32,
    pub sick_total: i32,
    pub casual_used: i32,
    pub casual_total: i32,
    pub privilege_used: i32,
    pub privilege_total: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn used_for(&self, kind: LeaveKind) -> i32 {
        match kind {
            LeaveKind::Sick => self.sick_used,
            LeaveKind::Casual => self.casual_used,
            LeaveKind::Privilege => self.privilege_used,
        }
    }

    pub fn total_for(&self, kind: LeaveKind) -> i32 {
        match kind {
            LeaveKind::Sick => self.sick_total,
            LeaveKind::Casual => self.casual_total,
            LeaveKind::Privilege => self.privilege_total,
        }
    }
}

impl From<Model> for LeaveBalance {
    fn from(model: Model) -> Self {
        Self {
            year: model.year,
            sick_used: model.sick_used,
            sick_total: model.sick_total,
            casual_used: model.casual_used,
            casual_total: model.casual_total,
            privilege_used: model.privilege_used,
            privilege_total: model.privilege_total,
        }
    }
}
