//! Initial schema migration - creates all tables from scratch.
//!
//! This is a consolidated migration creating the complete schema for Muster:
//!
//! - `employees`: the directory (read-only reference data for the engine)
//! - `users`: login principals with a system role
//! - `sessions`: token-keyed session store with explicit expiry
//! - `attendance`: one row per employee per day
//! - `leaves`: leave requests moving through the approval workflow
//! - `leave_balances`: per-year counters, created lazily by the engine

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    EmployeeCode,
    Name,
    Designation,
    ReportingManager,
    EmploymentStatus,
}

#[derive(Iden)]
enum Users {
    Table,
    Username,
    PasswordHash,
    Role,
    EmployeeCode,
    IsActive,
    LastLogin,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Token,
    Username,
    CreatedAt,
    ExpiresAt,
}

#[derive(Iden)]
enum Attendance {
    Table,
    Id,
    EmployeeCode,
    Date,
    ClockIn,
    ClockOut,
    WorkLog,
    Status,
    IpAddress,
}

#[derive(Iden)]
enum Leaves {
    Table,
    Id,
    EmployeeCode,
    StartDate,
    EndDate,
    LeaveType,
    Reason,
    Status,
    RejectionReason,
    AppliedAt,
}

#[derive(Iden)]
enum LeaveBalances {
    Table,
    Id,
    EmployeeCode,
    Year,
    SickUsed,
    SickTotal,
    CasualUsed,
    CasualTotal,
    PrivilegeUsed,
    PrivilegeTotal,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Employees
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::EmployeeCode).string().not_null())
                    .col(ColumnDef::new(Employees::Name).string().not_null())
                    .col(ColumnDef::new(Employees::Designation).string())
                    .col(ColumnDef::new(Employees::ReportingManager).string())
                    .col(
                        ColumnDef::new(Employees::EmploymentStatus)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-employees-employee_code-unique")
                    .table(Employees::Table)
                    .col(Employees::EmployeeCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::EmployeeCode).string())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Users::LastLogin).timestamp())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Sessions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Token)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::Username).string().not_null())
                    .col(ColumnDef::new(Sessions::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Sessions::ExpiresAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-username")
                            .from(Sessions::Table, Sessions::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Attendance
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::EmployeeCode).string().not_null())
                    .col(ColumnDef::new(Attendance::Date).string().not_null())
                    .col(ColumnDef::new(Attendance::ClockIn).string())
                    .col(ColumnDef::new(Attendance::ClockOut).string())
                    .col(ColumnDef::new(Attendance::WorkLog).string())
                    .col(ColumnDef::new(Attendance::Status).string().not_null())
                    .col(ColumnDef::new(Attendance::IpAddress).string())
                    .to_owned(),
            )
            .await?;

        // The clock-in race guard: concurrent inserts for the same day lose
        // on this index instead of creating duplicates.
        manager
            .create_index(
                Index::create()
                    .name("idx-attendance-employee_code-date-unique")
                    .table(Attendance::Table)
                    .col(Attendance::EmployeeCode)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Leaves
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Leaves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leaves::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Leaves::EmployeeCode).string().not_null())
                    .col(ColumnDef::new(Leaves::StartDate).string().not_null())
                    .col(ColumnDef::new(Leaves::EndDate).string().not_null())
                    .col(ColumnDef::new(Leaves::LeaveType).string().not_null())
                    .col(ColumnDef::new(Leaves::Reason).string())
                    .col(
                        ColumnDef::new(Leaves::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Leaves::RejectionReason).string())
                    .col(ColumnDef::new(Leaves::AppliedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-leaves-employee_code")
                    .table(Leaves::Table)
                    .col(Leaves::EmployeeCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-leaves-status")
                    .table(Leaves::Table)
                    .col(Leaves::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Leave balances
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LeaveBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeaveBalances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LeaveBalances::EmployeeCode)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LeaveBalances::Year).integer().not_null())
                    .col(
                        ColumnDef::new(LeaveBalances::SickUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LeaveBalances::SickTotal)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(LeaveBalances::CasualUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LeaveBalances::CasualTotal)
                            .integer()
                            .not_null()
                            .default(12),
                    )
                    .col(
                        ColumnDef::new(LeaveBalances::PrivilegeUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LeaveBalances::PrivilegeTotal)
                            .integer()
                            .not_null()
                            .default(15),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-leave_balances-employee_code-year-unique")
                    .table(LeaveBalances::Table)
                    .col(LeaveBalances::EmployeeCode)
                    .col(LeaveBalances::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(LeaveBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leaves::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        Ok(())
    }
}
