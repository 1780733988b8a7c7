use chrono::{NaiveDate, NaiveTime};
use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod attendance;
mod directory;
mod leaves;
mod summary;

pub use attendance::{DailyLogEntry, DayStatus};
pub use leaves::PendingLeave;
pub use summary::{DayMark, EmployeeMonthlySummary, MonthStats};

/// Runs the body inside a transaction; commits on `Ok`, while an error path
/// drops the transaction and rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Storage-backed core. Every operation talks to `database`, nothing is
/// cached in memory.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Starts building an [`Engine`].
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Builder for [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Sets the backing database connection.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

// Dates and clock times are stored as plain text in the schema.

fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn fmt_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
