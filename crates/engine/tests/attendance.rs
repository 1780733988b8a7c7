use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{ClockInCmd, ClockOutCmd, ClockState, Engine, EngineError};
use migration::MigratorTrait;
use uuid::Uuid;

async fn seed_employee(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
    designation: Option<&str>,
    manager: Option<&str>,
) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO employees (employee_code, name, designation, reporting_manager, employment_status) \
         VALUES (?, ?, ?, ?, 'Active')",
        vec![
            code.into(),
            name.into(),
            designation.map(str::to_string).into(),
            manager.map(str::to_string).into(),
        ],
    ))
    .await
    .unwrap();
}

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    seed_employee(&db, "EMP010", "Asha Verma", Some("Engineer"), None).await;
    seed_employee(&db, "EMP011", "Bir Mehta", Some("Analyst"), Some("EMP010")).await;
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, DatabaseConnection, String, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    seed_employee(&db, "EMP010", "Asha Verma", Some("Engineer"), None).await;
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    (engine, db, url, path)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn time(hour: u32, min: u32, sec: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, sec).unwrap()
}

#[tokio::test]
async fn clock_in_opens_a_present_day() {
    let (engine, _db) = engine_with_db().await;

    let day = engine
        .clock_in(
            ClockInCmd::new("EMP010", date(2024, 3, 4), time(9, 2, 11)).ip_address("10.0.0.5"),
        )
        .await
        .unwrap();

    assert_eq!(day.employee_code, "EMP010");
    assert_eq!(day.date, "2024-03-04");
    assert_eq!(day.clock_in.as_deref(), Some("09:02:11"));
    assert_eq!(day.clock_out, None);
    assert_eq!(day.work_log, None);
    assert_eq!(day.status, "Present");
    assert_eq!(day.ip_address.as_deref(), Some("10.0.0.5"));
    assert_eq!(day.state(), ClockState::ClockedIn);
}

#[tokio::test]
async fn a_day_can_only_be_opened_once() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2024, 3, 4);

    engine
        .clock_in(ClockInCmd::new("EMP010", today, time(9, 0, 0)))
        .await
        .unwrap();
    let err = engine
        .clock_in(ClockInCmd::new("EMP010", today, time(9, 5, 0)))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::AlreadyClockedIn);

    // Another employee and another day are unaffected.
    engine
        .clock_in(ClockInCmd::new("EMP011", today, time(9, 10, 0)))
        .await
        .unwrap();
    engine
        .clock_in(ClockInCmd::new("EMP010", date(2024, 3, 5), time(8, 55, 0)))
        .await
        .unwrap();
}

#[tokio::test]
async fn clock_out_needs_an_open_day() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2024, 3, 4);

    let err = engine
        .clock_out(ClockOutCmd::new("EMP010", today, time(18, 0, 0)))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NoAttendanceRecord);

    engine
        .clock_in(ClockInCmd::new("EMP010", today, time(9, 2, 11)))
        .await
        .unwrap();
    let day = engine
        .clock_out(
            ClockOutCmd::new("EMP010", today, time(18, 40, 0))
                .work_log("  wrapped the sprint demo  "),
        )
        .await
        .unwrap();
    assert_eq!(day.clock_out.as_deref(), Some("18:40:00"));
    assert_eq!(day.work_log.as_deref(), Some("wrapped the sprint demo"));
    assert_eq!(day.status, "Present");
    assert_eq!(day.state(), ClockState::Completed);

    let err = engine
        .clock_out(ClockOutCmd::new("EMP010", today, time(19, 0, 0)))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::AlreadyClockedOut);
}

#[tokio::test]
async fn blank_work_logs_are_dropped() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2024, 3, 4);

    engine
        .clock_in(ClockInCmd::new("EMP011", today, time(10, 0, 0)))
        .await
        .unwrap();
    let day = engine
        .clock_out(ClockOutCmd::new("EMP011", today, time(17, 30, 0)).work_log("   "))
        .await
        .unwrap();
    assert_eq!(day.work_log, None);
}

#[tokio::test]
async fn day_status_follows_the_clock() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2024, 3, 4);

    let status = engine.day_status("EMP010", today).await.unwrap();
    assert_eq!(status.state, ClockState::NotStarted);
    assert!(status.record.is_none());

    engine
        .clock_in(ClockInCmd::new("EMP010", today, time(9, 2, 11)))
        .await
        .unwrap();
    let status = engine.day_status("EMP010", today).await.unwrap();
    assert_eq!(status.state, ClockState::ClockedIn);
    assert_eq!(
        status.record.as_ref().map(|r| r.date.as_str()),
        Some("2024-03-04")
    );

    engine
        .clock_out(ClockOutCmd::new("EMP010", today, time(18, 40, 0)))
        .await
        .unwrap();
    let status = engine.day_status("EMP010", today).await.unwrap();
    assert_eq!(status.state, ClockState::Completed);
}

#[tokio::test]
async fn history_is_newest_first_and_capped() {
    let (engine, _db) = engine_with_db().await;

    for day in 4..=8 {
        engine
            .clock_in(ClockInCmd::new("EMP010", date(2024, 3, day), time(9, 0, 0)))
            .await
            .unwrap();
    }
    engine
        .clock_in(ClockInCmd::new("EMP011", date(2024, 3, 8), time(9, 0, 0)))
        .await
        .unwrap();

    let records = engine.history("EMP010", 3).await.unwrap();
    let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["2024-03-08", "2024-03-07", "2024-03-06"]);
    assert!(records.iter().all(|r| r.employee_code == "EMP010"));
}

#[tokio::test]
async fn the_daily_log_is_joined_and_sorted_by_name() {
    let (engine, _db) = engine_with_db().await;
    let today = date(2024, 3, 4);

    engine
        .clock_in(ClockInCmd::new("EMP011", today, time(8, 45, 0)))
        .await
        .unwrap();
    engine
        .clock_in(ClockInCmd::new("EMP010", today, time(9, 2, 11)))
        .await
        .unwrap();
    // A row whose code is missing from the directory never reaches the log.
    engine
        .clock_in(ClockInCmd::new("EMP404", today, time(9, 30, 0)))
        .await
        .unwrap();

    let log = engine.daily_log(today).await.unwrap();
    let names: Vec<&str> = log.iter().map(|e| e.employee_name.as_str()).collect();
    assert_eq!(names, ["Asha Verma", "Bir Mehta"]);
    assert_eq!(log[0].designation.as_deref(), Some("Engineer"));
    assert_eq!(log[0].record.clock_in.as_deref(), Some("09:02:11"));

    assert!(engine.daily_log(date(2024, 3, 5)).await.unwrap().is_empty());
}

#[tokio::test]
async fn restart_engine_reads_same_state() {
    let (engine, db, url, path) = engine_with_file_db().await;

    engine
        .clock_in(ClockInCmd::new("EMP010", date(2024, 3, 4), time(9, 2, 11)))
        .await
        .unwrap();

    drop(engine);
    drop(db);

    let db2 = Database::connect(&url).await.unwrap();
    let engine2 = Engine::builder()
        .database(db2.clone())
        .build()
        .await
        .unwrap();

    let status = engine2
        .day_status("EMP010", date(2024, 3, 4))
        .await
        .unwrap();
    assert_eq!(status.state, ClockState::ClockedIn);
    assert_eq!(
        status.record.and_then(|r| r.clock_in).as_deref(),
        Some("09:02:11")
    );

    drop(db2);
    let _ = std::fs::remove_file(path);
}
