use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    ApplyLeaveCmd, ClockInCmd, DayMark, DecideLeaveCmd, Engine, EngineError, MonthStats, Role,
};
use migration::MigratorTrait;

async fn seed_employee(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
    designation: Option<&str>,
    manager: Option<&str>,
    status: &str,
) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO employees (employee_code, name, designation, reporting_manager, employment_status) \
         VALUES (?, ?, ?, ?, ?)",
        vec![
            code.into(),
            name.into(),
            designation.map(str::to_string).into(),
            manager.map(str::to_string).into(),
            status.into(),
        ],
    ))
    .await
    .unwrap();
}

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    seed_employee(&db, "EMP010", "Asha Verma", Some("Engineer"), None, "Active").await;
    seed_employee(&db, "EMP011", "Bir Mehta", Some("Analyst"), Some("EMP010"), "Active").await;
    seed_employee(&db, "EMP012", "Chandra Rao", None, Some("EMP010"), "Active").await;
    seed_employee(&db, "EMP099", "Farida Usman", None, None, "Resigned").await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password_hash, role, employee_code, is_active) \
         VALUES (?, 'x', ?, ?, 1)",
        vec!["chandra".into(), "HR".into(), "EMP012".into()],
    ))
    .await
    .unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn nine_am() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}

fn applied(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap()
}

async fn approved_leave(engine: &Engine, code: &str, start: &str, end: &str, kind: &str) {
    let request = engine
        .apply_leave(ApplyLeaveCmd::new(
            code,
            2024,
            start,
            end,
            kind,
            applied(2024, 3, 25),
        ))
        .await
        .unwrap();
    engine
        .decide_leave(DecideLeaveCmd::new(request.id, "Approved", Role::Admin))
        .await
        .unwrap();
}

// April 2024 runs Monday the 1st through Tuesday the 30th, with eight
// weekend days.

#[tokio::test]
async fn april_reconciles_attendance_leave_and_weekends() {
    let (engine, _db) = engine_with_db().await;

    engine
        .clock_in(ClockInCmd::new("EMP010", date(2024, 4, 1), nine_am()))
        .await
        .unwrap();
    approved_leave(&engine, "EMP010", "2024-04-10", "2024-04-12", "Casual").await;

    // Pending and rejected requests never mark a day.
    engine
        .apply_leave(ApplyLeaveCmd::new(
            "EMP011",
            2024,
            "2024-04-03",
            "2024-04-04",
            "Sick",
            applied(2024, 4, 2),
        ))
        .await
        .unwrap();
    let rejected = engine
        .apply_leave(ApplyLeaveCmd::new(
            "EMP012",
            2024,
            "2024-04-08",
            "2024-04-09",
            "Casual",
            applied(2024, 4, 2),
        ))
        .await
        .unwrap();
    engine
        .decide_leave(DecideLeaveCmd::new(rejected.id, "Rejected", Role::Admin))
        .await
        .unwrap();

    let summaries = engine.monthly_summary(2024, 4).await.unwrap();
    let names: Vec<&str> = summaries.iter().map(|s| s.employee_name.as_str()).collect();
    assert_eq!(names, ["Asha Verma", "Bir Mehta", "Chandra Rao"]);
    assert!(summaries.iter().all(|s| s.employee_code != "EMP099"));

    let asha = &summaries[0];
    assert_eq!(asha.employee_code, "EMP010");
    assert_eq!(asha.days.len(), 30);
    assert_eq!(asha.days[0], DayMark::Present); // Mon Apr 1
    assert_eq!(asha.days[5], DayMark::Weekend); // Sat Apr 6
    assert_eq!(asha.days[9], DayMark::Leave); // Wed Apr 10
    assert_eq!(asha.days[11], DayMark::Leave); // Fri Apr 12
    assert_eq!(asha.days[14], DayMark::Absent); // Mon Apr 15
    assert_eq!(
        asha.stats,
        MonthStats {
            present: 1,
            leave: 3,
            absent: 18,
        }
    );

    // No approved records at all: 22 working days, all absent.
    let no_show = MonthStats {
        present: 0,
        leave: 0,
        absent: 22,
    };
    assert_eq!(summaries[1].stats, no_show);
    assert_eq!(summaries[2].stats, no_show);
}

#[tokio::test]
async fn attendance_wins_the_day_over_leave() {
    let (engine, _db) = engine_with_db().await;

    engine
        .clock_in(ClockInCmd::new("EMP011", date(2024, 4, 10), nine_am()))
        .await
        .unwrap();
    approved_leave(&engine, "EMP011", "2024-04-10", "2024-04-11", "Casual").await;

    let summaries = engine.monthly_summary(2024, 4).await.unwrap();
    let bir = &summaries[1];
    assert_eq!(bir.days[9], DayMark::Present);
    assert_eq!(bir.days[10], DayMark::Leave);
    assert_eq!(
        bir.stats,
        MonthStats {
            present: 1,
            leave: 1,
            absent: 20,
        }
    );
}

#[tokio::test]
async fn leave_spans_clip_to_the_month_and_cover_weekends() {
    let (engine, _db) = engine_with_db().await;

    approved_leave(&engine, "EMP010", "2024-03-28", "2024-04-02", "Sick").await;
    approved_leave(&engine, "EMP010", "2024-04-05", "2024-04-08", "Casual").await;
    approved_leave(&engine, "EMP010", "2024-04-29", "2024-05-03", "Privilege").await;

    let summaries = engine.monthly_summary(2024, 4).await.unwrap();
    let asha = &summaries[0];

    // Straddling spans only count their April days.
    assert_eq!(asha.days[0], DayMark::Leave); // Mon Apr 1
    assert_eq!(asha.days[1], DayMark::Leave); // Tue Apr 2
    assert_eq!(asha.days[2], DayMark::Absent); // Wed Apr 3
    assert_eq!(asha.days[28], DayMark::Leave); // Mon Apr 29
    assert_eq!(asha.days[29], DayMark::Leave); // Tue Apr 30

    // A Friday-to-Monday span marks the weekend it crosses.
    assert_eq!(asha.days[4], DayMark::Leave); // Fri Apr 5
    assert_eq!(asha.days[5], DayMark::Leave); // Sat Apr 6
    assert_eq!(asha.days[6], DayMark::Leave); // Sun Apr 7
    assert_eq!(asha.days[7], DayMark::Leave); // Mon Apr 8

    assert_eq!(
        asha.stats,
        MonthStats {
            present: 0,
            leave: 8,
            absent: 16,
        }
    );
}

#[tokio::test]
async fn spans_with_both_endpoints_outside_the_month_are_missed() {
    let (engine, _db) = engine_with_db().await;

    approved_leave(&engine, "EMP010", "2024-03-20", "2024-05-05", "Privilege").await;

    let summaries = engine.monthly_summary(2024, 4).await.unwrap();
    let asha = &summaries[0];
    assert!(asha.days.iter().all(|d| *d != DayMark::Leave));
    assert_eq!(
        asha.stats,
        MonthStats {
            present: 0,
            leave: 0,
            absent: 22,
        }
    );
}

#[tokio::test]
async fn unreadable_stored_dates_are_skipped() {
    let (engine, _db) = engine_with_db().await;

    // The span sorts into April but does not parse as a date.
    approved_leave(&engine, "EMP010", "2024-04-1O", "2024-04-13", "Sick").await;

    let summaries = engine.monthly_summary(2024, 4).await.unwrap();
    let asha = &summaries[0];
    assert!(asha.days.iter().all(|d| *d != DayMark::Leave));
    assert_eq!(asha.stats.leave, 0);
}

#[tokio::test]
async fn the_month_must_exist_on_the_calendar() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.monthly_summary(2024, 13).await.unwrap_err();
    assert_eq!(err, EngineError::InvalidDate("2024-13".to_string()));

    let feb = engine.monthly_summary(2024, 2).await.unwrap();
    assert_eq!(feb[0].days.len(), 29);
}

#[tokio::test]
async fn the_directory_resolves_names_managers_and_roles() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(
        engine.display_name("EMP011").await.unwrap().as_deref(),
        Some("Bir Mehta")
    );
    assert_eq!(engine.display_name("EMP404").await.unwrap(), None);

    // Two hops: the employee's row, then the manager's own row.
    assert_eq!(
        engine
            .reporting_manager_name("EMP011")
            .await
            .unwrap()
            .as_deref(),
        Some("Asha Verma")
    );
    assert_eq!(engine.reporting_manager_name("EMP010").await.unwrap(), None);
    assert_eq!(engine.reporting_manager_name("EMP404").await.unwrap(), None);

    assert_eq!(engine.system_role("EMP012").await.unwrap(), Some(Role::Hr));
    assert_eq!(engine.system_role("EMP010").await.unwrap(), None);

    let staff = engine.active_employees().await.unwrap();
    let names: Vec<&str> = staff.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Asha Verma", "Bir Mehta", "Chandra Rao"]);

    let asha = engine.employee("EMP010").await.unwrap().unwrap();
    assert_eq!(asha.designation.as_deref(), Some("Engineer"));
    assert_eq!(asha.employment_status, "Active");
}
