use std::sync::Arc;

use attendance::clock::{Clock, FixedClock};
use attendance::db;
use attendance::error::AppError;
use attendance::models::{AttendanceStatus, MarkAttendanceRequest, NewStudentRequest, Student};
use attendance::services::{AttendanceService, StudentService};
use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    day(2024, 3, 10)
}

async fn setup() -> (SqlitePool, AttendanceService) {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create test db");
    let clock = Arc::new(FixedClock::on(today()));
    let ledger = AttendanceService::new(pool.clone(), clock);
    (pool, ledger)
}

async fn register(pool: &SqlitePool, name: &str, roll_number: &str) -> Student {
    let email = format!("{roll_number}@x.com");
    StudentService::new(pool.clone(), Arc::new(FixedClock::on(today())))
        .register(NewStudentRequest::new(name, roll_number, &email).unwrap())
        .await
        .expect("Failed to register student")
}

fn mark(student_id: i64, status: AttendanceStatus, date: Option<&str>) -> MarkAttendanceRequest {
    MarkAttendanceRequest {
        student_id,
        status,
        date: date.map(str::to_string),
        notes: None,
    }
}

#[tokio::test]
async fn test_present_sets_time_in() {
    let (pool, ledger) = setup().await;
    let ann = register(&pool, "Ann", "R1").await;

    let record = ledger
        .mark(mark(ann.id, AttendanceStatus::Present, Some("2024-01-01")))
        .await
        .unwrap();

    assert_eq!(record.date, day(2024, 1, 1));
    assert_eq!(record.time_in, NaiveTime::from_hms_opt(12, 0, 0));
    assert!(record.time_out.is_none());
}

#[tokio::test]
async fn test_absent_and_late_leave_time_in_empty() {
    let (pool, ledger) = setup().await;
    let ann = register(&pool, "Ann", "R1").await;

    let absent = ledger
        .mark(mark(ann.id, AttendanceStatus::Absent, Some("2024-01-01")))
        .await
        .unwrap();
    let late = ledger
        .mark(mark(ann.id, AttendanceStatus::Late, Some("2024-01-02")))
        .await
        .unwrap();

    assert!(absent.time_in.is_none());
    assert!(late.time_in.is_none());
}

#[tokio::test]
async fn test_second_mark_same_day_is_a_conflict() {
    let (pool, ledger) = setup().await;
    let ann = register(&pool, "Ann", "R1").await;

    ledger
        .mark(mark(ann.id, AttendanceStatus::Present, Some("2024-01-01")))
        .await
        .unwrap();

    for status in [AttendanceStatus::Absent, AttendanceStatus::Present] {
        let err = ledger
            .mark(mark(ann.id, status, Some("2024-01-01")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
    }

    let listing = ledger.list_for_date(Some("2024-01-01"), 1, 10).await.unwrap();
    assert_eq!(listing.records.total, 1);
    assert_eq!(listing.records.items[0].status, AttendanceStatus::Present);
}

#[tokio::test]
async fn test_missing_or_bad_date_marks_today() {
    let (pool, ledger) = setup().await;
    let ann = register(&pool, "Ann", "R1").await;
    let bo = register(&pool, "Bo", "R2").await;

    let first = ledger
        .mark(mark(ann.id, AttendanceStatus::Late, None))
        .await
        .unwrap();
    let second = ledger
        .mark(mark(bo.id, AttendanceStatus::Late, Some("01/02/2024")))
        .await
        .unwrap();

    assert_eq!(first.date, today());
    assert_eq!(second.date, today());

    let err = ledger
        .mark(mark(ann.id, AttendanceStatus::Present, Some("not a date")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_mark_unknown_student_is_not_found() {
    let (_pool, ledger) = setup().await;

    let err = ledger
        .mark(mark(99, AttendanceStatus::Present, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_blank_notes_are_not_stored() {
    let (pool, ledger) = setup().await;
    let ann = register(&pool, "Ann", "R1").await;
    let bo = register(&pool, "Bo", "R2").await;

    let mut blank = mark(ann.id, AttendanceStatus::Absent, None);
    blank.notes = Some("   ".to_string());
    let mut noted = mark(bo.id, AttendanceStatus::Absent, None);
    noted.notes = Some(" sick ".to_string());

    assert!(ledger.mark(blank).await.unwrap().notes.is_none());
    assert_eq!(ledger.mark(noted).await.unwrap().notes.as_deref(), Some("sick"));
}

#[tokio::test]
async fn test_listing_filters_by_date_newest_first() {
    let (pool, ledger) = setup().await;
    let ann = register(&pool, "Ann", "R1").await;
    let bo = register(&pool, "Bo", "R2").await;

    ledger
        .mark(mark(ann.id, AttendanceStatus::Present, Some("2024-01-01")))
        .await
        .unwrap();
    ledger
        .mark(mark(bo.id, AttendanceStatus::Absent, Some("2024-01-01")))
        .await
        .unwrap();
    ledger
        .mark(mark(ann.id, AttendanceStatus::Late, Some("2024-01-02")))
        .await
        .unwrap();

    let listing = ledger.list_for_date(Some("2024-01-01"), 1, 10).await.unwrap();
    assert_eq!(listing.selected_date, day(2024, 1, 1));
    assert_eq!(listing.records.total, 2);

    let names: Vec<&str> = listing
        .records
        .items
        .iter()
        .map(|e| e.student_name.as_str())
        .collect();
    assert_eq!(names, vec!["Bo", "Ann"]);
}

#[tokio::test]
async fn test_listing_paginates_ten_per_page() {
    let (pool, ledger) = setup().await;

    for i in 0..12 {
        let s = register(&pool, &format!("Student {i}"), &format!("R{i}")).await;
        ledger
            .mark(mark(s.id, AttendanceStatus::Present, Some("2024-01-01")))
            .await
            .unwrap();
    }

    let first = ledger.list_for_date(Some("2024-01-01"), 1, 10).await.unwrap();
    assert_eq!(first.records.items.len(), 10);
    assert_eq!(first.records.pages, 2);
    assert!(first.records.has_next);

    let second = ledger.list_for_date(Some("2024-01-01"), 2, 10).await.unwrap();
    assert_eq!(second.records.items.len(), 2);
    assert!(!second.records.has_next);

    let past_end = ledger.list_for_date(Some("2024-01-01"), 5, 10).await.unwrap();
    assert!(past_end.records.items.is_empty());
    assert_eq!(past_end.records.total, 12);
}

#[tokio::test]
async fn test_listing_bad_date_uses_today() {
    let (pool, ledger) = setup().await;
    let ann = register(&pool, "Ann", "R1").await;
    ledger
        .mark(mark(ann.id, AttendanceStatus::Present, None))
        .await
        .unwrap();

    let listing = ledger.list_for_date(Some("garbage"), 1, 10).await.unwrap();
    assert_eq!(listing.selected_date, today());
    assert_eq!(listing.records.items.len(), 1);
}

#[tokio::test]
async fn test_summary_covers_seven_days_without_late() {
    let (pool, ledger) = setup().await;
    let ann = register(&pool, "Ann", "R1").await;
    let bo = register(&pool, "Bo", "R2").await;
    let cy = register(&pool, "Cy", "R3").await;

    ledger
        .mark(mark(ann.id, AttendanceStatus::Present, None))
        .await
        .unwrap();
    ledger
        .mark(mark(bo.id, AttendanceStatus::Absent, None))
        .await
        .unwrap();
    ledger
        .mark(mark(cy.id, AttendanceStatus::Late, None))
        .await
        .unwrap();
    ledger
        .mark(mark(ann.id, AttendanceStatus::Present, Some("2024-03-04")))
        .await
        .unwrap();
    // outside the window
    ledger
        .mark(mark(ann.id, AttendanceStatus::Present, Some("2024-03-03")))
        .await
        .unwrap();

    let series = ledger.summary(7).await.unwrap();
    assert_eq!(series.len(), 7);
    assert_eq!(series[0].date, today());
    for pair in series.windows(2) {
        assert_eq!(pair[0].date.pred_opt(), Some(pair[1].date));
    }

    assert_eq!((series[0].present, series[0].absent), (1, 1));
    assert_eq!(series[6].date, day(2024, 3, 4));
    assert_eq!((series[6].present, series[6].absent), (1, 0));
    let total_present: i64 = series.iter().map(|d| d.present).sum();
    assert_eq!(total_present, 2);
}

#[tokio::test]
async fn test_summary_of_zero_days_is_empty() {
    let (_pool, ledger) = setup().await;
    assert!(ledger.summary(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_created_at_comes_from_clock() {
    let (pool, ledger) = setup().await;
    let ann = register(&pool, "Ann", "R1").await;
    let expected = FixedClock::on(today()).now_utc();

    let record = ledger
        .mark(mark(ann.id, AttendanceStatus::Absent, Some("2024-01-01")))
        .await
        .unwrap();
    assert_eq!(record.created_at, expected);

    let listing = ledger.list_for_date(Some("2024-01-01"), 1, 10).await.unwrap();
    assert_eq!(listing.records.items[0].created_at, expected);
}
