use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use sqlx::sqlite::SqliteExecutor;

use crate::models::{
    Attendance, AttendanceEntry, AttendanceStatus, NewAttendance, NewStudentRequest, Student,
};

/// Per-student attendance counts, straight from the grouped report query.
#[derive(Debug, Clone, FromRow)]
pub struct StudentTally {
    #[sqlx(flatten)]
    pub student: Student,
    pub total_days: i64,
    pub present_days: i64,
    pub absent_days: i64,
    pub late_days: i64,
}

pub async fn fetch_students<'e, E: SqliteExecutor<'e>>(db: E) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, roll_number, email, created_at FROM students ORDER BY id ASC",
    )
    .fetch_all(db)
    .await
}

pub async fn find_student_by_id<'e, E: SqliteExecutor<'e>>(
    db: E,
    id: i64,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, roll_number, email, created_at FROM students WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_student_by_roll_number<'e, E: SqliteExecutor<'e>>(
    db: E,
    roll_number: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, roll_number, email, created_at FROM students WHERE roll_number = ?",
    )
    .bind(roll_number)
    .fetch_optional(db)
    .await
}

pub async fn find_student_by_email<'e, E: SqliteExecutor<'e>>(
    db: E,
    email: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, roll_number, email, created_at FROM students WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn insert_student<'e, E: SqliteExecutor<'e>>(
    db: E,
    req: &NewStudentRequest,
    created_at: DateTime<Utc>,
) -> Result<Student, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO students (name, roll_number, email, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&req.name)
    .bind(&req.roll_number)
    .bind(&req.email)
    .bind(created_at)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Student {
        id,
        name: req.name.clone(),
        roll_number: req.roll_number.clone(),
        email: req.email.clone(),
        created_at,
    })
}

pub async fn count_students<'e, E: SqliteExecutor<'e>>(db: E) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
        .fetch_one(db)
        .await
}

pub async fn delete_student<'e, E: SqliteExecutor<'e>>(
    db: E,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_attendance_for_student<'e, E: SqliteExecutor<'e>>(
    db: E,
    student_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM attendance WHERE student_id = ?")
        .bind(student_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result)
}

pub async fn find_attendance<'e, E: SqliteExecutor<'e>>(
    db: E,
    student_id: i64,
    date: NaiveDate,
) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, student_id, date, status, time_in, time_out, notes, created_at
        FROM attendance
        WHERE student_id = ?1 AND date = ?2
        "#,
    )
    .bind(student_id)
    .bind(date)
    .fetch_optional(db)
    .await
}

pub async fn insert_attendance<'e, E: SqliteExecutor<'e>>(
    db: E,
    new: &NewAttendance,
) -> Result<Attendance, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO attendance
            (student_id, date, status, time_in, time_out, notes, created_at)
        VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6)
        "#,
    )
    .bind(new.student_id)
    .bind(new.date)
    .bind(new.status)
    .bind(new.time_in)
    .bind(&new.notes)
    .bind(new.created_at)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Attendance {
        id,
        student_id: new.student_id,
        date: new.date,
        status: new.status,
        time_in: new.time_in,
        time_out: None,
        notes: new.notes.clone(),
        created_at: new.created_at,
    })
}

/// Records dated `date`, optionally narrowed to one status.
pub async fn count_attendance_on<'e, E: SqliteExecutor<'e>>(
    db: E,
    date: NaiveDate,
    status: Option<AttendanceStatus>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE date = ?1 AND (?2 IS NULL OR status = ?2)",
    )
    .bind(date)
    .bind(status)
    .fetch_one(db)
    .await
}

/// Newest first; records created in the same instant fall back to insertion order.
pub async fn fetch_attendance_page<'e, E: SqliteExecutor<'e>>(
    db: E,
    date: NaiveDate,
    limit: i64,
    offset: i64,
) -> Result<Vec<AttendanceEntry>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceEntry>(
        r#"
        SELECT
            a.id, a.student_id, s.name AS student_name, s.roll_number,
            a.date, a.status, a.time_in, a.time_out, a.notes, a.created_at
        FROM attendance a
        JOIN students s ON s.id = a.student_id
        WHERE a.date = ?1
        ORDER BY a.created_at DESC, a.id DESC
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(date)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

/// Present and absent counts per day in `[from, to]`. Days without records are omitted.
pub async fn fetch_daily_counts<'e, E: SqliteExecutor<'e>>(
    db: E,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<(NaiveDate, i64, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (NaiveDate, i64, i64)>(
        r#"
        SELECT
            date,
            COALESCE(SUM(status = 'Present'), 0) AS present,
            COALESCE(SUM(status = 'Absent'), 0) AS absent
        FROM attendance
        WHERE date BETWEEN ?1 AND ?2
        GROUP BY date
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
}

pub async fn fetch_student_tallies<'e, E: SqliteExecutor<'e>>(
    db: E,
) -> Result<Vec<StudentTally>, sqlx::Error> {
    sqlx::query_as::<_, StudentTally>(
        r#"
        SELECT
            s.id, s.name, s.roll_number, s.email, s.created_at,
            COUNT(a.id) AS total_days,
            COALESCE(SUM(a.status = 'Present'), 0) AS present_days,
            COALESCE(SUM(a.status = 'Absent'), 0) AS absent_days,
            COALESCE(SUM(a.status = 'Late'), 0) AS late_days
        FROM students s
        LEFT JOIN attendance a ON a.student_id = s.id
        GROUP BY s.id
        ORDER BY s.id ASC
        "#,
    )
    .fetch_all(db)
    .await
}
