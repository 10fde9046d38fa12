pub mod forms;

use axum::extract::{Form, Path, Query};
use axum::response::Redirect;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;
use crate::models::page::DEFAULT_PAGE_SIZE;
use crate::models::*;
use crate::services::{AttendanceService, ReportService, StudentService};
use crate::state::AppState;

use self::forms::{AttendanceQuery, MarkAttendanceForm, StudentForm};

const CHART_DAYS: u32 = 7;

#[derive(Serialize)]
struct MarkAttendanceContext {
    students: Vec<Student>,
    today: NaiveDate,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/students", get(list_students))
        .route("/add_student", get(add_student_form).post(add_student))
        .route("/attendance", get(list_attendance))
        .route("/mark_attendance", get(mark_attendance_form).post(mark_attendance))
        .route("/reports", get(reports))
        .route("/delete_student/{student_id}", get(delete_student))
        .route("/api/attendance_data", get(attendance_data))
        .with_state(state)
}

fn student_service(state: &AppState) -> StudentService {
    StudentService::new(state.db.clone(), state.clock.clone())
}

fn attendance_service(state: &AppState) -> AttendanceService {
    AttendanceService::new(state.db.clone(), state.clock.clone())
}

fn report_service(state: &AppState) -> ReportService {
    ReportService::new(state.db.clone(), state.clock.clone())
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn index(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let stats = report_service(&state).dashboard_stats().await?;
    Ok(Json(stats))
}

async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let students = student_service(&state).list().await?;
    Ok(Json(students))
}

async fn add_student_form() -> Json<StudentForm> {
    Json(StudentForm::default())
}

async fn add_student(
    State(state): State<AppState>,
    Form(form): Form<StudentForm>,
) -> Result<Redirect, AppError> {
    let req = NewStudentRequest::try_from(form)?;
    student_service(&state).register(req).await?;
    Ok(Redirect::to("/students"))
}

async fn list_attendance(
    State(state): State<AppState>,
    Query(params): Query<AttendanceQuery>,
) -> Result<Json<AttendanceListing>, AppError> {
    let listing = attendance_service(&state)
        .list_for_date(params.date.as_deref(), params.page(), DEFAULT_PAGE_SIZE)
        .await?;
    Ok(Json(listing))
}

async fn mark_attendance_form(
    State(state): State<AppState>,
) -> Result<Json<MarkAttendanceContext>, AppError> {
    let students = student_service(&state).list().await?;
    Ok(Json(MarkAttendanceContext {
        students,
        today: state.clock.today(),
    }))
}

async fn mark_attendance(
    State(state): State<AppState>,
    Form(form): Form<MarkAttendanceForm>,
) -> Result<Redirect, AppError> {
    let req = MarkAttendanceRequest::try_from(form)?;
    attendance_service(&state).mark(req).await?;
    Ok(Redirect::to("/mark_attendance"))
}

async fn reports(State(state): State<AppState>) -> Result<Json<Vec<ReportRow>>, AppError> {
    let rows = report_service(&state).build_report().await?;
    Ok(Json(rows))
}

async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Redirect, AppError> {
    // a non-numeric id names no student
    let id = student_id
        .parse::<i64>()
        .map_err(|_| AppError::NotFound(format!("Student {student_id} not found")))?;
    student_service(&state).delete(id).await?;
    Ok(Redirect::to("/students"))
}

async fn attendance_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyCount>>, AppError> {
    let series = attendance_service(&state).summary(CHART_DAYS).await?;
    Ok(Json(series))
}
