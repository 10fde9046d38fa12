use std::sync::Arc;

use sqlx::SqlitePool;

use crate::clock::Clock;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{AttendanceStatus, DashboardStats, ReportRow};

pub struct ReportService {
    db: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(db: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// One row per student, in listing order.
    pub async fn build_report(&self) -> Result<Vec<ReportRow>, AppError> {
        let tallies = repository::fetch_student_tallies(&self.db).await?;

        Ok(tallies
            .into_iter()
            .map(|t| {
                ReportRow::new(
                    t.student,
                    t.total_days,
                    t.present_days,
                    t.absent_days,
                    t.late_days,
                )
            })
            .collect())
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let today = self.clock.today();

        let total_students = repository::count_students(&self.db).await?;
        let today_attendance = repository::count_attendance_on(&self.db, today, None).await?;
        let present_today =
            repository::count_attendance_on(&self.db, today, Some(AttendanceStatus::Present))
                .await?;

        Ok(DashboardStats {
            total_students,
            today_attendance,
            present_today,
            today,
        })
    }
}
