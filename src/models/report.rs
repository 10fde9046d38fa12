use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Student;

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub student: Student,
    pub total_days: i64,
    pub present_days: i64,
    pub absent_days: i64,
    pub late_days: i64,
    pub attendance_percentage: f64,
}

impl ReportRow {
    pub fn new(
        student: Student,
        total_days: i64,
        present_days: i64,
        absent_days: i64,
        late_days: i64,
    ) -> Self {
        Self {
            student,
            total_days,
            present_days,
            absent_days,
            late_days,
            attendance_percentage: attendance_percentage(present_days, total_days),
        }
    }
}

/// Present share of all records, as a percentage rounded to two decimals.
pub fn attendance_percentage(present_days: i64, total_days: i64) -> f64 {
    if total_days <= 0 {
        return 0.0;
    }
    let ratio = present_days as f64 / total_days as f64 * 100.0;
    (ratio * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub today_attendance: i64,
    pub present_today: i64,
    pub today: NaiveDate,
}
