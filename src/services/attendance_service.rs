use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::db::repository;
use crate::error::AppError;
use crate::models::page::offset as page_offset;
use crate::models::{
    Attendance, AttendanceListing, AttendanceStatus, DailyCount, MarkAttendanceRequest,
    NewAttendance, Page,
};

const ALREADY_MARKED: &str = "Attendance already marked for this student on this date";

/// Parses `YYYY-MM-DD`, falling back to `today` when the input is missing or malformed.
pub fn resolve_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .unwrap_or(today)
}

pub struct AttendanceService {
    db: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    pub fn new(db: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Records one status for a student on a day. A second mark for the same
    /// day is a conflict; the first one is never overwritten.
    pub async fn mark(&self, req: MarkAttendanceRequest) -> Result<Attendance, AppError> {
        let now = self.clock.now();
        let date = resolve_date(req.date.as_deref(), now.date());

        let mut tx = self.db.begin().await?;

        if repository::find_student_by_id(&mut *tx, req.student_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!("Student {} not found", req.student_id)));
        }

        if repository::find_attendance(&mut *tx, req.student_id, date)
            .await?
            .is_some()
        {
            warn!("Attendance already marked for student {} on {}", req.student_id, date);
            return Err(AppError::Conflict(ALREADY_MARKED.to_string()));
        }

        let new = NewAttendance {
            student_id: req.student_id,
            date,
            status: req.status,
            time_in: (req.status == AttendanceStatus::Present).then(|| now.time()),
            notes: req
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: self.clock.now_utc(),
        };

        let record = repository::insert_attendance(&mut *tx, &new)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, ALREADY_MARKED))?;
        tx.commit().await?;

        info!(
            "Marked student {} {} on {}",
            record.student_id, record.status, record.date
        );
        Ok(record)
    }

    pub async fn list_for_date(
        &self,
        date: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Result<AttendanceListing, AppError> {
        let selected_date = resolve_date(date, self.clock.today());
        let page = page.max(1);
        let per_page = per_page.max(1);

        let total = repository::count_attendance_on(&self.db, selected_date, None).await?;
        let items = repository::fetch_attendance_page(
            &self.db,
            selected_date,
            i64::from(per_page),
            page_offset(page, per_page),
        )
        .await?;

        Ok(AttendanceListing {
            selected_date,
            records: Page::new(items, page, per_page, total),
        })
    }

    /// Present/absent counts for the last `days` days, today first.
    /// Late records are not part of this series.
    pub async fn summary(&self, days: u32) -> Result<Vec<DailyCount>, AppError> {
        if days == 0 {
            return Ok(Vec::new());
        }

        let today = self.clock.today();
        let dates: Vec<NaiveDate> = (0..days)
            .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
            .collect();
        let oldest = dates.last().copied().unwrap_or(today);

        let counts: HashMap<NaiveDate, (i64, i64)> =
            repository::fetch_daily_counts(&self.db, oldest, today)
                .await?
                .into_iter()
                .map(|(date, present, absent)| (date, (present, absent)))
                .collect();

        Ok(dates
            .into_iter()
            .map(|date| {
                let (present, absent) = counts.get(&date).copied().unwrap_or((0, 0));
                DailyCount {
                    date,
                    present,
                    absent,
                }
            })
            .collect())
    }
}
