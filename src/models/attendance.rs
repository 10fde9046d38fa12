use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Present" => Ok(AttendanceStatus::Present),
            "Absent" => Ok(AttendanceStatus::Absent),
            "Late" => Ok(AttendanceStatus::Late),
            other => Err(format!("unknown attendance status: {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub time_in: Option<NaiveTime>,
    pub time_out: Option<NaiveTime>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An attendance record joined with the owning student's identity, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceEntry {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub roll_number: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub time_in: Option<NaiveTime>,
    pub time_out: Option<NaiveTime>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Marking request as received from a caller. `date` is raw text and is
/// resolved against the clock by the ledger.
#[derive(Debug, Clone)]
pub struct MarkAttendanceRequest {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub date: Option<String>,
    pub notes: Option<String>,
}

/// Fully resolved row ready for insertion.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub time_in: Option<NaiveTime>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One date's worth of attendance, as shown on the history page.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceListing {
    pub selected_date: NaiveDate,
    pub records: Page<AttendanceEntry>,
}

/// Present/absent totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub present: i64,
    pub absent: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_exact_names() {
        assert_eq!("Present".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Present));
        assert_eq!(" Late ".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Late));
        assert!("present".parse::<AttendanceStatus>().is_err());
        assert!("".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn daily_count_serializes_iso_date() {
        let count = DailyCount {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            present: 2,
            absent: 1,
        };
        let json = serde_json::to_value(&count).unwrap();
        assert_eq!(json, serde_json::json!({"date": "2024-01-01", "present": 2, "absent": 1}));
    }
}
