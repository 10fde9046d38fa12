use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{AttendanceStatus, MarkAttendanceRequest, NewStudentRequest};

/// Registration form fields. Missing fields arrive empty and fail validation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StudentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub email: String,
}

impl TryFrom<StudentForm> for NewStudentRequest {
    type Error = AppError;

    fn try_from(form: StudentForm) -> Result<Self, Self::Error> {
        NewStudentRequest::new(&form.name, &form.roll_number, &form.email)
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct MarkAttendanceForm {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub status: String,
    pub notes: Option<String>,
    pub date: Option<String>,
}

impl TryFrom<MarkAttendanceForm> for MarkAttendanceRequest {
    type Error = AppError;

    fn try_from(form: MarkAttendanceForm) -> Result<Self, Self::Error> {
        let raw_id = form.student_id.trim();
        if raw_id.is_empty() {
            return Err(AppError::Validation("student_id is required".to_string()));
        }
        let student_id = raw_id
            .parse::<i64>()
            .map_err(|_| AppError::Validation(format!("invalid student_id: {raw_id:?}")))?;

        if form.status.trim().is_empty() {
            return Err(AppError::Validation("status is required".to_string()));
        }
        let status = form
            .status
            .parse::<AttendanceStatus>()
            .map_err(AppError::Validation)?;

        Ok(MarkAttendanceRequest {
            student_id,
            status,
            date: form.date,
            notes: form.notes,
        })
    }
}

/// `?date=YYYY-MM-DD&page=N`. Both are lenient: bad values fall back to defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AttendanceQuery {
    pub date: Option<String>,
    pub page: Option<String>,
}

impl AttendanceQuery {
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map(|p| p.clamp(1, i64::from(u32::MAX)) as u32)
            .unwrap_or(1)
    }
}
