use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub roll_number: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Validated registration input. All fields are non-empty and trimmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudentRequest {
    pub name: String,
    pub roll_number: String,
    pub email: String,
}

impl NewStudentRequest {
    /// Trims every field and rejects blanks.
    pub fn new(name: &str, roll_number: &str, email: &str) -> Result<Self, AppError> {
        let req = Self {
            name: name.trim().to_string(),
            roll_number: roll_number.trim().to_string(),
            email: email.trim().to_string(),
        };
        req.validate()?;
        Ok(req)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("name", &self.name),
            ("roll_number", &self.roll_number),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}
