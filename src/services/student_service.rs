use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{NewStudentRequest, Student};

const DUPLICATE_ROLL_NUMBER: &str = "Student with this roll number already exists";
const DUPLICATE_EMAIL: &str = "Student with this email already exists";
const DUPLICATE_STUDENT: &str = "Student with this roll number or email already exists";

pub struct StudentService {
    db: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl StudentService {
    pub fn new(db: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn list(&self) -> Result<Vec<Student>, AppError> {
        Ok(repository::fetch_students(&self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Student, AppError> {
        repository::find_student_by_id(&self.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))
    }

    /// Roll number is checked before email, so a request duplicating both
    /// reports the roll number.
    pub async fn register(&self, req: NewStudentRequest) -> Result<Student, AppError> {
        req.validate()?;

        let mut tx = self.db.begin().await?;

        if repository::find_student_by_roll_number(&mut *tx, &req.roll_number)
            .await?
            .is_some()
        {
            warn!("Rejected student registration, duplicate roll number: {}", req.roll_number);
            return Err(AppError::Conflict(DUPLICATE_ROLL_NUMBER.to_string()));
        }

        if repository::find_student_by_email(&mut *tx, &req.email)
            .await?
            .is_some()
        {
            warn!("Rejected student registration, duplicate email: {}", req.email);
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let student = repository::insert_student(&mut *tx, &req, self.clock.now_utc())
            .await
            .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_STUDENT))?;
        tx.commit().await?;

        info!("Registered student {} ({})", student.id, student.roll_number);
        Ok(student)
    }

    /// Removes the student and every attendance record it owns, atomically.
    /// Returns how many attendance records went with it.
    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let student = self.get(id).await?;

        let mut tx = self.db.begin().await?;
        let removed = repository::delete_attendance_for_student(&mut *tx, id).await?;
        if !repository::delete_student(&mut *tx, id).await? {
            // removed by someone else since the lookup; dropping tx rolls back
            return Err(AppError::NotFound(format!("Student {id} not found")));
        }
        tx.commit().await?;

        info!(
            "Deleted student {} ({}) and {} attendance records",
            id, student.roll_number, removed
        );
        Ok(removed)
    }
}
