pub mod attendance_service;
pub mod report_service;
pub mod student_service;

pub use attendance_service::{AttendanceService, resolve_date};
pub use report_service::ReportService;
pub use student_service::StudentService;
