pub mod attendance;
pub mod page;
pub mod report;
pub mod student;

pub use attendance::{
    Attendance, AttendanceEntry, AttendanceListing, AttendanceStatus, DailyCount,
    MarkAttendanceRequest, NewAttendance,
};
pub use page::Page;
pub use report::{DashboardStats, ReportRow};
pub use student::{NewStudentRequest, Student};
