pub mod attendance_log;
pub mod attendance_session;
pub mod class;
pub mod class_enrollment;
pub mod user;

pub use attendance_log::Entity as AttendanceLog;
pub use attendance_session::Entity as AttendanceSession;
pub use class::Entity as Class;
pub use class_enrollment::Entity as ClassEnrollment;
pub use user::Entity as User;
