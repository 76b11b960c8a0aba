pub mod attendance_log;
pub mod attendance_session;
pub mod class;
pub mod enrollment;
pub mod user;
