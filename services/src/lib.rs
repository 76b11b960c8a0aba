pub mod attendance;
pub mod attendance_log;
pub mod attendance_report;
pub mod attendance_session;
pub mod class;
pub mod enrollment;
pub mod service;
pub mod user;
