pub mod m202601150001_create_users;
pub mod m202601150002_create_classes;
pub mod m202601150003_create_class_enrollments;
pub mod m202601150004_create_attendance_sessions;
pub mod m202601150005_create_attendance_logs;
