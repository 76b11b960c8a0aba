//! Attendance session and check-in evaluator.
//!
//! Pure rules: QR token minting and validity, the ordered check-in
//! preconditions with PRESENT/LATE classification, Haversine geofencing and
//! report synthesis. Callers supply `now` explicitly.

pub mod check_in;
pub mod geo;
pub mod qr;
pub mod report;

pub use check_in::{CheckInRejection, Coordinates, classify, evaluate};
pub use geo::haversine;
pub use qr::{IssuedToken, QrPayload, is_valid, issue_token};
pub use report::{AttendanceReport, NameOrder, ReportRow, ReportSummary, RosterEntry, build_report};
