use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

/// Failure of a service call.
///
/// Business rejections of a check-in are not errors; they travel as
/// [`crate::attendance::CheckInRejection`] values instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] DbErr),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(format_validation_errors(&errors))
    }
}

/// Flattens field errors into one `"; "`-joined message.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
