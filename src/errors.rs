use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("habit {0} does not exist in the store")]
    HabitNotFound(String),

    #[error("user {0} does not exist in the store")]
    UserNotFound(String),
}

#[derive(Debug, Error)]
pub enum HabitError {
    #[error("not signed in")]
    NotAuthenticated,

    #[error("habit {habit_id} not found")]
    HabitNotFound { habit_id: String },

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl HabitError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(habit_id: impl Into<String>) -> Self {
        Self::HabitNotFound {
            habit_id: habit_id.into(),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<HabitError> for AppError {
    fn from(err: HabitError) -> Self {
        let status = match &err {
            HabitError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            HabitError::HabitNotFound { .. } => StatusCode::NOT_FOUND,
            HabitError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            HabitError::Backend(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
