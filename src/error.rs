use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::{Display, Error};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

/// Business failures raised by the services. Every variant is a deterministic
/// rule violation except `Store`, which wraps backing-store I/O failures.
#[derive(Debug, Display, Error)]
pub enum Error {
    #[display(fmt = "{}", _0)]
    NotFound(#[error(not(source))] String),

    #[display(fmt = "{}", _0)]
    InvalidInput(#[error(not(source))] String),

    #[display(fmt = "{}", _0)]
    Conflict(#[error(not(source))] String),

    #[display(
        fmt = "insufficient leave balance: requested {} day(s), {} available",
        requested,
        available
    )]
    InsufficientBalance { requested: i64, available: i64 },

    #[display(fmt = "{}", _0)]
    InvalidState(#[error(not(source))] String),

    #[display(fmt = "{}", _0)]
    Unauthorized(#[error(not(source))] String),

    #[display(fmt = "storage error: {}", _0)]
    Store(sqlx::Error),
}

impl Error {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Error::Conflict(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Error::InvalidState(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Error::Unauthorized(msg.into())
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::Store(e)
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidState(_) => StatusCode::CONFLICT,
            Error::Unauthorized(_) => StatusCode::FORBIDDEN,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Error::Store(e) => {
                tracing::error!(error = %e, "storage failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_stable_statuses() {
        assert_eq!(
            Error::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::invalid_input("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            Error::InsufficientBalance {
                requested: 5,
                available: 2
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::invalid_state("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::unauthorized("x").status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn insufficient_balance_names_both_counts() {
        let e = Error::InsufficientBalance {
            requested: 12,
            available: 4,
        };
        let msg = e.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("4"));
    }
}
