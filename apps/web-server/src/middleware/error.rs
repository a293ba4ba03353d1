//! Error handling - every failure becomes an HTML page or a redirect.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};

use yatube_core::error::{DomainError, RepoError};

use crate::pages;

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller must log in; `next` is where to resume afterwards.
    #[error("Login required for {next}")]
    LoginRequired { login_url: String, next: String },

    /// Soft denial: send the caller elsewhere without an error status.
    #[error("Redirect to {0}")]
    Redirect(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn login_required(login_url: &str, next: impl Into<String>) -> Self {
        AppError::LoginRequired {
            login_url: login_url.to_string(),
            next: next.into(),
        }
    }

    fn location(&self) -> Option<String> {
        match self {
            AppError::LoginRequired { login_url, next } => Some(format!(
                "{}?next={}",
                login_url,
                urlencoding::encode(next)
            )),
            AppError::Redirect(to) => Some(to.clone()),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRequired { .. } | AppError::Redirect(_) => StatusCode::FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Some(location) = self.location() {
            return HttpResponse::Found()
                .insert_header((header::LOCATION, location))
                .finish();
        }

        let body = match self {
            AppError::NotFound(detail) => {
                tracing::debug!(detail = %detail, "Not found");
                pages::not_found()
            }
            AppError::BadRequest(detail) => {
                tracing::debug!(detail = %detail, "Bad request");
                pages::bad_request(detail)
            }
            _ => {
                tracing::error!(error = %self, "Internal error");
                pages::server_error()
            }
        };

        HttpResponse::build(self.status_code())
            .content_type(pages::HTML)
            .body(body)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{entity_type} {key}"))
            }
            DomainError::PermissionDenied { owner } => {
                AppError::Redirect(format!("/{}/", pages::segment(&owner)))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        DomainError::from(err).into()
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
