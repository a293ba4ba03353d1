use actix_web::{HttpRequest, HttpResponse};

use crate::middleware::error::{AppError, AppResult};

/// Fallback for every unmatched path.
pub async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(req.path().to_string()))
}
