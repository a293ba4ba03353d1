//! Identity extractors.
//!
//! Login itself lives in a separate service; here we only verify the JWT it
//! issued, read from `Authorization: Bearer <token>` or the `session` cookie.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use yatube_core::domain::Identity;
use yatube_core::ports::{AuthError, TokenService};

use crate::middleware::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// The authenticated caller. Extraction fails with a login redirect.
///
/// ```ignore
/// async fn new_post(CurrentUser(identity): CurrentUser) -> AppResult<HttpResponse> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

/// The caller, if authenticated. Never fails.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<Identity>);

impl Viewer {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

fn bearer_or_cookie(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}

fn identify(req: &HttpRequest, tokens: &dyn TokenService) -> Result<Identity, AuthError> {
    let token = bearer_or_cookie(req).ok_or(AuthError::MissingAuth)?;
    let claims = tokens.validate_token(&token)?;
    Ok(claims.identity)
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Err(AppError::Internal("Server configuration error".into())));
        };

        match identify(req, state.tokens.as_ref()) {
            Ok(identity) => ready(Ok(CurrentUser(identity))),
            Err(e) => {
                tracing::debug!(path = %req.path(), reason = %e, "Login required");
                let next = req
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| req.path().to_string());
                ready(Err(AppError::login_required(&state.login_url, next)))
            }
        }
    }
}

impl FromRequest for Viewer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req
            .app_data::<web::Data<AppState>>()
            .and_then(|state| identify(req, state.tokens.as_ref()).ok());

        ready(Ok(Viewer(identity)))
    }
}
