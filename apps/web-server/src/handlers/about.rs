use actix_web::HttpResponse;

use super::html;
use crate::pages;

/// GET /about/author/
pub async fn author() -> HttpResponse {
    html(pages::about_author())
}

/// GET /about/tech/
pub async fn tech() -> HttpResponse {
    html(pages::about_tech())
}
