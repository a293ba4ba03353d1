//! Page-number extractor for paginated listings.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use yatube_shared::PageQuery;

/// The `?page=` of a listing. Extraction never fails: a repeated key keeps
/// its last value and an unreadable query string counts as no page.
#[derive(Debug, Clone, Default)]
pub struct Paging(pub PageQuery);

impl FromRequest for Paging {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_else(|e| {
                tracing::debug!(query = %req.query_string(), error = %e, "Unreadable query string");
                Vec::new()
            });

        ready(Ok(Paging(PageQuery::from_pairs(pairs))))
    }
}
