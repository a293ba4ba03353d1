use actix_web::{HttpResponse, web};

use super::{html, post_cards};
use crate::middleware::error::AppResult;
use crate::middleware::paging::Paging;
use crate::pages;
use crate::state::AppState;

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    Paging(query): Paging,
) -> AppResult<HttpResponse> {
    let group = state.community.get_group(&slug).await?;
    let page = state.community.list_posts_in(&group, query.number()).await?;
    let cards = post_cards(&state, page).await?;

    Ok(html(pages::group(&group, &cards)))
}
