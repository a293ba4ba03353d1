//! Profiles, follow edges and the personal feed.

use actix_web::{HttpResponse, web};

use super::{html, post_cards, profile_url, redirect};
use crate::middleware::auth::{CurrentUser, Viewer};
use crate::middleware::error::AppResult;
use crate::middleware::paging::Paging;
use crate::pages::{self, FollowControl};
use crate::state::AppState;

/// GET /{username}/
pub async fn profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    Paging(query): Paging,
    viewer: Viewer,
) -> AppResult<HttpResponse> {
    let viewer = viewer.identity();
    let profile = state
        .social
        .profile(viewer, &username, query.number())
        .await?;

    let is_self = viewer.is_some_and(|v| v.user_id == profile.user.id);
    let follow = FollowControl::for_viewer(viewer.is_none() || is_self, profile.is_following);
    let cards = post_cards(&state, profile.posts).await?;

    Ok(html(pages::profile(&profile.user, &cards, follow)))
}

/// GET /{username}/follow/
pub async fn follow(
    state: web::Data<AppState>,
    username: web::Path<String>,
    CurrentUser(me): CurrentUser,
) -> AppResult<HttpResponse> {
    let outcome = state.social.follow(&me, &username).await?;
    tracing::debug!(follower = %me.username, followee = %username, ?outcome, "Follow requested");

    Ok(redirect(profile_url(&username)))
}

/// GET /{username}/unfollow/
pub async fn unfollow(
    state: web::Data<AppState>,
    username: web::Path<String>,
    CurrentUser(me): CurrentUser,
) -> AppResult<HttpResponse> {
    let outcome = state.social.unfollow(&me, &username).await?;
    tracing::debug!(follower = %me.username, followee = %username, ?outcome, "Unfollow requested");

    Ok(redirect(profile_url(&username)))
}

/// GET /follow/
pub async fn feed(
    state: web::Data<AppState>,
    CurrentUser(me): CurrentUser,
    Paging(query): Paging,
) -> AppResult<HttpResponse> {
    let page = state.social.feed(&me, query.number()).await?;
    let cards = post_cards(&state, page).await?;

    Ok(html(pages::feed(&cards)))
}
