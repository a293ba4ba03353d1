//! HTTP handlers and route configuration.

mod about;
mod comments;
mod errors;
mod groups;
mod posts;
mod social;

use std::collections::{HashMap, HashSet};

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use yatube_core::domain::{Comment, Post};
use yatube_core::pagination::Page;

use crate::middleware::error::{AppError, AppResult};
use crate::pages::{self, CommentCard, PostCard};
use crate::state::AppState;

pub use posts::INDEX_CACHE_PREFIX;

/// Configure all application routes.
///
/// Fixed paths are registered before the `/{username}/...` patterns so they win.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(posts::index))
    .route("/about/author/", web::get().to(about::author))
    .route("/about/tech/", web::get().to(about::tech))
    .route("/follow/", web::get().to(social::feed))
    .service(
        web::resource("/new/")
            .route(web::get().to(posts::new_post_form))
            .route(web::post().to(posts::create_post)),
    )
    .route("/group/{slug}/", web::get().to(groups::group_posts))
    .route("/{username}/", web::get().to(social::profile))
    .route("/{username}/follow/", web::get().to(social::follow))
    .route("/{username}/unfollow/", web::get().to(social::unfollow))
    .service(
        web::resource("/{username}/{post_id}/")
            .route(web::get().to(posts::post_detail))
            .route(web::post().to(comments::comment_from_detail)),
    )
    .service(
        web::resource("/{username}/{post_id}/edit/")
            .route(web::get().to(posts::edit_post_form))
            .route(web::post().to(posts::edit_post)),
    )
    .service(
        web::resource("/{username}/{post_id}/comment/")
            .route(web::get().to(comments::comment_form))
            .route(web::post().to(comments::add_comment)),
    )
    .default_service(web::to(errors::not_found));
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(pages::HTML).body(body)
}

fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

fn profile_url(username: &str) -> String {
    format!("/{}/", pages::segment(username))
}

fn post_url(username: &str, post_id: Uuid) -> String {
    format!("/{}/{post_id}/", pages::segment(username))
}

/// Attach author names and groups to a page of posts.
async fn post_cards(state: &AppState, page: Page<Post>) -> AppResult<Page<PostCard>> {
    let author_ids: Vec<Uuid> = unique(page.items.iter().map(|p| p.author_id));
    let group_ids: Vec<Uuid> = unique(page.items.iter().filter_map(|p| p.group_id));

    let authors: HashMap<Uuid, String> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();
    let groups: HashMap<_, _> = state
        .groups
        .find_by_ids(&group_ids)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();

    Ok(page.map(|post| PostCard {
        author: authors.get(&post.author_id).cloned().unwrap_or_default(),
        group: post.group_id.and_then(|id| groups.get(&id).cloned()),
        post,
    }))
}

async fn post_card(state: &AppState, username: &str, post: Post) -> AppResult<PostCard> {
    let group = match post.group_id {
        Some(id) => state.groups.find_by_id(id).await?,
        None => None,
    };
    Ok(PostCard {
        post,
        author: username.to_string(),
        group,
    })
}

async fn comment_cards(state: &AppState, comments: Vec<Comment>) -> AppResult<Vec<CommentCard>> {
    let author_ids = unique(comments.iter().map(|c| c.author_id));
    let authors: HashMap<Uuid, String> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    Ok(comments
        .into_iter()
        .map(|comment| CommentCard {
            author: authors.get(&comment.author_id).cloned().unwrap_or_default(),
            comment,
        })
        .collect())
}

fn unique(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
