//! Comment submission, both inline on the post page and on its own page.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use yatube_core::DomainError;
use yatube_core::domain::Identity;
use yatube_shared::forms::add_error;
use yatube_shared::{CommentForm, FieldErrors};

use super::posts::detail_page;
use super::{comment_cards, html, post_card, post_url, redirect};
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::pages::{self, CommentBox};
use crate::state::AppState;

fn comment_url(username: &str, post_id: Uuid) -> String {
    format!("/{}/{post_id}/comment/", pages::segment(username))
}

/// POST /{username}/{post_id}/
pub async fn comment_from_detail(
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
    CurrentUser(me): CurrentUser,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();

    match submit(&state, &me, &username, post_id, &form).await? {
        None => Ok(redirect(post_url(&username, post_id))),
        Some(errors) => {
            let post = state.content.get_post(&username, post_id).await?;
            let body = detail_page(&state, Some(&me), &username, post, &form.text, &errors).await?;
            Ok(html(body))
        }
    }
}

/// GET /{username}/{post_id}/comment/
pub async fn comment_form(
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
    _user: CurrentUser,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let body = comment_page(&state, &username, post_id, "", &FieldErrors::new()).await?;
    Ok(html(body))
}

/// POST /{username}/{post_id}/comment/
///
/// Redirects back to this same page so the new comment shows in the list.
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
    CurrentUser(me): CurrentUser,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();

    match submit(&state, &me, &username, post_id, &form).await? {
        None => Ok(redirect(comment_url(&username, post_id))),
        Some(errors) => {
            let body = comment_page(&state, &username, post_id, &form.text, &errors).await?;
            Ok(html(body))
        }
    }
}

/// Store the comment, or return the field errors to show.
async fn submit(
    state: &AppState,
    me: &Identity,
    username: &str,
    post_id: Uuid,
    form: &CommentForm,
) -> AppResult<Option<FieldErrors>> {
    // Unknown posts are a 404 even when the text is also invalid.
    let text = match form.clean() {
        Ok(text) => text,
        Err(errors) => {
            state.content.get_post(username, post_id).await?;
            return Ok(Some(errors));
        }
    };

    match state.comments.add_comment(me, username, post_id, &text).await {
        Ok(_) => Ok(None),
        Err(DomainError::Validation(msg)) => {
            let mut errors = FieldErrors::new();
            add_error(&mut errors, "text", &msg);
            Ok(Some(errors))
        }
        Err(e) => Err(e.into()),
    }
}

async fn comment_page(
    state: &AppState,
    username: &str,
    post_id: Uuid,
    draft: &str,
    errors: &FieldErrors,
) -> AppResult<String> {
    let post = state.content.get_post(username, post_id).await?;
    let comments = state.comments.list_comments(post.id).await?;
    let comments = comment_cards(state, comments).await?;
    let card = post_card(state, username, post).await?;

    let form = CommentBox {
        action: comment_url(username, post_id),
        text: draft,
        errors,
    };
    Ok(pages::comment_page(&card, &comments, form))
}
