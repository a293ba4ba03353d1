//! Post listing, detail, creation and editing.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use yatube_core::DomainError;
use yatube_core::domain::{Group, Identity, Post};
use yatube_core::services::PostDraft;
use yatube_shared::forms::{INVALID_CHOICE, add_error};
use yatube_shared::{CleanPost, FieldErrors, PostForm};

use super::{comment_cards, html, post_card, post_cards, post_url, redirect};
use crate::middleware::auth::{CurrentUser, Viewer};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::paging::Paging;
use crate::pages::{self, CommentBox, FollowControl, PostFormMode};
use crate::state::AppState;

/// Cache key prefix of the rendered home page.
pub const INDEX_CACHE_PREFIX: &str = "index_page:";

/// GET /
///
/// Served from the page cache; new posts show up once the entry expires.
pub async fn index(
    state: web::Data<AppState>,
    Paging(query): Paging,
) -> AppResult<HttpResponse> {
    let number = query.number().unwrap_or(1).max(1);
    let key = format!("{INDEX_CACHE_PREFIX}{number}");
    let app: &AppState = &state;

    let body = app
        .page_cache
        .get_or_render(&key, move || async move {
            let page = app.content.list_posts(Some(number)).await?;
            let cards = post_cards(app, page).await?;
            Ok::<_, AppError>(pages::index(&cards))
        })
        .await?;

    Ok(html(body))
}

/// GET /new/
pub async fn new_post_form(
    state: web::Data<AppState>,
    _user: CurrentUser,
) -> AppResult<HttpResponse> {
    let groups = state.community.list_groups().await?;
    Ok(html(pages::post_form(
        &PostFormMode::New,
        &PostForm::default(),
        &groups,
        &FieldErrors::new(),
    )))
}

/// POST /new/
pub async fn create_post(
    state: web::Data<AppState>,
    CurrentUser(me): CurrentUser,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let groups = state.community.list_groups().await?;

    let clean = match clean_post_form(&form, &groups) {
        Ok(clean) => clean,
        Err(errors) => {
            return Ok(html(pages::post_form(&PostFormMode::New, &form, &groups, &errors)));
        }
    };

    match state.content.create_post(&me, draft(clean)).await {
        Ok(_) => Ok(redirect("/")),
        Err(DomainError::Validation(msg)) => Ok(html(pages::post_form(
            &PostFormMode::New,
            &form,
            &groups,
            &general_error(&msg),
        ))),
        Err(e) => Err(e.into()),
    }
}

/// GET /{username}/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
    viewer: Viewer,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let post = state.content.get_post(&username, post_id).await?;

    let body = detail_page(&state, viewer.identity(), &username, post, "", &FieldErrors::new()).await?;
    Ok(html(body))
}

/// Render the post page, optionally with a rejected comment draft.
pub(super) async fn detail_page(
    state: &AppState,
    viewer: Option<&Identity>,
    username: &str,
    post: Post,
    draft: &str,
    errors: &FieldErrors,
) -> AppResult<String> {
    let author_id = post.author_id;
    let comments = state.comments.list_comments(post.id).await?;
    let comments = comment_cards(state, comments).await?;
    let card = post_card(state, username, post).await?;

    let is_author = viewer.is_some_and(|v| v.user_id == author_id);
    let is_following = state.social.is_following(viewer, author_id).await?;
    let follow = FollowControl::for_viewer(viewer.is_none() || is_author, is_following);

    let action = post_url(username, card.post.id);
    let comment_form = viewer.map(|_| CommentBox {
        action,
        text: draft,
        errors,
    });

    Ok(pages::post_detail(&card, &comments, follow, is_author, comment_form))
}

/// GET /{username}/{post_id}/edit/
pub async fn edit_post_form(
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
    CurrentUser(me): CurrentUser,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let post = state.content.post_for_edit(&me, &username, post_id).await?;
    let groups = state.community.list_groups().await?;

    let form = PostForm {
        text: post.text,
        group: post.group_id.map(|id| id.to_string()),
        image: post.image,
    };
    let mode = PostFormMode::Edit { username, post_id };
    Ok(html(pages::post_form(&mode, &form, &groups, &FieldErrors::new())))
}

/// POST /{username}/{post_id}/edit/
///
/// Non-authors are redirected to the author's profile before the form is looked at.
pub async fn edit_post(
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
    CurrentUser(me): CurrentUser,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    state.content.post_for_edit(&me, &username, post_id).await?;

    let form = form.into_inner();
    let groups = state.community.list_groups().await?;
    let mode = PostFormMode::Edit {
        username: username.clone(),
        post_id,
    };

    let clean = match clean_post_form(&form, &groups) {
        Ok(clean) => clean,
        Err(errors) => return Ok(html(pages::post_form(&mode, &form, &groups, &errors))),
    };

    match state
        .content
        .edit_post(&me, &username, post_id, draft(clean))
        .await
    {
        Ok(post) => Ok(redirect(post_url(&username, post.id))),
        Err(DomainError::Validation(msg)) => Ok(html(pages::post_form(
            &mode,
            &form,
            &groups,
            &general_error(&msg),
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Validate the form and check the chosen group against the offered choices.
fn clean_post_form(form: &PostForm, groups: &[Group]) -> Result<CleanPost, FieldErrors> {
    let clean = form.clean()?;
    if let Some(group_id) = clean.group_id {
        if !groups.iter().any(|g| g.id == group_id) {
            let mut errors = FieldErrors::new();
            add_error(&mut errors, "group", INVALID_CHOICE);
            return Err(errors);
        }
    }
    Ok(clean)
}

fn draft(clean: CleanPost) -> PostDraft {
    PostDraft {
        text: clean.text,
        group_id: clean.group_id,
        image: clean.image,
    }
}

fn general_error(message: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    add_error(&mut errors, "__all__", message);
    errors
}
