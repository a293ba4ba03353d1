//! Listing and detail pages.

use std::fmt::Write;

use yatube_core::domain::{Group, User};
use yatube_core::pagination::Page;

use super::forms::{CommentBox, comment_box};
use super::{
    CommentCard, PostCard, escape, layout, paragraphs, post_article, post_list, segment,
};

/// Which follow button, if any, the viewer sees on an author's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowControl {
    /// Anonymous viewer, or the author looking at their own page.
    Hidden,
    Follow,
    Unfollow,
}

impl FollowControl {
    pub fn for_viewer(is_self_or_anonymous: bool, is_following: bool) -> Self {
        match (is_self_or_anonymous, is_following) {
            (true, _) => FollowControl::Hidden,
            (false, true) => FollowControl::Unfollow,
            (false, false) => FollowControl::Follow,
        }
    }

    fn render(self, username: &str) -> String {
        let username = segment(username);
        match self {
            FollowControl::Hidden => String::new(),
            FollowControl::Follow => {
                format!(r#"<a class="follow" href="/{username}/follow/">Follow</a>"#)
            }
            FollowControl::Unfollow => {
                format!(r#"<a class="unfollow" href="/{username}/unfollow/">Unfollow</a>"#)
            }
        }
    }
}

pub fn index(page: &Page<PostCard>) -> String {
    let body = format!(
        "<h1>Latest updates on the site</h1>\n{}",
        post_list(page, true)
    );
    layout("Latest updates on the site", &body)
}

pub fn group(group: &Group, page: &Page<PostCard>) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n{}",
        escape(&group.title),
        paragraphs(&group.description),
        post_list(page, false)
    );
    layout(&format!("Posts of the group {}", group.title), &body)
}

pub fn profile(user: &User, page: &Page<PostCard>, follow: FollowControl) -> String {
    let body = format!(
        "<h1>All posts of {name}</h1>\n<h3>Total posts: {total}</h3>\n{button}\n{posts}",
        name = escape(&user.username),
        total = page.total,
        button = follow.render(&user.username),
        posts = post_list(page, true),
    );
    layout(&format!("Profile of {}", user.username), &body)
}

pub fn feed(page: &Page<PostCard>) -> String {
    let body = if page.is_empty() {
        "<h1>Following</h1>\n<p>Posts of the authors you follow will show up here.</p>".to_string()
    } else {
        format!("<h1>Following</h1>\n{}", post_list(page, true))
    };
    layout("Following", &body)
}

pub fn post_detail(
    card: &PostCard,
    comments: &[CommentCard],
    follow: FollowControl,
    can_edit: bool,
    comment: Option<CommentBox<'_>>,
) -> String {
    let mut body = post_article(card, true);
    body.push_str(&follow.render(&card.author));
    if can_edit {
        let _ = write!(
            body,
            r#"<a class="edit" href="/{}/{}/edit/">Edit</a>"#,
            segment(&card.author),
            card.post.id
        );
    }
    body.push_str(&comment_section(comments, comment));
    layout(&card.post.preview(), &body)
}

pub(super) fn comment_section(comments: &[CommentCard], comment: Option<CommentBox<'_>>) -> String {
    let mut html = String::from("<section class=\"comments\">\n");
    if let Some(form) = comment {
        html.push_str(&comment_box(&form));
    }
    for card in comments {
        let author = escape(&card.author);
        let author_path = segment(&card.author);
        let _ = writeln!(
            html,
            r#"<div class="comment"><h5><a href="/{author_path}/">{author}</a></h5><p>{}</p></div>"#,
            paragraphs(&card.comment.text)
        );
    }
    html.push_str("</section>\n");
    html
}
