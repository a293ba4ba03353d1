//! Server-rendered HTML.
//!
//! Pages are plain strings; every piece of user content goes through [`escape`].

mod errors;
mod forms;
mod listings;
mod statics;

pub use errors::{bad_request, not_found, server_error};
pub use forms::{CommentBox, PostFormMode, comment_page, post_form};
pub use listings::{FollowControl, feed, group, index, post_detail, profile};
pub use statics::{about_author, about_tech};

use std::fmt::Write;

use yatube_core::domain::{Comment, Group, Post};
use yatube_core::pagination::Page;

pub const HTML: &str = "text/html; charset=utf-8";

/// A post with the names it links to.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub post: Post,
    pub author: String,
    pub group: Option<Group>,
}

#[derive(Debug, Clone)]
pub struct CommentCard {
    pub comment: Comment,
    pub author: String,
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode `text` as one URL path segment. The result is also safe
/// inside an HTML attribute.
pub fn segment(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}

/// Text with line breaks kept.
fn paragraphs(text: &str) -> String {
    escape(text).replace('\n', "<br>")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<header>
<nav>
<a href="/">Yatube</a>
<a href="/follow/">Following</a>
<a href="/new/">New post</a>
<a href="/about/author/">Author</a>
<a href="/about/tech/">Technologies</a>
</nav>
</header>
<main>
{body}
</main>
<footer><p>&copy; Yatube</p></footer>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn pagination<T>(page: &Page<T>) -> String {
    if page.num_pages <= 1 {
        return String::new();
    }

    let mut nav = String::from(r#"<nav class="pagination">"#);
    if let Some(prev) = page.previous_number() {
        let _ = write!(nav, r#"<a href="?page=1">First</a> <a href="?page={prev}">Previous</a> "#);
    }
    let _ = write!(nav, "<span>Page {} of {}</span>", page.number, page.num_pages);
    if let Some(next) = page.next_number() {
        let _ = write!(
            nav,
            r#" <a href="?page={next}">Next</a> <a href="?page={last}">Last</a>"#,
            last = page.num_pages
        );
    }
    nav.push_str("</nav>");
    nav
}

fn post_article(card: &PostCard, link_group: bool) -> String {
    let post = &card.post;
    let author = escape(&card.author);
    let author_path = segment(&card.author);

    let mut html = String::from("<article>\n<ul>\n");
    let _ = writeln!(html, r#"<li>Author: <a href="/{author_path}/">{author}</a></li>"#);
    let _ = writeln!(
        html,
        "<li>Published: {}</li>",
        post.created_at.format("%d %b %Y %H:%M")
    );
    html.push_str("</ul>\n");
    if let Some(image) = &post.image {
        let _ = writeln!(html, r#"<img src="/media/{}" alt="">"#, escape(image));
    }
    let _ = writeln!(html, "<p>{}</p>", paragraphs(&post.text));
    let _ = writeln!(html, r#"<a href="/{author_path}/{}/">Details</a>"#, post.id);
    if let (true, Some(group)) = (link_group, &card.group) {
        let _ = writeln!(
            html,
            r#"<a href="/group/{}/">All posts of the group "{}"</a>"#,
            segment(&group.slug),
            escape(&group.title)
        );
    }
    html.push_str("</article>\n");
    html
}

fn post_list(page: &Page<PostCard>, link_group: bool) -> String {
    let mut html = String::new();
    for card in &page.items {
        html.push_str(&post_article(card, link_group));
        html.push_str("<hr>\n");
    }
    html.push_str(&pagination(page));
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
    }

    #[test]
    fn single_page_has_no_pagination() {
        let window = yatube_core::Paginator::new(10).resolve(None, 3);
        let page = Page::new(window, vec![(); 3], 3);

        assert!(pagination(&page).is_empty());
    }

    #[test]
    fn middle_page_links_both_ways() {
        let window = yatube_core::Paginator::new(10).resolve(Some(2), 25);
        let page = Page::new(window, vec![(); 10], 25);
        let nav = pagination(&page);

        assert!(nav.contains(r#"href="?page=1""#));
        assert!(nav.contains(r#"href="?page=3""#));
        assert!(nav.contains("Page 2 of 3"));
    }
}
