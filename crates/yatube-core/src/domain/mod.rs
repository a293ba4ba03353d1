//! Domain entities - the core business objects.

mod comment;
mod follow;
mod group;
mod identity;
mod post;
mod user;

pub use comment::Comment;
pub use follow::Follow;
pub use group::Group;
pub use identity::Identity;
pub use post::Post;
pub use user::User;

const PREVIEW_WIDTH: usize = 15;
const PREVIEW_PLACEHOLDER: &str = "...";

/// Collapses whitespace and shortens `text` on word boundaries so the result,
/// placeholder included, is at most `width` characters.
pub(crate) fn shorten(text: &str, width: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(PREVIEW_PLACEHOLDER.chars().count());
    let mut kept = String::new();
    for word in words {
        let extra = if kept.is_empty() { 0 } else { 1 };
        if kept.chars().count() + extra + word.chars().count() > budget {
            break;
        }
        if extra == 1 {
            kept.push(' ');
        }
        kept.push_str(word);
    }

    if kept.is_empty() {
        PREVIEW_PLACEHOLDER.to_string()
    } else {
        format!("{kept}{PREVIEW_PLACEHOLDER}")
    }
}
