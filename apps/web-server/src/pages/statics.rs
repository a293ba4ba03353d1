//! Static "about" pages.

use super::layout;

pub fn about_author() -> String {
    layout(
        "About the author",
        "<h1>About the author</h1>\n<p>Yatube is written and maintained by a small team of bloggers who wanted a place to share their diaries.</p>",
    )
}

pub fn about_tech() -> String {
    layout(
        "Technologies",
        "<h1>Technologies</h1>\n<ul>\n<li>actix-web for HTTP</li>\n<li>SeaORM on PostgreSQL for storage</li>\n<li>Redis or an in-process cache for the home page</li>\n<li>tracing for structured logs</li>\n</ul>",
    )
}
