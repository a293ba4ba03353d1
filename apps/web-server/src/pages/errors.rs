use super::{escape, layout};

pub fn not_found() -> String {
    layout(
        "Page not found",
        "<h1>Custom 404</h1>\n<p>The page you requested does not exist.</p>\n<a href=\"/\">Back to the home page</a>",
    )
}

pub fn bad_request(detail: &str) -> String {
    layout(
        "Bad request",
        &format!("<h1>Bad request</h1>\n<p>{}</p>", escape(detail)),
    )
}

pub fn server_error() -> String {
    layout(
        "Server error",
        "<h1>Custom 500</h1>\n<p>Something went wrong on our side. Please try again later.</p>",
    )
}
