//! HTML rendering of the ranked story list.

use html_escape::{encode_double_quoted_attribute, encode_text};
use reqwest::Url;

use crate::types::Story;

/// Hostname of a display URL in parentheses, e.g. `(example.com)`.
///
/// Returns an empty string when the URL does not parse or has no host.
pub fn hostname(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().map(|host| format!("({host})")))
        .unwrap_or_default()
}

/// Render the stories as a complete HTML page, numbered from 1.
pub fn news_page(stories: &[Story]) -> String {
    let mut page = String::from(concat!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
        "<title>Top Stories</title>\n</head>\n<body>\n<ol>\n"
    ));

    for story in stories {
        page.push_str(&format!(
            "<li><a href=\"{url}\">{title}</a> <span class=\"host\">{host}</span><br>\
             <small>{score} points by {author}</small></li>\n",
            url = encode_double_quoted_attribute(&story.display_url),
            title = encode_text(&story.title),
            host = encode_text(&hostname(&story.display_url)),
            score = story.score,
            author = encode_text(&story.author),
        ));
    }

    page.push_str("</ol>\n</body>\n</html>\n");
    page
}
