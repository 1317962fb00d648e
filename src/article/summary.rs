//! Article summaries.

use regex::Regex;

/// Appended to summaries cut at `summary_length`.
pub const ELLIPSIS: &str = "...";

/// Produces an article summary from its raw body.
///
/// Closures with the same signature implement this, so hosts can plug in
/// their own strategy with `Blog::with_summary_generator`.
pub trait SummaryGenerator: Send + Sync {
    fn summarize(&self, body: &str, separator: &Regex, length: usize) -> Option<String>;
}

impl<F> SummaryGenerator for F
where
    F: Fn(&str, &Regex, usize) -> Option<String> + Send + Sync,
{
    fn summarize(&self, body: &str, separator: &Regex, length: usize) -> Option<String> {
        self(body, separator, length)
    }
}

/// Text before the first separator match; otherwise the first `length`
/// characters cut back to a word boundary. A `length` of 0 keeps the
/// whole body.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSummary;

impl SummaryGenerator for DefaultSummary {
    fn summarize(&self, body: &str, separator: &Regex, length: usize) -> Option<String> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }

        if let Some(found) = separator.find(body) {
            let head = body[..found.start()].trim_end();
            return (!head.is_empty()).then(|| head.to_owned());
        }

        Some(truncate_words(body, length))
    }
}

/// Cut `text` to at most `length` characters, preferring a word boundary.
pub fn truncate_words(text: &str, length: usize) -> String {
    if length == 0 {
        return text.to_owned();
    }
    let Some((cut, _)) = text.char_indices().nth(length) else {
        return text.to_owned();
    };

    let head = &text[..cut];
    let head = match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => &head[..space],
        _ => head,
    };
    format!("{}{ELLIPSIS}", head.trim_end())
}
