//! Path templates: `{token}` substitution, reverse matching and prefix joining.
//!
//! # Syntax
//!
//! | Placeholder | Meaning |
//! |-------------|---------|
//! | `{name}`    | required token, rendering fails when it has no value |
//! | `{name?}`   | optional token, renders as nothing when absent |
//!
//! Recognized names are `year`, `month`, `day`, `title`, `lang`, plus any
//! custom front-matter property and the manipulator tokens (`tag`, `num`).
//! Values are inserted verbatim; callers slug them beforehand.
//!
//! # Example
//!
//! ```ignore
//! let permalink = Template::new("/{year}/{month}/{title}.html");
//! let tokens = TokenMap::from([
//!     ("year".into(), "2024".into()),
//!     ("month".into(), "01".into()),
//!     ("title".into(), "hello-world".into()),
//! ]);
//! assert_eq!(permalink.render(&tokens)?, "/2024/01/hello-world.html");
//! ```

mod slug;

pub use slug::{SlugMode, slugify, unslug};

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Token name → substituted value.
pub type TokenMap = BTreeMap<String, String>;

/// A template references a token with no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template `{template}` has no value for `{{{token}}}`")]
pub struct MissingToken {
    pub template: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token { name: String, optional: bool },
}

/// A parsed path template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    /// Compiled lazily on the first `extract` call.
    matcher: OnceLock<Option<Regex>>,
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let segments = parse(&source);
        Self {
            source,
            segments,
            matcher: OnceLock::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of all placeholders, in order of appearance (duplicates kept).
    pub fn token_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Token { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_token(&self, name: &str) -> bool {
        self.token_names().any(|n| n == name)
    }

    /// Whether the template references `name` only as `{name?}`.
    pub fn is_optional(&self, name: &str) -> bool {
        let mut seen = false;
        for segment in &self.segments {
            if let Segment::Token { name: n, optional } = segment
                && n == name
            {
                if !optional {
                    return false;
                }
                seen = true;
            }
        }
        seen
    }

    /// Substitute every placeholder with its value from `tokens`.
    ///
    /// A required token that is absent (or empty) is an error. Absent
    /// optional tokens render as nothing and the doubled `/` they leave
    /// behind is collapsed.
    pub fn render(&self, tokens: &TokenMap) -> Result<String, MissingToken> {
        let mut rendered = String::with_capacity(self.source.len() + 16);
        let mut skipped_optional = false;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Token { name, optional } => {
                    match tokens.get(name).filter(|value| !value.is_empty()) {
                        Some(value) => rendered.push_str(value),
                        None if *optional => skipped_optional = true,
                        None => {
                            return Err(MissingToken {
                                template: self.source.clone(),
                                token: name.clone(),
                            });
                        }
                    }
                }
            }
        }

        if skipped_optional {
            rendered = collapse_separators(&rendered);
        }
        Ok(rendered)
    }

    /// Match a concrete path against this template and recover its tokens.
    ///
    /// Returns `None` when the path does not have the template's shape, or
    /// when a repeated token captures two different values.
    ///
    /// `year` must be four digits, `month`/`day` two digits and `num` any
    /// number; other tokens match within one path segment.
    pub fn extract(&self, path: &str) -> Option<TokenMap> {
        let matcher = self
            .matcher
            .get_or_init(|| Regex::new(&self.pattern()).ok())
            .as_ref()?;
        let captures = matcher.captures(path)?;

        let mut tokens = TokenMap::new();
        for (index, name) in self.token_names().enumerate() {
            let Some(value) = captures.get(index + 1).map(|m| m.as_str()) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match tokens.get(name) {
                Some(previous) if previous != value => return None,
                Some(_) => {}
                None => {
                    tokens.insert(name.to_owned(), value.to_owned());
                }
            }
        }
        Some(tokens)
    }

    fn pattern(&self) -> String {
        let mut pattern = String::from("^");
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Token { name, optional } => pattern.push_str(match (name.as_str(), *optional) {
                    ("year", false) => r"(\d{4})",
                    ("month" | "day", false) => r"(\d{2})",
                    ("num", false) => r"(\d+)",
                    (_, false) => r"([^/]+)",
                    (_, true) => r"([^/]*)",
                }),
            }
        }
        pattern.push('$');
        pattern
    }
}

/// Split a template into literal and placeholder segments.
///
/// An unterminated `{` or a brace pair that does not hold a valid token
/// name is kept as literal text.
fn parse(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = source;

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let token = after.find('}').and_then(|close| {
            let inner = &after[..close];
            let (name, optional) = match inner.strip_suffix('?') {
                Some(name) => (name, true),
                None => (inner, false),
            };
            is_token_name(name).then(|| (name.to_owned(), optional, close))
        });

        match token {
            Some((name, optional, close)) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Token { name, optional });
                rest = &after[close + 1..];
            }
            None => {
                literal.push('{');
                rest = after;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Replace every run of `/` with a single `/`.
fn collapse_separators(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !previous_slash {
                collapsed.push(c);
            }
            previous_slash = true;
        } else {
            collapsed.push(c);
            previous_slash = false;
        }
    }
    collapsed
}

/// Render `template` once with `tokens`.
pub fn render(template: &str, tokens: &TokenMap) -> Result<String, MissingToken> {
    Template::new(template).render(tokens)
}

/// Join `prefix` in front of `path` as a path segment.
///
/// Never doubles a separator. The result is absolute when either side
/// was: `("blog", "/{year}.html")` → `"/blog/{year}.html"`.
pub fn join_prefix(prefix: &str, path: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        return path.to_owned();
    }

    let absolute = path.starts_with('/') || prefix.starts_with('/');
    let rest = path.trim_start_matches('/');
    let joined = if rest.is_empty() {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/{rest}")
    };

    if absolute { format!("/{joined}") } else { joined }
}

/// Append `suffix` to `base` with exactly one `/` between them.
pub fn join_path(base: &str, suffix: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        suffix.trim_start_matches('/')
    )
}

/// Canonical resource-list form of a path: relative, no doubled `/`.
pub fn normalize_path(path: &str) -> String {
    collapse_separators(path).trim_start_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pairs: &[(&str, &str)]) -> TokenMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_render_basic() {
        let t = Template::new("/{year}/{month}/{day}/{title}.html");
        let out = t
            .render(&tokens(&[
                ("year", "2024"),
                ("month", "01"),
                ("day", "05"),
                ("title", "hello-world"),
            ]))
            .unwrap();
        assert_eq!(out, "/2024/01/05/hello-world.html");
    }

    #[test]
    fn test_render_repeated_token() {
        let t = Template::new("{lang}/{title}/{lang}.html");
        let out = t
            .render(&tokens(&[("lang", "en"), ("title", "x")]))
            .unwrap();
        assert_eq!(out, "en/x/en.html");
    }

    #[test]
    fn test_render_without_tokens() {
        let t = Template::new("archive.html");
        assert_eq!(t.render(&TokenMap::new()).unwrap(), "archive.html");
    }

    #[test]
    fn test_render_missing_required() {
        let t = Template::new("/{year}/{title}.html");
        let err = t.render(&tokens(&[("title", "x")])).unwrap_err();
        assert_eq!(err.token, "year");
        assert_eq!(err.template, "/{year}/{title}.html");
    }

    #[test]
    fn test_render_empty_value_counts_as_missing() {
        let t = Template::new("tags/{tag}.html");
        assert!(t.render(&tokens(&[("tag", "")])).is_err());
    }

    #[test]
    fn test_render_optional_absent_collapses() {
        let t = Template::new("/{lang?}/{year}/{title}.html");
        let out = t
            .render(&tokens(&[("year", "2024"), ("title", "x")]))
            .unwrap();
        assert_eq!(out, "/2024/x.html");

        let out = t
            .render(&tokens(&[("lang", "de"), ("year", "2024"), ("title", "x")]))
            .unwrap();
        assert_eq!(out, "/de/2024/x.html");
    }

    #[test]
    fn test_parse_keeps_invalid_braces_literal() {
        let t = Template::new("a{b c}/{open/{title}");
        let out = t.render(&tokens(&[("title", "x")])).unwrap();
        assert_eq!(out, "a{b c}/{open/x");
        assert_eq!(t.token_names().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_is_optional() {
        let t = Template::new("/{lang?}/{title}");
        assert!(t.is_optional("lang"));
        assert!(!t.is_optional("title"));
        assert!(!t.is_optional("year"));
    }

    #[test]
    fn test_extract_dated_source() {
        let t = Template::new("{year}-{month}-{day}-{title}.html");
        let found = t.extract("2024-01-05-hello-world.html").unwrap();
        assert_eq!(found["year"], "2024");
        assert_eq!(found["month"], "01");
        assert_eq!(found["day"], "05");
        assert_eq!(found["title"], "hello-world");
    }

    #[test]
    fn test_extract_rejects_other_shapes() {
        let t = Template::new("{year}-{month}-{day}-{title}.html");
        assert!(t.extract("about.html").is_none());
        assert!(t.extract("posts/2024-01-05-x.html").is_none());
        assert!(t.extract("24-01-05-x.html").is_none());
    }

    #[test]
    fn test_extract_escapes_literals() {
        let t = Template::new("posts/{title}.html");
        assert!(t.extract("posts/xhtml").is_none());
        assert_eq!(t.extract("posts/a.html").unwrap()["title"], "a");
    }

    #[test]
    fn test_extract_repeated_token_must_agree() {
        let t = Template::new("{lang}/{title}.{lang}.html");
        assert!(t.extract("en/x.en.html").is_some());
        assert!(t.extract("en/x.de.html").is_none());
    }

    #[test]
    fn test_extract_optional_token() {
        let t = Template::new("{lang?}/{title}.html");
        let found = t.extract("/x.html").unwrap();
        assert!(!found.contains_key("lang"));
        assert_eq!(t.extract("fr/x.html").unwrap()["lang"], "fr");
    }

    #[test]
    fn test_extract_then_render_roundtrip() {
        let t = Template::new("{year}/{month}-{title}.html");
        let path = "2023/11-notes.html";
        let found = t.extract(path).unwrap();
        assert_eq!(t.render(&found).unwrap(), path);
    }

    #[test]
    fn test_join_prefix() {
        assert_eq!(
            join_prefix("blog", "/{year}/{title}.html"),
            "/blog/{year}/{title}.html"
        );
        assert_eq!(join_prefix("blog/", "tags/{tag}.html"), "blog/tags/{tag}.html");
        assert_eq!(join_prefix("/blog/", "tags/{tag}.html"), "/blog/tags/{tag}.html");
        assert_eq!(join_prefix("", "/{year}.html"), "/{year}.html");
        assert_eq!(join_prefix("/", "x.html"), "x.html");
    }

    #[test]
    fn test_join_prefix_never_doubles() {
        let joined = join_prefix("//blog//", "//{year}.html");
        assert!(!joined.contains("//"));
        assert_eq!(joined, "/blog/{year}.html");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("tags/a.html", "page/2"), "tags/a.html/page/2");
        assert_eq!(join_path("tags/a/", "/page/2"), "tags/a/page/2");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/2024//01/x.html"), "2024/01/x.html");
        assert_eq!(normalize_path("tags/a.html"), "tags/a.html");
    }

    #[test]
    fn test_free_render() {
        let out = render("page/{num}", &tokens(&[("num", "3")])).unwrap();
        assert_eq!(out, "page/3");
    }
}
