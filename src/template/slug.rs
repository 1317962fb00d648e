//! Slug derivation for titles, tags and custom property values.

use deunicode::deunicode;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Separator used between slug words.
pub const SEPARATOR: char = '-';

/// How non-ASCII text is handled when slugging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugMode {
    /// Keep Unicode letters and digits (e.g., "你好 World" → "你好-world").
    #[default]
    Unicode,
    /// Transliterate to ASCII first (e.g., "Café Crème" → "cafe-creme").
    Ascii,
}

/// Convert free text into a path-safe slug.
///
/// Lower-cases, replaces every run of non-alphanumeric characters with a
/// single `-`, and trims separators from both ends.
pub fn slugify(text: &str, mode: SlugMode) -> String {
    let text: Cow<'_, str> = match mode {
        SlugMode::Unicode => Cow::Borrowed(text),
        SlugMode::Ascii => Cow::Owned(deunicode(text)),
    };

    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Turn a slug back into a readable title ("hello-world" → "hello world").
pub fn unslug(slug: &str) -> String {
    slug.replace(SEPARATOR, " ")
}
