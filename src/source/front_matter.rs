//! TOML front matter fenced by `+++` lines.
//!
//! ```text
//! +++
//! title = "Hello"
//! date = 2024-01-05
//! tags = ["rust", "blog"]
//! +++
//! Body text...
//! ```
//!
//! A file that does not open with a fence has no front matter; its whole
//! content is the body.

use anyhow::{Context, Result};

const FENCE: &str = "+++";

/// Split `content` into its front-matter table and body.
pub fn split(content: &str) -> Result<(toml::Table, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(after_open) = strip_fence_line(content) else {
        return Ok((toml::Table::new(), content));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let raw = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            let table: toml::Table = toml::from_str(raw).context("invalid TOML front matter")?;
            return Ok((table, body));
        }
        offset += line.len();
    }

    anyhow::bail!("front matter opened with `{FENCE}` but never closed")
}

/// If the first line is exactly the fence, return what follows it.
fn strip_fence_line(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(FENCE)?;
    let rest = rest.trim_start_matches([' ', '\t']);
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}
