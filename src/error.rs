//! Error taxonomy of the pipeline.
//!
//! Two families:
//!
//! | Kind | Errors | Effect on a rebuild |
//! |------|--------|---------------------|
//! | per-article | `MissingRequiredField`, `InvalidFrontMatter` | article skipped and logged |
//! | structural | `TokenResolution`, `PathCollision`, `InvalidConfiguration` | rebuild aborted, previous snapshot kept |

use crate::config::ConfigError;
use crate::template::MissingToken;
use thiserror::Error;

pub type Result<T, E = BlogError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("`{source_path}` is missing required field `{field}`")]
    MissingRequiredField {
        source_path: String,
        field: &'static str,
    },

    #[error("`{source_path}` has invalid front matter: {reason}")]
    InvalidFrontMatter { source_path: String, reason: String },

    #[error("template `{template}` has no value for token `{{{token}}}` (while rendering {context})")]
    TokenResolution {
        template: String,
        token: String,
        context: String,
    },

    #[error("path `{path}` is claimed by both {first} and {second}")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl BlogError {
    /// Per-article problems degrade gracefully: the article is left out
    /// and the rebuild carries on.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. } | Self::InvalidFrontMatter { .. }
        )
    }

    pub(crate) fn invalid_front_matter(source_path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFrontMatter {
            source_path: source_path.to_owned(),
            reason: reason.into(),
        }
    }
}

impl MissingToken {
    /// Attach the resource being rendered to a template failure.
    pub fn within(self, context: impl Into<String>) -> BlogError {
        BlogError::TokenResolution {
            template: self.template,
            token: self.token,
            context: context.into(),
        }
    }
}

impl From<ConfigError> for BlogError {
    fn from(err: ConfigError) -> Self {
        let mut message = err.to_string();
        let mut cause = std::error::Error::source(&err);
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = std::error::Error::source(inner);
        }
        Self::InvalidConfiguration(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_split() {
        let missing = BlogError::MissingRequiredField {
            source_path: "a.md".into(),
            field: "date",
        };
        assert!(missing.is_recoverable());
        assert!(BlogError::invalid_front_matter("a.md", "bad tags").is_recoverable());

        let collision = BlogError::PathCollision {
            path: "tags/a.html".into(),
            first: "`tags/a.html`".into(),
            second: "tag page `a`".into(),
        };
        assert!(!collision.is_recoverable());
        assert!(!BlogError::InvalidConfiguration("x".into()).is_recoverable());
    }

    #[test]
    fn test_display_names_both_sources() {
        let err = BlogError::PathCollision {
            path: "x.html".into(),
            first: "`one.md`".into(),
            second: "`two.md`".into(),
        };
        let display = err.to_string();
        assert!(display.contains("x.html"));
        assert!(display.contains("one.md"));
        assert!(display.contains("two.md"));
    }

    #[test]
    fn test_config_error_keeps_cause() {
        let toml_err = toml::from_str::<toml::Table>("x = ").unwrap_err();
        let err = BlogError::from(ConfigError::from(toml_err));
        let BlogError::InvalidConfiguration(message) = err else {
            panic!("expected InvalidConfiguration");
        };
        assert!(message.starts_with("Config file parsing error: "));
    }

    #[test]
    fn test_token_error_display() {
        let err = MissingToken {
            template: "/{year}/{title}.html".into(),
            token: "year".into(),
        }
        .within("article `a.md`");
        let display = err.to_string();
        assert!(display.contains("{year}"));
        assert!(display.contains("a.md"));
    }
}
