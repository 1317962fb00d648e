//! Blog configuration for `almanac.toml`.
//!
//! # Example
//!
//! ```toml
//! name = "journal"
//! prefix = "blog"
//! permalink = "/{year}/{month}/{day}/{title}.html"
//! sources = "{year}-{month}-{day}-{title}.html"
//! taglink = "tags/{tag}.html"
//! tag_template = "tag.html"
//! calendar_template = "calendar.html"
//! paginate = true
//! per_page = 10
//! time_zone = "+09:00"
//!
//! [custom_collections.category]
//! link = "/categories/{category}.html"
//! template = "category.html"
//! ```
//!
//! The file is read once; [`BlogConfig::resolve`] validates it and produces
//! the frozen [`ResolvedConfig`] the pipeline runs on.

mod collections;
pub mod defaults;
mod error;
mod resolved;

pub use collections::{CustomCollection, CustomCollections};
pub use error::ConfigError;
pub use resolved::{CalendarLevel, ResolvedCollection, ResolvedConfig};

use crate::template::{SlugMode, Template};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "almanac.toml";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing `almanac.toml`.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BlogConfig {
    /// Name of this blog instance (used in logs and the manifest).
    #[serde(default)]
    pub name: Option<String>,

    /// Path segment joined in front of every link and the sources template.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Article permalink template.
    #[serde(default = "defaults::link::permalink")]
    #[educe(Default = defaults::link::permalink())]
    pub permalink: String,

    /// Template matched against source paths to find articles.
    #[serde(default = "defaults::link::sources")]
    #[educe(Default = defaults::link::sources())]
    pub sources: String,

    /// Tag page link template (`{tag}`).
    #[serde(default = "defaults::link::taglink")]
    #[educe(Default = defaults::link::taglink())]
    pub taglink: String,

    /// Layout articles are rendered with unless their front matter says otherwise.
    #[serde(default = "defaults::article::layout")]
    #[educe(Default = defaults::article::layout())]
    pub layout: String,

    /// Regex marking the end of an article summary.
    #[serde(default = "defaults::article::summary_separator")]
    #[educe(Default = defaults::article::summary_separator())]
    pub summary_separator: String,

    /// Summary length (characters) when no separator is present.
    #[serde(default = "defaults::article::summary_length")]
    #[educe(Default = defaults::article::summary_length())]
    pub summary_length: usize,

    #[serde(default = "defaults::link::year")]
    #[educe(Default = defaults::link::year())]
    pub year_link: String,

    #[serde(default = "defaults::link::month")]
    #[educe(Default = defaults::link::month())]
    pub month_link: String,

    #[serde(default = "defaults::link::day")]
    #[educe(Default = defaults::link::day())]
    pub day_link: String,

    /// Fallback for the three calendar levels.
    #[serde(default)]
    pub calendar_template: Option<String>,

    #[serde(default)]
    pub year_template: Option<String>,

    #[serde(default)]
    pub month_template: Option<String>,

    #[serde(default)]
    pub day_template: Option<String>,

    #[serde(default)]
    pub tag_template: Option<String>,

    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub generate_year_pages: bool,

    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub generate_month_pages: bool,

    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub generate_day_pages: bool,

    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub generate_tag_pages: bool,

    /// Split listing pages into `per_page` slices.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub paginate: bool,

    #[serde(default = "defaults::article::per_page")]
    #[educe(Default = defaults::article::per_page())]
    pub per_page: usize,

    /// Suffix template for pages after the first (`{num}`).
    #[serde(default = "defaults::link::page")]
    #[educe(Default = defaults::link::page())]
    pub page_link: String,

    /// Treat articles dated after the build time as published.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub publish_future_dated: bool,

    /// Property → `{ link, template }`, in declaration order.
    #[serde(default)]
    pub custom_collections: CustomCollections,

    /// Ignore per-article `lang` and use `default_locale` for every article.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub preserve_locale: bool,

    /// Locale used when an article declares none.
    #[serde(default)]
    pub default_locale: Option<String>,

    /// Zone dates without an explicit offset are interpreted in.
    ///
    /// Either `"UTC"` (also `Z` or `GMT`) or a fixed `±HH:MM` offset.
    /// Named zones such as `Europe/Berlin` are rejected, so daylight saving
    /// changes are not followed.
    #[serde(default = "defaults::article::time_zone")]
    #[educe(Default = defaults::article::time_zone())]
    pub time_zone: String,

    #[serde(default)]
    pub slug_mode: SlugMode,

    /// Body seed for `almanac new`.
    #[serde(default)]
    pub new_article_template: Option<PathBuf>,

    /// Extension appended to scaffolded article files.
    #[serde(default = "defaults::article::default_extension")]
    #[educe(Default = defaults::article::default_extension())]
    pub default_extension: String,
}

impl BlogConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: BlogConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Check that every link template can be rendered by the page kind
    /// that uses it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 {
            return Err(ConfigError::Validation("[per_page] must be at least 1".into()));
        }

        if self.permalink.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation("[permalink] must not be empty".into()));
        }

        if self.generate_tag_pages {
            require_tokens("taglink", &self.taglink, &["tag"])?;
        }
        if self.generate_year_pages {
            require_tokens("year_link", &self.year_link, &["year"])?;
        }
        if self.generate_month_pages {
            require_tokens("month_link", &self.month_link, &["year", "month"])?;
        }
        if self.generate_day_pages {
            require_tokens("day_link", &self.day_link, &["year", "month", "day"])?;
        }
        if self.paginate {
            require_tokens("page_link", &self.page_link, &["num"])?;
        }

        for (property, collection) in self.custom_collections.iter() {
            if property.is_empty() {
                return Err(ConfigError::Validation(
                    "[custom_collections] property names must not be empty".into(),
                ));
            }
            let field = format!("custom_collections.{property}.link");
            require_tokens(&field, &collection.link, &[property])?;
        }

        Ok(())
    }
}

/// Fail unless `template` references each of `tokens` as a required token.
fn require_tokens(field: &str, template: &str, tokens: &[&str]) -> Result<(), ConfigError> {
    let parsed = Template::new(template);
    for token in tokens {
        if !parsed.has_token(token) || parsed.is_optional(token) {
            return Err(ConfigError::Validation(format!(
                "[{field}] = \"{template}\" must contain `{{{token}}}`"
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
