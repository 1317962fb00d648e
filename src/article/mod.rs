//! Article metadata model.
//!
//! An [`Article`] is built once per matching source resource on every
//! rebuild and never changes afterwards. Building does no I/O: the date,
//! the "now" used for the future-date policy and the time zone all come in
//! through [`BuildContext`].

pub mod date;
pub mod summary;

pub use summary::{DefaultSummary, SummaryGenerator};

use crate::config::ResolvedConfig;
use crate::error::{BlogError, Result};
use crate::source::SourceResource;
use crate::template::{TokenMap, normalize_path, slugify, unslug};
use chrono::{DateTime, Datelike, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;

/// Front-matter keys with built-in meaning; everything else is custom.
pub const RESERVED_KEYS: &[&str] = &[
    "title",
    "date",
    "tags",
    "published",
    "lang",
    "slug",
    "summary",
    "layout",
    "pageable",
    "per_page",
];

/// Everything besides the source needed to build an article.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub config: &'a ResolvedConfig,
    pub summary: &'a dyn SummaryGenerator,
    /// Reference point for the future-date policy.
    pub now: DateTime<FixedOffset>,
}

/// One dated content item with its computed permalink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub source_path: String,
    /// Always expressed in the configured time zone.
    pub date: DateTime<FixedOffset>,
    pub title: String,
    /// Value of the `{title}` token.
    pub slug: String,
    /// In front-matter order, deduplicated.
    pub tags: Vec<String>,
    /// Non-reserved front-matter properties.
    pub custom: BTreeMap<String, toml::Value>,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Normalized output path (no leading `/`).
    pub permalink: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub layout: String,
    #[serde(skip)]
    pub body: String,
    #[serde(skip)]
    pub front_matter: toml::Table,
}

impl Article {
    /// Build an article from a source whose path matched the `sources`
    /// template, `path_tokens` being what that match extracted.
    ///
    /// Per-article problems (no date, malformed front matter) come back as
    /// recoverable errors; a permalink token without a value is
    /// `TokenResolution`.
    pub fn build(source: &SourceResource, path_tokens: &TokenMap, ctx: &BuildContext<'_>) -> Result<Self> {
        let config = ctx.config;
        let path = source.path.as_str();
        let fm = &source.front_matter;

        let date = match fm.get("date") {
            Some(value) => date::from_value(value, config.time_zone)
                .map_err(|reason| BlogError::invalid_front_matter(path, reason))?,
            None => date::from_tokens(path_tokens, config.time_zone).ok_or(
                BlogError::MissingRequiredField {
                    source_path: path.to_owned(),
                    field: "date",
                },
            )?,
        }
        .with_timezone(&config.time_zone);

        let title = match string_field(source, "title")? {
            Some(title) => title,
            None => match path_tokens.get("title") {
                Some(slug) => unslug(slug),
                None => file_stem(path).to_owned(),
            },
        };

        let slug_source = string_field(source, "slug")?
            .or_else(|| path_tokens.get("title").cloned())
            .unwrap_or_else(|| title.clone());
        let slug = slugify(&slug_source, config.slug_mode);
        if slug.is_empty() {
            return Err(BlogError::invalid_front_matter(
                path,
                format!("`{slug_source}` does not produce a usable slug"),
            ));
        }

        let tags = match fm.get("tags") {
            Some(value) => parse_tags(value).map_err(|reason| BlogError::invalid_front_matter(path, reason))?,
            None => Vec::new(),
        };

        let published = match fm.get("published") {
            Some(toml::Value::Boolean(published)) => *published,
            Some(other) => {
                return Err(BlogError::invalid_front_matter(
                    path,
                    format!("`published` must be a boolean, found {}", other.type_str()),
                ));
            }
            None => config.publish_future_dated || date <= ctx.now,
        };

        let language = if config.preserve_locale {
            config.default_locale.clone()
        } else {
            string_field(source, "lang")?
                .or_else(|| path_tokens.get("lang").cloned())
                .or_else(|| config.default_locale.clone())
        };

        let summary = match string_field(source, "summary")? {
            Some(summary) => Some(summary),
            None => ctx
                .summary
                .summarize(&source.body, &config.summary_separator, config.summary_length),
        };

        let layout = string_field(source, "layout")?.unwrap_or_else(|| config.layout.clone());

        let custom = fm
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut article = Self {
            source_path: path.to_owned(),
            date,
            title,
            slug,
            tags,
            custom,
            published,
            language,
            permalink: String::new(),
            summary,
            layout,
            body: source.body.clone(),
            front_matter: fm.clone(),
        };

        let tokens = article.permalink_tokens(path_tokens, ctx);
        let permalink = config
            .permalink
            .render(&tokens)
            .map_err(|err| err.within(format!("permalink of `{path}`")))?;
        article.permalink = normalize_path(&permalink);

        Ok(article)
    }

    /// Tokens available to the permalink template.
    ///
    /// Built-in tokens come from the article itself; any other name the
    /// template uses is looked up in front matter (slugified), then in the
    /// tokens recovered from the source path.
    fn permalink_tokens(&self, path_tokens: &TokenMap, ctx: &BuildContext<'_>) -> TokenMap {
        let mut tokens = self.date_tokens();
        tokens.insert("title".to_owned(), self.slug.clone());
        if let Some(lang) = &self.language {
            tokens.insert("lang".to_owned(), lang.clone());
        }

        for name in ctx.config.permalink.token_names() {
            if tokens.contains_key(name) {
                continue;
            }
            let value = self
                .front_matter
                .get(name)
                .and_then(value_to_token)
                .map(|value| slugify(&value, ctx.config.slug_mode))
                .filter(|value| !value.is_empty())
                .or_else(|| path_tokens.get(name).cloned());
            if let Some(value) = value {
                tokens.insert(name.to_owned(), value);
            }
        }
        tokens
    }

    /// `year`, `month` and `day` tokens, zero-padded.
    pub fn date_tokens(&self) -> TokenMap {
        TokenMap::from([
            ("year".to_owned(), format!("{:04}", self.date.year())),
            ("month".to_owned(), format!("{:02}", self.date.month())),
            ("day".to_owned(), format!("{:02}", self.date.day())),
        ])
    }

    /// Absolute URL path of the article.
    pub fn url(&self) -> String {
        format!("/{}", self.permalink)
    }

    /// Grouping values of a front-matter property.
    ///
    /// Scalars give one value, arrays one per scalar element; tables and
    /// empty strings give none.
    pub fn property_values(&self, property: &str) -> Vec<String> {
        let Some(value) = self.front_matter.get(property) else {
            return Vec::new();
        };
        let values: Vec<String> = match value {
            toml::Value::Array(items) => items.iter().filter_map(value_to_token).collect(),
            scalar => value_to_token(scalar).into_iter().collect(),
        };
        let mut unique = Vec::with_capacity(values.len());
        for value in values {
            let value = value.trim().to_owned();
            if !value.is_empty() && !unique.contains(&value) {
                unique.push(value);
            }
        }
        unique
    }
}

/// Text form of a scalar front-matter value.
pub fn value_to_token(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(text) => Some(text.clone()),
        toml::Value::Integer(number) => Some(number.to_string()),
        toml::Value::Float(number) => Some(number.to_string()),
        toml::Value::Boolean(flag) => Some(flag.to_string()),
        toml::Value::Datetime(datetime) => Some(datetime.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Tags from an array of strings or a comma-separated string.
pub fn parse_tags(value: &toml::Value) -> std::result::Result<Vec<String>, String> {
    let raw: Vec<&str> = match value {
        toml::Value::String(text) => text.split(',').collect(),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| format!("`tags` entries must be strings, found {}", item.type_str()))
            })
            .collect::<std::result::Result<_, _>>()?,
        other => return Err(format!("`tags` must be a string or an array, found {}", other.type_str())),
    };

    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw.into_iter().map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_owned());
        }
    }
    Ok(tags)
}

fn string_field(source: &SourceResource, key: &str) -> Result<Option<String>> {
    match source.front_matter.get(key) {
        None => Ok(None),
        Some(toml::Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(BlogError::invalid_front_matter(
            &source.path,
            format!("`{key}` must be a string, found {}", other.type_str()),
        )),
    }
}

/// File name up to its first `.`.
fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}
