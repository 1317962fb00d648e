//! Frozen, normalized configuration.
//!
//! Normalization happens exactly once, here:
//!
//! - `prefix` is joined onto `permalink`, `sources`, `taglink`, the three
//!   calendar links and every custom collection link;
//! - `calendar_template` fans out to year/month/day levels lacking their own;
//! - `time_zone` and `summary_separator` are parsed.

use super::{BlogConfig, ConfigError};
use crate::template::{SlugMode, Template, join_prefix};
use chrono::FixedOffset;
use regex::Regex;
use std::path::PathBuf;

/// Name used when the config does not set one.
pub const DEFAULT_NAME: &str = "blog";

/// One level (year, month or day) of the calendar archive.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarLevel {
    pub enabled: bool,
    pub link: Template,
    pub template: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCollection {
    pub property: String,
    pub link: Template,
    pub template: String,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub name: String,
    pub prefix: Option<String>,
    pub permalink: Template,
    pub sources: Template,
    pub taglink: Template,
    pub tag_template: Option<String>,
    pub generate_tag_pages: bool,
    pub layout: String,
    pub summary_separator: Regex,
    pub summary_length: usize,
    pub year: CalendarLevel,
    pub month: CalendarLevel,
    pub day: CalendarLevel,
    pub paginate: bool,
    pub per_page: usize,
    pub page_link: Template,
    pub publish_future_dated: bool,
    pub custom_collections: Vec<ResolvedCollection>,
    pub preserve_locale: bool,
    pub default_locale: Option<String>,
    pub time_zone: FixedOffset,
    pub slug_mode: SlugMode,
    pub new_article_template: Option<PathBuf>,
    pub default_extension: String,
}

impl BlogConfig {
    /// Validate and normalize into the form the pipeline runs on.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        self.validate()?;

        let prefix = self
            .prefix
            .as_deref()
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .map(str::to_owned);
        let link = |template: &str| match &prefix {
            Some(prefix) => Template::new(join_prefix(prefix, template)),
            None => Template::new(template),
        };

        let calendar = |enabled: bool, link_template: &str, own: &Option<String>| CalendarLevel {
            enabled,
            link: link(link_template),
            template: own.clone().or_else(|| self.calendar_template.clone()),
        };

        let custom_collections = self
            .custom_collections
            .iter()
            .map(|(property, collection)| ResolvedCollection {
                property: property.to_owned(),
                link: link(&collection.link),
                template: collection.template.clone(),
            })
            .collect();

        let summary_separator =
            Regex::new(&self.summary_separator).map_err(ConfigError::SummarySeparator)?;

        Ok(ResolvedConfig {
            name: self.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_owned()),
            permalink: link(&self.permalink),
            sources: link(&self.sources),
            taglink: link(&self.taglink),
            tag_template: self.tag_template.clone(),
            generate_tag_pages: self.generate_tag_pages,
            layout: self.layout.clone(),
            summary_separator,
            summary_length: self.summary_length,
            year: calendar(self.generate_year_pages, &self.year_link, &self.year_template),
            month: calendar(self.generate_month_pages, &self.month_link, &self.month_template),
            day: calendar(self.generate_day_pages, &self.day_link, &self.day_template),
            paginate: self.paginate,
            per_page: self.per_page,
            page_link: Template::new(self.page_link.clone()),
            publish_future_dated: self.publish_future_dated,
            custom_collections,
            preserve_locale: self.preserve_locale,
            default_locale: self.default_locale.clone(),
            time_zone: parse_time_zone(&self.time_zone)?,
            slug_mode: self.slug_mode,
            new_article_template: self.new_article_template.clone(),
            default_extension: self.default_extension.clone(),
            prefix,
        })
    }
}

impl ResolvedConfig {
    /// Names of the configured custom properties, in declaration order.
    pub fn custom_properties(&self) -> Vec<String> {
        self.custom_collections
            .iter()
            .map(|c| c.property.clone())
            .collect()
    }
}

/// Parse `UTC`/`Z`/`GMT` or a fixed offset such as `+09:00`, `-0530`.
pub fn parse_time_zone(zone: &str) -> Result<FixedOffset, ConfigError> {
    let trimmed = zone.trim();
    if ["utc", "z", "gmt"].contains(&trimmed.to_ascii_lowercase().as_str()) {
        return FixedOffset::east_opt(0).ok_or_else(|| ConfigError::TimeZone(zone.to_owned()));
    }
    trimmed
        .parse::<FixedOffset>()
        .map_err(|_| ConfigError::TimeZone(zone.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(toml: &str) -> ResolvedConfig {
        BlogConfig::from_str(toml).unwrap().resolve().unwrap()
    }

    #[test]
    fn test_prefix_composition() {
        let config = resolve(
            r#"
            prefix = "blog"
            permalink = "/{year}/{title}.html"
        "#,
        );
        assert_eq!(config.permalink.as_str(), "/blog/{year}/{title}.html");
        assert_eq!(config.taglink.as_str(), "blog/tags/{tag}.html");
        assert_eq!(config.sources.as_str(), "blog/{year}-{month}-{day}-{title}.html");
        assert_eq!(config.year.link.as_str(), "/blog/{year}.html");
        // page suffix is relative to each listing, never prefixed
        assert_eq!(config.page_link.as_str(), "page/{num}");
    }

    #[test]
    fn test_prefix_with_slashes_does_not_double() {
        let config = resolve(
            r#"
            prefix = "/blog/"
            permalink = "/{year}/{title}.html"
        "#,
        );
        assert_eq!(config.permalink.as_str(), "/blog/{year}/{title}.html");
        assert_eq!(config.prefix.as_deref(), Some("blog"));
    }

    #[test]
    fn test_prefix_applies_to_custom_links() {
        let config = resolve(
            r#"
            prefix = "blog"
            [custom_collections.category]
            link = "/categories/{category}.html"
            template = "category.html"
        "#,
        );
        assert_eq!(
            config.custom_collections[0].link.as_str(),
            "/blog/categories/{category}.html"
        );
    }

    #[test]
    fn test_empty_prefix_is_none() {
        let config = resolve(r#"prefix = "/""#);
        assert!(config.prefix.is_none());
        assert_eq!(config.permalink.as_str(), "/{year}/{month}/{day}/{title}.html");
    }

    #[test]
    fn test_calendar_template_fan_out() {
        let config = resolve(
            r#"
            calendar_template = "calendar.html"
            month_template = "month.html"
        "#,
        );
        assert_eq!(config.year.template.as_deref(), Some("calendar.html"));
        assert_eq!(config.month.template.as_deref(), Some("month.html"));
        assert_eq!(config.day.template.as_deref(), Some("calendar.html"));
    }

    #[test]
    fn test_name_default() {
        assert_eq!(resolve("").name, DEFAULT_NAME);
        assert_eq!(resolve(r#"name = "notes""#).name, "notes");
    }

    #[test]
    fn test_time_zone() {
        assert_eq!(parse_time_zone("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_time_zone("z").unwrap().local_minus_utc(), 0);
        assert_eq!(
            parse_time_zone("+09:00").unwrap().local_minus_utc(),
            9 * 3600
        );
        assert_eq!(
            parse_time_zone("-05:30").unwrap().local_minus_utc(),
            -(5 * 3600 + 30 * 60)
        );
        assert!(matches!(
            parse_time_zone("Europe/Nowhere"),
            Err(ConfigError::TimeZone(_))
        ));
    }

    #[test]
    fn test_bad_time_zone_fails_resolve() {
        let config = BlogConfig::from_str(r#"time_zone = "somewhere""#).unwrap();
        assert!(matches!(config.resolve(), Err(ConfigError::TimeZone(_))));
    }

    #[test]
    fn test_named_time_zone_rejected() {
        let config = BlogConfig::from_str(r#"time_zone = "Europe/Berlin""#).unwrap();
        assert!(matches!(config.resolve(), Err(ConfigError::TimeZone(z)) if z == "Europe/Berlin"));
    }

    #[test]
    fn test_bad_summary_separator_fails_resolve() {
        let config = BlogConfig::from_str(r#"summary_separator = "(unclosed""#).unwrap();
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::SummarySeparator(_))
        ));
    }

    #[test]
    fn test_custom_properties_order() {
        let config = resolve(
            r#"
            [custom_collections.series]
            link = "/series/{series}.html"
            template = "series.html"
            [custom_collections.category]
            link = "/categories/{category}.html"
            template = "category.html"
        "#,
        );
        assert_eq!(config.custom_properties(), vec!["series", "category"]);
    }
}
