//! New-article scaffolding for `almanac new`.
//!
//! The file name comes from rendering the `sources` template, so the
//! created file is picked up as an article by the next rebuild.

use crate::config::ResolvedConfig;
use crate::log;
use crate::template::{TokenMap, normalize_path, slugify};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, FixedOffset};
use std::fs;
use std::path::{Path, PathBuf};

/// What `almanac new` was asked to create.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub date: DateTime<FixedOffset>,
    pub lang: Option<String>,
}

/// Source path (relative to the content directory) for `request`.
pub fn article_path(config: &ResolvedConfig, request: &NewArticle) -> Result<String> {
    let slug = slugify(&request.title, config.slug_mode);
    if slug.is_empty() {
        bail!("title `{}` does not produce a usable file name", request.title);
    }

    let date = request.date.with_timezone(&config.time_zone);
    let mut tokens = TokenMap::from([
        ("year".to_owned(), format!("{:04}", date.year())),
        ("month".to_owned(), format!("{:02}", date.month())),
        ("day".to_owned(), format!("{:02}", date.day())),
        ("title".to_owned(), slug),
    ]);
    if let Some(lang) = request.lang.as_ref().or(config.default_locale.as_ref()) {
        tokens.insert("lang".to_owned(), lang.clone());
    }

    let path = config
        .sources
        .render(&tokens)
        .context("cannot derive a file name from `sources`")?;
    let mut path = normalize_path(&path);

    let extension = config.default_extension.trim();
    if !extension.is_empty() {
        if !extension.starts_with('.') {
            path.push('.');
        }
        path.push_str(extension);
    }
    Ok(path)
}

/// `+++`-fenced TOML front matter for a fresh article.
pub fn front_matter(request: &NewArticle) -> Result<String> {
    let date: toml::value::Datetime = request
        .date
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
        .parse()
        .context("cannot express the date as a TOML datetime")?;

    let mut table = toml::Table::new();
    table.insert("title".to_owned(), toml::Value::String(request.title.clone()));
    table.insert("date".to_owned(), toml::Value::Datetime(date));
    table.insert("tags".to_owned(), toml::Value::Array(Vec::new()));
    if let Some(lang) = &request.lang {
        table.insert("lang".to_owned(), toml::Value::String(lang.clone()));
    }

    Ok(format!("+++\n{}+++\n", toml::to_string(&table)?))
}

/// Write the new article under `content_dir` and return its path.
///
/// `new_article_template`, when configured, is read relative to `root` and
/// becomes the body. An existing file is never overwritten.
pub fn new_article(
    config: &ResolvedConfig,
    root: &Path,
    content_dir: &Path,
    request: &NewArticle,
) -> Result<PathBuf> {
    let path = content_dir.join(article_path(config, request)?);
    if path.exists() {
        bail!("`{}` already exists", path.display());
    }

    let body = match &config.new_article_template {
        Some(template) => {
            let template = root.join(template);
            fs::read_to_string(&template)
                .with_context(|| format!("failed to read `{}`", template.display()))?
        }
        None => String::new(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(&path, format!("{}{body}", front_matter(request)?))
        .with_context(|| format!("failed to write `{}`", path.display()))?;

    log!("new"; "{}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlogConfig;
    use crate::source::SourceResource;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn config(toml: &str) -> ResolvedConfig {
        BlogConfig::from_str(toml).unwrap().resolve().unwrap()
    }

    fn request(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_owned(),
            date: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2024, 1, 5, 10, 30, 0)
                .unwrap(),
            lang: None,
        }
    }

    #[test]
    fn test_article_path_renders_sources() {
        let path = article_path(&config(""), &request("Hello, World!")).unwrap();
        assert_eq!(path, "2024-01-05-hello-world.html.md");
    }

    #[test]
    fn test_article_path_with_prefix_and_lang() {
        let config = config(
            r#"
            prefix = "blog"
            sources = "{lang}/{year}-{title}.html"
            default_extension = "erb"
            "#,
        );
        let mut request = request("Bonjour");
        request.lang = Some("fr".into());
        assert_eq!(article_path(&config, &request).unwrap(), "blog/fr/2024-bonjour.html.erb");
    }

    #[test]
    fn test_article_path_missing_token() {
        let config = config(r#"sources = "{category}/{title}.html""#);
        assert!(article_path(&config, &request("x")).is_err());
    }

    #[test]
    fn test_front_matter_parses_back() {
        let content = format!("{}body", front_matter(&request("Hello")).unwrap());
        let source = SourceResource::parse("x", &content).unwrap();
        assert_eq!(source.get_str("title"), Some("Hello"));
        assert!(source.front_matter["date"].as_datetime().is_some());
        assert_eq!(source.front_matter["tags"].as_array().map(Vec::len), Some(0));
        assert_eq!(source.body, "body");
    }

    #[test]
    fn test_new_article_written_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("seed.md"), "Write here.\n").unwrap();
        let config = config(r#"new_article_template = "seed.md""#);
        let content = dir.path().join("content");

        let path = new_article(&config, dir.path(), &content, &request("Hello")).unwrap();
        assert_eq!(path, content.join("2024-01-05-hello.html.md"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("+++\n"));
        assert!(written.ends_with("Write here.\n"));

        let err = new_article(&config, dir.path(), &content, &request("Hello")).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
