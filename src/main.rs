//! almanac - tag, calendar, custom collection and paginated listings for blogs.

mod cli;

use almanac::article::date;
use almanac::config::BlogConfig;
use almanac::logger::set_quiet;
use almanac::pipeline::Blog;
use almanac::scaffold::{NewArticle, new_article};
use almanac::source::FsSource;
use almanac::log;
use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands};
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_quiet(cli.quiet);
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Build { output, pretty } => build(&cli, config, output.as_deref(), *pretty),
        Commands::Check => check(&cli, config),
        Commands::New { title, date, lang } => {
            new(&cli, &config, title, date.as_deref(), lang.clone())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<BlogConfig> {
    let path = cli.config_path();
    if !path.exists() {
        bail!("Config file `{}` not found.", path.display());
    }
    let config = BlogConfig::from_path(&path)?;
    config.validate()?;
    Ok(config)
}

fn build(cli: &Cli, config: BlogConfig, output: Option<&Path>, pretty: bool) -> Result<()> {
    let blog = Blog::initialize(config)?;
    let snapshot = blog.attach(&FsSource::new(cli.content_dir()))?;

    let manifest = if pretty {
        serde_json::to_string_pretty(&*snapshot)?
    } else {
        serde_json::to_string(&*snapshot)?
    };

    match output {
        Some(path) => {
            fs::write(path, manifest)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            log!("done"; "{}", path.display());
        }
        None => println!("{manifest}"),
    }
    Ok(())
}

fn check(cli: &Cli, config: BlogConfig) -> Result<()> {
    let blog = Blog::initialize(config)?;
    let snapshot = blog.attach(&FsSource::new(cli.content_dir()))?;

    if !snapshot.skipped.is_empty() {
        bail!("{} article(s) could not be built", snapshot.skipped.len());
    }
    log!("done"; "{} resources, no problems found", snapshot.resources.len());
    Ok(())
}

fn new(cli: &Cli, config: &BlogConfig, title: &str, date: Option<&str>, lang: Option<String>) -> Result<()> {
    let config = config.resolve()?;
    let date = match date {
        Some(value) => date::parse(value, config.time_zone)
            .with_context(|| format!("`{value}` is not a recognized date"))?,
        None => Utc::now().with_timezone(&config.time_zone),
    };

    let request = NewArticle {
        title: title.to_owned(),
        date,
        lang,
    };
    new_article(&config, &cli.root, &cli.content_dir(), &request)?;
    Ok(())
}
