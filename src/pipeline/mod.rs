//! Pipeline coordinator.
//!
//! A [`Blog`] is an explicit handle: it owns the resolved configuration and
//! the manipulator chain, and publishes the result of each rebuild as an
//! immutable [`Snapshot`].
//!
//! # Architecture
//!
//! ```text
//! sources ──► articles ──► CollectionIndex ──► base list ──► manipulators
//!                                                              │
//!                          ArcSwap<Snapshot> ◄──── store ──────┘
//!                                 │
//!                    snapshot() readers (lock-free)
//! ```
//!
//! A rebuild is all-or-nothing. Per-article problems skip that article;
//! anything structural (path collision, unresolvable token) aborts the
//! rebuild and the previous snapshot stays published.

mod snapshot;

pub use snapshot::{Skipped, Snapshot};

use crate::article::{Article, BuildContext, DefaultSummary, SummaryGenerator};
use crate::config::{BlogConfig, ResolvedConfig};
use crate::error::{BlogError, Result};
use crate::index::{self, CollectionIndex};
use crate::log;
use crate::manipulator::{self, Manipulator};
use crate::resource::{Listing, ListingSubject, Resource, ResourceList};
use crate::source::{SourceProvider, SourceResource};
use crate::template::normalize_path;
use arc_swap::ArcSwap;
use chrono::{DateTime, FixedOffset, Utc};
use std::borrow::Cow;
use std::sync::Arc;

pub struct Blog {
    config: Arc<ResolvedConfig>,
    summary: Arc<dyn SummaryGenerator>,
    manipulators: Vec<Box<dyn Manipulator>>,
    current: ArcSwap<Snapshot>,
}

impl Blog {
    /// Validate and normalize `config` once. The initial snapshot is empty.
    pub fn initialize(config: BlogConfig) -> Result<Self> {
        let config = Arc::new(config.resolve()?);
        let manipulators = manipulator::chain(&config);
        let current = ArcSwap::from_pointee(Snapshot::empty(&config.name));
        Ok(Self {
            config,
            summary: Arc::new(DefaultSummary),
            manipulators,
            current,
        })
    }

    /// Replace the summary strategy used for articles without a `summary`.
    pub fn with_summary_generator(mut self, generator: impl SummaryGenerator + 'static) -> Self {
        self.summary = Arc::new(generator);
        self
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The manipulator chain in execution order, for hosts that register
    /// them as named transformers of their own pipeline.
    pub fn manipulators(&self) -> &[Box<dyn Manipulator>] {
        &self.manipulators
    }

    /// Latest published snapshot.
    #[inline]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Pull one batch from `provider` and rebuild from it.
    pub fn attach<P>(&self, provider: &P) -> anyhow::Result<Arc<Snapshot>>
    where
        P: SourceProvider + ?Sized,
    {
        let sources = provider.sources()?;
        Ok(self.rebuild(&sources)?)
    }

    /// Rebuild from `sources` as of the current time.
    pub fn rebuild(&self, sources: &[SourceResource]) -> Result<Arc<Snapshot>> {
        let now = Utc::now().with_timezone(&self.config.time_zone);
        self.rebuild_at(sources, now)
    }

    /// Rebuild from `sources`, judging future dates against `now`.
    ///
    /// On success the new snapshot is published and returned. On error
    /// nothing is published.
    pub fn rebuild_at(&self, sources: &[SourceResource], now: DateTime<FixedOffset>) -> Result<Arc<Snapshot>> {
        let config = &*self.config;
        let ctx = BuildContext {
            config,
            summary: self.summary.as_ref(),
            now,
        };

        let mut sources: Vec<Cow<'_, SourceResource>> = sources.iter().map(normalized).collect();
        sources.sort_by(|a, b| a.path.cmp(&b.path));

        // Source path → built article, or `None` for plain resources.
        let mut built: Vec<(&SourceResource, Option<Arc<Article>>)> = Vec::with_capacity(sources.len());
        let mut skipped = Vec::new();
        for source in &sources {
            let source = source.as_ref();
            if let Some(reason) = &source.front_matter_error {
                let err = BlogError::invalid_front_matter(&source.path, reason.as_str());
                log!("skip"; "{err}");
                skipped.push(Skipped::new(&source.path, &err));
                built.push((source, None));
                continue;
            }
            let article = match config.sources.extract(&source.path) {
                Some(tokens) => match Article::build(source, &tokens, &ctx) {
                    Ok(article) => Some(Arc::new(article)),
                    Err(err) if err.is_recoverable() => {
                        log!("skip"; "{err}");
                        skipped.push(Skipped::new(&source.path, &err));
                        None
                    }
                    Err(err) => return Err(err),
                },
                None => None,
            };
            built.push((source, article));
        }

        let mut articles: Vec<Arc<Article>> = built.iter().filter_map(|(_, a)| a.clone()).collect();
        articles.sort_by(|a, b| index::compare(a, b));
        let index = CollectionIndex::build(&articles, &config.custom_properties());

        let mut resources = ResourceList::new();
        for (source, article) in built {
            let resource = match article {
                Some(article) => Resource::source_at(article.permalink.clone(), &source.path)
                    .ignored(!article.published)
                    .with_article(article),
                None => {
                    let failed = skipped.iter().any(|s| s.source_path == source.path);
                    plain_resource(source, &index).ignored(failed)
                }
            };
            resources.push_unique(resource)?;
        }

        let resources = manipulator::run(&self.manipulators, resources, &index)?;

        let snapshot = Arc::new(Snapshot {
            name: config.name.clone(),
            generation: self.current.load().generation + 1,
            articles,
            index,
            resources,
            skipped,
        });
        log!(
            "blog";
            "{}: {} articles, {} resources, {} skipped",
            snapshot.name,
            snapshot.articles.len(),
            snapshot.resources.len(),
            snapshot.skipped.len()
        );

        self.current.store(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}

fn normalized(source: &SourceResource) -> Cow<'_, SourceResource> {
    let path = normalize_path(&source.path);
    if path == source.path {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(SourceResource {
            path,
            ..source.clone()
        })
    }
}

/// A non-article source at its own path; `pageable = true` front matter
/// turns it into a listing of every published article.
fn plain_resource(source: &SourceResource, index: &CollectionIndex) -> Resource {
    let resource = Resource::source(&source.path);
    if source.get_bool("pageable") != Some(true) {
        return resource;
    }

    let mut listing = Listing::new(ListingSubject::All, index.articles.clone());
    match source.front_matter.get("per_page").map(|v| v.as_integer()) {
        None => {}
        Some(Some(per_page)) if per_page >= 1 => {
            listing.per_page = usize::try_from(per_page).ok();
        }
        Some(_) => {
            let err = BlogError::invalid_front_matter(&source.path, "`per_page` must be a positive integer");
            log!("skip"; "{err}, using the configured page size");
        }
    }
    resource.with_listing(listing)
}
