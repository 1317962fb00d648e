//! The resource list manipulators work on.
//!
//! Every output path appears at most once; [`ResourceList::push_unique`]
//! enforces that and names both claimants when it cannot. Synthetic
//! resources carry the name of the manipulator that produced them so it
//! can discard them before regenerating.

use crate::article::Article;
use crate::error::{BlogError, Result};
use crate::index::Articles;
use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Tag,
    Year,
    Month,
    Day,
    Custom,
    PaginatedPage,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tag => "tag",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Custom => "custom",
            Self::PaginatedPage => "paginated",
        })
    }
}

/// Where a resource came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Origin {
    /// Supplied by the source provider.
    Source { source_path: String },
    /// Generated by the manipulator named `owner`.
    Synthetic {
        owner: String,
        kind: ResourceKind,
        /// Render template the host uses for this page.
        #[serde(skip_serializing_if = "Option::is_none")]
        template_path: Option<String>,
    },
}

/// What a listing page lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListingSubject {
    Tag {
        name: String,
    },
    Period {
        year: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        month: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        day: Option<u32>,
    },
    Custom {
        property: String,
        value: String,
    },
    /// All published articles (source pages with `pageable = true`).
    All,
}

impl fmt::Display for ListingSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag { name } => write!(f, "tag `{name}`"),
            Self::Period { year, month, day } => {
                write!(f, "archive {year:04}")?;
                if let Some(month) = month {
                    write!(f, "-{month:02}")?;
                }
                if let Some(day) = day {
                    write!(f, "-{day:02}")?;
                }
                Ok(())
            }
            Self::Custom { property, value } => write!(f, "`{property}` value `{value}`"),
            Self::All => f.write_str("all articles"),
        }
    }
}

/// The article sequence behind a paginatable page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub subject: ListingSubject,
    #[serde(serialize_with = "serialize_urls")]
    pub articles: Articles,
    /// Overrides the configured page size for this listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,
}

impl Listing {
    pub fn new(subject: ListingSubject, articles: Articles) -> Self {
        Self {
            subject,
            articles,
            per_page: None,
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSlice {
    /// 1-based.
    pub page_number: usize,
    #[serde(serialize_with = "serialize_urls")]
    pub items: Articles,
    pub total_pages: usize,
    pub total_items: usize,
    pub per_page: usize,
    pub prev_path: Option<String>,
    pub next_path: Option<String>,
    pub first_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Normalized output path, unique within a list.
    pub path: String,
    pub origin: Origin,
    /// Kept in the list but not written as output.
    pub ignored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<Arc<Article>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<Listing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageSlice>,
}

impl Resource {
    /// A source-backed resource at its own source path.
    pub fn source(source_path: impl Into<String>) -> Self {
        let source_path = source_path.into();
        Self::source_at(source_path.clone(), source_path)
    }

    /// A source-backed resource published at `path` (articles live at
    /// their permalink).
    pub fn source_at(path: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self::new(
            path.into(),
            Origin::Source {
                source_path: source_path.into(),
            },
        )
    }

    pub fn synthetic(
        path: impl Into<String>,
        owner: impl Into<String>,
        kind: ResourceKind,
        template_path: Option<String>,
    ) -> Self {
        Self::new(
            path.into(),
            Origin::Synthetic {
                owner: owner.into(),
                kind,
                template_path,
            },
        )
    }

    fn new(path: String, origin: Origin) -> Self {
        Self {
            path,
            origin,
            ignored: false,
            article: None,
            listing: None,
            page: None,
        }
    }

    pub fn with_article(mut self, article: Arc<Article>) -> Self {
        self.article = Some(article);
        self
    }

    pub fn with_listing(mut self, listing: Listing) -> Self {
        self.listing = Some(listing);
        self
    }

    pub fn with_page(mut self, page: PageSlice) -> Self {
        self.page = Some(page);
        self
    }

    pub fn ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }

    /// Name of the generating manipulator; `None` for source resources.
    pub fn owner(&self) -> Option<&str> {
        match &self.origin {
            Origin::Synthetic { owner, .. } => Some(owner),
            Origin::Source { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        match &self.origin {
            Origin::Synthetic { kind, .. } => Some(*kind),
            Origin::Source { .. } => None,
        }
    }

    pub fn source_path(&self) -> Option<&str> {
        match &self.origin {
            Origin::Source { source_path } => Some(source_path),
            Origin::Synthetic { .. } => None,
        }
    }

    pub fn template_path(&self) -> Option<&str> {
        match &self.origin {
            Origin::Synthetic { template_path, .. } => template_path.as_deref(),
            Origin::Source { source_path } => Some(source_path),
        }
    }

    /// Human-readable claimant, used in collision reports.
    pub fn describe(&self) -> String {
        match &self.origin {
            Origin::Source { source_path } => format!("source `{source_path}`"),
            Origin::Synthetic { owner, kind, .. } => match &self.listing {
                Some(listing) => format!("{kind} page for {}", listing.subject),
                None => format!("{kind} page from `{owner}`"),
            },
        }
    }
}

/// Ordered resources with a path index.
#[derive(Debug, Clone, Default)]
pub struct ResourceList {
    resources: Vec<Resource>,
    by_path: FxHashMap<String, usize>,
}

impl ResourceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `resource`, failing if its path is already taken.
    pub fn push_unique(&mut self, resource: Resource) -> Result<()> {
        if let Some(&existing) = self.by_path.get(&resource.path) {
            return Err(BlogError::PathCollision {
                path: resource.path.clone(),
                first: self.resources[existing].describe(),
                second: resource.describe(),
            });
        }
        self.by_path.insert(resource.path.clone(), self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    /// Drop every synthetic resource generated by `owner`.
    pub fn retain_not_owned_by(mut self, owner: &str) -> Self {
        let before = self.resources.len();
        self.resources.retain(|r| r.owner() != Some(owner));
        if self.resources.len() != before {
            self.reindex();
        }
        self
    }

    /// Flag the resource at `path` as non-output. Returns whether one existed.
    pub fn mark_ignored(&mut self, path: &str) -> bool {
        match self.by_path.get(path) {
            Some(&index) => {
                self.resources[index].ignored = true;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, path: &str) -> Option<&Resource> {
        self.by_path.get(path).map(|&index| &self.resources[index])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Paths in list order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|r| r.path.as_str())
    }

    /// Resources written as output.
    pub fn outputs(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(|r| !r.ignored)
    }

    fn reindex(&mut self) {
        self.by_path = self
            .resources
            .iter()
            .enumerate()
            .map(|(index, r)| (r.path.clone(), index))
            .collect();
    }
}

impl IntoIterator for ResourceList {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResourceList {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for ResourceList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.resources)
    }
}

/// Listed articles appear in the manifest by URL only.
fn serialize_urls<S: Serializer>(articles: &Articles, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(articles.iter().map(|article| article.url()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_page(path: &str) -> Resource {
        Resource::synthetic(path, "tag", ResourceKind::Tag, Some("tag.html".into()))
    }

    #[test]
    fn test_push_unique_rejects_duplicates() {
        let mut list = ResourceList::new();
        list.push_unique(Resource::source("tags/a.html")).unwrap();

        let err = list.push_unique(tag_page("tags/a.html")).unwrap_err();
        match err {
            BlogError::PathCollision { path, first, second } => {
                assert_eq!(path, "tags/a.html");
                assert!(first.contains("source `tags/a.html`"));
                assert!(second.contains("tag page"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_retain_not_owned_by_keeps_sources() {
        let mut list = ResourceList::new();
        list.push_unique(Resource::source("index.html")).unwrap();
        list.push_unique(tag_page("tags/a.html")).unwrap();
        list.push_unique(Resource::synthetic("2024.html", "calendar", ResourceKind::Year, None))
            .unwrap();

        let list = list.retain_not_owned_by("tag");
        assert_eq!(list.paths().collect::<Vec<_>>(), vec!["index.html", "2024.html"]);
        assert!(list.get("tags/a.html").is_none());
        assert_eq!(list.get("2024.html").unwrap().kind(), Some(ResourceKind::Year));

        // the freed path can be claimed again
        let mut list = list;
        list.push_unique(tag_page("tags/a.html")).unwrap();
    }

    #[test]
    fn test_mark_ignored() {
        let mut list = ResourceList::new();
        list.push_unique(Resource::source("tag.html")).unwrap();
        assert!(list.mark_ignored("tag.html"));
        assert!(!list.mark_ignored("missing.html"));
        assert!(list.get("tag.html").unwrap().ignored);
        assert_eq!(list.outputs().count(), 0);
    }

    #[test]
    fn test_serialize_manifest_shape() {
        let mut list = ResourceList::new();
        list.push_unique(tag_page("tags/a.html").with_listing(Listing::new(
            ListingSubject::Tag { name: "a".into() },
            Vec::new(),
        )))
        .unwrap();

        let json = serde_json::to_value(&list).unwrap();
        let entry = &json[0];
        assert_eq!(entry["path"], "tags/a.html");
        assert_eq!(entry["origin"]["type"], "synthetic");
        assert_eq!(entry["origin"]["kind"], "tag");
        assert_eq!(entry["listing"]["subject"]["name"], "a");
        assert!(entry.get("page").is_none());
    }

    #[test]
    fn test_template_path() {
        assert_eq!(Resource::source("about.html").template_path(), Some("about.html"));
        assert_eq!(tag_page("tags/x.html").template_path(), Some("tag.html"));
    }
}
