use crate::article::Article;
use crate::error::BlogError;
use crate::index::CollectionIndex;
use crate::resource::{Resource, ResourceList};
use serde::Serialize;
use std::sync::Arc;

/// Result of one successful rebuild. Never mutated once published.
#[derive(Debug, Default, Serialize)]
pub struct Snapshot {
    pub name: String,
    /// 0 for the empty snapshot of a fresh [`Blog`](super::Blog), +1 per rebuild.
    pub generation: u64,
    /// Every built article, published or not, in index order.
    pub articles: Vec<Arc<Article>>,
    #[serde(skip)]
    pub index: CollectionIndex,
    pub resources: ResourceList,
    pub skipped: Vec<Skipped>,
}

impl Snapshot {
    pub(crate) fn empty(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    pub fn get(&self, path: &str) -> Option<&Resource> {
        self.resources.get(path)
    }

    pub fn article(&self, source_path: &str) -> Option<&Arc<Article>> {
        self.articles.iter().find(|a| a.source_path == source_path)
    }
}

/// A source that matched the `sources` template but could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub source_path: String,
    pub reason: String,
}

impl Skipped {
    pub(crate) fn new(source_path: &str, err: &BlogError) -> Self {
        Self {
            source_path: source_path.to_owned(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::empty("notes");
        assert_eq!(snapshot.name, "notes");
        assert_eq!(snapshot.generation, 0);
        assert!(snapshot.resources.is_empty());
        assert!(snapshot.get("index.html").is_none());
    }

    #[test]
    fn test_manifest_skips_index() {
        let json = serde_json::to_value(Snapshot::empty("notes")).unwrap();
        assert!(json.get("index").is_none());
        assert_eq!(json["resources"], serde_json::json!([]));
    }
}
