use super::{Manipulator, ignore_template};
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::index::CollectionIndex;
use crate::log;
use crate::resource::{Listing, ListingSubject, Resource, ResourceKind, ResourceList};
use crate::template::{SlugMode, Template, TokenMap, normalize_path, slugify};

/// One listing page per tag at `taglink`.
#[derive(Debug, Clone)]
pub struct TagPages {
    enabled: bool,
    link: Template,
    template: Option<String>,
    slug_mode: SlugMode,
}

impl TagPages {
    pub const NAME: &'static str = "tag";

    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            enabled: config.generate_tag_pages,
            link: config.taglink.clone(),
            template: config.tag_template.clone(),
            slug_mode: config.slug_mode,
        }
    }

    /// Output path of the page for `tag`, `None` when the tag slugs to nothing.
    pub fn path_for(&self, tag: &str) -> Result<Option<String>> {
        let slug = slugify(tag, self.slug_mode);
        if slug.is_empty() {
            return Ok(None);
        }
        let tokens = TokenMap::from([("tag".to_owned(), slug)]);
        let path = self
            .link
            .render(&tokens)
            .map_err(|err| err.within(format!("page of tag `{tag}`")))?;
        Ok(Some(normalize_path(&path)))
    }
}

impl Manipulator for TagPages {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn manipulate(&self, resources: ResourceList, index: &CollectionIndex) -> Result<ResourceList> {
        let mut resources = resources.retain_not_owned_by(Self::NAME);
        ignore_template(&mut resources, self.template.as_deref());

        if !self.enabled {
            return Ok(resources);
        }

        for (tag, articles) in &index.by_tag {
            if articles.is_empty() {
                continue;
            }
            let Some(path) = self.path_for(tag)? else {
                log!("skip"; "tag `{tag}` has no usable slug");
                continue;
            };
            let listing = Listing::new(ListingSubject::Tag { name: tag.clone() }, articles.clone());
            resources.push_unique(
                Resource::synthetic(path, Self::NAME, ResourceKind::Tag, self.template.clone())
                    .with_listing(listing),
            )?;
        }

        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlogConfig;
    use crate::error::BlogError;
    use crate::manipulator::tests_support::{article, index_of};

    fn tag_pages(toml: &str) -> TagPages {
        TagPages::new(&BlogConfig::from_str(toml).unwrap().resolve().unwrap())
    }

    fn listed(resources: &ResourceList, path: &str) -> Vec<String> {
        resources
            .get(path)
            .and_then(|r| r.listing.as_ref())
            .map(|l| l.articles.iter().map(|a| a.source_path.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_tag_pages_for_three_articles() {
        let index = index_of(vec![
            article("one", (2024, 1, 5), &["a"]),
            article("two", (2024, 1, 20), &["a", "b"]),
            article("three", (2024, 2, 1), &["b"]),
        ]);
        let resources = tag_pages("")
            .manipulate(ResourceList::new(), &index)
            .unwrap();

        assert_eq!(
            resources.paths().collect::<Vec<_>>(),
            vec!["tags/a.html", "tags/b.html"]
        );
        assert_eq!(listed(&resources, "tags/a.html"), vec!["two", "one"]);
        assert_eq!(listed(&resources, "tags/b.html"), vec!["three", "two"]);
        let page = resources.get("tags/a.html").unwrap();
        assert_eq!(page.kind(), Some(ResourceKind::Tag));
        assert_eq!(page.owner(), Some("tag"));
    }

    #[test]
    fn test_tag_slug_in_path() {
        let index = index_of(vec![article("one", (2024, 1, 5), &["Rust Tips"])]);
        let resources = tag_pages("").manipulate(ResourceList::new(), &index).unwrap();
        assert!(resources.contains("tags/rust-tips.html"));
    }

    #[test]
    fn test_disabled_emits_nothing_but_ignores_template() {
        let index = index_of(vec![article("one", (2024, 1, 5), &["a"])]);
        let mut base = ResourceList::new();
        base.push_unique(Resource::source("tag.html")).unwrap();

        let resources = tag_pages("generate_tag_pages = false\ntag_template = \"tag.html\"")
            .manipulate(base, &index)
            .unwrap();
        assert_eq!(resources.len(), 1);
        assert!(resources.get("tag.html").unwrap().ignored);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let index = index_of(vec![article("one", (2024, 1, 5), &["a", "b"])]);
        let tags = tag_pages("");
        let once = tags.manipulate(ResourceList::new(), &index).unwrap();
        let twice = tags.manipulate(once.clone(), &index).unwrap();
        assert_eq!(
            once.paths().collect::<Vec<_>>(),
            twice.paths().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_collision_with_source() {
        let index = index_of(vec![article("one", (2024, 1, 5), &["a"])]);
        let mut base = ResourceList::new();
        base.push_unique(Resource::source("tags/a.html")).unwrap();

        let err = tag_pages("").manipulate(base, &index).unwrap_err();
        assert!(matches!(err, BlogError::PathCollision { ref path, .. } if path == "tags/a.html"));
    }

    #[test]
    fn test_tags_with_same_slug_collide() {
        let index = index_of(vec![
            article("one", (2024, 1, 5), &["Rust"]),
            article("two", (2024, 1, 6), &["rust"]),
        ]);
        let err = tag_pages("").manipulate(ResourceList::new(), &index).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("`Rust`"));
        assert!(message.contains("`rust`"));
    }

    #[test]
    fn test_unsluggable_tag_skipped() {
        let index = index_of(vec![article("one", (2024, 1, 5), &["!!!", "ok"])]);
        let resources = tag_pages("").manipulate(ResourceList::new(), &index).unwrap();
        assert_eq!(resources.paths().collect::<Vec<_>>(), vec!["tags/ok.html"]);
    }
}
