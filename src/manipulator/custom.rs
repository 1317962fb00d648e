use super::{Manipulator, ignore_template};
use crate::config::ResolvedCollection;
use crate::error::Result;
use crate::index::CollectionIndex;
use crate::log;
use crate::resource::{Listing, ListingSubject, Resource, ResourceKind, ResourceList};
use crate::template::{SlugMode, Template, TokenMap, normalize_path, slugify};

/// One listing page per distinct value of a front-matter property.
///
/// The link template receives the slugified value under the property's
/// own name, e.g. `{category}`.
#[derive(Debug, Clone)]
pub struct CustomPages {
    name: String,
    property: String,
    link: Template,
    template: String,
    slug_mode: SlugMode,
}

impl CustomPages {
    pub fn new(collection: &ResolvedCollection, slug_mode: SlugMode) -> Self {
        Self {
            name: format!("custom:{}", collection.property),
            property: collection.property.clone(),
            link: collection.link.clone(),
            template: collection.template.clone(),
            slug_mode,
        }
    }
}

impl Manipulator for CustomPages {
    fn name(&self) -> &str {
        &self.name
    }

    fn manipulate(&self, resources: ResourceList, index: &CollectionIndex) -> Result<ResourceList> {
        let mut resources = resources.retain_not_owned_by(&self.name);
        ignore_template(&mut resources, Some(&self.template));

        let Some(groups) = index.by_custom.get(&self.property) else {
            return Ok(resources);
        };

        for (value, articles) in groups {
            let slug = slugify(value, self.slug_mode);
            if slug.is_empty() {
                log!("skip"; "`{}` value `{value}` has no usable slug", self.property);
                continue;
            }
            let subject = ListingSubject::Custom {
                property: self.property.clone(),
                value: value.clone(),
            };
            let tokens = TokenMap::from([(self.property.clone(), slug)]);
            let path = self
                .link
                .render(&tokens)
                .map_err(|err| err.within(format!("page for {subject}")))?;

            resources.push_unique(
                Resource::synthetic(
                    normalize_path(&path),
                    self.name.as_str(),
                    ResourceKind::Custom,
                    Some(self.template.clone()),
                )
                .with_listing(Listing::new(subject, articles.clone())),
            )?;
        }

        Ok(resources)
    }
}
