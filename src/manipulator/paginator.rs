use super::Manipulator;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::index::{Articles, CollectionIndex};
use crate::resource::{PageSlice, Resource, ResourceKind, ResourceList};
use crate::template::{Template, TokenMap, join_path, normalize_path};

/// Splits every listing into fixed-size pages.
///
/// Page 1 stays on the listing's own resource; page `k > 1` is a new
/// resource at `<path>/<page_link>`, so with the default `page/{num}` the
/// second page of `tags/a.html` is `tags/a.html/page/2`.
#[derive(Debug, Clone)]
pub struct Paginator {
    enabled: bool,
    per_page: usize,
    page_link: Template,
}

impl Paginator {
    pub const NAME: &'static str = "paginator";

    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            enabled: config.paginate,
            per_page: config.per_page,
            page_link: config.page_link.clone(),
        }
    }

    /// Path of page `number` of the listing at `path`.
    pub fn page_path(&self, path: &str, number: usize) -> Result<String> {
        if number == 1 {
            return Ok(path.to_owned());
        }
        let tokens = TokenMap::from([("num".to_owned(), number.to_string())]);
        let suffix = self
            .page_link
            .render(&tokens)
            .map_err(|err| err.within(format!("page {number} of `{path}`")))?;
        Ok(normalize_path(&join_path(path, &suffix)))
    }

    /// Slice `articles` into pages for the listing at `path`.
    ///
    /// An empty listing still has one (empty) page.
    pub fn paginate(&self, path: &str, articles: &Articles, per_page: usize) -> Result<Vec<PageSlice>> {
        let per_page = per_page.max(1);
        let total_items = articles.len();
        let total_pages = total_items.div_ceil(per_page).max(1);

        let paths = (1..=total_pages)
            .map(|number| self.page_path(path, number))
            .collect::<Result<Vec<_>>>()?;

        let slices = (0..total_pages)
            .map(|i| {
                let start = (i * per_page).min(total_items);
                let end = (start + per_page).min(total_items);
                PageSlice {
                    page_number: i + 1,
                    items: articles[start..end].to_vec(),
                    total_pages,
                    total_items,
                    per_page,
                    prev_path: i.checked_sub(1).map(|prev| paths[prev].clone()),
                    next_path: paths.get(i + 1).cloned(),
                    first_path: paths[0].clone(),
                }
            })
            .collect();
        Ok(slices)
    }
}

impl Manipulator for Paginator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn manipulate(&self, resources: ResourceList, _index: &CollectionIndex) -> Result<ResourceList> {
        let resources = resources.retain_not_owned_by(Self::NAME);
        if !self.enabled {
            return Ok(resources);
        }

        let mut paginated = ResourceList::new();
        for mut resource in resources {
            let Some(listing) = &resource.listing else {
                paginated.push_unique(resource)?;
                continue;
            };

            let per_page = listing.per_page.unwrap_or(self.per_page);
            let mut slices = self
                .paginate(&resource.path, &listing.articles, per_page)?
                .into_iter();
            let template_path = resource.template_path().map(str::to_owned);

            resource.page = slices.next();
            paginated.push_unique(resource)?;

            for slice in slices {
                let path = self.page_path(&slice.first_path, slice.page_number)?;
                paginated.push_unique(
                    Resource::synthetic(path, Self::NAME, ResourceKind::PaginatedPage, template_path.clone())
                        .with_page(slice),
                )?;
            }
        }

        Ok(paginated)
    }
}
