//! Resource list manipulators.
//!
//! Each manipulator is a pure step `(ResourceList, &CollectionIndex) ->
//! ResourceList`. They run in a fixed order:
//!
//! ```text
//! base list ─► tag ─► calendar ─► custom:<property>... ─► paginator
//! ```
//!
//! The paginator comes last so it sees every listing page the earlier
//! steps produced. A manipulator only adds resources it owns or flips
//! `ignored` on template sources. It starts by discarding what it added
//! on a previous pass, which makes re-running the chain over its own
//! output a no-op.

mod calendar;
mod custom;
mod paginator;
mod tag;

pub use calendar::CalendarPages;
pub use custom::CustomPages;
pub use paginator::Paginator;
pub use tag::TagPages;

use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::index::CollectionIndex;
use crate::resource::ResourceList;
use crate::template::normalize_path;

pub trait Manipulator: Send + Sync {
    /// Stable name; also the owner recorded on generated resources.
    fn name(&self) -> &str;

    fn manipulate(&self, resources: ResourceList, index: &CollectionIndex) -> Result<ResourceList>;
}

/// The standard chain for `config`, in execution order.
pub fn chain(config: &ResolvedConfig) -> Vec<Box<dyn Manipulator>> {
    let mut manipulators: Vec<Box<dyn Manipulator>> = vec![
        Box::new(TagPages::new(config)),
        Box::new(CalendarPages::new(config)),
    ];
    manipulators.extend(
        config
            .custom_collections
            .iter()
            .map(|collection| Box::new(CustomPages::new(collection, config.slug_mode)) as Box<dyn Manipulator>),
    );
    manipulators.push(Box::new(Paginator::new(config)));
    manipulators
}

/// Run `manipulators` in order.
pub fn run(
    manipulators: &[Box<dyn Manipulator>],
    mut resources: ResourceList,
    index: &CollectionIndex,
) -> Result<ResourceList> {
    for manipulator in manipulators {
        resources = manipulator.manipulate(resources, index)?;
    }
    Ok(resources)
}

/// Flag a render template's own source file as non-output.
fn ignore_template(resources: &mut ResourceList, template: Option<&str>) {
    if let Some(template) = template {
        resources.mark_ignored(&normalize_path(template));
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use crate::article::Article;
    use crate::index::CollectionIndex;
    use chrono::{FixedOffset, TimeZone};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    /// A published article dated `(y, m, d)` at midnight UTC.
    pub fn article(path: &str, (y, m, d): (i32, u32, u32), tags: &[&str]) -> Arc<Article> {
        with_front_matter(path, (y, m, d), tags, "")
    }

    pub fn with_front_matter(path: &str, (y, m, d): (i32, u32, u32), tags: &[&str], front_matter: &str) -> Arc<Article> {
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(y, m, d, 0, 0, 0)
            .unwrap();
        Arc::new(Article {
            source_path: path.into(),
            date,
            title: path.into(),
            slug: path.into(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            custom: BTreeMap::new(),
            published: true,
            language: None,
            permalink: format!("{path}.html"),
            summary: None,
            layout: "layout".into(),
            body: String::new(),
            front_matter: toml::from_str(front_matter).unwrap(),
        })
    }

    pub fn index_of(articles: Vec<Arc<Article>>) -> CollectionIndex {
        index_with(articles, &[])
    }

    pub fn index_with(articles: Vec<Arc<Article>>, properties: &[&str]) -> CollectionIndex {
        let properties: Vec<String> = properties.iter().map(|p| (*p).to_owned()).collect();
        CollectionIndex::build(&articles, &properties)
    }
}
