//! Derived groupings of published articles.
//!
//! [`CollectionIndex::build`] is the only constructor; the pipeline runs it
//! from scratch on every rebuild. All sequences share one ordering (see
//! [`compare`]), so every view is deterministic regardless of the order the
//! sources arrived in.

use crate::article::Article;
use chrono::Datelike;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Ordered article sequence shared between views.
pub type Articles = Vec<Arc<Article>>;

/// Newest first; equal dates by source path ascending.
pub fn compare(a: &Article, b: &Article) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| a.source_path.cmp(&b.source_path))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearArchive {
    pub articles: Articles,
    pub months: BTreeMap<u32, MonthArchive>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthArchive {
    pub articles: Articles,
    pub days: BTreeMap<u32, Articles>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionIndex {
    /// Every published article.
    pub articles: Articles,
    pub by_tag: BTreeMap<String, Articles>,
    pub by_calendar: BTreeMap<i32, YearArchive>,
    /// Property → value → articles, for each configured custom collection.
    pub by_custom: BTreeMap<String, BTreeMap<String, Articles>>,
}

impl CollectionIndex {
    /// Group `articles`, dropping unpublished ones.
    ///
    /// `custom_properties` always get an entry in `by_custom`, empty when
    /// no article sets them.
    pub fn build<'a>(
        articles: impl IntoIterator<Item = &'a Arc<Article>>,
        custom_properties: &[String],
    ) -> Self {
        let mut published: Articles = articles
            .into_iter()
            .filter(|article| article.published)
            .cloned()
            .collect();
        published.sort_by(|a, b| compare(a, b));

        let mut index = Self {
            by_custom: custom_properties
                .iter()
                .map(|property| (property.clone(), BTreeMap::new()))
                .collect(),
            ..Self::default()
        };

        // Iterating in sorted order keeps every bucket sorted too.
        for article in &published {
            for tag in &article.tags {
                index
                    .by_tag
                    .entry(tag.clone())
                    .or_default()
                    .push(Arc::clone(article));
            }

            let date = article.date;
            let year = index.by_calendar.entry(date.year()).or_default();
            year.articles.push(Arc::clone(article));
            let month = year.months.entry(date.month()).or_default();
            month.articles.push(Arc::clone(article));
            month
                .days
                .entry(date.day())
                .or_default()
                .push(Arc::clone(article));

            for (property, groups) in &mut index.by_custom {
                for value in article.property_values(property) {
                    groups.entry(value).or_default().push(Arc::clone(article));
                }
            }
        }

        index.articles = published;
        index
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Articles of one calendar period; `None` for periods with none.
    pub fn period(&self, year: i32, month: Option<u32>, day: Option<u32>) -> Option<&Articles> {
        let archive = self.by_calendar.get(&year)?;
        let Some(month) = month else {
            return Some(&archive.articles);
        };
        let archive = archive.months.get(&month)?;
        match day {
            Some(day) => archive.days.get(&day),
            None => Some(&archive.articles),
        }
    }
}
