use super::{Manipulator, ignore_template};
use crate::config::{CalendarLevel, ResolvedConfig};
use crate::error::Result;
use crate::index::{Articles, CollectionIndex};
use crate::resource::{Listing, ListingSubject, Resource, ResourceKind, ResourceList};
use crate::template::{TokenMap, normalize_path};

/// Year, month and day archive pages.
///
/// Emitted newest period first, each year followed by its months and each
/// month by its days. The three levels are enabled independently.
#[derive(Debug, Clone)]
pub struct CalendarPages {
    year: CalendarLevel,
    month: CalendarLevel,
    day: CalendarLevel,
}

impl CalendarPages {
    pub const NAME: &'static str = "calendar";

    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            year: config.year.clone(),
            month: config.month.clone(),
            day: config.day.clone(),
        }
    }

    fn push(
        resources: &mut ResourceList,
        level: &CalendarLevel,
        kind: ResourceKind,
        (year, month, day): (i32, Option<u32>, Option<u32>),
        articles: &Articles,
    ) -> Result<()> {
        let subject = ListingSubject::Period { year, month, day };

        let mut tokens = TokenMap::from([("year".to_owned(), format!("{year:04}"))]);
        if let Some(month) = month {
            tokens.insert("month".to_owned(), format!("{month:02}"));
        }
        if let Some(day) = day {
            tokens.insert("day".to_owned(), format!("{day:02}"));
        }
        let path = level
            .link
            .render(&tokens)
            .map_err(|err| err.within(format!("{kind} page for {subject}")))?;

        resources.push_unique(
            Resource::synthetic(normalize_path(&path), Self::NAME, kind, level.template.clone())
                .with_listing(Listing::new(subject, articles.clone())),
        )
    }
}

impl Manipulator for CalendarPages {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn manipulate(&self, resources: ResourceList, index: &CollectionIndex) -> Result<ResourceList> {
        let mut resources = resources.retain_not_owned_by(Self::NAME);
        for level in [&self.year, &self.month, &self.day] {
            ignore_template(&mut resources, level.template.as_deref());
        }

        for (&year, archive) in index.by_calendar.iter().rev() {
            if self.year.enabled {
                Self::push(&mut resources, &self.year, ResourceKind::Year, (year, None, None), &archive.articles)?;
            }
            for (&month, archive) in archive.months.iter().rev() {
                if self.month.enabled {
                    Self::push(
                        &mut resources,
                        &self.month,
                        ResourceKind::Month,
                        (year, Some(month), None),
                        &archive.articles,
                    )?;
                }
                if !self.day.enabled {
                    continue;
                }
                for (&day, articles) in archive.days.iter().rev() {
                    Self::push(
                        &mut resources,
                        &self.day,
                        ResourceKind::Day,
                        (year, Some(month), Some(day)),
                        articles,
                    )?;
                }
            }
        }

        Ok(resources)
    }
}
