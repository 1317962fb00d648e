//! `[custom_collections]` table, kept in declaration order.
//!
//! ```toml
//! [custom_collections.category]
//! link = "/categories/{category}.html"
//! template = "category.html"
//!
//! [custom_collections.series]
//! link = "/series/{series}/index.html"
//! template = "series.html"
//! ```
//!
//! Manipulators are registered in the order collections are declared, so
//! the table is deserialized into a `Vec` rather than a sorted map.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One custom collection: where its pages go and how they are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomCollection {
    /// Link template; `{<property>}` is replaced by the slugged value.
    pub link: String,
    /// Render template reference handed to the host.
    pub template: String,
}

/// Property name → collection, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomCollections(Vec<(String, CustomCollection)>);

impl CustomCollections {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CustomCollection)> {
        self.0.iter().map(|(name, c)| (name.as_str(), c))
    }

    pub fn get(&self, property: &str) -> Option<&CustomCollection> {
        self.0
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, c)| c)
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add a collection; a later declaration of the same property replaces
    /// the earlier one in place.
    pub fn insert(&mut self, property: impl Into<String>, collection: CustomCollection) {
        let property = property.into();
        match self.0.iter_mut().find(|(name, _)| *name == property) {
            Some(slot) => slot.1 = collection,
            None => self.0.push((property, collection)),
        }
    }
}

impl Serialize for CustomCollections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, collection) in &self.0 {
            map.serialize_entry(name, collection)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CustomCollections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = CustomCollections;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of property = { link, template }")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut collections = CustomCollections::default();
                while let Some((name, collection)) =
                    access.next_entry::<String, CustomCollection>()?
                {
                    collections.insert(name, collection);
                }
                Ok(collections)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
