//! Source resources: the raw input of every rebuild.
//!
//! The pipeline never reads files. A [`SourceProvider`] hands it the
//! current list of [`SourceResource`]s (path + front matter + body); each
//! batch is the new ground truth. [`FsSource`] is the filesystem provider
//! used by the CLI; hosts embedding the library bring their own.

pub mod front_matter;
mod fs;

pub use fs::FsSource;

use anyhow::Result;

/// One source item as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceResource {
    /// Logical path relative to the source root, `/`-separated
    /// (e.g. `2024-01-05-hello.html`).
    pub path: String,
    pub front_matter: toml::Table,
    pub body: String,
    /// Set when the file had front matter that could not be parsed. The
    /// pipeline skips such a source instead of failing the rebuild.
    pub front_matter_error: Option<String>,
}

impl SourceResource {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Build from raw file content, splitting off `+++` front matter.
    pub fn parse(path: impl Into<String>, content: &str) -> Result<Self> {
        let (front_matter, body) = front_matter::split(content)?;
        Ok(Self {
            path: path.into(),
            front_matter,
            body: body.to_owned(),
            front_matter_error: None,
        })
    }

    /// Like [`parse`](Self::parse), but a malformed front matter block is
    /// kept on the resource as [`front_matter_error`](Self::front_matter_error).
    pub fn parse_lenient(path: impl Into<String>, content: &str) -> Self {
        let path = path.into();
        Self::parse(path.clone(), content).unwrap_or_else(|err| Self {
            front_matter_error: Some(format!("{err:#}")),
            ..Self::new(path)
        })
    }

    pub fn with_front_matter(mut self, front_matter: toml::Table) -> Self {
        self.front_matter = front_matter;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.front_matter.get(key).and_then(toml::Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.front_matter.get(key).and_then(toml::Value::as_bool)
    }
}

/// Supplies the current source list.
///
/// Called once per rebuild; the host re-invokes the pipeline whenever its
/// watched set changes.
pub trait SourceProvider {
    fn sources(&self) -> Result<Vec<SourceResource>>;
}

/// An in-memory list is its own provider.
impl SourceProvider for [SourceResource] {
    fn sources(&self) -> Result<Vec<SourceResource>> {
        Ok(self.to_vec())
    }
}

impl SourceProvider for Vec<SourceResource> {
    fn sources(&self) -> Result<Vec<SourceResource>> {
        Ok(self.clone())
    }
}
