//! Filesystem source provider.

use super::{SourceProvider, SourceResource, front_matter};
use crate::log;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Walks a content directory and reads every visible file.
///
/// Logical paths drop a trailing template-language extension, so
/// `2024-01-05-hello.html.md` is offered as `2024-01-05-hello.html`.
/// Files that are not UTF-8 (images, fonts) are passed through with empty
/// front matter and body. Malformed front matter does not stop the walk;
/// the file is handed on with [`SourceResource::front_matter_error`] set.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, entry: &DirEntry) -> Result<SourceResource> {
        let path = entry.path();
        let relative = path
            .strip_prefix(&self.root)
            .with_context(|| format!("`{}` is outside the content root", path.display()))?;
        let logical = logical_path(relative);

        let bytes = fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
        match String::from_utf8(bytes) {
            Ok(content) => Ok(SourceResource::parse_lenient(logical, &content)),
            Err(_) => Ok(SourceResource::new(logical)),
        }
    }
}

impl SourceProvider for FsSource {
    fn sources(&self) -> Result<Vec<SourceResource>> {
        let mut sources = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry.with_context(|| format!("failed to walk `{}`", self.root.display()))?;
            if entry.file_type().is_file() {
                sources.push(self.read(&entry)?);
            }
        }

        log!("source"; "{} files under {}", sources.len(), self.root.display());
        Ok(sources)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// `/`-separated relative path with a template-language extension removed.
fn logical_path(relative: &Path) -> String {
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let (dir, file) = match joined.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, joined.as_str()),
    };

    // "name.html.md" → "name.html"; "name.md" and "name" are kept.
    let file = match file.rsplit_once('.') {
        Some((stem, _)) if stem.contains('.') && !stem.starts_with('.') => stem,
        _ => file,
    };

    match dir {
        Some(dir) => format!("{dir}/{file}"),
        None => file.to_owned(),
    }
}
