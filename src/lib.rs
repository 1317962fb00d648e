//! almanac - derived pages for dated, tagged content.
//!
//! Given source resources with TOML front matter, almanac decides which
//! output resources exist and at what path: one per article at its
//! permalink, plus tag pages, year/month/day archives, custom collection
//! pages and paginated listings. Rendering is left to the host.
//!
//! # Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`template`] | `{token}` path templates, slugs, prefix joining |
//! | [`config`] | `almanac.toml`, validation and normalization |
//! | [`source`] | source resources and providers |
//! | [`article`] | article metadata and permalinks |
//! | [`index`] | tag, calendar and custom groupings |
//! | [`resource`] | the resource list and collision detection |
//! | [`manipulator`] | tag, calendar, custom and paginator steps |
//! | [`pipeline`] | [`Blog`](pipeline::Blog) handle and snapshots |
//! | [`scaffold`] | new-article files |
//!
//! # Example
//!
//! ```ignore
//! let blog = Blog::initialize(BlogConfig::from_str(&toml)?)?;
//! let snapshot = blog.attach(&FsSource::new("content"))?;
//! for resource in snapshot.resources.outputs() {
//!     println!("{}", resource.path);
//! }
//! ```

pub mod logger;

pub mod article;
pub mod config;
pub mod error;
pub mod index;
pub mod manipulator;
pub mod pipeline;
pub mod resource;
pub mod scaffold;
pub mod source;
pub mod template;

pub use config::BlogConfig;
pub use error::{BlogError, Result};
pub use pipeline::{Blog, Snapshot};
