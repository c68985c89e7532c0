//! Static site generator for lectern documentation.
//!
//! Renders every markdown page under the configured source directory through
//! the resolved theme and writes a deployable site: pages, assets, search
//! index, sitemap and a not-found page.

pub mod assets;
pub mod builder;
pub mod search;
pub mod sitemap;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
