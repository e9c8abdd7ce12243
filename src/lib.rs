//! Site graph rules and configuration
//!
//! This crate validates the site graph configuration of a documentation
//! site and decides, from ordered glob rule lists and per-page frontmatter,
//! which pages become graph nodes, which links become edges, which pages
//! show a backlinks panel and which tags each page carries.

pub mod config;
pub mod engine;
pub mod explain;
pub mod sitemap;
pub mod starlight;

pub use config::{validate, ConfigError, SiteGraphConfig, ValidationErrors};
pub use engine::{PageFrontmatter, RuleEngine};
pub use explain::{DecisionKind, ExplainOutput};
pub use sitemap::{PageInput, Sitemap, SitemapBuilder, SitemapEntry};
