//! Site graph configuration
//!
//! Raw configuration comes in as JSON or TOML, is layered over the built-in
//! defaults, then validated into a [`SiteGraphConfig`]:
//! 1. Built-in defaults
//! 2. Each config file, in order
//!
//! Validation reports every problem at once, or returns the typed config.

mod defaults;
mod error;
mod loader;
mod merge;
mod schema;
mod validate;

pub use defaults::{BuiltinDefaults, DEFAULT_CONTENT_ROOT, DEFAULT_RULES};
pub use error::{ConfigError, ValidationErrors};
pub use loader::{load_config, load_file, load_layers};
pub use merge::{deep_merge, merge_layers};
pub use schema::{BacklinksConfig, SiteGraphConfig, SitemapConfig};
pub use validate::validate;
