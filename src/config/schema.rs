//! Typed site graph configuration
//!
//! These types are only built by `validate`, which applies
//! every default. They serialize back to the raw shape they were read from,
//! so a validated config can be validated again without change.

use serde::Serialize;
use site_graph_rules::{RuleList, TagRules};
use std::collections::BTreeMap;

use super::defaults::BuiltinDefaults;
use crate::sitemap::Sitemap;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteGraphConfig {
    /// Sitemap generation
    pub sitemap_config: SitemapConfig,

    /// Backlinks sidebar panel
    pub backlinks_config: BacklinksConfig,
}

/// Sitemap generation settings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapConfig {
    /// Directory whose content the sitemap is generated from
    pub content_root: String,

    /// Keep links going to external websites
    pub include_external_links: bool,

    /// Explicit sitemap; when set, the generation rules are not used to
    /// build the map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sitemap: Option<Sitemap>,

    /// Full page or link path -> node title.
    /// Beats the derived title, loses to the page's frontmatter title.
    pub page_titles: BTreeMap<String, String>,

    /// Drop root, social, edit, credits, and pagination links the host
    /// theme renders on every page
    pub ignore_starlight_links: bool,

    /// Which content files become pages, matched on the file path
    pub page_inclusion_rules: RuleList,

    /// Which links of a page are kept, matched on the link target
    pub link_inclusion_rules: RuleList,

    /// Tag name -> rules selecting the pages that carry it
    pub tag_rules: TagRules,
}

/// Backlinks panel settings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinksConfig {
    /// Which pages show the backlinks panel, matched on the page slug
    pub visibility_rules: RuleList,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            content_root: defaults.content_root,
            include_external_links: defaults.include_external_links,
            sitemap: None,
            page_titles: BTreeMap::new(),
            ignore_starlight_links: defaults.ignore_starlight_links,
            page_inclusion_rules: RuleList::new(defaults.page_inclusion_rules),
            link_inclusion_rules: RuleList::new(defaults.link_inclusion_rules),
            tag_rules: TagRules::new(),
        }
    }
}

impl Default for BacklinksConfig {
    fn default() -> Self {
        Self {
            visibility_rules: RuleList::new(BuiltinDefaults::default().visibility_rules),
        }
    }
}
