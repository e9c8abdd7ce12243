//! Built-in defaults
//!
//! The defaults form the lowest configuration layer. Config files are merged
//! on top of them, so an absent field takes its default while a present
//! field (even `null`) is validated as given.

use serde_json::{json, Value};

/// Default content directory the sitemap is generated from
pub const DEFAULT_CONTENT_ROOT: &str = "./src/content/docs";

/// Default rule list: include everything
pub const DEFAULT_RULES: &[&str] = &["**/*"];

/// Built-in default values
#[derive(Debug, Clone)]
pub struct BuiltinDefaults {
    /// Content root directory (default: "./src/content/docs")
    pub content_root: String,

    /// Keep links to external websites (default: false)
    pub include_external_links: bool,

    /// Drop host chrome links from the graph (default: true)
    pub ignore_starlight_links: bool,

    /// Page inclusion rules (default: ["**/*"])
    pub page_inclusion_rules: Vec<String>,

    /// Link inclusion rules (default: ["**/*"])
    pub link_inclusion_rules: Vec<String>,

    /// Backlinks panel visibility rules (default: ["**/*"])
    pub visibility_rules: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        let rules: Vec<String> = DEFAULT_RULES.iter().map(|s| s.to_string()).collect();
        Self {
            content_root: DEFAULT_CONTENT_ROOT.to_string(),
            include_external_links: false,
            ignore_starlight_links: true,
            page_inclusion_rules: rules.clone(),
            link_inclusion_rules: rules.clone(),
            visibility_rules: rules,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to a raw configuration value for merging
    pub fn to_value(&self) -> Value {
        json!({
            "sitemapConfig": {
                "contentRoot": self.content_root,
                "includeExternalLinks": self.include_external_links,
                "pageTitles": {},
                "ignoreStarlightLinks": self.ignore_starlight_links,
                "pageInclusionRules": self.page_inclusion_rules,
                "linkInclusionRules": self.link_inclusion_rules,
                "tagRules": {}
            },
            "backlinksConfig": {
                "visibilityRules": self.visibility_rules
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.content_root, "./src/content/docs");
        assert!(!defaults.include_external_links);
        assert!(defaults.ignore_starlight_links);
        assert_eq!(defaults.page_inclusion_rules, vec!["**/*"]);
        assert_eq!(defaults.visibility_rules, vec!["**/*"]);
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();

        assert_eq!(value["sitemapConfig"]["contentRoot"], "./src/content/docs");
        assert_eq!(value["sitemapConfig"]["includeExternalLinks"], false);
        assert_eq!(value["sitemapConfig"]["linkInclusionRules"][0], "**/*");
        assert!(value["sitemapConfig"]["tagRules"].as_object().unwrap().is_empty());
        assert!(value["sitemapConfig"].get("sitemap").is_none());
        assert_eq!(value["backlinksConfig"]["visibilityRules"][0], "**/*");
    }
}
