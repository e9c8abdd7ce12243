//! Raw configuration validation
//!
//! Walks an untyped configuration value, applies defaults for absent fields,
//! and records every violation instead of stopping at the first one. Either
//! the whole config is valid and returned, or a single
//! [`ConfigError::Invalid`] lists everything that is wrong.
//!
//! Field paths are dotted, with bracketed indices for array elements:
//! `sitemapConfig.tagRules.api[1]`.

use serde_json::{Map, Value};
use site_graph_rules::{RuleList, TagRules};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::error::{ConfigError, ValidationErrors};
use super::schema::{BacklinksConfig, SiteGraphConfig, SitemapConfig};
use crate::sitemap::{Sitemap, SitemapEntry};

const ROOT_KEYS: &[&str] = &["sitemapConfig", "backlinksConfig"];

const SITEMAP_CONFIG_KEYS: &[&str] = &[
    "contentRoot",
    "includeExternalLinks",
    "sitemap",
    "pageTitles",
    "ignoreStarlightLinks",
    "pageInclusionRules",
    "linkInclusionRules",
    "tagRules",
];

const BACKLINKS_CONFIG_KEYS: &[&str] = &["visibilityRules"];

const SITEMAP_ENTRY_KEYS: &[&str] = &["external", "exists", "title", "links", "backlinks", "tags"];

/// Validate a raw configuration and apply defaults.
///
/// A `null` root is treated as "no options given" and yields the defaults;
/// `null` anywhere else is a type mismatch.
pub fn validate(raw: &Value) -> Result<SiteGraphConfig, ConfigError> {
    let mut validator = Validator::default();
    let config = match raw {
        Value::Null => SiteGraphConfig::default(),
        raw => validator.site_graph_config(raw),
    };

    if validator.errors.is_empty() {
        debug!("site graph configuration is valid");
        Ok(config)
    } else {
        debug!(errors = validator.errors.len(), "site graph configuration is invalid");
        Err(ConfigError::Invalid(validator.errors))
    }
}

/// Name of a value's type as shown in messages
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}

/// Error collector. Every helper records its own violations and returns
/// `None` for a value it could not accept.
#[derive(Default)]
struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    fn push(&mut self, path: &str, message: String) {
        if path.is_empty() {
            self.errors.push_form(message);
        } else {
            self.errors.push_field(path, message);
        }
    }

    fn mismatch(&mut self, path: &str, expected: &str, value: &Value) {
        self.push(
            path,
            format!("Expected {}, received {}", expected, type_name(value)),
        );
    }

    fn object<'v>(
        &mut self,
        path: &str,
        value: &'v Value,
        known: &[&str],
    ) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => {
                for key in map.keys().filter(|k| !known.contains(&k.as_str())) {
                    warn!(field = %child(path, key), "ignoring unknown configuration key");
                }
                Some(map)
            }
            other => {
                self.mismatch(path, "object", other);
                None
            }
        }
    }

    fn string(&mut self, path: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.mismatch(path, "string", other);
                None
            }
        }
    }

    fn boolean(&mut self, path: &str, value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            other => {
                self.mismatch(path, "boolean", other);
                None
            }
        }
    }

    /// An array of strings; every bad element is reported
    fn string_list(&mut self, path: &str, value: &Value) -> Option<Vec<String>> {
        let Value::Array(items) = value else {
            self.mismatch(path, "array", value);
            return None;
        };

        let mut strings = Vec::with_capacity(items.len());
        let mut valid = true;
        for (i, item) in items.iter().enumerate() {
            match self.string(&index(path, i), item) {
                Some(s) => strings.push(s),
                None => valid = false,
            }
        }
        valid.then_some(strings)
    }

    fn rule_list(&mut self, path: &str, value: &Value) -> Option<RuleList> {
        self.string_list(path, value).map(RuleList::new)
    }

    fn required<'v>(
        &mut self,
        map: &'v Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<&'v Value> {
        let value = map.get(key);
        if value.is_none() {
            self.errors.push_field(child(path, key), "Required");
        }
        value
    }

    fn site_graph_config(&mut self, value: &Value) -> SiteGraphConfig {
        let mut config = SiteGraphConfig::default();
        let Some(root) = self.object("", value, ROOT_KEYS) else {
            return config;
        };

        if let Some(v) = root.get("sitemapConfig") {
            config.sitemap_config = self.sitemap_config("sitemapConfig", v);
        }
        if let Some(v) = root.get("backlinksConfig") {
            config.backlinks_config = self.backlinks_config("backlinksConfig", v);
        }
        config
    }

    fn sitemap_config(&mut self, path: &str, value: &Value) -> SitemapConfig {
        let mut config = SitemapConfig::default();
        let Some(map) = self.object(path, value, SITEMAP_CONFIG_KEYS) else {
            return config;
        };

        if let Some(v) = map.get("contentRoot") {
            if let Some(s) = self.string(&child(path, "contentRoot"), v) {
                config.content_root = s;
            }
        }
        if let Some(v) = map.get("includeExternalLinks") {
            if let Some(b) = self.boolean(&child(path, "includeExternalLinks"), v) {
                config.include_external_links = b;
            }
        }
        if let Some(v) = map.get("sitemap") {
            config.sitemap = self.sitemap(&child(path, "sitemap"), v);
        }
        if let Some(v) = map.get("pageTitles") {
            if let Some(titles) = self.page_titles(&child(path, "pageTitles"), v) {
                config.page_titles = titles;
            }
        }
        if let Some(v) = map.get("ignoreStarlightLinks") {
            if let Some(b) = self.boolean(&child(path, "ignoreStarlightLinks"), v) {
                config.ignore_starlight_links = b;
            }
        }
        if let Some(v) = map.get("pageInclusionRules") {
            if let Some(rules) = self.rule_list(&child(path, "pageInclusionRules"), v) {
                config.page_inclusion_rules = rules;
            }
        }
        if let Some(v) = map.get("linkInclusionRules") {
            if let Some(rules) = self.rule_list(&child(path, "linkInclusionRules"), v) {
                config.link_inclusion_rules = rules;
            }
        }
        if let Some(v) = map.get("tagRules") {
            if let Some(tag_rules) = self.tag_rules(&child(path, "tagRules"), v) {
                config.tag_rules = tag_rules;
            }
        }

        config
    }

    fn backlinks_config(&mut self, path: &str, value: &Value) -> BacklinksConfig {
        let mut config = BacklinksConfig::default();
        let Some(map) = self.object(path, value, BACKLINKS_CONFIG_KEYS) else {
            return config;
        };

        if let Some(v) = map.get("visibilityRules") {
            if let Some(rules) = self.rule_list(&child(path, "visibilityRules"), v) {
                config.visibility_rules = rules;
            }
        }
        config
    }

    fn page_titles(&mut self, path: &str, value: &Value) -> Option<BTreeMap<String, String>> {
        let Value::Object(map) = value else {
            self.mismatch(path, "object", value);
            return None;
        };

        let mut titles = BTreeMap::new();
        let mut valid = true;
        for (key, title) in map {
            match self.string(&child(path, key), title) {
                Some(title) => {
                    titles.insert(key.clone(), title);
                }
                None => valid = false,
            }
        }
        valid.then_some(titles)
    }

    fn tag_rules(&mut self, path: &str, value: &Value) -> Option<TagRules> {
        let Value::Object(map) = value else {
            self.mismatch(path, "object", value);
            return None;
        };

        let mut tag_rules = TagRules::new();
        let mut valid = true;
        for (tag, rules) in map {
            match self.rule_list(&child(path, tag), rules) {
                Some(rules) => tag_rules.insert(tag.clone(), rules),
                None => valid = false,
            }
        }
        valid.then_some(tag_rules)
    }

    fn sitemap(&mut self, path: &str, value: &Value) -> Option<Sitemap> {
        let Value::Object(map) = value else {
            self.mismatch(path, "object", value);
            return None;
        };

        let mut sitemap = Sitemap::new();
        let mut valid = true;
        for (key, entry) in map {
            match self.sitemap_entry(&child(path, key), entry) {
                Some(entry) => {
                    sitemap.insert(key.clone(), entry);
                }
                None => valid = false,
            }
        }
        valid.then_some(sitemap)
    }

    fn sitemap_entry(&mut self, path: &str, value: &Value) -> Option<SitemapEntry> {
        let map = self.object(path, value, SITEMAP_ENTRY_KEYS)?;
        let before = self.errors.len();

        let external = self
            .required(map, path, "external")
            .and_then(|v| self.boolean(&child(path, "external"), v));
        let exists = self
            .required(map, path, "exists")
            .and_then(|v| self.boolean(&child(path, "exists"), v));
        let title = self
            .required(map, path, "title")
            .and_then(|v| self.string(&child(path, "title"), v));

        let mut optional_list = |key: &str| -> Option<Vec<String>> {
            map.get(key)
                .and_then(|v| self.string_list(&child(path, key), v))
        };
        let links = optional_list("links");
        let backlinks = optional_list("backlinks");
        let tags = optional_list("tags");

        if self.errors.len() != before {
            return None;
        }

        Some(SitemapEntry {
            external: external?,
            exists: exists?,
            title: title?,
            links,
            backlinks,
            tags,
        })
    }
}
