//! Sitemap types
//!
//! A sitemap maps page keys to nodes of the site graph. Forward links and
//! backlinks describe the same edges: B lists A as a backlink iff A links to
//! B, so either direction can be derived from the other.

mod builder;

pub use builder::{PageInput, SitemapBuilder};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One node of the site graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    /// Whether the node is outside the website
    pub external: bool,

    /// Whether the node resolves to a page (false for unresolved links)
    pub exists: bool,

    /// Display title
    pub title: String,

    /// Outgoing links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,

    /// Incoming links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backlinks: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl SitemapEntry {
    /// A page of the site
    pub fn page(title: impl Into<String>) -> Self {
        Self {
            external: false,
            exists: true,
            title: title.into(),
            links: None,
            backlinks: None,
            tags: None,
        }
    }

    /// A link target inside the site with no page behind it
    pub fn unresolved(title: impl Into<String>) -> Self {
        Self {
            exists: false,
            ..Self::page(title)
        }
    }

    /// A link target on another website
    pub fn external(title: impl Into<String>) -> Self {
        Self {
            external: true,
            ..Self::page(title)
        }
    }
}

/// Page key -> node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sitemap {
    entries: BTreeMap<String, SitemapEntry>,
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, entry: SitemapEntry) -> Option<SitemapEntry> {
        self.entries.insert(key.into(), entry)
    }

    pub fn get(&self, key: &str) -> Option<&SitemapEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SitemapEntry> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SitemapEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fill every node's backlinks from all nodes' forward links.
    ///
    /// Links to keys missing from the map are ignored. Backlinks are sorted
    /// and deduplicated; nodes nobody links to get an empty list.
    pub fn derive_backlinks(&mut self) {
        let inverted = self.invert(|entry| entry.links.as_deref());
        for (key, entry) in self.entries.iter_mut() {
            let sources = inverted.get(key).cloned().unwrap_or_default();
            entry.backlinks = Some(sources.into_iter().collect());
        }
    }

    /// Fill every node's forward links from all nodes' backlinks.
    pub fn derive_links(&mut self) {
        let inverted = self.invert(|entry| entry.backlinks.as_deref());
        for (key, entry) in self.entries.iter_mut() {
            let targets = inverted.get(key).cloned().unwrap_or_default();
            entry.links = Some(targets.into_iter().collect());
        }
    }

    fn invert<F>(&self, edges: F) -> BTreeMap<String, BTreeSet<String>>
    where
        F: Fn(&SitemapEntry) -> Option<&[String]>,
    {
        let mut inverted: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (key, entry) in &self.entries {
            for other in edges(entry).unwrap_or_default() {
                if self.entries.contains_key(other) {
                    inverted
                        .entry(other.clone())
                        .or_default()
                        .insert(key.clone());
                }
            }
        }
        inverted
    }
}

impl FromIterator<(String, SitemapEntry)> for Sitemap {
    fn from_iter<I: IntoIterator<Item = (String, SitemapEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn linked(title: &str, links: &[&str]) -> SitemapEntry {
        SitemapEntry {
            links: Some(links.iter().map(|s| s.to_string()).collect()),
            ..SitemapEntry::page(title)
        }
    }

    #[test]
    fn test_derive_backlinks() {
        let mut sitemap = Sitemap::new();
        sitemap.insert("a", linked("A", &["b", "c"]));
        sitemap.insert("b", linked("B", &["c", "c"]));
        sitemap.insert("c", linked("C", &[]));

        sitemap.derive_backlinks();

        assert_eq!(sitemap.get("a").unwrap().backlinks, Some(vec![]));
        assert_eq!(sitemap.get("b").unwrap().backlinks, Some(vec!["a".to_string()]));
        assert_eq!(
            sitemap.get("c").unwrap().backlinks,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_links_to_missing_keys_are_ignored() {
        let mut sitemap = Sitemap::new();
        sitemap.insert("a", linked("A", &["nowhere"]));
        sitemap.derive_backlinks();

        assert_eq!(sitemap.len(), 1);
        assert_eq!(sitemap.get("a").unwrap().backlinks, Some(vec![]));
    }

    #[test]
    fn test_derive_links_inverts_backlinks() {
        let mut sitemap = Sitemap::new();
        sitemap.insert("a", SitemapEntry::page("A"));
        sitemap.insert(
            "b",
            SitemapEntry {
                backlinks: Some(vec!["a".to_string()]),
                ..SitemapEntry::page("B")
            },
        );

        sitemap.derive_links();

        assert_eq!(sitemap.get("a").unwrap().links, Some(vec!["b".to_string()]));
        assert_eq!(sitemap.get("b").unwrap().links, Some(vec![]));
    }

    #[test]
    fn test_entry_constructors() {
        let unresolved = SitemapEntry::unresolved("Missing");
        assert!(!unresolved.exists);
        assert!(!unresolved.external);

        let external = SitemapEntry::external("https://astro.build");
        assert!(external.external);
        assert!(external.exists);
    }

    #[test]
    fn test_serialization_omits_absent_lists() {
        let mut sitemap = Sitemap::new();
        sitemap.insert("intro", SitemapEntry::page("Introduction"));
        let value = serde_json::to_value(&sitemap).unwrap();
        assert_eq!(
            value,
            json!({"intro": {"external": false, "exists": true, "title": "Introduction"}})
        );

        let parsed: Sitemap = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, sitemap);
    }
}
