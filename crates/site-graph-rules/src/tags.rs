//! Tag assignment from per-tag rule lists.
//!
//! Each tag owns its own rule list. A `!` rule only removes its own tag, and
//! frontmatter tags are added on top of whatever the rules produce.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::rule_list::RuleList;

/// Tag name to rule list, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRules {
    entries: Vec<(String, RuleList)>,
}

impl TagRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag's rules. Redeclaring a tag replaces its rules in place.
    pub fn insert(&mut self, tag: impl Into<String>, rules: RuleList) {
        let tag = tag.into();
        match self.entries.iter_mut().find(|(name, _)| *name == tag) {
            Some((_, existing)) => *existing = rules,
            None => self.entries.push((tag, rules)),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&RuleList> {
        self.entries
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, rules)| rules)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleList)> {
        self.entries.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    /// Tags whose rules include `candidate`, in declaration order.
    pub fn matching_tags<'a>(&'a self, candidate: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter()
            .filter(move |(_, rules)| rules.evaluate(candidate, false))
            .map(|(name, _)| name)
    }
}

/// Compute the tags of `candidate`.
///
/// The result has no duplicates: rule-derived tags come first in declaration
/// order, followed by frontmatter tags that are not already present.
pub fn assign_tags<S: AsRef<str>>(
    tag_rules: &TagRules,
    candidate: &str,
    frontmatter_tags: &[S],
) -> Vec<String> {
    let mut tags: Vec<String> = tag_rules
        .matching_tags(candidate)
        .map(str::to_string)
        .collect();

    for tag in frontmatter_tags {
        let tag = tag.as_ref();
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    tags
}

impl<K: Into<String>> FromIterator<(K, RuleList)> for TagRules {
    fn from_iter<I: IntoIterator<Item = (K, RuleList)>>(iter: I) -> Self {
        let mut tag_rules = TagRules::new();
        for (tag, rules) in iter {
            tag_rules.insert(tag, rules);
        }
        tag_rules
    }
}

impl Serialize for TagRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (tag, rules) in &self.entries {
            map.serialize_entry(tag, rules)?;
        }
        map.end()
    }
}

struct TagRulesVisitor;

impl<'de> Visitor<'de> for TagRulesVisitor {
    type Value = TagRules;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of tag names to rule lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TagRules, A::Error> {
        let mut tag_rules = TagRules::new();
        while let Some((tag, rules)) = access.next_entry::<String, RuleList>()? {
            tag_rules.insert(tag, rules);
        }
        Ok(tag_rules)
    }
}

impl<'de> Deserialize<'de> for TagRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TagRulesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_rules(entries: Vec<(&str, Vec<&str>)>) -> TagRules {
        entries
            .into_iter()
            .map(|(tag, rules)| (tag, RuleList::new(rules)))
            .collect()
    }

    #[test]
    fn test_rule_tags_union_frontmatter_tags() {
        let rules = tag_rules(vec![("api", vec!["api/**"])]);
        let tags = assign_tags(&rules, "api/intro", &["custom"]);
        assert_eq!(tags, vec!["api", "custom"]);
    }

    #[test]
    fn test_no_match_keeps_frontmatter_only() {
        let rules = tag_rules(vec![("api", vec!["api/**"])]);
        let tags = assign_tags(&rules, "guides/intro", &["custom"]);
        assert_eq!(tags, vec!["custom"]);
    }

    #[test]
    fn test_negation_removes_only_own_tag() {
        let rules = tag_rules(vec![
            ("secret", vec!["**/*", "!public/**"]),
            ("docs", vec!["**/*"]),
        ]);
        let tags = assign_tags::<&str>(&rules, "public/readme", &[]);
        assert_eq!(tags, vec!["docs"]);

        let tags = assign_tags::<&str>(&rules, "internal/keys", &[]);
        assert_eq!(tags, vec!["secret", "docs"]);
    }

    #[test]
    fn test_frontmatter_tags_are_never_removed() {
        let rules = tag_rules(vec![("secret", vec!["**/*", "!public/**"])]);
        let tags = assign_tags(&rules, "public/readme", &["secret"]);
        assert_eq!(tags, vec!["secret"]);
    }

    #[test]
    fn test_result_has_no_duplicates() {
        let rules = tag_rules(vec![("api", vec!["api/**"]), ("ref", vec!["**/*"])]);
        let tags = assign_tags(&rules, "api/users", &["ref", "api", "extra", "extra"]);
        assert_eq!(tags, vec!["api", "ref", "extra"]);
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let rules = tag_rules(vec![("zeta", vec!["**/*"]), ("alpha", vec!["**/*"])]);
        let tags = assign_tags::<&str>(&rules, "page", &[]);
        assert_eq!(tags, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_redeclared_tag_replaces_rules() {
        let mut rules = TagRules::new();
        rules.insert("api", RuleList::new(["api/**"]));
        rules.insert("api", RuleList::new(["reference/**"]));
        assert_eq!(rules.len(), 1);
        assert!(assign_tags::<&str>(&rules, "api/x", &[]).is_empty());
        assert_eq!(assign_tags::<&str>(&rules, "reference/x", &[]), vec!["api"]);
    }

    #[test]
    fn test_serde_keeps_order() {
        let json = r#"{"zeta":["**/*"],"alpha":["api/**"]}"#;
        let rules: TagRules = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = rules.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(serde_json::to_string(&rules).unwrap(), json);
    }
}
