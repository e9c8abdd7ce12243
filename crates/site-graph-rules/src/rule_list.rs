//! Ordered rule lists.
//!
//! A rule list is evaluated **last-match-wins**: the last rule whose body
//! matches the candidate decides. A plain rule includes, a `!` rule excludes.
//! Authors therefore put the broad rule first and the exceptions after it:
//!
//! ```text
//! ["**/*", "!secret/**"]   secret/x -> excluded
//! ["!secret/**", "**/*"]   secret/x -> included (the broad rule comes last)
//! ```
//!
//! Rules that do not match the candidate never affect the outcome, and
//! duplicates or contradictions resolve purely by position.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::pattern::Pattern;

/// The rule that decided a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    /// Position of the rule in its list.
    pub index: usize,
    pub pattern: &'a Pattern,
}

impl RuleMatch<'_> {
    /// Verdict the rule produces: include unless it is negated.
    pub fn verdict(&self) -> bool {
        !self.pattern.is_negated()
    }
}

/// An ordered sequence of signed glob patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleList {
    rules: Vec<Pattern>,
}

impl RuleList {
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rules: rules.into_iter().map(Pattern::new).collect(),
        }
    }

    /// The rule list that includes everything.
    pub fn match_all() -> Self {
        Self::new(["**/*"])
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.rules.iter()
    }

    /// The rules as written.
    pub fn to_strings(&self) -> Vec<String> {
        self.rules.iter().map(|p| p.as_str().to_string()).collect()
    }

    /// Insert a rule at `index`, clamped to the end of the list.
    pub fn insert(&mut self, index: usize, rule: impl Into<String>) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, Pattern::new(rule));
    }

    pub fn push(&mut self, rule: impl Into<String>) {
        self.rules.push(Pattern::new(rule));
    }

    /// Find the rule that decides `candidate`: the last one whose body matches.
    pub fn decisive_rule(&self, candidate: &str) -> Option<RuleMatch<'_>> {
        self.rules
            .iter()
            .enumerate()
            .rev()
            .find(|(_, pattern)| pattern.matches_body(candidate))
            .map(|(index, pattern)| RuleMatch { index, pattern })
    }

    /// Verdict of the decisive rule, or `None` when no rule matches.
    pub fn verdict(&self, candidate: &str) -> Option<bool> {
        self.decisive_rule(candidate).map(|m| m.verdict())
    }

    /// Evaluate `candidate`, falling back to `default` when no rule matches.
    pub fn evaluate(&self, candidate: &str, default: bool) -> bool {
        self.verdict(candidate).unwrap_or(default)
    }
}

/// Evaluate raw rule strings against a candidate.
///
/// Compiles every rule on each call; prefer [`RuleList`] for repeated use.
pub fn evaluate<S: AsRef<str>>(rules: &[S], candidate: &str, default: bool) -> bool {
    rules
        .iter()
        .rev()
        .map(|rule| Pattern::new(rule.as_ref()))
        .find(|pattern| pattern.matches_body(candidate))
        .map(|pattern| !pattern.is_negated())
        .unwrap_or(default)
}

impl<S: Into<String>> FromIterator<S> for RuleList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a RuleList {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl Serialize for RuleList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rules.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Pattern>::deserialize(deserializer).map(|rules| Self { rules })
    }
}
