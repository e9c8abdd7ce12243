//! Rule verdicts combined with per-page overrides.
//!
//! A page's frontmatter always has the final say: when it sets a value, the
//! rule list is not consulted.

use serde::Serialize;

use crate::rule_list::RuleList;

/// Pick the frontmatter override when present, otherwise the rule verdict.
pub fn resolve(rule_verdict: bool, frontmatter_override: Option<bool>) -> bool {
    frontmatter_override.unwrap_or(rule_verdict)
}

/// Where a decision came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionSource {
    /// The page frontmatter set the value.
    Override,
    /// A rule matched.
    Rule { index: usize, pattern: String },
    /// Nothing matched and no override was set.
    Default,
    /// The candidate was rejected before any rule ran.
    Filtered { reason: String },
}

/// A verdict together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub verdict: bool,
    pub source: DecisionSource,
}

impl Decision {
    /// Decide `candidate` against `rules`, letting `frontmatter_override` win.
    pub fn decide(
        rules: &RuleList,
        candidate: &str,
        default: bool,
        frontmatter_override: Option<bool>,
    ) -> Self {
        if let Some(verdict) = frontmatter_override {
            return Self {
                verdict,
                source: DecisionSource::Override,
            };
        }

        match rules.decisive_rule(candidate) {
            Some(m) => Self {
                verdict: m.verdict(),
                source: DecisionSource::Rule {
                    index: m.index,
                    pattern: m.pattern.as_str().to_string(),
                },
            },
            None => Self {
                verdict: default,
                source: DecisionSource::Default,
            },
        }
    }
}
