//! Explain command output
//!
//! Structured JSON and human-readable explanations of a single decision,
//! naming the rule list consulted and the rule (or override) that decided.

use serde::Serialize;
use site_graph_rules::{Decision, DecisionSource};
use std::fmt;
use std::str::FromStr;

use crate::engine::{link_candidate, PageFrontmatter, RuleEngine};

/// Which decision to explain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Page inclusion, candidate is a content file path
    Page,
    /// Link inclusion, candidate is a link target
    Link,
    /// Backlinks panel visibility, candidate is a page slug
    Backlinks,
    /// Tag assignment, candidate is a content file path
    Tags,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecisionKind::Page => "page",
            DecisionKind::Link => "link",
            DecisionKind::Backlinks => "backlinks",
            DecisionKind::Tags => "tags",
        };
        f.write_str(name)
    }
}

impl FromStr for DecisionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(DecisionKind::Page),
            "link" => Ok(DecisionKind::Link),
            "backlinks" => Ok(DecisionKind::Backlinks),
            "tags" => Ok(DecisionKind::Tags),
            other => Err(format!(
                "unknown decision kind '{}' (expected page, link, backlinks or tags)",
                other
            )),
        }
    }
}

/// One tag's verdict
#[derive(Debug, Clone, Serialize)]
pub struct TagDecision {
    pub tag: String,
    pub rules: Vec<String>,
    pub decision: Decision,
}

/// Explanation of one decision
#[derive(Debug, Clone, Serialize)]
pub struct ExplainOutput {
    pub kind: DecisionKind,

    /// The string the rules were matched against
    pub candidate: String,

    /// Rule list consulted, in evaluation order (empty for tags)
    pub rules: Vec<String>,

    /// The decision (None for tags, see `tags`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,

    /// Per-tag decisions, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagDecision>,

    /// Final tag set including frontmatter tags
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assigned_tags: Vec<String>,

    /// Human-readable explanation
    pub explanation: String,
}

impl ExplainOutput {
    /// Explain how `engine` decides `candidate`
    pub fn new(
        engine: &RuleEngine<'_>,
        kind: DecisionKind,
        candidate: &str,
        frontmatter: Option<&PageFrontmatter>,
    ) -> Self {
        let (candidate, rules, decision) = match kind {
            DecisionKind::Page => {
                let path = engine.relative_path(candidate);
                let decision = engine.page_decision(&path, frontmatter);
                (path, engine.page_rules().to_strings(), Some(decision))
            }
            DecisionKind::Link => (
                link_candidate(candidate).to_string(),
                engine.link_rules().to_strings(),
                Some(engine.link_decision(candidate, frontmatter)),
            ),
            DecisionKind::Backlinks => (
                candidate.to_string(),
                engine.visibility_rules().to_strings(),
                Some(engine.backlinks_decision(candidate, frontmatter)),
            ),
            DecisionKind::Tags => (engine.relative_path(candidate), Vec::new(), None),
        };

        let (tags, assigned_tags) = if kind == DecisionKind::Tags {
            let tags = engine
                .config()
                .sitemap_config
                .tag_rules
                .iter()
                .map(|(tag, rules)| TagDecision {
                    tag: tag.to_string(),
                    rules: rules.to_strings(),
                    decision: Decision::decide(rules, &candidate, false, None),
                })
                .collect();
            (tags, engine.tags_for(&candidate, frontmatter))
        } else {
            (Vec::new(), Vec::new())
        };

        let mut output = Self {
            kind,
            candidate,
            rules,
            decision,
            tags,
            assigned_tags,
            explanation: String::new(),
        };
        output.explanation = output.generate_explanation();
        output
    }

    fn generate_explanation(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("{} decision for: {}", self.kind, self.candidate));
        lines.push(String::new());

        if let Some(ref decision) = self.decision {
            let verdict = if decision.verdict { "INCLUDED" } else { "EXCLUDED" };
            let verdict = match self.kind {
                DecisionKind::Backlinks if decision.verdict => "VISIBLE",
                DecisionKind::Backlinks => "HIDDEN",
                _ => verdict,
            };
            lines.push(format!("Decision: {}", verdict));
            lines.push(format!("Reason: {}", Self::format_source(&decision.source)));
        } else {
            if self.tags.is_empty() {
                lines.push("No tag rules configured".to_string());
            }
            for tag in &self.tags {
                let mark = if tag.decision.verdict { "+" } else { "-" };
                lines.push(format!(
                    "  {} {}: {}",
                    mark,
                    tag.tag,
                    Self::format_source(&tag.decision.source)
                ));
            }
            lines.push(String::new());
            if self.assigned_tags.is_empty() {
                lines.push("Tags: (none)".to_string());
            } else {
                lines.push(format!("Tags: {}", self.assigned_tags.join(", ")));
            }
        }

        lines.join("\n")
    }

    fn format_source(source: &DecisionSource) -> String {
        match source {
            DecisionSource::Override => "set by page frontmatter".to_string(),
            DecisionSource::Rule { index, pattern } => {
                format!("rule #{} '{}' was the last to match", index, pattern)
            }
            DecisionSource::Default => "no rule matched, default applies".to_string(),
            DecisionSource::Filtered { reason } => reason.clone(),
        }
    }

    /// Format as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as human-readable text
    pub fn to_human(&self) -> String {
        let mut output = self.explanation.clone();
        if !self.rules.is_empty() {
            output.push_str("\n\n--- Rules (last match wins) ---\n");
            for (i, rule) in self.rules.iter().enumerate() {
                output.push_str(&format!("  #{} {}\n", i, rule));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validate, SiteGraphConfig};
    use serde_json::json;

    #[test]
    fn test_explain_page_rule() {
        let config = validate(&json!({
            "sitemapConfig": {
                "pageInclusionRules": ["**/*", "!secret/**"],
                "ignoreStarlightLinks": false
            }
        }))
        .unwrap();
        let engine = RuleEngine::new(&config);
        let path = "src/content/docs/secret/keys.md";
        let output = ExplainOutput::new(&engine, DecisionKind::Page, path, None);

        assert_eq!(output.candidate, "secret/keys.md");
        let decision = output.decision.as_ref().unwrap();
        assert!(!decision.verdict);
        assert_eq!(
            decision.source,
            DecisionSource::Rule {
                index: 1,
                pattern: "!secret/**".to_string()
            }
        );
        assert!(output.explanation.contains("EXCLUDED"));
        assert!(output.explanation.contains("rule #1 '!secret/**'"));
        assert!(output.to_human().contains("#2 !starlight:sidebar/**"));
    }

    #[test]
    fn test_explain_link_override() {
        let config = SiteGraphConfig::default();
        let engine = RuleEngine::new(&config);
        let mut fm = PageFrontmatter::default();
        fm.links.exclude = vec!["faq".to_string()];

        let output = ExplainOutput::new(&engine, DecisionKind::Link, "/faq", Some(&fm));
        assert_eq!(output.candidate, "faq");
        let decision = output.decision.unwrap();
        assert!(!decision.verdict);
        assert_eq!(decision.source, DecisionSource::Override);
        assert!(output.explanation.contains("set by page frontmatter"));
    }

    #[test]
    fn test_explain_link_rule_on_site_link() {
        let config = validate(&json!({
            "sitemapConfig": {"linkInclusionRules": ["**/*", "!api/**"]}
        }))
        .unwrap();
        let engine = RuleEngine::new(&config);
        let output = ExplainOutput::new(&engine, DecisionKind::Link, "/api/users", None);

        assert_eq!(output.candidate, "api/users");
        assert!(!output.decision.as_ref().unwrap().verdict);
        assert!(output.explanation.contains("rule #1 '!api/**'"));
    }

    #[test]
    fn test_explain_filtered_external_link() {
        let config = SiteGraphConfig::default();
        let engine = RuleEngine::new(&config);
        let output = ExplainOutput::new(&engine, DecisionKind::Link, "https://astro.build", None);
        assert!(output.explanation.contains("external links are not included"));
    }

    #[test]
    fn test_explain_backlinks_default() {
        let config = validate(&json!({"backlinksConfig": {"visibilityRules": []}})).unwrap();
        let engine = RuleEngine::new(&config);
        let output = ExplainOutput::new(&engine, DecisionKind::Backlinks, "guides/intro", None);
        assert_eq!(output.decision.as_ref().unwrap().source, DecisionSource::Default);
        assert!(output.explanation.contains("HIDDEN"));
    }

    #[test]
    fn test_explain_tags() {
        let config = validate(&json!({
            "sitemapConfig": {"tagRules": {"api": ["api/**"], "secret": ["**/*", "!api/**"]}}
        }))
        .unwrap();
        let engine = RuleEngine::new(&config);
        let fm = PageFrontmatter {
            tags: vec!["custom".to_string()],
            ..Default::default()
        };
        let output = ExplainOutput::new(&engine, DecisionKind::Tags, "api/users.md", Some(&fm));

        assert!(output.decision.is_none());
        assert_eq!(output.tags.len(), 2);
        assert!(output.tags[0].decision.verdict);
        assert!(!output.tags[1].decision.verdict);
        assert_eq!(output.assigned_tags, vec!["api", "custom"]);
        assert!(output.explanation.contains("Tags: api, custom"));
    }

    #[test]
    fn test_json_output() {
        let config = SiteGraphConfig::default();
        let engine = RuleEngine::new(&config);
        let output = ExplainOutput::new(&engine, DecisionKind::Page, "index.md", None);
        let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();

        assert_eq!(json["kind"], "page");
        assert_eq!(json["decision"]["verdict"], true);
        assert_eq!(json["decision"]["source"]["type"], "rule");
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("backlinks".parse::<DecisionKind>().unwrap(), DecisionKind::Backlinks);
        assert!("pages".parse::<DecisionKind>().is_err());
    }
}
