//! Site graph decisions over a validated configuration
//!
//! [`RuleEngine`] answers, for one page or link at a time, every question the
//! sitemap builder and the page components ask. It borrows the immutable
//! config and holds only the effective page rules it derives from it, so one
//! engine can be shared across threads for the whole build.

use serde::{Deserialize, Serialize};
use site_graph_rules::{assign_tags, resolve, Decision, DecisionSource, RuleList};
use tracing::debug;

use crate::config::SiteGraphConfig;
use crate::sitemap::Sitemap;
use crate::starlight::{effective_page_rules, is_host_link};

/// Per-page settings read from frontmatter by the content collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageFrontmatter {
    /// Node title; beats `pageTitles` and the derived title
    pub title: Option<String>,

    /// Tags added to whatever the tag rules assign
    pub tags: Vec<String>,

    /// Force the page in or out of the sitemap
    pub include: Option<bool>,

    /// Per-page link overrides, matched like `linkInclusionRules`
    pub links: LinkOverrides,

    /// Force the backlinks panel on or off
    pub backlinks: Option<bool>,
}

/// Link target patterns a page forces in or out. Internal targets are
/// matched without their leading `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOverrides {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl LinkOverrides {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// The override as a rule list: includes first, then excludes, so an
    /// exclude wins over an include matching the same target.
    pub fn to_rule_list(&self) -> RuleList {
        self.include
            .iter()
            .cloned()
            .chain(self.exclude.iter().map(|p| format!("!{}", p)))
            .collect()
    }

    /// The forced verdict for `target`, if any pattern matches it
    pub fn verdict(&self, target: &str) -> Option<bool> {
        if self.is_empty() {
            return None;
        }
        self.to_rule_list().verdict(link_candidate(target))
    }
}

/// Whether a link target points outside the site. Theme-rendered links are
/// never external, whatever they point at.
pub fn is_external(target: &str) -> bool {
    if is_host_link(target) {
        return false;
    }
    target.contains("://") || target.starts_with("mailto:") || target.starts_with("//")
}

/// The string link rules see for `target`. Host and external links are
/// matched as written, site links without their leading `/`.
pub fn link_candidate(target: &str) -> &str {
    if is_host_link(target) || is_external(target) {
        target
    } else {
        target.trim_start_matches('/')
    }
}

/// Decisions for one validated configuration
#[derive(Debug, Clone)]
pub struct RuleEngine<'c> {
    config: &'c SiteGraphConfig,
    page_rules: RuleList,
    content_root: String,
}

impl<'c> RuleEngine<'c> {
    pub fn new(config: &'c SiteGraphConfig) -> Self {
        let sitemap = &config.sitemap_config;
        let page_rules =
            effective_page_rules(&sitemap.page_inclusion_rules, sitemap.ignore_starlight_links);
        debug!(
            page_rules = page_rules.len(),
            link_rules = sitemap.link_inclusion_rules.len(),
            tags = sitemap.tag_rules.len(),
            visibility_rules = config.backlinks_config.visibility_rules.len(),
            "compiled site graph rules"
        );

        Self {
            config,
            page_rules,
            content_root: normalize_path(&sitemap.content_root),
        }
    }

    pub fn config(&self) -> &'c SiteGraphConfig {
        self.config
    }

    /// Page inclusion rules with the host link exclusions applied
    pub fn page_rules(&self) -> &RuleList {
        &self.page_rules
    }

    pub fn link_rules(&self) -> &RuleList {
        &self.config.sitemap_config.link_inclusion_rules
    }

    pub fn visibility_rules(&self) -> &RuleList {
        &self.config.backlinks_config.visibility_rules
    }

    /// The configured explicit sitemap, which replaces generation
    pub fn explicit_sitemap(&self) -> Option<&'c Sitemap> {
        self.config.sitemap_config.sitemap.as_ref()
    }

    /// Path of a content file relative to the content root, with `/`
    /// separators and no leading `./` or `/`
    pub fn relative_path(&self, path: &str) -> String {
        let path = normalize_path(path);
        match path.strip_prefix(&self.content_root) {
            Some(rest)
                if self.content_root.is_empty() || rest.is_empty() || rest.starts_with('/') =>
            {
                rest.trim_start_matches('/').to_string()
            }
            _ => path,
        }
    }

    pub fn page_decision(&self, path: &str, frontmatter: Option<&PageFrontmatter>) -> Decision {
        Decision::decide(
            &self.page_rules,
            path,
            false,
            frontmatter.and_then(|fm| fm.include),
        )
    }

    /// Whether the content file at `path` becomes a node
    pub fn is_page_included(&self, path: &str, frontmatter: Option<&PageFrontmatter>) -> bool {
        self.page_decision(path, frontmatter).verdict
    }

    /// Decide a link of the page carrying `frontmatter`.
    ///
    /// External links are dropped before any rule runs unless
    /// `includeExternalLinks` is set.
    pub fn link_decision(&self, target: &str, frontmatter: Option<&PageFrontmatter>) -> Decision {
        if is_external(target) && !self.config.sitemap_config.include_external_links {
            return Decision {
                verdict: false,
                source: DecisionSource::Filtered {
                    reason: "external links are not included".to_string(),
                },
            };
        }

        let forced = frontmatter.and_then(|fm| fm.links.verdict(target));
        Decision::decide(self.link_rules(), link_candidate(target), false, forced)
    }

    pub fn is_link_included(&self, target: &str, frontmatter: Option<&PageFrontmatter>) -> bool {
        self.link_decision(target, frontmatter).verdict
    }

    pub fn backlinks_decision(
        &self,
        slug: &str,
        frontmatter: Option<&PageFrontmatter>,
    ) -> Decision {
        Decision::decide(
            self.visibility_rules(),
            slug,
            false,
            frontmatter.and_then(|fm| fm.backlinks),
        )
    }

    /// Whether the page at `slug` shows the backlinks panel
    pub fn are_backlinks_visible(&self, slug: &str, frontmatter: Option<&PageFrontmatter>) -> bool {
        resolve(
            self.visibility_rules().evaluate(slug, false),
            frontmatter.and_then(|fm| fm.backlinks),
        )
    }

    /// Tags of the page at `path`: rule-derived first, then frontmatter tags
    pub fn tags_for(&self, path: &str, frontmatter: Option<&PageFrontmatter>) -> Vec<String> {
        let frontmatter_tags = frontmatter.map(|fm| fm.tags.as_slice()).unwrap_or_default();
        assign_tags(&self.config.sitemap_config.tag_rules, path, frontmatter_tags)
    }

    /// Node title: frontmatter title, then `pageTitles[key]`, then `derived`
    pub fn page_title(
        &self,
        key: &str,
        frontmatter: Option<&PageFrontmatter>,
        derived: &str,
    ) -> String {
        frontmatter
            .and_then(|fm| fm.title.clone())
            .or_else(|| self.config.sitemap_config.page_titles.get(key).cloned())
            .unwrap_or_else(|| derived.to_string())
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let path = path.trim_start_matches("./").trim_start_matches('/');
    path.trim_end_matches('/').to_string()
}
