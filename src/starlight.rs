//! Host theme link rules
//!
//! The Starlight theme renders the same links on every page: the site title
//! links to `/`, and the header, footer and sidebar carry social, edit,
//! credits, pagination and navigation links. The link extractor reports the
//! theme-rendered ones under the reserved `starlight:<kind>/` namespace so
//! they can be told apart from links written in the content.
//!
//! These links are excluded through `pageInclusionRules`: a link is dropped
//! when its target would not be a node of the graph.

use site_graph_rules::RuleList;

/// Candidate reported for the site title link
pub const ROOT_LINK: &str = "/";

/// Prefix of every theme-rendered link candidate other than [`ROOT_LINK`]
pub const HOST_LINK_PREFIX: &str = "starlight:";

/// Exclusions applied when `ignoreStarlightLinks` is set
pub const IGNORED_LINK_RULES: &[&str] = &[
    "!/",
    "!starlight:social/**",
    "!starlight:edit/**",
    "!starlight:credits/**",
    "!starlight:pagination/**",
];

/// Sidebar links are always excluded
pub const SIDEBAR_LINK_RULE: &str = "!starlight:sidebar/**";

/// Kind of theme-rendered link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostLink {
    Social,
    Edit,
    Credits,
    Pagination,
    Sidebar,
}

impl HostLink {
    fn as_str(self) -> &'static str {
        match self {
            HostLink::Social => "social",
            HostLink::Edit => "edit",
            HostLink::Credits => "credits",
            HostLink::Pagination => "pagination",
            HostLink::Sidebar => "sidebar",
        }
    }

    /// The candidate string the link extractor reports for `href`
    pub fn candidate(self, href: &str) -> String {
        format!(
            "{}{}/{}",
            HOST_LINK_PREFIX,
            self.as_str(),
            href.trim_start_matches('/')
        )
    }
}

/// Whether `candidate` is a theme-rendered link
pub fn is_host_link(candidate: &str) -> bool {
    candidate == ROOT_LINK || candidate.starts_with(HOST_LINK_PREFIX)
}

/// The page inclusion rules actually evaluated.
///
/// Later rules take precedence, so the lowest-priority rule is the first
/// one. With `ignore_host_links`, the theme exclusions rank immediately
/// above it: they follow the first rule (or make up an empty list), and
/// every later user rule can still override them. The sidebar exclusion is
/// appended last, so it wins over every user rule.
pub fn effective_page_rules(rules: &RuleList, ignore_host_links: bool) -> RuleList {
    let mut effective = rules.clone();

    if ignore_host_links {
        let at = effective.len().min(1);
        for (offset, rule) in IGNORED_LINK_RULES.iter().enumerate() {
            effective.insert(at + offset, *rule);
        }
    }

    effective.push(SIDEBAR_LINK_RULE);
    effective
}
