//! In-memory sitemap generation
//!
//! The content collaborator hands over every content file as a
//! [`PageInput`]; the builder decides which become nodes, which of their
//! links survive, and what every node is titled and tagged.

use serde::{Deserialize, Serialize};
use site_graph_rules::assign_tags;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use super::{Sitemap, SitemapEntry};
use crate::engine::{is_external, link_candidate, PageFrontmatter, RuleEngine};
use crate::starlight::is_host_link;

/// One content file as seen by the builder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInput {
    /// Content file path, absolute or relative to the project
    pub path: String,

    /// Sitemap key of the page, e.g. `/guides/intro`
    pub key: String,

    /// Title derived from the content when nothing else names the page
    pub derived_title: String,

    pub frontmatter: PageFrontmatter,

    /// Link targets found in the page, as sitemap keys or external URLs
    pub links: Vec<String>,
}

/// Builds a [`Sitemap`] from page inputs under one engine
pub struct SitemapBuilder<'e> {
    engine: &'e RuleEngine<'e>,
    pages: Vec<PageInput>,
}

impl<'e> SitemapBuilder<'e> {
    pub fn new(engine: &'e RuleEngine<'e>) -> Self {
        Self {
            engine,
            pages: Vec::new(),
        }
    }

    pub fn page(mut self, page: PageInput) -> Self {
        self.pages.push(page);
        self
    }

    pub fn pages(mut self, pages: impl IntoIterator<Item = PageInput>) -> Self {
        self.pages.extend(pages);
        self
    }

    /// Produce the sitemap.
    ///
    /// A configured explicit sitemap is returned instead of generating one,
    /// with rule-derived tags merged into its pages.
    pub fn build(&self) -> Sitemap {
        if let Some(explicit) = self.engine.explicit_sitemap() {
            debug!(nodes = explicit.len(), "using explicit sitemap");
            return self.tag_explicit(explicit);
        }

        let mut sitemap = Sitemap::new();
        let mut excluded: HashSet<&str> = HashSet::new();
        let mut included: Vec<&PageInput> = Vec::new();

        for page in &self.pages {
            let path = self.engine.relative_path(&page.path);
            if !self.engine.is_page_included(&path, Some(&page.frontmatter)) {
                debug!(page = %page.key, "page excluded");
                excluded.insert(page.key.as_str());
                continue;
            }

            let title = self
                .engine
                .page_title(&page.key, Some(&page.frontmatter), &page.derived_title);
            let tags = self.engine.tags_for(&path, Some(&page.frontmatter));
            let mut entry = SitemapEntry::page(title);
            entry.tags = Some(tags);
            sitemap.insert(page.key.clone(), entry);
            included.push(page);
        }

        for page in included {
            let links = self.page_links(page, &sitemap, &excluded);

            for target in &links {
                if sitemap.contains(target) {
                    continue;
                }
                let title = self.engine.page_title(target, None, target);
                let node = if is_external(target) {
                    SitemapEntry::external(title)
                } else {
                    SitemapEntry::unresolved(title)
                };
                sitemap.insert(target.clone(), node);
            }

            if let Some(entry) = sitemap.get_mut(&page.key) {
                entry.links = Some(links);
            }
        }

        sitemap.derive_backlinks();
        debug!(nodes = sitemap.len(), "generated sitemap");
        sitemap
    }

    /// Surviving link targets of `page`, in first-seen order
    fn page_links(
        &self,
        page: &PageInput,
        sitemap: &Sitemap,
        excluded: &HashSet<&str>,
    ) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut links = Vec::new();

        for target in &page.links {
            if !seen.insert(target.as_str()) {
                continue;
            }
            if !self.engine.is_link_included(target, Some(&page.frontmatter)) {
                continue;
            }
            if excluded.contains(target.as_str()) {
                continue;
            }

            // Theme links and unknown internal targets only survive if they
            // would be pages themselves.
            let known = sitemap.contains(target) && !is_host_link(target);
            if !known
                && !is_external(target)
                && !self.engine.is_page_included(link_candidate(target), None)
            {
                continue;
            }

            links.push(target.clone());
        }
        links
    }

    fn tag_explicit(&self, explicit: &Sitemap) -> Sitemap {
        let tag_rules = &self.engine.config().sitemap_config.tag_rules;
        let mut sitemap = explicit.clone();

        let keys: Vec<String> = sitemap.iter().map(|(key, _)| key.to_string()).collect();
        for key in keys {
            if let Some(entry) = sitemap.get_mut(&key) {
                if entry.external {
                    continue;
                }
                let existing = entry.tags.take().unwrap_or_default();
                entry.tags = Some(assign_tags(tag_rules, link_candidate(&key), &existing));
            }
        }
        sitemap
    }
}
