//! Glob rule lists for site graph decisions.
//!
//! Every decision the site graph makes about a page (is it in the graph, is a
//! link kept, which tags does it carry, are its backlinks shown) is computed
//! by feeding a path through a [`RuleList`]: an ordered list of glob patterns,
//! optionally negated with `!`, where the last matching rule wins. A page's
//! frontmatter can then override the verdict.
//!
//! All types here are immutable after construction and safe to share across
//! threads.

mod decision;
mod pattern;
mod rule_list;
mod tags;

pub use decision::{resolve, Decision, DecisionSource};
pub use pattern::{matches, Pattern, NEGATION_PREFIX};
pub use rule_list::{evaluate, RuleList, RuleMatch};
pub use tags::{assign_tags, TagRules};
