//! Rule evaluation correctness corpus
//!
//! Each case is (rules, candidate, default, expected).

use site_graph_rules::{assign_tags, evaluate, matches, resolve, RuleList, TagRules};

fn check(rules: &[&str], candidate: &str, default: bool, expected: bool) {
    assert_eq!(
        evaluate(rules, candidate, default),
        expected,
        "rules {:?} on '{}' (default {})",
        rules,
        candidate,
        default
    );
}

// =============================================================================
// Category 1: Pattern matching
// =============================================================================

#[test]
fn test_pattern_corpus() {
    let cases: &[(&str, &str, bool)] = &[
        ("api/**", "api/foo", true),
        ("api/**", "api/foo/bar", true),
        ("!api/**", "api/foo", false),
        ("!api/**", "guides/foo", true),
        ("api/*", "api/foo", true),
        ("api/*", "api/foo/bar", false),
        ("**/*", "index.md", true),
        ("**/*.md", "guides/setup/install.md", true),
        ("**/*.md", "guides/setup/install.mdx", false),
        ("API/**", "api/foo", false),
        ("api", "api/foo", false),
        ("secret**", "secret/x", true),
        ("secret**", "secretary", true),
        ("**.md", "a/b.md", true),
        ("**.md", "b.md", true),
        ("**.md", "a/b.mdx", false),
        ("guides/{setup,faq}", "guides/faq", false),
        ("guides/?.md", "guides/a.md", false),
    ];

    for (pattern, candidate, expected) in cases {
        assert_eq!(
            matches(pattern, candidate),
            *expected,
            "pattern '{}' on '{}'",
            pattern,
            candidate
        );
    }
}

#[test]
fn test_non_star_characters_are_literal() {
    assert!(matches("[broken", "[broken"));
    assert!(!matches("[broken", "b"));
    assert!(matches("guides/{setup,faq}", "guides/{setup,faq}"));
    assert!(matches("!a**", "b"));
    assert!(!matches("!a**", "a/b"));
}

// =============================================================================
// Category 2: Last match wins
// =============================================================================

#[test]
fn test_ordering_corpus() {
    check(&["**/*", "!secret/**"], "secret/x", false, false);
    check(&["!secret/**", "**/*"], "secret/x", false, true);
    check(&["**/*", "!secret/**"], "public/x", false, true);
    check(&["**/*", "!secret/**", "secret/shared/**"], "secret/shared/a", false, true);
    check(&["**/*", "!secret/**", "secret/shared/**"], "secret/private/a", true, false);
    check(&["api/**", "!api/**"], "api/x", true, false);
    check(&["!api/**", "api/**"], "api/x", false, true);
    check(&["api/**", "api/**"], "api/x", false, true);
    check(&["**/*", "!secret**"], "secret/x", false, false);
    check(&["**/*", "!secret**"], "public/x", false, true);
}

#[test]
fn test_empty_and_unmatched_use_default() {
    check(&[], "anything", true, true);
    check(&[], "anything", false, false);
    check(&["api/**"], "guides/x", true, true);
    check(&["!api/**"], "guides/x", false, false);
}

#[test]
fn test_inserting_unmatched_rule_changes_nothing() {
    let base = ["**/*", "!secret/**", "secret/shared/**"];
    let candidates = ["secret/x", "secret/shared/y", "public/z", "index.md"];

    for at in 0..=base.len() {
        let mut rules = RuleList::new(base);
        rules.insert(at, "!nowhere/**");
        for candidate in candidates {
            for default in [true, false] {
                assert_eq!(
                    rules.evaluate(candidate, default),
                    evaluate(&base, candidate, default),
                    "insertion at {} changed '{}'",
                    at,
                    candidate
                );
            }
        }
    }
}

// =============================================================================
// Category 3: Overrides and tags
// =============================================================================

#[test]
fn test_override_table() {
    for verdict in [true, false] {
        assert_eq!(resolve(verdict, None), verdict);
        assert!(resolve(verdict, Some(true)));
        assert!(!resolve(verdict, Some(false)));
    }
}

#[test]
fn test_tag_union() {
    let tag_rules: TagRules = [
        ("api", RuleList::new(["api/**"])),
        ("secret", RuleList::new(["**/*", "!api/**"])),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        assign_tags(&tag_rules, "api/users", &["custom"]),
        vec!["api", "custom"]
    );
    assert_eq!(assign_tags(&tag_rules, "guides/intro", &["secret"]), vec!["secret"]);
    assert!(assign_tags(&TagRules::new(), "api/users", &[] as &[&str]).is_empty());
}