//! Signed glob patterns.
//!
//! A pattern is a glob body with an optional leading `!`. The body is matched
//! against the whole candidate: `*` stays within one path segment, `**` spans
//! segments, and matching is case-sensitive. Every other character is literal.
//!
//! globset only accepts `**` as a whole path segment, so a `**` touching other
//! characters (`secret**`, `**.md`) is expanded before compiling into the two
//! globset forms that cover it: `*` for no separator crossed and `*/**/*` for
//! one or more.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// Negation marker for a pattern.
pub const NEGATION_PREFIX: char = '!';

/// How the body of a pattern is tested.
#[derive(Debug, Clone)]
enum BodyMatcher {
    Glob(GlobSet),
    /// Body the glob compiler rejected; compared as a plain string.
    Literal(String),
}

/// A compiled, optionally negated glob pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    negated: bool,
    matcher: BodyMatcher,
}

impl Pattern {
    /// Compile a pattern. Never fails: a body globset rejects falls back to
    /// literal comparison.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let (negated, body) = match source.strip_prefix(NEGATION_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, source.as_str()),
        };

        let matcher = match compile(body) {
            Ok(set) => BodyMatcher::Glob(set),
            Err(e) => {
                debug!(pattern = %source, error = %e, "glob rejected, matching literally");
                BodyMatcher::Literal(body.to_string())
            }
        };

        Self {
            source,
            negated,
            matcher,
        }
    }

    /// The pattern as written, including any `!`.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The pattern without its negation marker.
    pub fn body(&self) -> &str {
        if self.negated {
            &self.source[NEGATION_PREFIX.len_utf8()..]
        } else {
            &self.source
        }
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Test the body against `candidate`, ignoring negation.
    pub fn matches_body(&self, candidate: &str) -> bool {
        match &self.matcher {
            BodyMatcher::Glob(glob) => glob.is_match(candidate),
            BodyMatcher::Literal(body) => body == candidate,
        }
    }

    /// Test `candidate`, inverting the result for negated patterns.
    pub fn matches(&self, candidate: &str) -> bool {
        self.matches_body(candidate) != self.negated
    }
}

/// globset sources equivalent to `body`.
fn expand(body: &str) -> Vec<String> {
    let chars: Vec<char> = body.chars().collect();
    let mut variants = vec![String::new()];
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '*' {
            if matches!(c, '?' | '[' | ']' | '{' | '}' | ',' | '\\') {
                push_all(&mut variants, "\\");
            }
            push_all(&mut variants, c.encode_utf8(&mut [0; 4]));
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i] == '*' {
            i += 1;
        }
        if i - start == 1 {
            push_all(&mut variants, "*");
            continue;
        }

        let segment_start = start == 0 || chars[start - 1] == '/';
        let segment_end = i == chars.len() || chars[i] == '/';
        if segment_start && segment_end {
            push_all(&mut variants, "**");
        } else {
            variants = variants
                .into_iter()
                .flat_map(|v| [format!("{}*", v), format!("{}*/**/*", v)])
                .collect();
        }
    }

    variants
}

fn push_all(variants: &mut [String], s: &str) {
    for v in variants.iter_mut() {
        v.push_str(s);
    }
}

fn compile(body: &str) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for source in expand(body) {
        builder.add(
            GlobBuilder::new(&source)
                .literal_separator(true)
                .backslash_escape(true)
                .build()?,
        );
    }
    builder.build()
}

/// One-shot match of a pattern string against a candidate.
///
/// Compiles the pattern on every call; hold a [`Pattern`] when matching
/// repeatedly.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    Pattern::new(pattern).matches(candidate)
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::new(s)
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Pattern::new(s)
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Pattern::new)
    }
}
