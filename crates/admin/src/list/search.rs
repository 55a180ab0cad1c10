//! Free-text search over a record's searchable fields.
//!
//! Operators type patterns such as `john|jane` or `^98`, so the query is
//! compiled as a case-insensitive regular expression. Text that does not
//! compile (`(`, `[a-`, `*x`) is matched literally instead; search never
//! fails. The `regex` crate matches in linear time, and the compiled program
//! size is capped so a pathological query cannot exhaust memory.

use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Upper bound on the compiled program for a search query.
const MAX_COMPILED_SIZE: usize = 256 * 1024;

/// Upper bound on the lazy DFA cache for a search query.
const MAX_DFA_SIZE: usize = 1024 * 1024;

/// A compiled search query.
#[derive(Debug, Clone, Default)]
pub enum SearchPattern {
    /// Empty query: everything matches.
    #[default]
    Any,
    /// Query compiled as a case-insensitive regular expression.
    Regex(Regex),
    /// Query that failed to compile, matched as a lowercase substring.
    Literal(String),
}

impl SearchPattern {
    /// Compile an operator's query. Surrounding whitespace is ignored.
    #[must_use]
    pub fn compile(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            return Self::Any;
        }

        match RegexBuilder::new(query)
            .case_insensitive(true)
            .size_limit(MAX_COMPILED_SIZE)
            .dfa_size_limit(MAX_DFA_SIZE)
            .build()
        {
            Ok(regex) => Self::Regex(regex),
            Err(e) => {
                debug!(query, error = %e, "Search query is not a valid pattern; matching literally");
                Self::Literal(query.to_lowercase())
            }
        }
    }

    /// Whether `text` matches.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Regex(regex) => regex.is_match(text),
            Self::Literal(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }

    /// Whether any of `fields` matches.
    pub fn matches_any<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.is_any() || fields.into_iter().any(|field| self.is_match(field))
    }

    /// Whether the query matches everything.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}
