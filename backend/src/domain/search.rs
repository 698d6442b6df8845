//! Free-text search queries over record fields.
//!
//! Queries are matched as case-insensitive substrings. User input is
//! escaped before compilation so metacharacters search literally.

use regex::{Regex, RegexBuilder};

/// Compiled case-insensitive substring query.
///
/// An empty or whitespace-only query compiles to a matcher that hits
/// nothing; callers receive an empty result set rather than an error.
///
/// # Examples
/// ```
/// use backend::domain::SearchQuery;
///
/// let query = SearchQuery::new("corol");
/// assert!(query.matches("Toyota Corolla"));
/// assert!(!query.matches("Honda Civic"));
/// assert!(!SearchQuery::new("").matches("anything"));
/// ```
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pattern: Option<Regex>,
}

impl SearchQuery {
    /// Compile a query from raw user input.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self { pattern: None };
        }

        let pattern = RegexBuilder::new(&regex::escape(trimmed))
            .case_insensitive(true)
            .build()
            .ok();
        Self { pattern }
    }

    /// Whether the query matches a single field value.
    pub fn matches(&self, field: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(field))
    }

    /// Whether the query matches any of the given field values.
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        fields.into_iter().any(|field| self.matches(field))
    }
}
