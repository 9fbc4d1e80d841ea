//! Typed list query: page, page size and search text.

use serde::{Deserialize, Serialize};

use crate::query::{QueryState, RawQuery};
use crate::sync::QueryCodec;

/// First page.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 40;

const PAGE_KEY: &str = "page";
const LIMIT_KEY: &str = "limit";
const SEARCH_KEY: &str = "search";

/// Pagination and search state of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    /// Items per page, at least 1.
    pub limit: u32,
    /// Trimmed search text; empty means no filter.
    pub search: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
        }
    }
}

impl ListQuery {
    /// Copy with a new search text and the page reset to the first one.
    #[must_use]
    pub fn with_search(&self, search: &str) -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: self.limit,
            search: search.trim().to_string(),
        }
    }

    /// Copy pointing at `page` (clamped to at least 1).
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

/// [`QueryCodec`] for [`ListQuery`].
///
/// `page` and `limit` accept anything a browser's integer parse would:
/// leading whitespace, an optional sign and leading digits, with trailing
/// garbage ignored. Values that are missing, unparsable, below 1 or out of
/// range fall back to the defaults. `search` is trimmed.
#[derive(Debug, Clone, Default)]
pub struct ListQueryCodec {
    defaults: ListQuery,
}

impl ListQueryCodec {
    /// Codec whose page and limit defaults come from `defaults`.
    ///
    /// The search default is always empty.
    pub fn new(defaults: ListQuery) -> Self {
        Self {
            defaults: ListQuery {
                page: defaults.page.max(1),
                limit: defaults.limit.max(1),
                search: String::new(),
            },
        }
    }

    /// Defaults used for fallback and omitted from built queries.
    pub fn defaults(&self) -> &ListQuery {
        &self.defaults
    }
}

impl QueryCodec for ListQueryCodec {
    type State = ListQuery;

    fn parse(&self, query: &RawQuery) -> ListQuery {
        ListQuery {
            page: parse_int_at_least(query.scalar(PAGE_KEY), 1, self.defaults.page),
            limit: parse_int_at_least(query.scalar(LIMIT_KEY), 1, self.defaults.limit),
            search: query.scalar(SEARCH_KEY).trim().to_string(),
        }
    }

    fn build(&self, state: &ListQuery) -> QueryState {
        let mut out = QueryState::new();
        if state.page != self.defaults.page {
            out.insert(PAGE_KEY, state.page.to_string());
        }
        if state.limit != self.defaults.limit {
            out.insert(LIMIT_KEY, state.limit.to_string());
        }
        if !state.search.is_empty() {
            out.insert(SEARCH_KEY, state.search.clone());
        }
        out
    }
}

/// Parse an integer prefix and keep it only if it is at least `min`.
fn parse_int_at_least(text: &str, min: u32, fallback: u32) -> u32 {
    match parse_leading_int(text) {
        Some(value) if value >= i64::from(min) => u32::try_from(value).unwrap_or(fallback),
        _ => fallback,
    }
}

/// Integer prefix of `text`: optional whitespace, optional sign, digits.
fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
