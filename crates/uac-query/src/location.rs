//! In-memory location store.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::query::{QueryState, RawQuery};
use crate::sync::QueryStore;

#[derive(Debug, Default)]
struct LocationInner {
    query: RefCell<RawQuery>,
    /// Entries created by `navigate`; `replace` rewrites the current one.
    history: Cell<usize>,
    replaces: Cell<usize>,
}

/// A [`QueryStore`] held in memory.
///
/// Clones share the same location, so one clone can be handed to a
/// [`QuerySync`](crate::QuerySync) while another plays the user navigating.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    inner: Rc<LocationInner>,
}

impl MemoryLocation {
    /// A location with an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// A location initialized from an encoded query string.
    pub fn from_query_string(input: &str) -> Self {
        let location = Self::new();
        *location.inner.query.borrow_mut() = RawQuery::from_query_string(input);
        location
    }

    /// Simulate an external navigation to `query` (a new history entry).
    pub fn navigate(&self, query: RawQuery) {
        *self.inner.query.borrow_mut() = query;
        self.inner.history.set(self.inner.history.get() + 1);
    }

    /// Current query.
    pub fn query(&self) -> RawQuery {
        self.inner.query.borrow().clone()
    }

    /// Current query encoded as a string (normalized, no `?`).
    pub fn query_string(&self) -> String {
        crate::normalize_query(&self.inner.query.borrow()).to_query_string()
    }

    /// Number of `replace` calls seen.
    pub fn replace_count(&self) -> usize {
        self.inner.replaces.get()
    }

    /// Number of history entries created by navigation.
    pub fn history_len(&self) -> usize {
        self.inner.history.get()
    }
}

impl QueryStore for MemoryLocation {
    fn read(&self) -> RawQuery {
        self.query()
    }

    fn replace(&self, query: QueryState) {
        *self.inner.query.borrow_mut() = RawQuery::from(query);
        self.inner.replaces.set(self.inner.replaces.get() + 1);
    }
}
