//! Bidirectional synchronization between a location query and typed state.
//!
//! Both directions are driven by observation (a location watcher calls
//! [`QuerySync::sync_from_route`], a state watcher calls
//! [`QuerySync::sync_to_route`]), so each outbound write would normally come
//! straight back as an inbound change. `QuerySync` remembers the normalized
//! form of its last write and swallows exactly one matching inbound
//! notification.

use std::cell::RefCell;
use std::rc::Rc;

use crate::query::{QueryState, RawQuery, normalize_query};

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Read/replace access to the external location query.
pub trait QueryStore {
    /// Current query.
    fn read(&self) -> RawQuery;

    /// Replace the query without creating a new history entry.
    fn replace(&self, query: QueryState);
}

/// Conversion between the query and a typed state.
///
/// Both functions must be total: `parse` falls back to defaults for missing
/// or malformed keys and `build` emits the canonical minimal form.
pub trait QueryCodec {
    /// Typed state carried by the query.
    type State;

    /// Read a typed state out of a raw query.
    fn parse(&self, query: &RawQuery) -> Self::State;

    /// Encode a typed state, omitting keys equal to their default.
    fn build(&self, state: &Self::State) -> QueryState;
}

/// Bridge to the consumer's own copy of the state.
pub trait StateBinding<S> {
    /// Replace the consumer's state with `state`.
    fn apply(&self, state: S);

    /// Current consumer state.
    fn snapshot(&self) -> S;
}

impl<T: QueryStore + ?Sized> QueryStore for Rc<T> {
    fn read(&self) -> RawQuery {
        (**self).read()
    }

    fn replace(&self, query: QueryState) {
        (**self).replace(query);
    }
}

impl<S, T: StateBinding<S> + ?Sized> StateBinding<S> for Rc<T> {
    fn apply(&self, state: S) {
        (**self).apply(state);
    }

    fn snapshot(&self) -> S {
        (**self).snapshot()
    }
}

/// [`StateBinding`] built from a pair of closures.
pub struct FnBinding<A, G> {
    apply: A,
    snapshot: G,
}

impl<A, G> FnBinding<A, G> {
    /// `apply` receives parsed state, `snapshot` returns the current one.
    pub fn new(apply: A, snapshot: G) -> Self {
        Self { apply, snapshot }
    }
}

impl<S, A, G> StateBinding<S> for FnBinding<A, G>
where
    A: Fn(S),
    G: Fn() -> S,
{
    fn apply(&self, state: S) {
        (self.apply)(state);
    }

    fn snapshot(&self) -> S {
        (self.snapshot)()
    }
}

// =============================================================================
// SYNCHRONIZER
// =============================================================================

/// Result of [`QuerySync::sync_from_route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FromRoute {
    /// The location matched our last write; nothing was applied.
    EchoSuppressed,
    /// The location was parsed and applied to the consumer state.
    Applied,
}

/// Result of [`QuerySync::sync_to_route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToRoute {
    /// The location already matched the state; nothing was written.
    Unchanged,
    /// The location was replaced.
    Pushed,
}

/// Keeps a [`QueryStore`] and a [`StateBinding`] in step.
pub struct QuerySync<L, C, B> {
    store: L,
    codec: C,
    binding: B,
    /// Normalized form of the last outbound write, cleared by the next
    /// inbound sync.
    last_pushed: RefCell<Option<QueryState>>,
}

impl<L, C, B> QuerySync<L, C, B>
where
    L: QueryStore,
    C: QueryCodec,
    B: StateBinding<C::State>,
{
    /// Wire a synchronizer from its capabilities.
    pub fn new(store: L, codec: C, binding: B) -> Self {
        Self {
            store,
            codec,
            binding,
            last_pushed: RefCell::new(None),
        }
    }

    /// Pull the location into the consumer state.
    ///
    /// An inbound query equal to our last write is treated as its echo: the
    /// remembered write is forgotten and nothing else happens. Any other
    /// query is parsed and applied.
    pub fn sync_from_route(&self) -> FromRoute {
        let current = self.store.read();
        let normalized = normalize_query(&current);
        let last = self.last_pushed.borrow_mut().take();

        if last.as_ref() == Some(&normalized) {
            tracing::debug!(query = %normalized.to_query_string(), "suppressed query echo");
            return FromRoute::EchoSuppressed;
        }

        let state = self.codec.parse(&current);
        tracing::debug!(query = %normalized.to_query_string(), "applying location query");
        self.binding.apply(state);
        FromRoute::Applied
    }

    /// Push the consumer state into the location.
    ///
    /// Nothing is written when the location already holds the same
    /// normalized query.
    pub fn sync_to_route(&self) -> ToRoute {
        let next = self.codec.build(&self.binding.snapshot());
        let next_normalized = next.normalized();
        let current = normalize_query(&self.store.read());

        if next_normalized == current {
            return ToRoute::Unchanged;
        }

        tracing::debug!(query = %next_normalized.to_query_string(), "replacing location query");
        *self.last_pushed.borrow_mut() = Some(next_normalized);
        self.store.replace(next);
        ToRoute::Pushed
    }

    /// Normalized form of a write still waiting for its echo.
    pub fn pending_echo(&self) -> Option<QueryState> {
        self.last_pushed.borrow().clone()
    }

    /// The location store.
    pub fn store(&self) -> &L {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::MemoryLocation;

    /// Codec over a single optional `q` key.
    struct TextCodec;

    impl QueryCodec for TextCodec {
        type State = String;

        fn parse(&self, query: &RawQuery) -> String {
            query.scalar("q").to_string()
        }

        fn build(&self, state: &String) -> QueryState {
            let mut out = QueryState::new();
            if !state.is_empty() {
                out.insert("q", state.clone());
            }
            out
        }
    }

    #[test]
    fn test_echo_is_suppressed_exactly_once() {
        let location = MemoryLocation::new();
        let state = Rc::new(RefCell::new("hello".to_string()));
        let applies = Rc::new(Cell::new(0));
        let binding = FnBinding::new(
            {
                let state = Rc::clone(&state);
                let applies = Rc::clone(&applies);
                move |next: String| {
                    applies.set(applies.get() + 1);
                    *state.borrow_mut() = next;
                }
            },
            {
                let state = Rc::clone(&state);
                move || state.borrow().clone()
            },
        );
        let sync = QuerySync::new(location.clone(), TextCodec, binding);

        assert_eq!(sync.sync_to_route(), ToRoute::Pushed);
        assert_eq!(sync.pending_echo(), Some(QueryState::new().with("q", "hello")));

        assert_eq!(sync.sync_from_route(), FromRoute::EchoSuppressed);
        assert_eq!(sync.pending_echo(), None);
        assert_eq!(applies.get(), 0);

        // The snapshot is gone, so the same query now counts as inbound.
        assert_eq!(sync.sync_from_route(), FromRoute::Applied);
        assert_eq!(applies.get(), 1);
    }

    #[test]
    fn test_mismatched_inbound_clears_snapshot_and_applies() {
        let location = MemoryLocation::new();
        let state = Rc::new(RefCell::new("mine".to_string()));
        let binding = FnBinding::new(
            {
                let state = Rc::clone(&state);
                move |next: String| *state.borrow_mut() = next
            },
            {
                let state = Rc::clone(&state);
                move || state.borrow().clone()
            },
        );
        let sync = QuerySync::new(location.clone(), TextCodec, binding);

        sync.sync_to_route();
        location.navigate(RawQuery::new().with("q", "theirs"));

        assert_eq!(sync.sync_from_route(), FromRoute::Applied);
        assert_eq!(*state.borrow(), "theirs");
        assert_eq!(sync.pending_echo(), None);
    }
}
