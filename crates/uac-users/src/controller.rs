//! The user list page: search box, location query and store wired together.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use uac_query::{FromRoute, ListQuery, ListQueryCodec, QueryStore, QuerySync, ToRoute};
use uac_reactive::{Debounced, ReadSignal, Scheduler, Signal, Subscription};

use crate::api::UserApi;
use crate::store::{ListOutcome, UserStore};

type StoreSync<L, A> = QuerySync<L, ListQueryCodec, Rc<UserStore<A>>>;

/// Drives the user list from a search box and the location query.
///
/// Keystrokes go into [`search_input`](Self::search_input). Once typing
/// pauses for the debounce delay, the trimmed text becomes the store's
/// search, the page goes back to 1 and the location query is updated. The
/// echo of that update is suppressed by [`on_navigate`](Self::on_navigate),
/// while genuine navigation is parsed back into the store.
///
/// Neither path fetches on its own: they raise
/// [`needs_refresh`](Self::needs_refresh) and the caller awaits
/// [`refresh`](Self::refresh).
pub struct UsersListController<L, A> {
    store: Rc<UserStore<A>>,
    sync: Rc<StoreSync<L, A>>,
    search: Signal<String>,
    debounced: Debounced<String>,
    dirty: Rc<Cell<bool>>,
    _settled: Subscription,
}

impl<L, A> UsersListController<L, A>
where
    L: QueryStore + 'static,
    A: UserApi + 'static,
{
    /// Mount the page: restore the store from the location and seed the
    /// search box with the restored search.
    pub fn new(
        store: Rc<UserStore<A>>,
        location: L,
        codec: ListQueryCodec,
        delay: Duration,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let sync = Rc::new(QuerySync::new(location, codec, Rc::clone(&store)));
        sync.sync_from_route();

        let search = Signal::new(store.query().search);
        let debounced = Debounced::new(&search, delay, scheduler);
        let dirty = Rc::new(Cell::new(true));

        let settled = debounced.value().subscribe({
            let store = Rc::clone(&store);
            let sync = Rc::clone(&sync);
            let dirty = Rc::clone(&dirty);
            move |text: &String| {
                let current = store.query();
                if text.trim() == current.search {
                    return;
                }
                store.apply_query(&current.with_search(text));
                if sync.sync_to_route() == ToRoute::Pushed {
                    tracing::debug!(search = %text.trim(), "search settled");
                }
                dirty.set(true);
            }
        });

        Self {
            store,
            sync,
            search,
            debounced,
            dirty,
            _settled: settled,
        }
    }

    /// The raw search box.
    pub fn search_input(&self) -> &Signal<String> {
        &self.search
    }

    /// Search text after the debounce.
    pub fn settled_search(&self) -> ReadSignal<String> {
        self.debounced.value()
    }

    /// Whether typed text is still waiting for the debounce.
    pub fn is_search_pending(&self) -> bool {
        self.debounced.is_pending()
    }

    /// Type into the search box.
    pub fn set_search(&self, text: impl Into<String>) {
        self.search.set(text.into());
    }

    /// Go to `page`, keeping search and limit.
    pub fn set_page(&self, page: u32) {
        self.store.apply_query(&self.store.query().with_page(page));
        self.sync.sync_to_route();
        self.dirty.set(true);
    }

    /// React to a location change.
    ///
    /// Returns whether the store's query changed, i.e. whether a refetch is
    /// needed. Our own writes coming back are ignored.
    pub fn on_navigate(&self) -> bool {
        let before = self.store.query();
        if self.sync.sync_from_route() == FromRoute::EchoSuppressed {
            return false;
        }

        let after = self.store.query();
        if after == before {
            return false;
        }
        self.search.set_if_changed(after.search.clone());
        self.dirty.set(true);
        true
    }

    /// Whether the store's query changed since the last [`refresh`](Self::refresh).
    pub fn needs_refresh(&self) -> bool {
        self.dirty.get()
    }

    /// Fetch the list for the current query.
    pub async fn refresh(&self) -> ListOutcome {
        self.dirty.set(false);
        self.store.fetch_list().await
    }

    pub fn query(&self) -> ListQuery {
        self.store.query()
    }

    pub fn store(&self) -> &Rc<UserStore<A>> {
        &self.store
    }

    pub fn location(&self) -> &L {
        self.sync.store()
    }

    /// Stop reacting to the search box; pending input is dropped.
    pub fn dispose(&mut self) {
        self.debounced.dispose();
    }
}
