//! List, detail and save state backed by a [`UserApi`].

use std::cell::{Cell, RefCell};

use chrono::Utc;
use serde::Serialize;
use uac_query::{ListQuery, StateBinding};

use crate::api::UserApi;
use crate::error::Result;
use crate::model::{ListRequest, User, UserCreate, UserId, UserUpdate};

/// State of the user list view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListState {
    pub items: Vec<User>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        let query = ListQuery::default();
        Self {
            items: Vec::new(),
            total: 0,
            page: query.page,
            limit: query.limit,
            search: query.search,
            is_loading: false,
            error: None,
        }
    }
}

/// State of the single-user view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailState {
    pub current: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// State of the create/edit submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveState {
    pub is_saving: bool,
    pub error: Option<String>,
}

/// What happened to a [`UserStore::fetch_list`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    /// The response replaced the list.
    Loaded,
    /// The call failed and its message is in [`ListState::error`].
    Failed,
    /// A newer request was issued meanwhile; the response was dropped.
    Superseded,
}

/// Client-side user state.
///
/// Every list fetch takes a fresh request id. A response, successful or not,
/// is only applied if its id is still the latest, so a slow response can
/// never overwrite the results of a newer query.
#[derive(Debug)]
pub struct UserStore<A> {
    api: A,
    list: RefCell<ListState>,
    detail: RefCell<DetailState>,
    save: RefCell<SaveState>,
    list_request_id: Cell<u64>,
}

impl<A: UserApi> UserStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            list: RefCell::new(ListState::default()),
            detail: RefCell::new(DetailState::default()),
            save: RefCell::new(SaveState::default()),
            list_request_id: Cell::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn list(&self) -> ListState {
        self.list.borrow().clone()
    }

    pub fn detail(&self) -> DetailState {
        self.detail.borrow().clone()
    }

    pub fn save_state(&self) -> SaveState {
        self.save.borrow().clone()
    }

    // =========================================================================
    // List
    // =========================================================================

    /// Set page, limit and search without fetching.
    pub fn apply_query(&self, query: &ListQuery) {
        let mut list = self.list.borrow_mut();
        list.page = query.page;
        list.limit = query.limit;
        list.search.clone_from(&query.search);
    }

    /// Current page, limit and search.
    pub fn query(&self) -> ListQuery {
        let list = self.list.borrow();
        ListQuery {
            page: list.page,
            limit: list.limit,
            search: list.search.clone(),
        }
    }

    /// Fetch the list for the current query.
    ///
    /// On success the items, total, page and limit come from the response.
    /// `is_loading` stays set until the latest request settles.
    pub async fn fetch_list(&self) -> ListOutcome {
        let id = self.list_request_id.get() + 1;
        self.list_request_id.set(id);

        let request = {
            let mut list = self.list.borrow_mut();
            list.is_loading = true;
            list.error = None;
            ListRequest {
                page: list.page,
                limit: list.limit,
                search: list.search.clone(),
            }
        };
        tracing::debug!(request_id = id, page = request.page, search = %request.search, "fetching users");

        let response = self.api.list(request).await;

        if id != self.list_request_id.get() {
            tracing::debug!(request_id = id, "discarding superseded list response");
            return ListOutcome::Superseded;
        }

        let mut list = self.list.borrow_mut();
        list.is_loading = false;
        match response {
            Ok(page) => {
                list.items = page.items;
                list.total = page.total;
                list.page = page.page;
                list.limit = page.limit;
                ListOutcome::Loaded
            }
            Err(e) => {
                tracing::warn!(request_id = id, error = %e, "user list request failed");
                list.error = Some(e.to_string());
                ListOutcome::Failed
            }
        }
    }

    /// Clear the list error.
    pub fn reset_list_state(&self) {
        self.list.borrow_mut().error = None;
    }

    // =========================================================================
    // Detail
    // =========================================================================

    /// Load one user into the detail state.
    pub async fn fetch_one(&self, id: UserId) -> Option<User> {
        {
            let mut detail = self.detail.borrow_mut();
            detail.is_loading = true;
            detail.error = None;
            detail.current = None;
        }

        let response = self.api.get(id).await;

        let mut detail = self.detail.borrow_mut();
        detail.is_loading = false;
        match response {
            Ok(user) => {
                detail.current = Some(user.clone());
                Some(user)
            }
            Err(e) => {
                detail.error = Some(e.to_string());
                None
            }
        }
    }

    /// Clear the loaded user, its error and the save error.
    pub fn reset_detail_state(&self) {
        *self.detail.borrow_mut() = DetailState::default();
        self.save.borrow_mut().error = None;
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Create a user stamped with the current time.
    pub async fn create(&self, fields: UserUpdate) -> Result<User> {
        let payload = UserCreate::from_update(fields, Utc::now());
        self.begin_save();
        let result = self.api.create(payload).await;
        self.finish_save(result)
    }

    /// Overwrite the editable fields of user `id`.
    pub async fn update(&self, id: UserId, fields: UserUpdate) -> Result<User> {
        self.begin_save();
        let result = self.api.update(id, fields).await;
        self.finish_save(result)
    }

    /// Clear the save error.
    pub fn reset_save_error(&self) {
        self.save.borrow_mut().error = None;
    }

    fn begin_save(&self) {
        let mut save = self.save.borrow_mut();
        save.is_saving = true;
        save.error = None;
    }

    fn finish_save(&self, result: Result<User>) -> Result<User> {
        let mut save = self.save.borrow_mut();
        save.is_saving = false;
        if let Err(e) = &result {
            save.error = Some(e.to_string());
        }
        result
    }
}

impl<A: UserApi> StateBinding<ListQuery> for UserStore<A> {
    fn apply(&self, state: ListQuery) {
        self.apply_query(&state);
    }

    fn snapshot(&self) -> ListQuery {
        self.query()
    }
}
