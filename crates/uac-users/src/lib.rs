//! User directory for the User Admin Console.
//!
//! - [`model`]: user records and request/response payloads
//! - [`UserApi`]: the backend seam, with [`MemoryBackend`] as the bundled
//!   implementation (JSON file persistence, optional latency)
//! - [`UserStore`]: list, detail and save state with stale-response
//!   protection
//! - [`UserForm`]: create/edit form validation
//! - [`UsersListController`]: debounced search and location query sync for
//!   the list page

mod api;
mod backend;
mod controller;
pub mod error;
mod form;
pub mod model;
mod store;

pub use api::UserApi;
pub use backend::MemoryBackend;
pub use controller::UsersListController;
pub use error::{ApiError, Result};
pub use form::{UserField, UserForm};
pub use model::{
    ListRequest, UnknownStatus, User, UserCreate, UserId, UserStatus, UserUpdate, UsersPage,
};
pub use store::{DetailState, ListOutcome, ListState, SaveState, UserStore};
