//! Location query handling for the User Admin Console.
//!
//! This crate keeps a typed piece of UI state (for example the users list's
//! page, limit and search text) in step with the query part of an
//! addressable location, in both directions:
//!
//! - **Query model** (`query`): raw external values, the normalized sparse
//!   [`QueryState`] and `x-www-form-urlencoded` conversion
//! - **Synchronization** (`sync`): [`QuerySync`] with echo suppression so
//!   that our own writes never bounce back as external changes
//! - **List queries** (`list`): the `page` / `limit` / `search` codec
//! - **In-memory location** (`location`): a [`QueryStore`] for tests and the
//!   command-line front end
//!
//! # Example
//!
//! ```ignore
//! use uac_query::{ListQueryCodec, MemoryLocation, QuerySync};
//!
//! let location = MemoryLocation::from_query_string("page=2&search=ann");
//! let sync = QuerySync::new(location.clone(), ListQueryCodec::default(), binding);
//!
//! sync.sync_from_route(); // location -> state
//! sync.sync_to_route();   // state -> location
//! ```

mod list;
mod location;
mod query;
mod sync;

pub use list::{DEFAULT_LIMIT, DEFAULT_PAGE, ListQuery, ListQueryCodec};
pub use location::MemoryLocation;
pub use query::{QueryState, RawQuery, RawValue, normalize_query};
pub use sync::{FnBinding, FromRoute, QueryCodec, QueryStore, QuerySync, StateBinding, ToRoute};
