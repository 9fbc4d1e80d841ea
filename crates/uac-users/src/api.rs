//! The backend seam.

use std::rc::Rc;

use crate::error::Result;
use crate::model::{ListRequest, User, UserCreate, UserId, UserUpdate, UsersPage};

/// Operations the console needs from a user directory.
///
/// Calls are awaited on a single-threaded executor, so implementations are
/// free to hold `Rc` state and their futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait UserApi {
    /// One page of users matching `request.search`.
    async fn list(&self, request: ListRequest) -> Result<UsersPage>;

    /// A single user.
    async fn get(&self, id: UserId) -> Result<User>;

    /// Store a new user and return it with its assigned id.
    async fn create(&self, payload: UserCreate) -> Result<User>;

    /// Overwrite a user's editable fields.
    async fn update(&self, id: UserId, payload: UserUpdate) -> Result<User>;
}

impl<T: UserApi + ?Sized> UserApi for Rc<T> {
    async fn list(&self, request: ListRequest) -> Result<UsersPage> {
        (**self).list(request).await
    }

    async fn get(&self, id: UserId) -> Result<User> {
        (**self).get(id).await
    }

    async fn create(&self, payload: UserCreate) -> Result<User> {
        (**self).create(payload).await
    }

    async fn update(&self, id: UserId, payload: UserUpdate) -> Result<User> {
        (**self).update(id, payload).await
    }
}
