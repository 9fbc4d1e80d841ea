//! In-memory user directory with optional JSON file persistence.

use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::UserApi;
use crate::error::{ApiError, Result};
use crate::model::{ListRequest, User, UserCreate, UserId, UserUpdate, UsersPage};

/// On-disk layout of the database file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Database {
    #[serde(default)]
    users: Vec<User>,
}

/// A [`UserApi`] over a vector of users.
///
/// Listing follows the directory server's rules: page and limit are clamped
/// to at least 1, search is a case-insensitive substring match on full name
/// or email, and `total` counts matches before paging.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    users: RefCell<Vec<User>>,
    path: Option<PathBuf>,
    latency: Duration,
    fail_next: RefCell<Option<String>>,
    calls: Cell<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend seeded with `users`.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RefCell::new(users),
            ..Self::default()
        }
    }

    /// Load the database at `path`.
    ///
    /// A missing file yields an empty directory; [`save`](Self::save) will
    /// create it.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let database = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<Database>(&bytes).map_err(|source| {
                ApiError::Decode {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no user database yet, starting empty");
                Database::default()
            }
            Err(source) => {
                return Err(ApiError::Io {
                    operation: "read",
                    path,
                    source,
                });
            }
        };

        tracing::debug!(path = %path.display(), users = database.users.len(), "loaded user database");
        Ok(Self {
            users: RefCell::new(database.users),
            path: Some(path),
            ..Self::default()
        })
    }

    /// Delay every call by `latency` before answering.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make the next call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.fail_next.borrow_mut() = Some(message.into());
    }

    /// File this backend was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Snapshot of all users in storage order.
    pub fn users(&self) -> Vec<User> {
        self.users.borrow().clone()
    }

    /// Number of API calls served, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Write the directory back to the file it was loaded from.
    ///
    /// Does nothing for a backend without a file.
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    /// Write the directory to `path` through a temp file and rename.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let database = Database {
            users: self.users(),
        };
        let bytes = serde_json::to_vec_pretty(&database)
            .map_err(|e| ApiError::storage(format!("Failed to encode user database: {e}")))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ApiError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = path.with_extension("json.tmp");
        let io_error = |operation: &'static str| {
            let temp_path = temp_path.clone();
            move |source: std::io::Error| ApiError::Io {
                operation,
                path: temp_path,
                source,
            }
        };
        let mut file = File::create(&temp_path).map_err(io_error("create"))?;
        file.write_all(&bytes).map_err(io_error("write"))?;
        file.sync_all().map_err(io_error("sync"))?;
        fs::rename(&temp_path, path).map_err(|source| ApiError::Io {
            operation: "replace",
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), users = database.users.len(), "saved user database");
        Ok(())
    }

    /// Wait out the configured latency, then consume an injected failure.
    async fn begin_call(&self) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.calls.set(self.calls.get() + 1);
        match self.fail_next.borrow_mut().take() {
            Some(message) => Err(ApiError::storage(message)),
            None => Ok(()),
        }
    }
}

impl UserApi for MemoryBackend {
    async fn list(&self, request: ListRequest) -> Result<UsersPage> {
        self.begin_call().await?;

        let page = request.page.max(1);
        let limit = request.limit.max(1);
        let needle = request.search.trim().to_lowercase();

        let users = self.users.borrow();
        let matches: Vec<&User> = users
            .iter()
            .filter(|user| {
                needle.is_empty()
                    || user.full_name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            })
            .collect();

        let total = matches.len();
        let start = (page as usize - 1).saturating_mul(limit as usize);
        let items = matches
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(UsersPage {
            items,
            total,
            page,
            limit,
        })
    }

    async fn get(&self, id: UserId) -> Result<User> {
        self.begin_call().await?;
        self.users
            .borrow()
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(ApiError::NotFound { id })
    }

    async fn create(&self, payload: UserCreate) -> Result<User> {
        self.begin_call().await?;
        let mut users = self.users.borrow_mut();
        let id = users.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            full_name: payload.full_name,
            email: payload.email,
            created_at: payload.created_at,
            status: payload.status,
        };
        users.push(user.clone());
        tracing::debug!(id, "created user");
        Ok(user)
    }

    async fn update(&self, id: UserId, payload: UserUpdate) -> Result<User> {
        self.begin_call().await?;
        let mut users = self.users.borrow_mut();
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or(ApiError::NotFound { id })?;
        user.full_name = payload.full_name;
        user.email = payload.email;
        user.status = payload.status;
        tracing::debug!(id, "updated user");
        Ok(user.clone())
    }
}
