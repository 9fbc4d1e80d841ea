//! Shared fixtures for the user directory tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use uac_users::{User, UserStatus};

pub fn user(id: u64, full_name: &str, email: &str) -> User {
    User {
        id,
        full_name: full_name.to_string(),
        email: email.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
            + chrono::Duration::days(id as i64),
        status: UserStatus::Active,
    }
}

/// Five users; two match "ann", one matches "EXAMPLE.ORG".
pub fn directory() -> Vec<User> {
    vec![
        user(1, "Ann Lee", "ann@example.com"),
        user(2, "Bob Stone", "bob@example.com"),
        user(3, "Joanna Hall", "jo@example.org"),
        user(4, "Carl Ruiz", "carl@example.com"),
        user(5, "Dee Park", "dee@example.com"),
    ]
}
