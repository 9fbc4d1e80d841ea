//! Create/edit form for a user.

use std::fmt;

use uac_validate::{Schema, ValidationEngine, Values, email, required};

use crate::model::{User, UserStatus, UserUpdate};

/// Editable fields of the user form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    FullName,
    Email,
    Status,
}

impl UserField {
    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::Email => "Email",
            Self::Status => "Status",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn schema() -> Schema<UserField, String> {
    Schema::new()
        .field(UserField::FullName, vec![required()])
        .field(UserField::Email, vec![required(), email()])
        .field(UserField::Status, vec![])
}

fn values_of(update: &UserUpdate) -> Values<UserField, String> {
    Values::from([
        (UserField::FullName, update.full_name.clone()),
        (UserField::Email, update.email.clone()),
        (UserField::Status, update.status.to_string()),
    ])
}

/// Text inputs of the user form plus their validation state.
#[derive(Debug, Clone)]
pub struct UserForm {
    engine: ValidationEngine<UserField, String>,
}

impl Default for UserForm {
    fn default() -> Self {
        Self::new()
    }
}

impl UserForm {
    /// Blank form for a new user.
    pub fn new() -> Self {
        let blank = UserUpdate {
            full_name: String::new(),
            email: String::new(),
            status: UserStatus::default(),
        };
        Self {
            engine: ValidationEngine::new(values_of(&blank), schema()),
        }
    }

    /// Form prefilled with `user`'s fields.
    pub fn from_user(user: &User) -> Self {
        Self {
            engine: ValidationEngine::new(values_of(&UserUpdate::from(user)), schema()),
        }
    }

    /// Input change: store the text and re-check the field if it was touched.
    pub fn input(&mut self, field: UserField, text: impl Into<String>) {
        self.engine.set_field(field, text.into());
        if self.engine.is_touched(&field) {
            self.engine.validate_field(&field);
        }
    }

    /// Focus left `field`.
    pub fn blur(&mut self, field: UserField) {
        self.engine.touch_field(&field);
        self.engine.validate_field(&field);
    }

    /// Validate everything and build the payload.
    ///
    /// Every field is marked touched so all errors become visible. Returns
    /// `None` while any field is invalid. Text is trimmed; an unrecognized
    /// status becomes `active`.
    pub fn submit(&mut self) -> Option<UserUpdate> {
        self.engine.touch_all();
        if !self.engine.validate_all() {
            return None;
        }

        let text = |field: UserField| {
            self.engine
                .value(&field)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        Some(UserUpdate {
            full_name: text(UserField::FullName),
            email: text(UserField::Email),
            status: text(UserField::Status).parse().unwrap_or_default(),
        })
    }

    /// Back to the values the form was opened with, or `user`'s.
    pub fn reset(&mut self, user: Option<&User>) {
        self.engine
            .reset(user.map(|user| values_of(&UserUpdate::from(user))));
    }

    /// Error to show under `field`, once it was touched.
    pub fn visible_error(&self, field: UserField) -> Option<&str> {
        self.engine.visible_error(&field)
    }

    pub fn value(&self, field: UserField) -> &str {
        self.engine.value(&field).map_or("", String::as_str)
    }

    pub fn engine(&self) -> &ValidationEngine<UserField, String> {
        &self.engine
    }
}
