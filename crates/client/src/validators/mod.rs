//! Form validation for the auth and profile flows.
//!
//! Each form has a `validate` method that either yields a normalized value
//! (trimmed strings, parsed [`Email`](santafe_core::Email), empty optionals
//! collapsed to `None`) or a [`FieldErrors`] map with one user-facing
//! message per offending field. Messages are in Portuguese, as shown to
//! customers.

pub mod auth;
pub mod profile;

pub use auth::{LoginField, LoginForm, SignupField, SignupForm, ValidLogin, ValidSignup};
pub use profile::{ProfileField, ProfileForm, ValidProfile};

use std::collections::BTreeMap;
use std::fmt;

/// Per-field validation messages, ordered by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: Ord> {
    errors: BTreeMap<F, String>,
}

impl<F: Ord> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: Ord> FieldErrors<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-field error.
    #[must_use]
    pub fn single(field: F, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Record `message` for `field`. A later message replaces an earlier one.
    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    #[must_use]
    pub fn get(&self, field: &F) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&F, &str)> {
        self.errors.iter().map(|(f, m)| (f, m.as_str()))
    }

    /// `Ok(value)` when no error was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl<F: Ord + fmt::Display> fmt::Display for FieldErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Trim an optional input, collapsing blank strings to `None`.
pub(crate) fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Length in characters, matching how users count.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
