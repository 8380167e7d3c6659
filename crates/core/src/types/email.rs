//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty (after trimming).
    #[error("email cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    MissingAtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The local part starts with a dot or contains consecutive dots.
    #[error("email local part is malformed")]
    MalformedLocalPart,
    /// The domain part (after @) is empty.
    #[error("email domain cannot be empty")]
    EmptyDomain,
    /// The domain has no dot-separated top-level domain, or an empty label.
    #[error("email domain is malformed: {0}")]
    MalformedDomain(String),
    /// The input contains whitespace or another forbidden character.
    #[error("email contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// An email address, trimmed and structurally validated.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed before validation
/// - Length: 1-254 characters (RFC 5321 limit)
/// - Exactly one @ symbol, no whitespace
/// - Local part: non-empty, only ASCII letters, digits and `_ ' + . -`,
///   no leading or trailing dot, no `..`, not ending in `'`
/// - Domain: at least two non-empty labels, the last one alphabetic and 2+ chars
///
/// ## Examples
///
/// ```
/// use santafe_core::Email;
///
/// assert!(Email::parse("cliente@santafe.com.br").is_ok());
/// assert!(Email::parse("  maria+feira@gmail.com ").is_ok());
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("sem-arroba").is_err());
/// assert!(Email::parse("joao@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first structural problem found.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(EmailError::InvalidCharacter(c));
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::MissingAtSymbol);
        }

        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if let Some(c) = local.chars().find(|&c| !is_local_char(c)) {
            return Err(EmailError::InvalidCharacter(c));
        }
        if local.starts_with('.')
            || local.ends_with('.')
            || local.ends_with('\'')
            || local.contains("..")
        {
            return Err(EmailError::MalformedLocalPart);
        }

        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }
        validate_domain(domain)?;

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the local part of the email (before the @).
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or("", |(local, _)| local)
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

const fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '+' | '.' | '-')
}

fn validate_domain(domain: &str) -> Result<(), EmailError> {
    let malformed = || EmailError::MalformedDomain(domain.to_owned());

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err(malformed());
    }

    for label in &labels {
        let valid = !label.is_empty()
            && !label.starts_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(malformed());
        }
    }

    let tld = labels.last().copied().unwrap_or_default();
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(malformed());
    }

    Ok(())
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
