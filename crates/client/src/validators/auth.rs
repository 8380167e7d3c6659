//! Login and signup forms.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use santafe_core::Email;

use super::{FieldErrors, char_len, trimmed};

pub const INVALID_EMAIL: &str = "E-mail inválido";
pub const PASSWORD_REQUIRED: &str = "Senha é obrigatória";
pub const NAME_TOO_SHORT: &str = "Nome muito curto";
pub const PHONE_TOO_SHORT: &str = "Telefone muito curto";
pub const PASSWORD_TOO_SHORT: &str = "A senha deve ter no mínimo 6 caracteres";
pub const CONFIRMATION_TOO_SHORT: &str = "A confirmação deve ter no mínimo 6 caracteres";
pub const PASSWORDS_DIFFER: &str = "As senhas não coincidem";

const MIN_NAME_LEN: usize = 2;
const MIN_PHONE_LEN: usize = 8;
const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// Login
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoginField {
    Email,
    Password,
}

impl fmt::Display for LoginField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "email",
            Self::Password => "password",
        })
    }
}

/// Raw login input.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

/// Login input that passed validation.
#[derive(Debug, Clone)]
pub struct ValidLogin {
    pub email: Email,
    pub password: SecretString,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the offending fields when the email is malformed or the
    /// password is empty.
    pub fn validate(&self) -> Result<ValidLogin, FieldErrors<LoginField>> {
        let mut errors = FieldErrors::new();

        let email = Email::parse(&self.email)
            .map_err(|_| errors.insert(LoginField::Email, INVALID_EMAIL))
            .ok();

        if self.password.expose_secret().is_empty() {
            errors.insert(LoginField::Password, PASSWORD_REQUIRED);
        }

        match email {
            Some(email) => errors.into_result(|| ValidLogin {
                email,
                password: self.password.clone(),
            }),
            None => Err(errors),
        }
    }
}

// =============================================================================
// Signup
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignupField {
    Name,
    Email,
    Phone,
    Password,
    ConfirmPassword,
}

impl fmt::Display for SignupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        })
    }
}

/// Raw signup input.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// Signup input that passed validation.
#[derive(Debug, Clone)]
pub struct ValidSignup {
    pub nome: String,
    pub email: Email,
    /// Trimmed; `None` when left blank.
    pub telefone: Option<String>,
    pub senha: SecretString,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns one message per failing field. A password mismatch is
    /// reported on the confirmation field and replaces its length message.
    pub fn validate(&self) -> Result<ValidSignup, FieldErrors<SignupField>> {
        let mut errors = FieldErrors::new();

        let nome = self.name.trim();
        if char_len(nome) < MIN_NAME_LEN {
            errors.insert(SignupField::Name, NAME_TOO_SHORT);
        }

        let email = Email::parse(&self.email)
            .map_err(|_| errors.insert(SignupField::Email, INVALID_EMAIL))
            .ok();

        let telefone = trimmed(self.phone.as_deref());
        if telefone.as_deref().is_some_and(|t| char_len(t) < MIN_PHONE_LEN) {
            errors.insert(SignupField::Phone, PHONE_TOO_SHORT);
        }

        let password = self.password.expose_secret();
        let confirmation = self.confirm_password.expose_secret();
        if char_len(password) < MIN_PASSWORD_LEN {
            errors.insert(SignupField::Password, PASSWORD_TOO_SHORT);
        }
        if char_len(confirmation) < MIN_PASSWORD_LEN {
            errors.insert(SignupField::ConfirmPassword, CONFIRMATION_TOO_SHORT);
        }
        if password != confirmation {
            errors.insert(SignupField::ConfirmPassword, PASSWORDS_DIFFER);
        }

        match email {
            Some(email) => errors.into_result(|| ValidSignup {
                nome: nome.to_string(),
                email,
                telefone,
                senha: self.password.clone(),
            }),
            None => Err(errors),
        }
    }
}
