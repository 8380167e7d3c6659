//! Profile edit form.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use santafe_core::Email;

use super::{FieldErrors, char_len, trimmed};

pub const NAME_TOO_SHORT: &str = "Nome muito curto";
pub const INVALID_EMAIL: &str = "Email inválido";
pub const INVALID_PHONE: &str = "Telefone inválido";
pub const INVALID_CPF: &str = "CPF inválido";
pub const INVALID_UF: &str = "UF inválida";
pub const INVALID_CEP: &str = "CEP inválido";

static CPF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{11}|\d{3}\.\d{3}\.\d{3}-\d{2})$").expect("Invalid regex")
});
static UF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("Invalid regex"));
static CEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5}-\d{3}|\d{8})$").expect("Invalid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileField {
    Nome,
    Email,
    Telefone,
    Cpf,
    Estado,
    Cep,
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Nome => "nome",
            Self::Email => "email",
            Self::Telefone => "telefone",
            Self::Cpf => "cpf",
            Self::Estado => "estado",
            Self::Cep => "cep",
        })
    }
}

/// Raw profile input. Blank optional fields count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub cpf: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
}

/// Profile input that passed validation, every field trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProfile {
    pub nome: String,
    pub email: Email,
    pub telefone: Option<String>,
    pub cpf: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
}

fn check(
    errors: &mut FieldErrors<ProfileField>,
    field: ProfileField,
    value: Option<&str>,
    valid: impl Fn(&str) -> bool,
    message: &str,
) {
    if value.is_some_and(|v| !valid(v)) {
        errors.insert(field, message);
    }
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns one message per failing field.
    pub fn validate(&self) -> Result<ValidProfile, FieldErrors<ProfileField>> {
        let mut errors = FieldErrors::new();

        let nome = self.nome.trim();
        if char_len(nome) < 2 {
            errors.insert(ProfileField::Nome, NAME_TOO_SHORT);
        }

        let email = Email::parse(&self.email)
            .map_err(|_| errors.insert(ProfileField::Email, INVALID_EMAIL))
            .ok();

        let telefone = trimmed(self.telefone.as_deref());
        let cpf = trimmed(self.cpf.as_deref());
        let estado = trimmed(self.estado.as_deref());
        let cep = trimmed(self.cep.as_deref());

        check(
            &mut errors,
            ProfileField::Telefone,
            telefone.as_deref(),
            |t| char_len(t) >= 8,
            INVALID_PHONE,
        );
        check(
            &mut errors,
            ProfileField::Cpf,
            cpf.as_deref(),
            |c| CPF_RE.is_match(c),
            INVALID_CPF,
        );
        check(
            &mut errors,
            ProfileField::Estado,
            estado.as_deref(),
            |e| UF_RE.is_match(e),
            INVALID_UF,
        );
        check(
            &mut errors,
            ProfileField::Cep,
            cep.as_deref(),
            |c| CEP_RE.is_match(c),
            INVALID_CEP,
        );

        match email {
            Some(email) => errors.into_result(|| ValidProfile {
                nome: nome.to_string(),
                email,
                telefone,
                cpf,
                endereco: trimmed(self.endereco.as_deref()),
                cidade: trimmed(self.cidade.as_deref()),
                estado,
                cep,
            }),
            None => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ProfileForm {
        ProfileForm {
            nome: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_profile_is_valid() {
        let valid = form().validate().unwrap();
        assert_eq!(valid.nome, "Ana Souza");
        assert!(valid.cpf.is_none());
    }

    #[test]
    fn test_cpf_formats() {
        for cpf in ["12345678909", "123.456.789-09", " 123.456.789-09 "] {
            let f = ProfileForm {
                cpf: Some(cpf.to_string()),
                ..form()
            };
            assert!(f.validate().is_ok(), "{cpf}");
        }
        for cpf in ["1234567890", "123.456.789.09", "123456789-09"] {
            let f = ProfileForm {
                cpf: Some(cpf.to_string()),
                ..form()
            };
            let errors = f.validate().unwrap_err();
            assert_eq!(errors.get(&ProfileField::Cpf), Some(INVALID_CPF), "{cpf}");
        }
    }

    #[test]
    fn test_uf_and_cep() {
        let f = ProfileForm {
            estado: Some("sp".to_string()),
            cep: Some("01310-100".to_string()),
            ..form()
        };
        assert!(f.validate().is_ok());

        let f = ProfileForm {
            estado: Some("SPA".to_string()),
            cep: Some("1310-100".to_string()),
            ..form()
        };
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.get(&ProfileField::Estado), Some(INVALID_UF));
        assert_eq!(errors.get(&ProfileField::Cep), Some(INVALID_CEP));
    }

    #[test]
    fn test_blank_optionals_are_unset() {
        let f = ProfileForm {
            telefone: Some("   ".to_string()),
            cidade: Some("".to_string()),
            ..form()
        };
        let valid = f.validate().unwrap();
        assert_eq!(valid.telefone, None);
        assert_eq!(valid.cidade, None);
    }

    #[test]
    fn test_invalid_name_email_phone() {
        let f = ProfileForm {
            nome: " A ".to_string(),
            email: "ana@".to_string(),
            telefone: Some("1234".to_string()),
            ..Default::default()
        };
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.get(&ProfileField::Nome), Some(NAME_TOO_SHORT));
        assert_eq!(errors.get(&ProfileField::Email), Some(INVALID_EMAIL));
        assert_eq!(errors.get(&ProfileField::Telefone), Some(INVALID_PHONE));
    }
}
