use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perfil {
    Admin,
    #[default]
    Usuario,
}

impl Perfil {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Usuario => "usuario",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "admin" => Self::Admin,
            _ => Self::Usuario,
        }
    }
}

/// Public user shape. Password material never leaves the persistence
/// layer; this type carries only what the API exposes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: UserId,
    pub nome: String,
    pub login: String,
    pub perfil: Perfil,
    pub ativo: bool,
    pub created_date: String,
}

/// Create/update payload for user management. `senha` is optional on
/// update: a blank password keeps the stored hash.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub nome: String,
    pub login: String,
    pub senha: String,
    pub perfil: Perfil,
    pub ativo: Option<bool>,
}

impl UserInput {
    pub fn validate_for_create(&self) -> Result<(), DomainError> {
        if self.nome.trim().is_empty() {
            return Err(DomainError::MissingRequiredField("nome"));
        }
        if self.login.trim().is_empty() {
            return Err(DomainError::MissingRequiredField("login"));
        }
        if self.senha.trim().is_empty() {
            return Err(DomainError::MissingRequiredField("senha"));
        }
        Ok(())
    }

    /// Logins are stored lowercased so lookups are case-insensitive.
    pub fn normalized_login(&self) -> String {
        self.login.trim().to_lowercase()
    }
}
