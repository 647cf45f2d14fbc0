use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

/// Customer record. `aprovado` is tri-state: approved, rejected, or
/// pending while still `None`. Toggling it keeps no audit trail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    pub id: ClientId,
    pub razao_social: String,
    pub nome_fantasia: String,
    pub cnpj: String,
    pub email: String,
    pub telefone: String,
    pub endereco: String,
    pub cidade: String,
    pub estado: String,
    pub contato_principal: String,
    pub aprovado: Option<bool>,
    pub created_date: String,
    pub updated_date: String,
}

impl Client {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.razao_social.trim().is_empty() {
            return Err(DomainError::MissingRequiredField("razao_social"));
        }
        Ok(())
    }
}
