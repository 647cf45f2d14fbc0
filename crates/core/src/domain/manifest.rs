use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::numeric::lenient_decimal;
use crate::errors::DomainError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManifestId(pub String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ManifestStatus {
    #[default]
    Pendente,
    EmTransito,
    Entregue,
    Cancelado,
}

impl ManifestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendente => "pendente",
            Self::EmTransito => "em_transito",
            Self::Entregue => "entregue",
            Self::Cancelado => "cancelado",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "em_transito" => Self::EmTransito,
            "entregue" => Self::Entregue,
            "cancelado" => Self::Cancelado,
            _ => Self::Pendente,
        }
    }
}

impl From<String> for ManifestStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ManifestStatus> for String {
    fn from(value: ManifestStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestItem {
    pub descricao: String,
    #[serde(deserialize_with = "lenient_decimal")]
    pub quantidade: Decimal,
    pub unidade: String,
    pub peso: String,
    pub observacao_item: String,
}

/// Shipment record, optionally linked to a proposal. The proposal number
/// and client name are denormalized at link time and never re-synced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryManifest {
    pub id: ManifestId,
    pub numero: String,
    pub proposta_id: Option<String>,
    pub proposta_numero: String,
    pub cliente_nome: String,
    pub data_emissao: String,
    pub data_entrega: String,
    pub status: ManifestStatus,
    pub endereco_entrega: String,
    pub observacoes: String,
    pub itens: Vec<ManifestItem>,
    pub created_date: String,
    pub updated_date: String,
}

impl DeliveryManifest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.numero.trim().is_empty() {
            return Err(DomainError::MissingRequiredField("numero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DeliveryManifest, ManifestStatus};

    #[test]
    fn unknown_status_degrades_to_pending() {
        assert_eq!(ManifestStatus::parse("extraviado"), ManifestStatus::Pendente);
        assert_eq!(ManifestStatus::parse("em_transito"), ManifestStatus::EmTransito);
    }

    #[test]
    fn validation_requires_a_number() {
        assert!(DeliveryManifest::default().validate().is_err());
        let manifest =
            DeliveryManifest { numero: "ROM-2026-014".to_string(), ..DeliveryManifest::default() };
        assert!(manifest.validate().is_ok());
    }
}
