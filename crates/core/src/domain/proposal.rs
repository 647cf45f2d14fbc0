use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::numeric::lenient_decimal;
use crate::errors::DomainError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProposalStatus {
    #[default]
    Rascunho,
    Enviada,
    EmNegociacao,
    Aprovada,
    Perdida,
    Cancelada,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rascunho => "rascunho",
            Self::Enviada => "enviada",
            Self::EmNegociacao => "em_negociacao",
            Self::Aprovada => "aprovada",
            Self::Perdida => "perdida",
            Self::Cancelada => "cancelada",
        }
    }

    /// Stored status text is free-form legacy data; anything unknown
    /// degrades to draft rather than failing the load.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "enviada" => Self::Enviada,
            "em_negociacao" => Self::EmNegociacao,
            "aprovada" => Self::Aprovada,
            "perdida" => Self::Perdida,
            "cancelada" => Self::Cancelada,
            _ => Self::Rascunho,
        }
    }
}

impl From<String> for ProposalStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ProposalStatus> for String {
    fn from(value: ProposalStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub un: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub qtd: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub valor: Decimal,
}

/// One checklist-backed clause: a set of selections from the fixed option
/// list plus free-typed extra lines, in the order the user entered them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistField {
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub extra: Vec<String>,
}

impl ChecklistField {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.extra.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxBlock {
    pub icms: bool,
    pub icms_val: String,
    pub ipi: bool,
    pub ipi_val: String,
    pub pis: bool,
    pub pis_val: String,
    pub cofins: bool,
    pub cofins_val: String,
    pub iss: bool,
    pub iss_val: String,
    pub ncm: String,
    pub cod_servico: String,
}

impl Default for TaxBlock {
    fn default() -> Self {
        let defaults = crate::codec::TaxDefaults::default();
        Self {
            icms: false,
            icms_val: defaults.icms.to_string(),
            ipi: false,
            ipi_val: String::new(),
            pis: false,
            pis_val: defaults.pis.to_string(),
            cofins: false,
            cofins_val: defaults.cofins.to_string(),
            iss: false,
            iss_val: String::new(),
            ncm: defaults.ncm.to_string(),
            cod_servico: String::new(),
        }
    }
}

impl TaxBlock {
    /// Preset used for brand-new proposals: ICMS, PIS and COFINS on at
    /// their standard rates.
    pub fn new_proposal() -> Self {
        Self { icms: true, pis: true, cofins: true, ..Self::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentTerms {
    /// One of the canonical payment strings, or the `OUTRO` sentinel.
    pub selecao: String,
    /// Free-text override, meaningful only when `selecao` is `OUTRO`.
    pub personalizado: String,
}

impl Default for PaymentTerms {
    fn default() -> Self {
        Self {
            selecao: crate::codec::payment::CANONICAL_TERMS[0].to_string(),
            personalizado: String::new(),
        }
    }
}

impl PaymentTerms {
    /// The text that actually goes on the proposal.
    pub fn effective(&self) -> &str {
        if self.selecao == crate::codec::payment::OTHER_SENTINEL {
            &self.personalizado
        } else {
            &self.selecao
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportMode {
    #[default]
    #[serde(rename = "CIF")]
    Cif,
    #[serde(rename = "DDP")]
    Ddp,
    #[serde(rename = "FOB")]
    Fob,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cif => "CIF",
            Self::Ddp => "DDP",
            Self::Fob => "FOB",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DDP" => Self::Ddp,
            "FOB" => Self::Fob,
            _ => Self::Cif,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transport {
    pub tipo: TransportMode,
    pub local: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceDocuments {
    pub docs: Vec<String>,
    pub enviado_por: String,
    /// Submission date in `YYYY-MM-DD` form, empty when unknown.
    pub data: String,
}

/// Structured editable shape of a proposal. The persisted counterpart is
/// [`ProposalRecord`]; `codec::expand_record` / `codec::flatten_form`
/// convert between the two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalForm {
    pub numero: String,
    pub revisao: String,
    pub cliente_id: Option<String>,
    pub cliente_nome: String,
    pub contato: String,
    pub referencia: String,
    pub data_proposta: String,
    pub titulo: String,
    pub tipo_fornecimento: String,
    pub status: ProposalStatus,
    pub observacoes: String,
    pub reajuste: String,
    pub impostos: TaxBlock,
    pub pagamento: PaymentTerms,
    pub validade_texto: String,
    pub prazo_entrega: String,
    pub garantia: String,
    pub escopo: ChecklistField,
    pub fora_escopo: ChecklistField,
    pub ensaios: String,
    pub tratamento: ChecklistField,
    pub databook: ChecklistField,
    pub transporte: Transport,
    pub documentos: ReferenceDocuments,
    pub itens: Vec<LineItem>,
    /// Last-saved grand total. A cache only: totals are always recomputed
    /// from `itens` before being trusted.
    pub valor_total: Decimal,
}

impl Default for ProposalForm {
    fn default() -> Self {
        Self {
            numero: String::new(),
            revisao: "1.0".to_string(),
            cliente_id: None,
            cliente_nome: String::new(),
            contato: String::new(),
            referencia: String::new(),
            data_proposta: String::new(),
            titulo: String::new(),
            tipo_fornecimento: "fornecimento e fabricação".to_string(),
            status: ProposalStatus::Rascunho,
            observacoes: String::new(),
            reajuste: "Preço base: Janeiro/2026. Os preços serão reajustados conforme a \
                       variação no Índice do Aço – INFOMET, toda vez que ultrapassar 10% de aumento."
                .to_string(),
            impostos: TaxBlock::new_proposal(),
            pagamento: PaymentTerms::default(),
            validade_texto: "30 (Trinta) dias.".to_string(),
            prazo_entrega: "Em até 20 dias úteis após recebimento do pedido oficial.".to_string(),
            garantia: "Garantia Mecânica: A CARBAT garante a CONTRATANTE que irá corrigir, \
                       substituir qualquer material com defeito ou que apresente não \
                       conformidade, bem como será responsável por defeitos latentes ou ocultos \
                       por um período de 12 (doze) meses a contar da data de emissão da NF-e;\n\
                       Não nos responsabilizamos por mau uso das peças."
                .to_string(),
            escopo: ChecklistField::default(),
            fora_escopo: ChecklistField::default(),
            ensaios: "Não se aplica (teste hidrostático, teste de corrente parasita, ultrassom \
                      e LP)."
                .to_string(),
            tratamento: ChecklistField::default(),
            databook: ChecklistField::default(),
            transporte: Transport::default(),
            documentos: ReferenceDocuments::default(),
            itens: Vec::new(),
            valor_total: Decimal::ZERO,
        }
    }
}

impl ProposalForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.titulo.trim().is_empty() {
            return Err(DomainError::MissingRequiredField("titulo"));
        }
        Ok(())
    }

    /// Refresh the cached grand total from the current item list.
    pub fn recompute_total(&mut self) {
        self.valor_total = crate::totals::grand_total(&self.itens);
    }
}

/// Flattened persisted shape of a proposal: every checklist family, the
/// tax block, transport and reference documents collapse into generic
/// text columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalRecord {
    pub id: ProposalId,
    pub numero: String,
    pub revisao: String,
    pub cliente_id: Option<String>,
    pub cliente_nome: String,
    pub contato: String,
    pub referencia: String,
    pub titulo: String,
    pub tipo_fornecimento: String,
    #[serde(deserialize_with = "lenient_decimal")]
    pub valor_total: Decimal,
    pub status: ProposalStatus,
    pub data_proposta: String,
    pub validade_texto: String,
    pub condicoes_pagamento: String,
    pub prazo_entrega: String,
    pub observacoes: String,
    pub reajuste: String,
    pub impostos: String,
    pub garantia: String,
    pub escopo: String,
    pub fora_escopo: String,
    pub ensaios: String,
    pub tratamento: String,
    pub databook: String,
    pub transporte: String,
    pub documentos: String,
    pub documentos_data: String,
    pub itens: Vec<LineItem>,
    pub created_date: String,
    pub updated_date: String,
}

impl ProposalRecord {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.titulo.trim().is_empty() {
            return Err(DomainError::MissingRequiredField("titulo"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{LineItem, PaymentTerms, ProposalForm, ProposalStatus, TaxBlock, TransportMode};

    #[test]
    fn unknown_status_degrades_to_draft() {
        assert_eq!(ProposalStatus::parse("arquivada"), ProposalStatus::Rascunho);
        assert_eq!(ProposalStatus::parse("em_negociacao"), ProposalStatus::EmNegociacao);
    }

    #[test]
    fn line_item_accepts_numeric_strings_on_the_wire() {
        let item: LineItem =
            serde_json::from_value(serde_json::json!({"descricao": "Viga W150", "un": "Kg", "qtd": "12", "valor": 8.5}))
                .expect("line item should deserialize");
        assert_eq!(item.qtd, Decimal::from(12));
        assert_eq!(item.valor, "8.5".parse::<Decimal>().unwrap());
    }

    #[test]
    fn line_item_coerces_garbage_quantity_to_zero() {
        let item: LineItem =
            serde_json::from_value(serde_json::json!({"descricao": "Chapa", "qtd": "doze", "valor": 10}))
                .expect("line item should deserialize");
        assert_eq!(item.qtd, Decimal::ZERO);
    }

    #[test]
    fn new_proposal_tax_preset_enables_standard_rates() {
        let block = TaxBlock::new_proposal();
        assert!(block.icms && block.pis && block.cofins);
        assert!(!block.ipi && !block.iss);
        assert_eq!(block.icms_val, "17");
        assert_eq!(block.ncm, "73089010");
    }

    #[test]
    fn payment_terms_resolve_custom_override() {
        let terms = PaymentTerms {
            selecao: "OUTRO".to_string(),
            personalizado: "50% na OC, 50% contra aviso de prontidão.".to_string(),
        };
        assert_eq!(terms.effective(), "50% na OC, 50% contra aviso de prontidão.");

        let canonical = PaymentTerms::default();
        assert_eq!(canonical.effective(), canonical.selecao);
    }

    #[test]
    fn transport_mode_parses_case_insensitively_with_cif_fallback() {
        assert_eq!(TransportMode::parse("fob"), TransportMode::Fob);
        assert_eq!(TransportMode::parse(""), TransportMode::Cif);
        assert_eq!(TransportMode::parse("EXW"), TransportMode::Cif);
    }

    #[test]
    fn recompute_total_refreshes_the_cache() {
        let mut form = ProposalForm {
            itens: vec![
                LineItem {
                    descricao: "Estrutura".to_string(),
                    un: "Kg".to_string(),
                    qtd: Decimal::from(100),
                    valor: "12.50".parse().unwrap(),
                },
                LineItem {
                    descricao: "Guarda-corpo".to_string(),
                    un: "m".to_string(),
                    qtd: Decimal::from(4),
                    valor: "300".parse().unwrap(),
                },
            ],
            ..ProposalForm::default()
        };
        form.recompute_total();
        assert_eq!(form.valor_total, "2450.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn validation_requires_a_title() {
        let form = ProposalForm::default();
        assert!(form.validate().is_err());

        let form = ProposalForm { titulo: "Estrutura metálica".to_string(), ..form };
        assert!(form.validate().is_ok());
    }
}
