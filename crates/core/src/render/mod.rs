//! Proposal document assembly.
//!
//! Produces a fixed three-page artifact (cover letter, commercial page,
//! technical page) from the structured form. Section numbering is
//! computed here, not in the template: blank clauses are skipped and
//! consume no number, and the commercial and technical counters are
//! independent.

pub mod filename;

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;
use tera::Tera;
use thiserror::Error;
use tracing::warn;

use crate::codec::{checklist, taxes};
use crate::config::DocumentConfig;
use crate::domain::proposal::{ProposalForm, Transport};
use crate::{codec::dates, totals};

pub use filename::build_filename;

const COMPANY_NAME: &str = "CARBAT DO BRASIL";
const COMPANY_LEGAL_NAME: &str = "CARBAT CARBONO ATIVADO DO BRASIL LTDA";
const COMPANY_CNPJ: &str = "73.698.573/0002-95";
const COMPANY_ADDRESS: &str = "Rodovia BR 262, KM 11.5, S/N, Zona Rural, Três Lagoas/MS";
const COMPANY_CONTACTS: &[&str] = &[
    "Eng.ª Camila Barcellos Gomes — camila@carbat.com.br — (71) 9 9367-4081",
    "Diretor Renato Gomes Filho — renato@carbat.com.br — (67) 9 9244-7793",
];
const BANK_DETAILS: &str = "Segue Dados Bancários:\nCARBAT CARBONO ATIVADO DO BRASIL LTDA\nPIX CNPJ: 73.698.573/0002-95\nBANCO: 756 – SICOOB | AGÊNCIA: 4439 | C.C: 127686-7";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(String),
}

impl From<tera::Error> for RenderError {
    fn from(error: tera::Error) -> Self {
        Self::Template(error.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Print-ready HTML stream for the browser print dialog.
    Html,
    /// HTML-Word package downloaded as a `.doc` file.
    Doc,
}

impl DocumentFormat {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "doc" | "docx" | "word" => Self::Doc,
            _ => Self::Html,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

/// One numbered clause section on the commercial or technical page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    pub numero: usize,
    pub titulo: String,
    pub linhas: Vec<String>,
    pub lista: bool,
}

#[derive(Serialize)]
struct ItemRow {
    idx: usize,
    descricao: String,
    un: String,
    qtd: String,
    valor_unit: String,
    total: String,
}

pub struct DocumentRenderer {
    tera: Tera,
    client: reqwest::Client,
    logo_url: Option<String>,
    logo_timeout: Duration,
}

impl DocumentRenderer {
    pub fn new(config: &DocumentConfig) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(
            "pages.html",
            include_str!("../../../../templates/proposal/pages.html.tera"),
        )?;
        tera.add_raw_template(
            "proposal.html",
            include_str!("../../../../templates/proposal/document.html.tera"),
        )?;
        tera.add_raw_template(
            "proposal.doc",
            include_str!("../../../../templates/proposal/word.html.tera"),
        )?;
        // Clause text goes in verbatim: the artifact is assembled from the
        // operator's own form data and must keep slashes and accents as
        // typed (escaping would mangle dates like 05/08/2026).
        tera.autoescape_on(vec![]);

        Ok(Self {
            tera,
            client: reqwest::Client::new(),
            logo_url: config.logo_url.clone(),
            logo_timeout: Duration::from_secs(config.logo_timeout_secs),
        })
    }

    /// Render the proposal document. The form is snapshotted up front so
    /// concurrent edits cannot be observed across the asset-fetch await.
    pub async fn render(
        &self,
        form: &ProposalForm,
        format: DocumentFormat,
    ) -> Result<DocumentArtifact, RenderError> {
        let snapshot = form.clone();
        let logo_url = self.resolve_logo().await;
        let context = build_context(&snapshot, logo_url);

        let template = match format {
            DocumentFormat::Html => "proposal.html",
            DocumentFormat::Doc => "proposal.doc",
        };
        let html = self.tera.render(template, &context)?;
        let filename = build_filename(&snapshot);

        Ok(match format {
            DocumentFormat::Html => DocumentArtifact {
                filename,
                content_type: "text/html; charset=utf-8",
                body: html,
            },
            DocumentFormat::Doc => DocumentArtifact {
                filename: format!("{filename}.doc"),
                content_type: "application/msword; charset=utf-8",
                // BOM keeps Word from guessing the encoding.
                body: format!("\u{feff}{html}"),
            },
        })
    }

    /// Probe the configured logo with a bounded timeout. On any failure
    /// the document renders with a text header instead of hanging.
    async fn resolve_logo(&self) -> Option<String> {
        let url = self.logo_url.clone()?;
        match self.client.get(&url).timeout(self.logo_timeout).send().await {
            Ok(response) if response.status().is_success() => Some(url),
            Ok(response) => {
                warn!(status = %response.status(), url = %url, "logo fetch refused, using text fallback");
                None
            }
            Err(error) => {
                warn!(error = %error, url = %url, "logo fetch failed, using text fallback");
                None
            }
        }
    }
}

fn build_context(form: &ProposalForm, logo_url: Option<String>) -> tera::Context {
    let itens: Vec<ItemRow> = form
        .itens
        .iter()
        .enumerate()
        .map(|(index, item)| ItemRow {
            idx: index + 1,
            descricao: item.descricao.clone(),
            un: item.un.clone(),
            qtd: item.qtd.normalize().to_string(),
            valor_unit: format_brl(item.valor),
            total: format_brl(totals::line_total(item)),
        })
        .collect();

    let mut context = tera::Context::new();
    context.insert("logo_url", &logo_url);
    context.insert("company_name", COMPANY_NAME);
    context.insert("numero", &form.numero);
    context.insert("revisao", &form.revisao);
    context.insert("cliente_nome", &form.cliente_nome);
    context.insert("contato", &form.contato);
    context.insert("referencia", &form.referencia);
    context.insert("data_display", &dates::display(&form.data_proposta));
    context.insert("fornecimento_frase", supply_phrase(&form.tipo_fornecimento));
    context.insert("itens", &itens);
    context.insert("total_geral", &format_brl(totals::grand_total(&form.itens)));
    context.insert("comercial", &commercial_sections(form));
    context.insert("tecnica", &technical_sections(form));
    context.insert("titulo_documento", &build_filename(form));
    context
}

/// Cover-letter opening clause, keyed on the supply-type classification.
pub fn supply_phrase(tipo_fornecimento: &str) -> &'static str {
    let tipo = tipo_fornecimento.to_lowercase();
    if tipo.contains("montagem") && tipo.contains("fabricação") {
        "o fornecimento, fabricação, montagem e instalação"
    } else if tipo.contains("montagem") || tipo.contains("instalação") {
        "a montagem e instalação"
    } else {
        "o fornecimento e fabricação"
    }
}

/// Commercial page sections. The counter starts at 2: the line-item
/// table is always section 1.
pub fn commercial_sections(form: &ProposalForm) -> Vec<Section> {
    let pagamento = payment_with_bank_details(form.pagamento.effective());
    let mut sections = Vec::new();
    let mut counter = 2;
    push_section(&mut sections, &mut counter, "OBSERVAÇÕES GERAIS", &form.observacoes, false);
    push_section(&mut sections, &mut counter, "REAJUSTE", &form.reajuste, false);
    push_section(
        &mut sections,
        &mut counter,
        "TRIBUTOS E ENCARGOS FISCAIS",
        &taxes::flatten(&form.impostos),
        false,
    );
    push_section(&mut sections, &mut counter, "CONDIÇÕES DE PAGAMENTO", &pagamento, false);
    push_section(
        &mut sections,
        &mut counter,
        "VALIDADE DA PROPOSTA COMERCIAL",
        &form.validade_texto,
        false,
    );
    push_section(
        &mut sections,
        &mut counter,
        "PRAZO DE ENTREGA E CAPACIDADE PRODUTIVA",
        &form.prazo_entrega,
        false,
    );
    push_section(&mut sections, &mut counter, "GARANTIA", &form.garantia, false);
    sections
}

/// Technical page sections, ending with the fixed contact block.
pub fn technical_sections(form: &ProposalForm) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut counter = 1;
    push_section(
        &mut sections,
        &mut counter,
        "ESCOPO DE FORNECIMENTO",
        &checklist::flatten(&form.escopo),
        true,
    );
    push_section(
        &mut sections,
        &mut counter,
        "FORA DE ESCOPO / ESCOPO CONTRATANTE",
        &checklist::flatten(&form.fora_escopo),
        true,
    );
    push_section(&mut sections, &mut counter, "ENSAIOS NÃO DESTRUTIVOS (END)", &form.ensaios, false);
    push_section(
        &mut sections,
        &mut counter,
        "TRATAMENTO ANTICORROSIVO",
        &checklist::flatten(&form.tratamento),
        true,
    );
    push_section(
        &mut sections,
        &mut counter,
        "DATA BOOK TÉCNICO",
        &checklist::flatten(&form.databook),
        true,
    );
    push_section(
        &mut sections,
        &mut counter,
        "CONDIÇÕES DE TRANSPORTE E LOGÍSTICA",
        &transport_display(&form.transporte),
        false,
    );
    push_section(
        &mut sections,
        &mut counter,
        "DOCUMENTOS DE REFERÊNCIA RECEBIDOS",
        &crate::codec::documents::flatten(&form.documentos),
        true,
    );
    push_section(&mut sections, &mut counter, "INFORMAÇÕES DE CONTATO", &contact_block(), false);
    sections
}

fn push_section(
    sections: &mut Vec<Section>,
    counter: &mut usize,
    titulo: &str,
    conteudo: &str,
    lista: bool,
) {
    if conteudo.trim().is_empty() {
        return;
    }
    let linhas: Vec<String> = if lista {
        conteudo.lines().map(str::trim).filter(|line| !line.is_empty()).map(String::from).collect()
    } else {
        conteudo.lines().map(String::from).collect()
    };
    sections.push(Section { numero: *counter, titulo: titulo.to_string(), linhas, lista });
    *counter += 1;
}

fn transport_display(transport: &Transport) -> String {
    if transport.local.is_empty() {
        transport.tipo.as_str().to_string()
    } else {
        format!("{}\nLocal: {}", transport.tipo.as_str(), transport.local)
    }
}

fn payment_with_bank_details(effective: &str) -> String {
    if effective.to_uppercase().contains("PIX") {
        format!("{effective}\n\n{BANK_DETAILS}")
    } else {
        effective.to_string()
    }
}

fn contact_block() -> String {
    let contacts =
        COMPANY_CONTACTS.iter().map(|c| format!("• {c}")).collect::<Vec<_>>().join("\n");
    format!(
        "{COMPANY_LEGAL_NAME}\nCNPJ: {COMPANY_CNPJ}\nEndereço: {COMPANY_ADDRESS}\n\nContatos Comerciais:\n{contacts}"
    )
}

/// Brazilian money display: thousands separated by dots, two decimal
/// places after a comma.
fn format_brl(value: Decimal) -> String {
    let raw = format!("{:.2}", value.round_dp(2));
    let negative = raw.starts_with('-');
    let digits = raw.trim_start_matches('-');
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::new();
    for (position, digit) in int_part.chars().rev().enumerate() {
        if position > 0 && position % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let grouped: String = grouped.chars().rev().collect();

    format!("{}{grouped},{frac_part}", if negative { "-" } else { "" })
}
