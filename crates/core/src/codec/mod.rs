//! Bidirectional mapping between the structured proposal form and the
//! flattened record persisted in generic text columns.
//!
//! Each clause family has its own `flatten`/`expand` pair. None of them
//! ever fail: stored clause text is free-form human input, so malformed
//! content degrades to defaults instead of blocking a save or a load.

pub mod checklist;
pub mod dates;
pub mod documents;
pub mod payment;
pub mod taxes;
pub mod transport;

pub use taxes::TaxDefaults;

use crate::domain::proposal::{ProposalForm, ProposalRecord};

/// Known options for the "Escopo de Fornecimento" checklist.
pub const ESCOPO_OPTIONS: &[&str] = &[
    "Mão de obra especializada;",
    "Mão de obra especializada, contratada pela RGF Montagens Industriais Ltda (CNPJ 49.551.973/0001-08);",
    "Matéria prima conforme solicitação;",
    "Consumíveis do Processo Produtivo;",
    "Ferramental e/ou Equipamentos;",
    "Inspeção Visual de Solda;",
    "Inspeção Dimensional;",
    "Alojamento, alimentação e transporte;",
];

/// Known options for the "Fora de Escopo / Escopo Contratante" checklist.
pub const FORA_ESCOPO_OPTIONS: &[&str] = &[
    "ART;",
    "Descarga de materiais na obra;",
    "Documentação para liberação das atividades na área;",
    "Elementos de fixação;",
    "Energia elétrica; Água; Local para refeições e sanitários;",
    "Inspetor qualificado;",
    "Local para estoque do material, próximo ao local da instalação;",
    "Montagem e instalação na obra;",
    "Mão de obra especializada, contratada pela RGF Montagens Industriais Ltda (CNPJ 49.551.973/0001-08);",
    "Obras Civis;",
    "Partes Civis e Elétricas;",
    "Projeto;",
    "Topografia;",
    "Transporte vertical e horizontal (caminhão Munck, PTA, Guindaste e etc);",
    "Alojamento, alimentação e transporte;",
];

/// Known options for the "Tratamento Anticorrosivo" checklist.
pub const TRATAMENTO_OPTIONS: &[&str] = &[
    "Galvanização à fogo.",
    "Aço carbono: Jateado e pintado, conforme padrão da obra.",
    "Aço carbono: Galvanizado e pintado, conforme padrão da obra.",
    "Inox: decapagem e passivação",
    "Sem Tratamento",
];

/// Known options for the "Data Book Técnico" checklist.
pub const DATABOOK_OPTIONS: &[&str] = &[
    "Certificado de consumíveis;",
    "Certificado de matéria prima;",
    "Certificado de Galvanização à fogo;",
    "Certificado de Pintura;",
];

/// Process-wide codec defaults, hoisted out of the individual parsers so
/// callers can see (and override) the baked-in fallback values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodecOptions {
    pub taxes: TaxDefaults,
}

/// Collapse a structured form into the flattened persisted shape.
///
/// The grand total is recomputed from the item list; the form's cached
/// `valor_total` is never trusted. Items with a blank description are
/// dropped, matching the save path of the editing UI.
pub fn flatten_form(form: &ProposalForm) -> ProposalRecord {
    let itens: Vec<_> =
        form.itens.iter().filter(|item| !item.descricao.trim().is_empty()).cloned().collect();

    ProposalRecord {
        numero: form.numero.clone(),
        revisao: form.revisao.clone(),
        cliente_id: form.cliente_id.clone(),
        cliente_nome: form.cliente_nome.clone(),
        contato: form.contato.clone(),
        referencia: form.referencia.clone(),
        titulo: form.titulo.clone(),
        tipo_fornecimento: form.tipo_fornecimento.clone(),
        valor_total: crate::totals::grand_total(&itens),
        status: form.status,
        data_proposta: dates::normalize(&form.data_proposta),
        validade_texto: form.validade_texto.clone(),
        condicoes_pagamento: payment::flatten(&form.pagamento),
        prazo_entrega: form.prazo_entrega.clone(),
        observacoes: form.observacoes.clone(),
        reajuste: form.reajuste.clone(),
        impostos: taxes::flatten(&form.impostos),
        garantia: form.garantia.clone(),
        escopo: checklist::flatten(&form.escopo),
        fora_escopo: checklist::flatten(&form.fora_escopo),
        ensaios: form.ensaios.clone(),
        tratamento: checklist::flatten(&form.tratamento),
        databook: checklist::flatten(&form.databook),
        transporte: transport::flatten(&form.transporte),
        documentos: documents::flatten(&form.documentos),
        documentos_data: dates::normalize(&form.documentos.data),
        itens,
        ..ProposalRecord::default()
    }
}

/// Re-expand a flattened record into the structured editable form.
///
/// Known limitation, accepted rather than fixed: an extra free-typed
/// line whose text exactly matches a known option is reclassified as a
/// selection on the next load, because the flattened blob keeps no
/// marker distinguishing the two.
pub fn expand_record(record: &ProposalRecord, options: &CodecOptions) -> ProposalForm {
    ProposalForm {
        numero: record.numero.clone(),
        revisao: record.revisao.clone(),
        cliente_id: record.cliente_id.clone(),
        cliente_nome: record.cliente_nome.clone(),
        contato: record.contato.clone(),
        referencia: record.referencia.clone(),
        data_proposta: dates::normalize(&record.data_proposta),
        titulo: record.titulo.clone(),
        tipo_fornecimento: record.tipo_fornecimento.clone(),
        status: record.status,
        observacoes: record.observacoes.clone(),
        reajuste: record.reajuste.clone(),
        impostos: taxes::expand(&record.impostos, &options.taxes),
        pagamento: payment::expand(&record.condicoes_pagamento),
        validade_texto: record.validade_texto.clone(),
        prazo_entrega: record.prazo_entrega.clone(),
        garantia: record.garantia.clone(),
        escopo: checklist::expand(&record.escopo, ESCOPO_OPTIONS),
        fora_escopo: checklist::expand(&record.fora_escopo, FORA_ESCOPO_OPTIONS),
        ensaios: record.ensaios.clone(),
        tratamento: checklist::expand(&record.tratamento, TRATAMENTO_OPTIONS),
        databook: checklist::expand(&record.databook, DATABOOK_OPTIONS),
        transporte: transport::expand(&record.transporte),
        documentos: documents::expand(&record.documentos),
        itens: record.itens.clone(),
        valor_total: record.valor_total,
    }
}
