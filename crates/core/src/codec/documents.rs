//! Reference-document list plus a fixed-format submission trailer.
//!
//! Stored shape:
//!
//! ```text
//! Projeto Executivo Rev.02
//! Memorial de cálculo
//!
//! Enviados por contato@empresa.com, no dia 05/08/2026.
//! ```

use crate::codec::dates;
use crate::domain::proposal::ReferenceDocuments;

const TRAILER_MARKER: &str = "\n\nEnviados por ";
const TRAILER_DATE_SEP: &str = ", no dia ";

pub fn flatten(documents: &ReferenceDocuments) -> String {
    let body = documents
        .docs
        .iter()
        .filter(|doc| !doc.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    if documents.enviado_por.is_empty() {
        return body;
    }
    format!(
        "{body}{TRAILER_MARKER}{}{TRAILER_DATE_SEP}{}.",
        documents.enviado_por.trim_start_matches(' '),
        dates::display(&documents.data)
    )
}

pub fn expand(text: &str) -> ReferenceDocuments {
    let mut documents = ReferenceDocuments::default();
    if text.is_empty() {
        return documents;
    }

    let (body, trailer) = match text.split_once(TRAILER_MARKER) {
        Some((body, trailer)) => (body, Some(trailer)),
        None => (text, None),
    };

    documents.docs = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(trailer) = trailer {
        if let Some(sentence) = trailer.strip_suffix('.') {
            // Greedy match on the submitter, mirroring `(.+), no dia (.+)`.
            if let Some(split) = sentence.rfind(TRAILER_DATE_SEP) {
                documents.enviado_por = sentence[..split].to_string();
                documents.data =
                    dates::normalize(&sentence[split + TRAILER_DATE_SEP.len()..]);
            }
        }
    }

    documents
}

#[cfg(test)]
mod tests {
    use crate::domain::proposal::ReferenceDocuments;

    use super::{expand, flatten};

    #[test]
    fn round_trip_recovers_list_submitter_and_date() {
        let documents = ReferenceDocuments {
            docs: vec!["Projeto Executivo Rev.02".to_string(), "Memorial de cálculo".to_string()],
            enviado_por: "contato@empresa.com".to_string(),
            data: "2026-08-05".to_string(),
        };
        assert_eq!(expand(&flatten(&documents)), documents);
    }

    #[test]
    fn list_without_submitter_has_no_trailer() {
        let documents = ReferenceDocuments {
            docs: vec!["Planta baixa".to_string()],
            ..ReferenceDocuments::default()
        };
        let stored = flatten(&documents);
        assert_eq!(stored, "Planta baixa");
        assert_eq!(expand(&stored), documents);
    }

    #[test]
    fn malformed_trailer_degrades_to_empty_submitter() {
        let documents = expand("Planta baixa\n\nEnviados por alguém sem data");
        assert_eq!(documents.docs, vec!["Planta baixa".to_string()]);
        assert_eq!(documents.enviado_por, "");
        assert_eq!(documents.data, "");
    }

    #[test]
    fn unparseable_trailer_date_yields_empty_date() {
        let documents = expand("Planta baixa\n\nEnviados por Ana, no dia —.");
        assert_eq!(documents.enviado_por, "Ana");
        assert_eq!(documents.data, "");
    }

    #[test]
    fn blank_entries_are_dropped_when_flattening() {
        let documents = ReferenceDocuments {
            docs: vec![String::new(), "Cronograma".to_string()],
            ..ReferenceDocuments::default()
        };
        assert_eq!(flatten(&documents), "Cronograma");
    }
}
