//! Payment terms: a canonical set of strings or a free-text override.

use crate::domain::proposal::PaymentTerms;

/// Canonical payment terms offered by the commercial team.
pub const CANONICAL_TERMS: &[&str] = &[
    "30 DDL, após a emissão da Notas Fiscal.",
    "Sinal de 50% na aprovação do pedido e 50% na entrega.",
    "PIX",
    "Conforme medição mensal de serviços executados.",
    "Pagamento antecipado com 5% de desconto.",
];

/// Sentinel selection meaning "free-typed condition".
pub const OTHER_SENTINEL: &str = "OUTRO";

/// Any stored value that is not canonical is treated as an override.
pub fn expand(stored: &str) -> PaymentTerms {
    if stored.is_empty() {
        return PaymentTerms::default();
    }
    if CANONICAL_TERMS.contains(&stored) {
        PaymentTerms { selecao: stored.to_string(), personalizado: String::new() }
    } else {
        PaymentTerms { selecao: OTHER_SENTINEL.to_string(), personalizado: stored.to_string() }
    }
}

pub fn flatten(terms: &PaymentTerms) -> String {
    terms.effective().to_string()
}

#[cfg(test)]
mod tests {
    use super::{expand, flatten, CANONICAL_TERMS, OTHER_SENTINEL};

    #[test]
    fn canonical_values_expand_without_override() {
        let terms = expand(CANONICAL_TERMS[2]);
        assert_eq!(terms.selecao, "PIX");
        assert!(terms.personalizado.is_empty());
    }

    #[test]
    fn unknown_values_become_free_text_overrides() {
        let terms = expand("40% sinal, saldo na entrega técnica.");
        assert_eq!(terms.selecao, OTHER_SENTINEL);
        assert_eq!(terms.personalizado, "40% sinal, saldo na entrega técnica.");
        assert_eq!(flatten(&terms), "40% sinal, saldo na entrega técnica.");
    }

    #[test]
    fn empty_storage_falls_back_to_the_default_term() {
        let terms = expand("");
        assert_eq!(terms.selecao, CANONICAL_TERMS[0]);
    }
}
