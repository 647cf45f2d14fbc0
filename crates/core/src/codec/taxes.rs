//! Tax block serialization.
//!
//! The structured flags are the source of truth; the persisted bullet
//! summary is a generated view. Expanding the text back is heuristic by
//! construction: a flag is "on" when its label substring is present, and
//! the value is whatever numeric run follows the label.

use crate::domain::proposal::TaxBlock;

/// Fallback rates applied when a label line carries no usable number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxDefaults {
    pub icms: &'static str,
    pub pis: &'static str,
    pub cofins: &'static str,
    pub ncm: &'static str,
}

impl Default for TaxDefaults {
    fn default() -> Self {
        Self { icms: "17", pis: "0.65", cofins: "3.00", ncm: "73089010" }
    }
}

/// Render the structured flags as the stored bullet summary.
pub fn flatten(block: &TaxBlock) -> String {
    let mut parts = Vec::new();
    if block.icms {
        parts.push(format!("• ICMS: {}%", block.icms_val));
    }
    if block.ipi {
        parts.push(format!("• IPI: {}%", block.ipi_val));
    }
    if block.pis {
        parts.push(format!("• PIS: {}% (Incluso)", block.pis_val));
    }
    if block.cofins {
        parts.push(format!("• COFINS: {}% (Incluso)", block.cofins_val));
    }
    if block.iss {
        parts.push(format!("• ISS: {}", block.iss_val));
    }
    if !block.ncm.is_empty() {
        parts.push(format!("• NCM: {}", block.ncm));
    }
    if !block.cod_servico.is_empty() {
        parts.push(format!("• Cód. Serviço: {}", block.cod_servico));
    }
    parts.join("\n")
}

/// Pattern-match label markers back out of the stored summary.
pub fn expand(text: &str, defaults: &TaxDefaults) -> TaxBlock {
    let mut block = TaxBlock {
        icms_val: defaults.icms.to_string(),
        pis_val: defaults.pis.to_string(),
        cofins_val: defaults.cofins.to_string(),
        ncm: defaults.ncm.to_string(),
        ..TaxBlock::default()
    };
    for line in text.lines() {
        if line.contains("ICMS:") {
            block.icms = true;
            block.icms_val =
                capture_number(line, "ICMS:").unwrap_or_else(|| defaults.icms.to_string());
        }
        if line.contains("IPI:") {
            block.ipi = true;
            block.ipi_val = capture_number(line, "IPI:").unwrap_or_default();
        }
        if line.contains("PIS:") {
            block.pis = true;
            block.pis_val =
                capture_number(line, "PIS:").unwrap_or_else(|| defaults.pis.to_string());
        }
        if line.contains("COFINS:") {
            block.cofins = true;
            block.cofins_val =
                capture_number(line, "COFINS:").unwrap_or_else(|| defaults.cofins.to_string());
        }
        if line.contains("ISS:") {
            block.iss = true;
            block.iss_val = capture_rest(line, "ISS:");
        }
        if line.contains("NCM:") {
            block.ncm = capture_rest(line, "NCM:");
        }
        if line.contains("Cód. Serviço:") {
            block.cod_servico = capture_rest(line, "Cód. Serviço:");
        }
    }
    block
}

/// First run of digits/dots after the label, if any.
fn capture_number(line: &str, label: &str) -> Option<String> {
    let rest = line.split_once(label)?.1.trim_start();
    let value: String =
        rest.chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Everything after the label, trimmed.
fn capture_rest(line: &str, label: &str) -> String {
    line.split_once(label).map(|(_, rest)| rest.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::domain::proposal::TaxBlock;

    use super::{expand, flatten, TaxDefaults};

    #[test]
    fn round_trip_reproduces_flags_and_values() {
        let block = TaxBlock {
            icms: true,
            icms_val: "17".to_string(),
            ipi: false,
            pis: true,
            pis_val: "0.65".to_string(),
            cofins: true,
            cofins_val: "3.00".to_string(),
            ncm: "73089010".to_string(),
            ..TaxBlock::default()
        };

        let reloaded = expand(&flatten(&block), &TaxDefaults::default());

        assert!(reloaded.icms);
        assert_eq!(reloaded.icms_val, "17");
        assert!(!reloaded.ipi);
        assert!(reloaded.pis);
        assert_eq!(reloaded.pis_val, "0.65");
        assert!(reloaded.cofins);
        assert_eq!(reloaded.cofins_val, "3.00");
        assert_eq!(reloaded.ncm, "73089010");
    }

    #[test]
    fn label_without_number_falls_back_to_the_default_rate() {
        let block = expand("• ICMS: a combinar", &TaxDefaults::default());
        assert!(block.icms);
        assert_eq!(block.icms_val, "17");
    }

    #[test]
    fn iss_and_service_code_capture_free_text() {
        let block = expand("• ISS: 5% retido na fonte\n• Cód. Serviço: 14.01", &TaxDefaults::default());
        assert!(block.iss);
        assert_eq!(block.iss_val, "5% retido na fonte");
        assert_eq!(block.cod_servico, "14.01");
    }

    #[test]
    fn empty_text_leaves_all_flags_off_with_defaults() {
        let block = expand("", &TaxDefaults::default());
        assert!(!block.icms && !block.ipi && !block.pis && !block.cofins && !block.iss);
        assert_eq!(block.ncm, "73089010");
    }

    #[test]
    fn flatten_omits_disabled_flags_and_blank_codes() {
        let block = TaxBlock { iss: true, iss_val: "5".to_string(), ncm: String::new(), ..TaxBlock::default() };
        assert_eq!(flatten(&block), "• ISS: 5");
    }
}
