//! Transport terms: mode line followed by a labelled delivery address.

use crate::domain::proposal::{Transport, TransportMode};

const LOCAL_LABEL: &str = "Local:";

pub fn flatten(transport: &Transport) -> String {
    format!("{}\n{} {}", transport.tipo.as_str(), LOCAL_LABEL, transport.local)
}

/// First line is the mode (blank defaults to CIF); the second line only
/// yields an address when it carries the `Local:` label.
pub fn expand(text: &str) -> Transport {
    let mut lines = text.lines();
    let tipo = TransportMode::parse(lines.next().unwrap_or(""));
    let local = lines
        .next()
        .and_then(|line| line.trim_start().strip_prefix(LOCAL_LABEL))
        .map(|rest| rest.trim().to_string())
        .unwrap_or_default();
    Transport { tipo, local }
}
