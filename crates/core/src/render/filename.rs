//! Derived export filename for proposal documents.

use crate::domain::proposal::ProposalForm;

const UNSAFE: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Replace path-unsafe characters and whitespace with underscores.
fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| if UNSAFE.contains(&c) || c.is_whitespace() { '_' } else { c })
        .collect()
}

/// `numero_cliente_titulo_referencia_Rev<revisao>`, each component
/// sanitized, blank components omitted, underscore runs collapsed.
pub fn build_filename(form: &ProposalForm) -> String {
    let revisao = sanitize(&form.revisao);
    let components = [
        sanitize(&form.numero),
        sanitize(&form.cliente_nome),
        sanitize(&form.titulo),
        sanitize(&form.referencia),
        if revisao.is_empty() { String::new() } else { format!("Rev{revisao}") },
    ];

    let joined = components.iter().filter(|part| !part.is_empty()).cloned().collect::<Vec<_>>().join("_");
    collapse_underscores(&joined)
}

fn collapse_underscores(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut last_was_underscore = false;
    for c in value.chars() {
        if c == '_' {
            if !last_was_underscore {
                output.push(c);
            }
            last_was_underscore = true;
        } else {
            output.push(c);
            last_was_underscore = false;
        }
    }
    output.trim_matches('_').to_string()
}
