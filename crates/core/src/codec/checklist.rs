//! Checklist clauses: selections from a fixed option list plus free
//! extra lines, persisted as one newline-joined blob.

use crate::domain::proposal::ChecklistField;

/// Split stored clause text back into selections and extras.
///
/// A line is a selection when it exactly equals a known option; order
/// and duplicates of the input lines are preserved on both sides.
pub fn expand(text: &str, known_options: &[&str]) -> ChecklistField {
    let mut field = ChecklistField::default();
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if known_options.contains(&line) {
            field.selected.push(line.to_string());
        } else {
            field.extra.push(line.to_string());
        }
    }
    field
}

/// Join selections followed by extras, one per line, skipping blanks.
pub fn flatten(field: &ChecklistField) -> String {
    field
        .selected
        .iter()
        .chain(field.extra.iter())
        .filter(|line| !line.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}
