//! Revision and proposal-number bookkeeping.

/// Numbering base for human-facing proposal numbers. New numbers are
/// allocated as offsets above this base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberingOptions {
    pub base: u64,
}

impl Default for NumberingOptions {
    fn default() -> Self {
        Self { base: 260_000 }
    }
}

/// Next revision label after an edit-save.
///
/// Numeric revisions bump the integer part and reset the fraction to
/// `.0`. A blank current revision yields `2.0` (the fixed starting
/// revision is `1.0`, and this path only runs while editing). Anything
/// non-numeric keeps the original text and appends a `.1` sub-revision.
pub fn next_revision(current: &str) -> String {
    let current = current.trim();
    if current.is_empty() {
        return "2.0".to_string();
    }
    match current.parse::<f64>() {
        Ok(value) => format!("{}.0", value.floor() as i64 + 1),
        Err(_) => format!("{current}.1"),
    }
}

/// Next human-facing proposal number given every number already issued.
///
/// Non-digit characters are stripped before comparison; only values
/// above the base participate. No locking happens here: two concurrent
/// creations can race, and serializing them is the store's problem.
pub fn next_proposal_number(existing: &[String], options: &NumberingOptions) -> String {
    let base = options.base;
    let max_offset = existing
        .iter()
        .filter_map(|raw| {
            let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
            digits.parse::<u64>().ok()
        })
        .filter(|value| *value > base)
        .map(|value| value - base)
        .max()
        .unwrap_or(0);
    (base + max_offset + 1).to_string()
}
