//! Date normalization for wire and stored values.
//!
//! Everything is exchanged as plain `YYYY-MM-DD` strings; timestamps and
//! timezone arithmetic are deliberately kept out so a proposal dated on
//! the 1st never shows up on the 31st of the previous month.

/// Normalize a raw date-ish string to `YYYY-MM-DD`.
///
/// Accepts `YYYY-MM-DD` as-is, truncates ISO timestamps at the date
/// boundary, and converts `DD/MM/YYYY`. Any other shape yields empty.
pub fn normalize(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }
    if is_iso_date(value) {
        return value.to_string();
    }
    if let Some((prefix, _)) = value.split_once('T') {
        if is_iso_date(prefix) {
            return prefix.to_string();
        }
        return String::new();
    }
    if is_slash_date(value) {
        let mut parts = value.splitn(3, '/');
        let (day, month, year) =
            (parts.next().unwrap_or(""), parts.next().unwrap_or(""), parts.next().unwrap_or(""));
        return format!("{year}-{month}-{day}");
    }
    String::new()
}

/// Brazilian display form, `DD/MM/YYYY`, or an em dash when the value
/// does not normalize.
pub fn display(raw: &str) -> String {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return "—".to_string();
    }
    let mut parts = normalized.splitn(3, '-');
    let (year, month, day) =
        (parts.next().unwrap_or(""), parts.next().unwrap_or(""), parts.next().unwrap_or(""));
    format!("{day}/{month}/{year}")
}

fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes.iter().enumerate().all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
}

fn is_slash_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes.iter().enumerate().all(|(i, b)| matches!(i, 2 | 5) || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::{display, normalize};

    #[test]
    fn iso_dates_pass_through() {
        assert_eq!(normalize("2024-05-01"), "2024-05-01");
    }

    #[test]
    fn iso_timestamps_truncate_at_the_date_boundary() {
        assert_eq!(normalize("2024-05-01T00:00:00.000Z"), "2024-05-01");
    }

    #[test]
    fn brazilian_dates_convert() {
        assert_eq!(normalize("01/05/2024"), "2024-05-01");
    }

    #[test]
    fn anything_else_yields_empty() {
        assert_eq!(normalize("not-a-date"), "");
        assert_eq!(normalize("2024-5-1"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn display_renders_brazilian_form_or_em_dash() {
        assert_eq!(display("2024-05-01"), "01/05/2024");
        assert_eq!(display(""), "—");
        assert_eq!(display("garbage"), "—");
    }
}
