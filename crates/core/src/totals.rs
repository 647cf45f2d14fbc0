//! Line and grand totals, always derived from the item list.
//!
//! The persisted `valor_total` column is a last-saved cache; anything
//! that needs a trustworthy figure recomputes it from here.

use rust_decimal::Decimal;

use crate::domain::proposal::LineItem;

pub fn line_total(item: &LineItem) -> Decimal {
    item.qtd * item.valor
}

pub fn grand_total(items: &[LineItem]) -> Decimal {
    items.iter().map(line_total).sum()
}
