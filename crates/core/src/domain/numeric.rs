//! Lenient numeric deserialization for user-entered quantities and prices.
//!
//! Form inputs arrive either as JSON numbers or as free-typed strings.
//! Anything that does not parse as a number is coerced to zero so a bad
//! keystroke can never block a save or a total computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce(&value))
}

pub fn coerce(value: &serde_json::Value) -> Decimal {
    match value {
        serde_json::Value::Number(number) => {
            number.to_string().parse::<Decimal>().unwrap_or(Decimal::ZERO)
        }
        serde_json::Value::String(raw) => raw.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::coerce;

    #[test]
    fn numbers_and_numeric_strings_parse() {
        assert_eq!(coerce(&serde_json::json!(3)), Decimal::from(3));
        assert_eq!(coerce(&serde_json::json!("2.5")), "2.5".parse::<Decimal>().unwrap());
    }

    #[test]
    fn non_numeric_input_coerces_to_zero() {
        assert_eq!(coerce(&serde_json::json!("abc")), Decimal::ZERO);
        assert_eq!(coerce(&serde_json::json!(null)), Decimal::ZERO);
        assert_eq!(coerce(&serde_json::json!([1])), Decimal::ZERO);
    }
}
