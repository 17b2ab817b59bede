//! Decimal text form for wide integers.
//!
//! Accepts plain digits with optional `_` separators and an optional
//! `e<exp>` suffix, so `"1e18"`, `"1_000_000"` and `"-2e18"` all parse.
//! Serialization always writes plain decimal digits.
//!
//! The [`unsigned`] and [`signed`] modules plug into `#[serde(with = ...)]`.

use ethnum::{I256, U256};

use crate::ArithmeticError;

/// Text could not be read as a wide decimal integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecimalError {
    /// Empty input or a stray character.
    #[error("invalid decimal {0:?}")]
    Invalid(String),

    /// Value does not fit.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Parse an unsigned wide integer.
pub fn parse_u256(text: &str) -> Result<U256, DecimalError> {
    let text = text.trim();
    let (mantissa, exponent) = match text.split_once(|c: char| c == 'e' || c == 'E') {
        Some((m, e)) => (m, Some(e)),
        None => (text, None),
    };

    let mut value = U256::ZERO;
    let mut digits = 0usize;
    for c in mantissa.chars() {
        if c == '_' {
            continue;
        }
        let digit = c
            .to_digit(10)
            .ok_or_else(|| DecimalError::Invalid(text.to_string()))?;
        value = value
            .checked_mul(U256::new(10))
            .and_then(|v| v.checked_add(U256::new(u128::from(digit))))
            .ok_or(ArithmeticError::Overflow("parse_u256"))?;
        digits += 1;
    }
    if digits == 0 {
        return Err(DecimalError::Invalid(text.to_string()));
    }

    if let Some(exponent) = exponent {
        let exponent: u32 = exponent
            .parse()
            .map_err(|_| DecimalError::Invalid(text.to_string()))?;
        for _ in 0..exponent {
            value = value
                .checked_mul(U256::new(10))
                .ok_or(ArithmeticError::Overflow("parse_u256"))?;
        }
    }
    Ok(value)
}

/// Parse a signed wide integer (leading `-` allowed).
pub fn parse_i256(text: &str) -> Result<I256, DecimalError> {
    let text = text.trim();
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = crate::fixed::to_signed(parse_u256(magnitude)?)?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// `#[serde(with = "gauge_types::decimal::unsigned")]` for [`U256`].
pub mod unsigned {
    use ethnum::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_u256(&text).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "gauge_types::decimal::signed")]` for [`I256`].
pub mod signed {
    use ethnum::I256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &I256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<I256, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_i256(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_u256("1e18").expect("parse"), crate::fixed::WAD);
        assert_eq!(parse_u256("1_000").expect("parse"), U256::new(1000));
        assert_eq!(parse_u256(" 42 ").expect("parse"), U256::new(42));
        assert_eq!(parse_u256("15e14").expect("parse"), U256::new(1_500_000_000_000_000));
        assert_eq!(parse_i256("-2e18").expect("parse"), I256::new(-2_000_000_000_000_000_000));
        assert_eq!(parse_i256("0").expect("parse"), I256::ZERO);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_u256(""), Err(DecimalError::Invalid(_))));
        assert!(matches!(parse_u256("0x10"), Err(DecimalError::Invalid(_))));
        assert!(matches!(parse_u256("-1"), Err(DecimalError::Invalid(_))));
        assert!(matches!(parse_u256("1e"), Err(DecimalError::Invalid(_))));
    }

    #[test]
    fn test_parse_overflow() {
        assert!(matches!(
            parse_u256("1e78"),
            Err(DecimalError::Arithmetic(ArithmeticError::Overflow(_)))
        ));
        assert!(parse_u256("1e77").is_ok());
    }

    #[derive(Serialize, Deserialize)]
    struct Wrapped {
        #[serde(with = "unsigned")]
        amount: U256,
        #[serde(with = "signed")]
        gain: I256,
    }

    #[test]
    fn test_serde_writes_plain_digits() {
        let w = Wrapped {
            amount: U256::new(1_000_000_000_000_000_000),
            gain: I256::new(-5),
        };
        let json = serde_json::to_string(&w).expect("serialize");
        assert_eq!(json, r#"{"amount":"1000000000000000000","gain":"-5"}"#);
        let back: Wrapped = serde_json::from_str(r#"{"amount":"1e18","gain":"-5"}"#).expect("parse");
        assert_eq!(back.amount, w.amount);
        assert_eq!(back.gain, w.gain);
    }
}
