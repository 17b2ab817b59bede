//! Fixed-point helpers for WAD (1e18) and RAY (1e27) scaled integers.
//!
//! Signed division here follows floor semantics: the quotient is rounded
//! toward negative infinity, not toward zero. `-7 / 2` is `-4`.

use ethnum::{I256, U256};

use crate::ArithmeticError;

/// 1e18.
pub const WAD: U256 = U256::new(1_000_000_000_000_000_000);

/// 1e27.
pub const RAY: U256 = U256::new(1_000_000_000_000_000_000_000_000_000);

/// 1e18 as a signed value.
pub const WAD_I: I256 = I256::new(1_000_000_000_000_000_000);

/// 1e27 as a signed value.
pub const RAY_I: I256 = I256::new(1_000_000_000_000_000_000_000_000_000);

/// 1e9, the RAY/WAD ratio.
pub const WAD_TO_RAY: I256 = I256::new(1_000_000_000);

/// Divide rounding toward negative infinity.
///
/// # Errors
///
/// - [`ArithmeticError::DivisionByZero`] if `denominator` is zero
/// - [`ArithmeticError::Overflow`] for `I256::MIN / -1`
pub fn floor_div(numerator: I256, denominator: I256) -> Result<I256, ArithmeticError> {
    if denominator == I256::ZERO {
        return Err(ArithmeticError::DivisionByZero("floor_div"));
    }
    let quotient = numerator
        .checked_div(denominator)
        .ok_or(ArithmeticError::Overflow("floor_div"))?;
    let remainder = numerator
        .checked_rem(denominator)
        .ok_or(ArithmeticError::Overflow("floor_div"))?;
    if remainder != I256::ZERO && (remainder < I256::ZERO) != (denominator < I256::ZERO) {
        quotient
            .checked_sub(I256::ONE)
            .ok_or(ArithmeticError::Overflow("floor_div"))
    } else {
        Ok(quotient)
    }
}

/// `a * b / denominator` with a checked product and floor division.
pub fn mul_div_floor(a: I256, b: I256, denominator: I256) -> Result<I256, ArithmeticError> {
    let product = a
        .checked_mul(b)
        .ok_or(ArithmeticError::Overflow("mul_div_floor"))?;
    floor_div(product, denominator)
}

/// Unsigned `a * b / denominator` with a checked product.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, ArithmeticError> {
    if denominator == U256::ZERO {
        return Err(ArithmeticError::DivisionByZero("mul_div"));
    }
    let product = a
        .checked_mul(b)
        .ok_or(ArithmeticError::Overflow("mul_div"))?;
    Ok(product / denominator)
}

/// Checked signed addition.
pub fn add(a: I256, b: I256) -> Result<I256, ArithmeticError> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow("add"))
}

/// Convert an unsigned value into the signed domain.
///
/// # Errors
///
/// [`ArithmeticError::Overflow`] if the value exceeds `I256::MAX`.
pub fn to_signed(value: U256) -> Result<I256, ArithmeticError> {
    if value.leading_zeros() == 0 {
        return Err(ArithmeticError::Overflow("to_signed"));
    }
    Ok(value.as_i256())
}

/// Whether `value` is representable in `bits` unsigned bits.
pub fn fits_bits(value: U256, bits: u32) -> bool {
    bits >= 256 || value.leading_zeros() >= 256 - bits
}

/// `|a - b|` for unsigned values.
pub fn abs_diff(a: U256, b: U256) -> U256 {
    if a >= b {
        a - b
    } else {
        b - a
    }
}
