//! Exact arithmetic helpers
//!
//! All quantities and monetary amounts are held as arbitrary-precision
//! rationals so that sums stay exact across a whole year of replayed
//! operations. Decimal values only appear at the wire/config boundary
//! and are converted here without loss.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use rust_decimal::Decimal;

pub type Rational = BigRational;

const NANOS_PER_UNIT: i64 = 1_000_000_000;

/// Build a rational from a whole-number quantity.
pub fn from_int(value: i64) -> Rational {
    Rational::from_integer(BigInt::from(value))
}

/// Build a rational from a broker quotation (integer units plus nanos).
pub fn from_quotation(units: i64, nanos: i32) -> Rational {
    Rational::from_integer(BigInt::from(units))
        + Rational::new(BigInt::from(nanos), BigInt::from(NANOS_PER_UNIT))
}

/// Convert a wire decimal into an exact rational (mantissa over 10^scale).
pub fn from_decimal(value: Decimal) -> Rational {
    let mantissa = BigInt::from(value.mantissa());
    let denom = BigInt::from(10u32).pow(value.scale());
    Rational::new(mantissa, denom)
}

/// Render a rational as a fixed-point decimal string, rounded to `places`
/// fractional digits. Display only; never feed the result back into
/// arithmetic.
pub fn format_rational(value: &Rational, places: u32) -> String {
    let pow10 = BigInt::from(10u32).pow(places);
    let scaled = (value * Rational::from_integer(pow10.clone()))
        .round()
        .to_integer();

    let sign = if scaled.is_negative() { "-" } else { "" };
    let abs = scaled.abs();
    let int_part = &abs / &pow10;
    let frac_part = &abs % &pow10;

    if places == 0 {
        format!("{}{}", sign, int_part)
    } else {
        format!(
            "{}{}.{:0>width$}",
            sign,
            int_part,
            frac_part.to_string(),
            width = places as usize
        )
    }
}

/// Exact zero test.
pub fn is_zero(value: &Rational) -> bool {
    value.is_zero()
}
