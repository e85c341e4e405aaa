//! Whole-dollar currency rendering for prediction results.
//!
//! Amounts arrive from the prediction backend as JSON numbers (`f64`). They
//! are converted to [`Decimal`] before rounding so midpoints round the same
//! way a locale-aware number formatter does (half away from zero).

use rust_decimal::prelude::{Decimal, FromPrimitive, RoundingStrategy};

/// Rounds to whole units using half-up rounding (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relief_core::currency::round_whole;
///
/// assert_eq!(round_whole(dec!(12345.5)), dec!(12346));
/// assert_eq!(round_whole(dec!(12345.49)), dec!(12345));
/// assert_eq!(round_whole(dec!(-2.5)), dec!(-3));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as US dollars with thousands separators and no cents.
///
/// Negative amounts keep their sign after the dollar sign (`$-1,200`).
/// Values that have no decimal representation (NaN, infinities) fall back
/// to their plain `f64` rendering.
pub fn format_usd(amount: f64) -> String {
    match Decimal::from_f64(amount) {
        Some(d) => format!("${}", group_thousands(round_whole(d))),
        None => format!("${amount}"),
    }
}

fn group_thousands(whole: Decimal) -> String {
    let digits = whole.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole.is_sign_negative() && !whole.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
