//! Exact conversion between human decimal strings and smallest units.
//!
//! All parsing and scaling is done with integer arithmetic. Fractional
//! smallest units are truncated toward zero, never rounded: once a transfer
//! executes it cannot be unwound, so conversion always errs on the side of
//! sending less.

use crate::errors::CoreError;

/// Scale used by [`sum_amounts`] when adding human decimal strings.
const SUM_DECIMALS: u8 = 18;

/// Converts a human decimal string to smallest units at `decimals` places.
///
/// Fractional digits beyond `decimals` are dropped. Fails with
/// `InvalidAmount` when the input is not a plain non-negative decimal
/// (signs, exponents, and anything non-numeric are rejected) or when the
/// result does not fit the accounting range.
pub fn to_smallest_unit(amount: &str, decimals: u8) -> Result<u128, CoreError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidAmount("empty amount".to_string()));
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (trimmed, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(CoreError::InvalidAmount(trimmed.to_string()));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(CoreError::InvalidAmount(trimmed.to_string()));
    }

    let scale = 10u128
        .checked_pow(decimals as u32)
        .ok_or_else(|| CoreError::InvalidAmount(format!("unsupported decimals: {}", decimals)))?;

    let int_value: u128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| CoreError::InvalidAmount(format!("amount out of range: {}", trimmed)))?
    };

    // Truncate the fraction to `decimals` digits, then scale what remains
    // up to a full smallest-unit count.
    let kept = &frac_part[..frac_part.len().min(decimals as usize)];
    let frac_value: u128 = if kept.is_empty() {
        0
    } else {
        kept.parse()
            .map_err(|_| CoreError::InvalidAmount(format!("amount out of range: {}", trimmed)))?
    };
    let frac_scale = 10u128.pow((decimals as usize - kept.len()) as u32);

    int_value
        .checked_mul(scale)
        .and_then(|units| units.checked_add(frac_value * frac_scale))
        .ok_or_else(|| CoreError::InvalidAmount(format!("amount out of range: {}", trimmed)))
}

/// Renders a smallest-unit value as a decimal string at `decimals` places,
/// trimming trailing fractional zeros.
pub fn format_units(value: u128, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }

    let mut digits = value.to_string();
    let decimals = decimals as usize;
    if digits.len() <= decimals {
        // pad so there is always at least one integer digit
        digits = format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits);
    }

    let split = digits.len() - decimals;
    let int_part = &digits[..split];
    let frac_part = digits[split..].trim_end_matches('0');

    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}

/// Adds human decimal strings exactly and renders the total.
///
/// Works at 18 fractional places, which covers every asset this engine
/// converts for; digits beyond that are truncated like in
/// [`to_smallest_unit`].
pub fn sum_amounts<'a, I>(amounts: I) -> Result<String, CoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total: u128 = 0;
    for amount in amounts {
        let units = to_smallest_unit(amount, SUM_DECIMALS)?;
        total = total.checked_add(units).ok_or(CoreError::BalanceOverflow)?;
    }
    Ok(format_units(total, SUM_DECIMALS))
}
