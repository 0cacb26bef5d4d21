use crate::errors::{ClientError, ClientResult};

/// Stroops per display unit: amounts are stored on-chain with 7 decimal
/// places of precision.
pub const STROOPS_PER_UNIT: i128 = 10_000_000;

const FRACTION_DIGITS: u32 = 7;

/// Convert a display amount such as `"42.50"` to stroops exactly.
///
/// Parsing works on the decimal text directly; going through floating point
/// would not survive the round-trip for all 7-digit fractions.
pub fn to_stroops(display: &str) -> ClientResult<i128> {
    let trimmed = display.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid(display, "empty amount"));
    }
    if fraction.len() > FRACTION_DIGITS as usize {
        return Err(invalid(display, "more than 7 fractional digits"));
    }
    let whole_value: i128 = if whole.is_empty() {
        0
    } else {
        parse_digits(whole).ok_or_else(|| invalid(display, "non-numeric characters"))?
    };
    let fraction_value: i128 = if fraction.is_empty() {
        0
    } else {
        parse_digits(fraction).ok_or_else(|| invalid(display, "non-numeric characters"))?
    };
    let scale = 10i128.pow(FRACTION_DIGITS - fraction.len() as u32);
    let stroops = whole_value
        .checked_mul(STROOPS_PER_UNIT)
        .and_then(|value| value.checked_add(fraction_value * scale))
        .ok_or_else(|| invalid(display, "amount overflow"))?;
    Ok(if negative { -stroops } else { stroops })
}

/// Render stroops as a display amount, trimming trailing fractional zeros
/// (`425000000` becomes `"42.5"`).
pub fn from_stroops(stroops: i128) -> String {
    let negative = stroops < 0;
    let magnitude = stroops.unsigned_abs();
    let whole = magnitude / STROOPS_PER_UNIT as u128;
    let fraction = magnitude % STROOPS_PER_UNIT as u128;
    let sign = if negative { "-" } else { "" };
    if fraction == 0 {
        return format!("{sign}{whole}");
    }
    let digits = format!("{fraction:07}");
    format!("{sign}{whole}.{}", digits.trim_end_matches('0'))
}

fn parse_digits(raw: &str) -> Option<i128> {
    if raw.bytes().all(|byte| byte.is_ascii_digit()) {
        raw.parse().ok()
    } else {
        None
    }
}

fn invalid(display: &str, reason: &str) -> ClientError {
    ClientError::Build(format!("invalid amount {display:?}: {reason}"))
}
