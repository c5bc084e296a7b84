// Form field parsing
//
// Submitted fields arrive as strings. These helpers turn them into the typed
// values the services take, raising format errors for anything unusable.

use crate::error::{PlannerError, Result};

/// Parse a non-negative whole number (plus-ones, capacity, table counts).
///
/// Blank input reads as zero, the way an untouched number box submits.
pub fn parse_count(field: &str, raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    trimmed
        .parse::<u32>()
        .map_err(|_| PlannerError::format(field, raw, "expected a whole number of 0 or more"))
}

/// Parse a money amount such as `1250`, `1,250.50` or `$99.99`.
///
/// Negative amounts are rejected; a blank field reads as zero.
pub fn parse_money(field: &str, raw: &str) -> Result<f64> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    if cleaned.is_empty() {
        return Ok(0.0);
    }

    let amount = cleaned
        .parse::<f64>()
        .map_err(|_| PlannerError::format(field, raw, "expected an amount"))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(PlannerError::format(field, raw, "amount must be 0 or more"));
    }

    Ok(amount)
}

/// Interpret a submitted table number.
///
/// Anything that is not a positive integer means "unassigned". This is
/// deliberately lenient: the seating form sends an empty string for guests
/// left without a table.
pub fn parse_table(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|table| *table > 0)
}

/// Require a non-blank text field.
pub fn required(field: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::format(field, raw, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
