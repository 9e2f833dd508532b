/// Number of micro-STX in one STX.
pub const MICRO_PER_STX: u64 = 1_000_000;

/// Decimal places between micro-STX and STX.
pub const MICRO_DECIMALS: usize = 6;

/// Splits a micro-unit digit string into whole and fraction parts.
///
/// Works on the digits directly, so amounts wider than `u64` or `f64`
/// precision come out exact. The fraction has its trailing zeros stripped
/// and is empty for whole amounts. Returns `None` unless `raw` is a non-empty
/// run of ASCII digits.
pub fn split_micro(raw: &str) -> Option<(String, String)> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let padded = format!("{:0>width$}", raw, width = MICRO_DECIMALS + 1);
    let (whole, fraction) = padded.split_at(padded.len() - MICRO_DECIMALS);

    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = fraction.trim_end_matches('0');

    Some((whole.to_string(), fraction.to_string()))
}

/// Formats a micro-unit digit string as a decimal STX amount, e.g.
/// `"1500000"` becomes `"1.5"`.
pub fn format_micro(raw: &str) -> Option<String> {
    let (whole, fraction) = split_micro(raw)?;
    if fraction.is_empty() {
        Some(whole)
    } else {
        Some(format!("{}.{}", whole, fraction))
    }
}
