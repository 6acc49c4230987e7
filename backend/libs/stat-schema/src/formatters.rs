//! Stock score formatters.
//!
//! A formatter turns a raw `f64` score into the string a leaderboard page
//! shows, registered per metric via [`MetricDefinition::with_formatter`].
//!
//! [`MetricDefinition::with_formatter`]: crate::metric::MetricDefinition::with_formatter

/// Nearest integer with thousands separators: `1234567.0` -> `"1,234,567"`.
pub fn commas(score: f64) -> String {
    let rounded = score.abs().round() as u64;
    let digits = rounded.to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if score < 0.0 && rounded > 0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Two decimal places, for ratio metrics like win/loss: `3.5` -> `"3.50"`.
pub fn ratio(score: f64) -> String {
    format!("{:.2}", score)
}
