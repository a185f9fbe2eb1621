use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Dollars and cents with thousands separators: `-1234.5` prints as
/// `-$1,234.50`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let cents = val.round_dp(2);
    let digits = format!("{:.2}", cents.abs());
    let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if cents < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

/// Signed percentage with one decimal, e.g. `+12.5%` or `-3.0%`.
pub(crate) fn format_change(percent: Decimal) -> String {
    let rounded = percent.round_dp(1);
    if rounded.is_zero() {
        return "+0.0%".to_string();
    }
    if rounded < Decimal::ZERO {
        format!("{rounded:.1}%")
    } else {
        format!("+{rounded:.1}%")
    }
}

/// Fit `s` into a table column of `max` characters, ending in `…` when cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some(_) if max == 0 => String::new(),
        Some(_) => {
            let kept: String = s.chars().take(max - 1).collect();
            format!("{kept}…")
        }
    }
}

/// A text progress bar `width` cells wide, capped at full.
pub(crate) fn progress_bar(percent: Decimal, width: usize) -> String {
    let capped = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (capped * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}
