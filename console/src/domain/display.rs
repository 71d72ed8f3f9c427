//! Presentation-only values derived from raw record fields.

use chrono::{DateTime, Utc};

/// Locale and currency used when rendering amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// BCP 47 language tag such as `en-US` or `es-MX`.
    pub locale: String,
    /// ISO 4217 currency code such as `MXN`.
    pub currency: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            locale: "en-US".to_owned(),
            currency: "MXN".to_owned(),
        }
    }
}

impl DisplayOptions {
    /// Format `amount` in the configured currency and locale.
    pub fn money(&self, amount: f64) -> String {
        format_currency(amount, &self.currency, &self.locale)
    }
}

/// Visual tone for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Confirmed, active, or completed.
    Success,
    /// Waiting on an operator or the customer.
    Warning,
    /// Cancelled, rejected, or expired.
    Danger,
    /// Anything else.
    Neutral,
}

impl Tone {
    /// Marker printed beside the status in terminal tables.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Success => "+",
            Self::Warning => "~",
            Self::Danger => "!",
            Self::Neutral => " ",
        }
    }
}

/// Map a backend status string to a badge tone.
pub fn status_tone(status: &str) -> Tone {
    match status.trim().to_ascii_uppercase().as_str() {
        "CONFIRMED" | "ACTIVE" | "APPROVED" | "COMPLETED" | "ATTENDED" | "ACCEPTED"
        | "SCHEDULED" => Tone::Success,
        "PENDING" | "WAITLISTED" | "IN_PROGRESS" => Tone::Warning,
        "CANCELLED" | "CANCELED" | "REJECTED" | "EXPIRED" | "NO_SHOW" | "INACTIVE" => {
            Tone::Danger
        }
        _ => Tone::Neutral,
    }
}

/// Status text prefixed with its tone marker.
pub fn status_badge(status: &str) -> String {
    format!("{} {status}", status_tone(status).marker())
}

fn separators(locale: &str) -> (char, char) {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "es" | "de" | "pt" | "it" | "nl" => ('.', ','),
        _ => (',', '.'),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}

/// Format `amount` with locale-aware separators and the currency symbol.
///
/// # Examples
/// ```
/// use admin_console::domain::display::format_currency;
///
/// assert_eq!(format_currency(1234.5, "USD", "en-US"), "$1,234.50");
/// assert_eq!(format_currency(1234.5, "EUR", "de-DE"), "€1.234,50");
/// assert_eq!(format_currency(-3.0, "CLP", "en"), "-3.00 CLP");
/// ```
pub fn format_currency(amount: f64, currency: &str, locale: &str) -> String {
    let (group, decimal) = separators(locale);
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    let number = format!("{}{decimal}{cents}", group_digits(whole, group));
    let code = currency.trim().to_ascii_uppercase();
    match code.as_str() {
        "MXN" | "USD" => format!("{sign}${number}"),
        "EUR" => format!("{sign}€{number}"),
        "GBP" => format!("{sign}£{number}"),
        _ => format!("{sign}{number} {code}"),
    }
}

/// Compact UTC timestamp for tables.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// Optional cell text, `-` when absent.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_owned(), |value| value.to_string())
}

/// `yes`/`no` cell text.
pub fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_owned()
}
