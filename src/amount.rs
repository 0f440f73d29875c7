use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A filed value exactly as it arrives from the open-data service: either
/// a JSON number or a loosely formatted string ("$ 1.234,56", "(500)").
/// Absent values deserialize to [`RawValue::Null`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawValue {
    #[schemars(description = "Numeric value as filed")]
    Number(f64),
    #[schemars(description = "Free-text amount, possibly with currency symbols and separators")]
    Text(String),
    #[schemars(description = "Missing or null value")]
    Null,
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Null
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// Parse a heterogeneous amount into a finite number. Failure is never an
/// error: anything unparseable (including IEEE NaN) maps to `None`.
pub fn parse_amount(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Number(n) => {
            if n.is_nan() {
                None
            } else {
                Some(*n)
            }
        }
        RawValue::Text(text) => parse_amount_text(text),
        RawValue::Null => None,
    }
}

/// String amounts: a fully parenthesized value is negative; currency
/// symbols and internal spaces are stripped. Separator disambiguation:
/// when both ',' and '.' appear, whichever occurs last is the decimal
/// point and the other is removed as a thousands separator; a lone ','
/// is a decimal point. Remaining non-numeric characters are dropped, and
/// empty or sign-only remnants yield `None`.
fn parse_amount_text(raw: &str) -> Option<f64> {
    let mut text = raw.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let negative = text.starts_with('(') && text.ends_with(')');
    if negative {
        text = text[1..text.len() - 1].to_string();
    }

    text.retain(|c| c != ' ' && c != '$');

    match (text.rfind(','), text.rfind('.')) {
        (Some(comma), Some(dot)) => {
            if comma > dot {
                text.retain(|c| c != '.');
                text = text.replace(',', ".");
            } else {
                text.retain(|c| c != ',');
            }
        }
        (Some(_), None) => {
            text = text.replace(',', ".");
        }
        _ => {}
    }

    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();

    if matches!(cleaned.as_str(), "" | "-" | "." | "-.") {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Format a peso amount for display: "COP 1,234,567", or "N/D" when
/// missing.
pub fn format_currency(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("COP {}", group_thousands(v, 0)),
        None => "N/D".to_string(),
    }
}

/// Format a plain number with thousands grouping and fixed decimals, or
/// "N/D" when missing.
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => group_thousands(v, decimals),
        None => "N/D".to_string(),
    }
}

/// Percentage change against a prior value; `None` when the prior value is
/// missing or zero.
pub fn pct_change(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    let current = current?;
    let previous = previous?;
    if previous == 0.0 {
        return None;
    }
    Some(((current - previous) / previous.abs()) * 100.0)
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let negative = formatted.starts_with('-');
    let unsigned = formatted.trim_start_matches('-');
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    let len = int_part.len();
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
