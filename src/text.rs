use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize free text for matching: NFKD fold with combining marks
/// stripped (so "depreciación" and "depreciacion" compare equal),
/// lowercase, curly quotes and dashes folded to ASCII, whitespace
/// collapsed to single spaces.
///
/// Idempotent: normalizing already-normalized text returns it unchanged.
pub fn normalize_text(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let folded: String = value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce a raw tax id to its 9-digit NIT form. Strips every non-digit
/// character; anything shorter than 9 digits is unusable and maps to the
/// empty string.
pub fn normalize_nit(raw_nit: &str) -> String {
    let digits: String = raw_nit.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= 9 {
        digits[..9].to_string()
    } else {
        String::new()
    }
}
