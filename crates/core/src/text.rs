//! Text helpers: transliteration, slugs and derived country codes.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s_-]").unwrap());
static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]+").unwrap());

/// ASCII transliteration of any script.
///
/// The Azerbaijani schwa is written `e`; everything else follows
/// `deunicode`. Characters without a transliteration are dropped.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'ə' => out.push('e'),
            'Ə' => out.push('E'),
            _ => out.push_str(deunicode::deunicode_char(c).unwrap_or("")),
        }
    }
    out
}

/// URL slug: transliterated, lower-cased, words joined by `-`.
///
/// Can be empty when the text has no transliterable characters.
pub fn slugify(text: &str) -> String {
    let lowered = transliterate(text).to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lowered, "");
    let joined = SLUG_SEPARATORS.replace_all(cleaned.trim(), "-");
    joined.trim_matches('-').to_string()
}

/// Three-letter upper-case code derived from a (translated) country name:
/// its first three alphabetic characters after transliteration.
pub fn country_code(name: &str) -> String {
    transliterate(name)
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}
