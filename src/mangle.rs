//! Localization mangling
//!
//! Wraps a string as `[[ -- S -- ]]`, with one dash per four UTF-16 code units
//! of `S` on each side. Translations that would be truncated or laid out badly
//! show up as clipped markers during testing. Strings that parse as an
//! integer (font sizes and similar numeric "strings") pass through
//! untouched so they can still be parsed.

pub fn mangle_localized_string(s: &str) -> String {
    if s.parse::<i32>().is_ok() {
        return s.to_string();
    }

    let dashes = "-".repeat(s.encode_utf16().count() / 4);
    ["[[", dashes.as_str(), s, dashes.as_str(), "]]"].join(" ")
}
