//! Locale name resolution
//!
//! The bundle only needs a string-to-string function from a preferred locale
//! to the locale whose pak should be loaded. [`DefaultLocaleResolver`]
//! canonicalizes POSIX-style names and falls back to a fixed locale; any
//! closure `Fn(&str) -> String` works too.

/// Locale used when the preference is empty or unusable
pub const DEFAULT_LOCALE: &str = "en-US";

pub trait LocaleResolver: Send + Sync {
    /// Locale name to load for the given preference (may be empty)
    fn resolve(&self, preferred: &str) -> String;
}

impl<F> LocaleResolver for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn resolve(&self, preferred: &str) -> String {
        self(preferred)
    }
}

/// Canonicalizes `ll[_-]RR[.charset][@modifier]` into `ll-RR`
#[derive(Debug, Clone)]
pub struct DefaultLocaleResolver {
    fallback: String,
}

impl DefaultLocaleResolver {
    pub fn new(fallback: impl Into<String>) -> Self {
        DefaultLocaleResolver {
            fallback: fallback.into(),
        }
    }

    fn canonicalize(preferred: &str) -> Option<String> {
        let name = preferred
            .split(&['.', '@'][..])
            .next()
            .unwrap_or_default()
            .trim();
        if name.is_empty() || name.eq_ignore_ascii_case("c") || name.eq_ignore_ascii_case("posix") {
            return None;
        }

        let mut parts = name.split(&['_', '-'][..]);
        let language = parts.next()?;
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let mut canonical = language.to_ascii_lowercase();

        if let Some(region) = parts.next() {
            if region.is_empty() || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
            canonical.push('-');
            if region.len() == 4 {
                // Script subtag, e.g. zh-Hant
                let mut chars = region.chars();
                if let Some(first) = chars.next() {
                    canonical.push(first.to_ascii_uppercase());
                    canonical.extend(chars.map(|c| c.to_ascii_lowercase()));
                }
            } else {
                canonical.push_str(&region.to_ascii_uppercase());
            }
        }
        Some(canonical)
    }
}

impl Default for DefaultLocaleResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl LocaleResolver for DefaultLocaleResolver {
    fn resolve(&self, preferred: &str) -> String {
        Self::canonicalize(preferred).unwrap_or_else(|| self.fallback.clone())
    }
}
