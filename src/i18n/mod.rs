//! i18n - Internationalization Module
//!
//! Thin lookup layer over `rust-i18n`. Translations live in `locales/*.yml`;
//! the active locale is process-wide and defaults to German.

use parking_lot::RwLock;
use rust_i18n::t;

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// German (default)
    #[default]
    De,
    /// English
    En,
}

impl Locale {
    /// Locale code as used by the translation files
    pub fn code(&self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::En => "en",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::De => "Deutsch",
            Locale::En => "English",
        }
    }

    /// Parse a language tag such as `de`, `en-US` or `de_AT`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lang = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "de" => Some(Locale::De),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    /// Detect the locale from the operating system, falling back to German
    pub fn detect() -> Self {
        let current = locale_config::Locale::current().to_string();
        current
            .split(',')
            .find_map(Locale::from_tag)
            .unwrap_or_default()
    }
}

static CURRENT_LOCALE: RwLock<Locale> = RwLock::new(Locale::De);

/// Get the active locale
pub fn current_locale() -> Locale {
    *CURRENT_LOCALE.read()
}

/// Set the active locale
pub fn set_locale(locale: Locale) {
    *CURRENT_LOCALE.write() = locale;
}

/// Translate a key in the active locale
pub fn tr(key: &str) -> String {
    tr_in(current_locale(), key)
}

/// Translate a key in an explicit locale
pub fn tr_in(locale: Locale, key: &str) -> String {
    t!(key, locale = locale.code()).to_string()
}

/// Translate a key and substitute `%{name}` placeholders
///
/// # Example
/// ```ignore
/// // With translation `validation: "Validierungsfehler: %{detail}"`
/// tr_with("errors.validation", &[("detail", "email missing")])
/// // Returns "Validierungsfehler: email missing"
/// ```
pub fn tr_with(key: &str, args: &[(&str, &str)]) -> String {
    format_args_in(current_locale(), key, args)
}

/// Translate and substitute placeholders in an explicit locale
pub fn format_args_in(locale: Locale, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = tr_in(locale, key);
    for (name, value) in args {
        result = result.replace(&format!("%{{{name}}}"), value);
    }
    result
}
