/*!
 * Language utilities for target language handling.
 *
 * Holds the catalogue of suggested languages, validation of custom language
 * codes and the code normalisation each provider expects.
 */

use anyhow::{anyhow, Result};
use isolang::Language;
use once_cell::sync::Lazy;

use crate::app_config::AvailableLanguage;

/// A language that can be offered as a translation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    /// Language code, optionally with a region (e.g. "zh-CN")
    pub code: String,
    /// English name
    pub name: String,
    /// Native name
    pub native: String,
}

impl LanguageInfo {
    fn new(code: &str, name: &str, native: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            native: native.to_string(),
        }
    }
}

static SUGGESTED_LANGUAGES: Lazy<Vec<LanguageInfo>> = Lazy::new(|| {
    vec![
        LanguageInfo::new("zh-CN", "Chinese (Simplified)", "简体中文"),
        LanguageInfo::new("zh-TW", "Chinese (Traditional)", "繁體中文"),
        LanguageInfo::new("ja", "Japanese", "日本語"),
        LanguageInfo::new("ko", "Korean", "한국어"),
        LanguageInfo::new("de", "German", "Deutsch"),
        LanguageInfo::new("fr", "French", "Français"),
        LanguageInfo::new("es", "Spanish", "Español"),
        LanguageInfo::new("pt", "Portuguese", "Português"),
        LanguageInfo::new("it", "Italian", "Italiano"),
        LanguageInfo::new("nl", "Dutch", "Nederlands"),
        LanguageInfo::new("pl", "Polish", "Polski"),
        LanguageInfo::new("ru", "Russian", "Русский"),
        LanguageInfo::new("tr", "Turkish", "Türkçe"),
        LanguageInfo::new("ar", "Arabic", "العربية"),
        LanguageInfo::new("th", "Thai", "ไทย"),
        LanguageInfo::new("vi", "Vietnamese", "Tiếng Việt"),
    ]
});

/// All languages the tool suggests out of the box
pub fn all_languages() -> &'static [LanguageInfo] {
    &SUGGESTED_LANGUAGES
}

/// Suggested languages that do not have a translation yet
pub fn suggested_languages(available: &[AvailableLanguage]) -> Vec<&'static LanguageInfo> {
    SUGGESTED_LANGUAGES
        .iter()
        .filter(|lang| !available.iter().any(|a| a.code == lang.code))
        .collect()
}

/// Look up a suggested language by code (case-insensitive)
pub fn find_suggested(code: &str) -> Option<&'static LanguageInfo> {
    SUGGESTED_LANGUAGES
        .iter()
        .find(|lang| lang.code.eq_ignore_ascii_case(code.trim()))
}

/// Validate a user supplied language code and name
///
/// The code is lower-cased and must be 2 to 5 characters long, the name must
/// have at least 2 characters. Returns the normalised `(code, name)` pair.
pub fn validate_custom_language(code: &str, name: &str) -> Result<(String, String)> {
    let code = code.trim().to_lowercase();
    let name = name.trim().to_string();

    validate_language_code(&code)?;
    if name.chars().count() < 2 {
        return Err(anyhow!("Language name must be at least 2 characters: '{}'", name));
    }

    Ok((code, name))
}

/// Validate the shape of a target language code
///
/// Catalogue codes and custom codes follow the same rule: 2 to 5 characters
/// with no whitespace.
pub fn validate_language_code(code: &str) -> Result<()> {
    let code = code.trim();
    let code_len = code.chars().count();

    if !(2..=5).contains(&code_len) || code.chars().any(char::is_whitespace) {
        return Err(anyhow!("Language code must be 2 to 5 characters: '{}'", code));
    }

    Ok(())
}

/// Resolve a target language picked by the user into a `(code, name)` pair
///
/// Catalogue codes keep their canonical spelling ("zh-cn" -> "zh-CN") and
/// name. Any other code is a custom language: it goes through
/// `validate_custom_language`, named by `name`, else by ISO 639, else by the
/// code itself.
pub fn resolve_target_language(code: &str, name: Option<&str>) -> Result<(String, String)> {
    if let Some(lang) = find_suggested(code) {
        let name = name.map_or_else(|| lang.name.clone(), |n| n.trim().to_string());
        return Ok((lang.code.clone(), name));
    }

    let name = match name {
        Some(name) => name.to_string(),
        None => get_language_name(code).unwrap_or_else(|_| code.trim().to_string()),
    };
    validate_custom_language(code, &name)
}

/// Get the English language name for a code such as "de" or "pt-BR"
pub fn get_language_name(code: &str) -> Result<String> {
    if let Some(lang) = find_suggested(code) {
        return Ok(lang.name.clone());
    }

    let base = base_code(code);
    let lang = match base.len() {
        2 => Language::from_639_1(&base),
        3 => Language::from_639_3(&base),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}

/// Lower-cased code without its region part
fn base_code(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Target code in the form LibreTranslate expects ("zh-CN" -> "zh")
pub fn libretranslate_target(code: &str) -> String {
    base_code(code)
}

/// Target code in the form DeepL expects ("de" -> "DE", "pt-br" -> "PT-BR")
///
/// DeepL has no regional Chinese targets in the free API, so every `zh-*`
/// collapses to `ZH`.
pub fn deepl_target(code: &str) -> String {
    let normalized = code.trim().replace('_', "-").to_uppercase();
    if normalized.starts_with("ZH") {
        return "ZH".to_string();
    }
    normalized
}
