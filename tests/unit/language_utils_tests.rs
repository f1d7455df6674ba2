/*!
 * Tests for the language catalogue and code utilities
 */

use i18n_contrib::app_config::AvailableLanguage;
use i18n_contrib::language_utils::{
    all_languages, deepl_target, find_suggested, get_language_name, libretranslate_target,
    suggested_languages, validate_language_code,
};

#[test]
fn test_allLanguages_shouldContainSixteenUniqueCodes() {
    let languages = all_languages();
    assert_eq!(languages.len(), 16);

    let mut codes: Vec<&str> = languages.iter().map(|l| l.code.as_str()).collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 16);
}

#[test]
fn test_findSuggested_shouldIgnoreCase() {
    let chinese = find_suggested("ZH-tw").unwrap();
    assert_eq!(chinese.code, "zh-TW");
    assert_eq!(chinese.native, "繁體中文");
    assert!(find_suggested("sv").is_none());
}

#[test]
fn test_suggestedLanguages_withNoneAvailable_shouldReturnAll() {
    assert_eq!(suggested_languages(&[]).len(), all_languages().len());
}

#[test]
fn test_suggestedLanguages_shouldExcludeExactCodesOnly() {
    let available = vec![AvailableLanguage {
        code: "zh-CN".to_string(),
        name: "Chinese (Simplified)".to_string(),
        native: "简体中文".to_string(),
        completion: 80,
    }];

    let suggested = suggested_languages(&available);
    assert!(suggested.iter().any(|l| l.code == "zh-TW"));
    assert!(!suggested.iter().any(|l| l.code == "zh-CN"));
}

#[test]
fn test_validateLanguageCode_shouldAcceptTwoToFiveCharacters() {
    assert!(validate_language_code("de").is_ok());
    assert!(validate_language_code("pt-BR").is_ok());
    assert!(validate_language_code("deu").is_ok());
    assert!(validate_language_code("xx").is_ok());
    assert!(validate_language_code("sr-ME").is_ok());
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("x").is_err());
    assert!(validate_language_code("en-GB-x").is_err());
    assert!(validate_language_code("a b").is_err());
}

#[test]
fn test_providerTargets_shouldNormaliseCodes() {
    assert_eq!(libretranslate_target("pt-BR"), "pt");
    assert_eq!(libretranslate_target("zh_TW"), "zh");
    assert_eq!(deepl_target("ja"), "JA");
    assert_eq!(deepl_target("en_gb"), "EN-GB");
    assert_eq!(deepl_target("zh-CN"), "ZH");
}

#[test]
fn test_getLanguageName_shouldPreferCatalogueName() {
    assert_eq!(get_language_name("pt").unwrap(), "Portuguese");
    assert_eq!(get_language_name("fi").unwrap(), "Finnish");
}
