use anyhow::{Result, anyhow};
use isolang::Language;

// Language utilities for target language handling
//
// Users may name the target language ("English", "Deutsch", "中文") or give an
// ISO 639-1 / 639-2 code ("en", "deu", "ger"). Codes are expanded to their
// English name before they are put into a prompt; names are passed through.

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
        if let Some((_, part2t)) = PART2B_TO_PART2T.iter().find(|(b, _)| *b == normalized_code) {
            return Ok((*part2t).to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Name to put into the translation prompt for a user supplied language.
///
/// Only lowercase 2/3-letter ASCII input is treated as a code, so a name
/// such as "Ewe" or "Ido" given with a capital is never rewritten.
pub fn prompt_language_name(language: &str) -> String {
    let trimmed = language.trim();
    let looks_like_code = (trimmed.len() == 2 || trimmed.len() == 3)
        && trimmed.chars().all(|c| c.is_ascii_lowercase());

    if looks_like_code {
        if let Ok(name) = get_language_name(trimmed) {
            return name;
        }
    }

    trimmed.to_string()
}
