//! Supported language catalog.
//!
//! The remote speech service synthesizes voices for a fixed set of
//! languages; this catalog mirrors that set for CLI display and lookup.
//! The session controller itself treats language codes as opaque
//! pass-through values — nothing here gates what gets sent.

/// Metadata for a supported language.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageInfo {
    /// ISO 639-1 code (e.g., "en", "fr")
    pub code: &'static str,
    /// English display name
    pub name: &'static str,
}

/// Languages the speech service can transcribe, translate, and speak.
pub const LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        code: "en",
        name: "English",
    },
    LanguageInfo {
        code: "fr",
        name: "French",
    },
    LanguageInfo {
        code: "de",
        name: "German",
    },
    LanguageInfo {
        code: "es",
        name: "Spanish",
    },
    LanguageInfo {
        code: "hi",
        name: "Hindi",
    },
    LanguageInfo {
        code: "zh",
        name: "Mandarin Chinese",
    },
    LanguageInfo {
        code: "ar",
        name: "Arabic",
    },
    LanguageInfo {
        code: "ru",
        name: "Russian",
    },
];

/// Look up a language by its code.
pub fn get_language(code: &str) -> Option<&'static LanguageInfo> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// List all supported languages.
pub fn list_languages() -> &'static [LanguageInfo] {
    LANGUAGES
}
