//! Supported languages and per-entity localized name maps.
//!
//! Every directory entity carries a [`NameMap`] with an optional canonical
//! name plus one field per supported language. Display-name resolution
//! follows a fixed fallback chain: requested language, canonical name,
//! English. English is guaranteed present by the write-side collaborator,
//! so a map that exhausts the chain is a data-integrity violation and is
//! reported instead of papered over.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of languages the directory is localized into.
///
/// Anything outside this set is treated as English, both when parsing
/// request parameters and when resolving display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    #[default]
    En,
    Es,
    Fr,
    Tr,
}

impl Language {
    pub const ALL: [Self; 5] = [Self::De, Self::En, Self::Es, Self::Fr, Self::Tr];

    /// Parse a language tag, falling back to English for unsupported codes.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "de" => Self::De,
            "es" => Self::Es,
            "fr" => Self::Fr,
            "tr" => Self::Tr,
            _ => Self::En,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::Tr => "tr",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocalizeError {
    /// The fallback chain was exhausted: neither the canonical name nor the
    /// English name is present. Write-side invariants guarantee this never
    /// happens for well-formed entities.
    #[error("name map has no canonical or English entry")]
    MissingEnglishName,
}

/// Localized names for one entity: an optional canonical name plus one
/// optional entry per supported language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameMap {
    /// Canonical (usually local-script) name, e.g. `München`.
    pub canonical: Option<String>,
    pub en: Option<String>,
    pub de: Option<String>,
    pub es: Option<String>,
    pub fr: Option<String>,
    pub tr: Option<String>,
}

impl NameMap {
    /// A map with only the English entry set.
    #[must_use]
    pub fn english(name: impl Into<String>) -> Self {
        Self {
            en: Some(name.into()),
            ..Self::default()
        }
    }

    /// A map with a canonical name plus the English entry.
    #[must_use]
    pub fn canonical(name: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            canonical: Some(name.into()),
            en: Some(en.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with(mut self, language: Language, name: impl Into<String>) -> Self {
        *self.slot_mut(language) = Some(name.into());
        self
    }

    #[must_use]
    pub fn get(&self, language: Language) -> Option<&str> {
        self.slot(language).as_deref()
    }

    /// Resolve the display name for a requested language.
    ///
    /// Order: requested-language entry, canonical name, English. An empty
    /// chain is an error, never a silent substitute.
    pub fn resolve(&self, language: Language) -> Result<&str, LocalizeError> {
        self.get(language)
            .or(self.canonical.as_deref())
            .or(self.en.as_deref())
            .ok_or(LocalizeError::MissingEnglishName)
    }

    /// The name used for deterministic tie-breaking: canonical if present,
    /// otherwise English.
    #[must_use]
    pub fn canonical_or_en(&self) -> Option<&str> {
        self.canonical.as_deref().or(self.en.as_deref())
    }

    /// Every present name, for substring matching.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.canonical
            .as_deref()
            .into_iter()
            .chain(Language::ALL.iter().filter_map(|lang| self.get(*lang)))
    }

    fn slot(&self, language: Language) -> &Option<String> {
        match language {
            Language::De => &self.de,
            Language::En => &self.en,
            Language::Es => &self.es,
            Language::Fr => &self.fr,
            Language::Tr => &self.tr,
        }
    }

    fn slot_mut(&mut self, language: Language) -> &mut Option<String> {
        match language {
            Language::De => &mut self.de,
            Language::En => &mut self.en,
            Language::Es => &mut self.es,
            Language::Fr => &mut self.fr,
            Language::Tr => &mut self.tr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_tags_fall_back_to_english() {
        assert_eq!(Language::from_tag("de"), Language::De);
        assert_eq!(Language::from_tag("TR"), Language::Tr);
        assert_eq!(Language::from_tag("jp"), Language::En);
        assert_eq!(Language::from_tag(""), Language::En);
    }

    #[test]
    fn resolve_prefers_requested_language() {
        let names = NameMap::canonical("München", "Munich").with(Language::Fr, "Munich (fr)");
        assert_eq!(names.resolve(Language::Fr).unwrap(), "Munich (fr)");
    }

    #[test]
    fn resolve_falls_back_to_canonical_then_english() {
        let names = NameMap::canonical("München", "Munich");
        assert_eq!(names.resolve(Language::Tr).unwrap(), "München");

        let names = NameMap::english("Munich");
        assert_eq!(names.resolve(Language::De).unwrap(), "Munich");
    }

    #[test]
    fn resolve_never_returns_empty_for_well_formed_maps() {
        let names = NameMap::english("Berlin");
        for lang in Language::ALL {
            assert!(!names.resolve(lang).unwrap().is_empty());
        }
    }

    #[test]
    fn exhausted_chain_is_an_error() {
        let names = NameMap {
            de: Some("Nur Deutsch".into()),
            ..NameMap::default()
        };
        assert_eq!(
            names.resolve(Language::En),
            Err(LocalizeError::MissingEnglishName)
        );
    }

    #[test]
    fn iter_yields_all_present_names() {
        let names = NameMap::canonical("Wien", "Vienna").with(Language::Tr, "Viyana");
        let all: Vec<_> = names.iter().collect();
        assert_eq!(all, vec!["Wien", "Vienna", "Viyana"]);
    }
}
