//! Site language registry.
//!
//! The registry owns the list of languages configured on the site, the default
//! language, and the list of predefined standard languages an administrator may add.

mod standard;

use serde::{Deserialize, Serialize};

pub use standard::standard_languages;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    id: String,
    name: String,
}

impl Language {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }

    /// The language code, e.g. `de` or `pt-br`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The English name of the language.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait LanguageRegistry: Send + Sync {
    /// Languages configured on the site.
    fn languages(&self) -> Vec<Language>;

    /// Predefined standard languages which are not configured yet, sorted by name.
    fn standard_languages_without_configured(&self) -> Vec<Language>;

    /// The site default language.
    fn default_language(&self) -> Language;

    /// Checks whether `langcode` belongs to a configured language.
    fn is_configured(&self, langcode: &str) -> bool {
        self.languages().iter().any(|language| language.id() == langcode)
    }
}

/// A registry holding its configured languages in memory.
#[derive(Debug, Clone)]
pub struct ConfigurableLanguageRegistry {
    languages: Vec<Language>,
    default_langcode: String,
}

impl ConfigurableLanguageRegistry {
    /// Creates a registry without configured languages.
    pub fn new(default_langcode: impl Into<String>) -> Self {
        Self { languages: vec![], default_langcode: default_langcode.into() }
    }

    /// Adds a configured language, replacing a language with the same code.
    pub fn with_language(mut self, language: Language) -> Self {
        match self.languages.iter_mut().find(|existing| existing.id == language.id) {
            Some(existing) => *existing = language,
            None => self.languages.push(language),
        }
        self
    }

    /// Adds a standard language by code. Unknown codes use the code as their name.
    pub fn with_standard_language(self, langcode: &str) -> Self {
        let language = lookup_standard(langcode).unwrap_or_else(|| Language::new(langcode, langcode));
        self.with_language(language)
    }
}

impl LanguageRegistry for ConfigurableLanguageRegistry {
    fn languages(&self) -> Vec<Language> {
        self.languages.clone()
    }

    fn standard_languages_without_configured(&self) -> Vec<Language> {
        let mut languages = standard_languages()
            .filter(|standard| !self.languages.iter().any(|configured| configured.id == standard.id))
            .collect::<Vec<_>>();
        languages.sort_by(|a, b| a.name.cmp(&b.name));
        languages
    }

    fn default_language(&self) -> Language {
        self.languages
            .iter()
            .find(|language| language.id == self.default_langcode)
            .cloned()
            .or_else(|| lookup_standard(&self.default_langcode))
            .unwrap_or_else(|| Language::new(self.default_langcode.as_str(), self.default_langcode.as_str()))
    }
}

fn lookup_standard(langcode: &str) -> Option<Language> {
    standard_languages().find(|language| language.id == langcode)
}

#[cfg(test)]
mod tests {
    use super::{ConfigurableLanguageRegistry, Language, LanguageRegistry};

    fn registry() -> ConfigurableLanguageRegistry {
        ConfigurableLanguageRegistry::new("en")
            .with_standard_language("en")
            .with_standard_language("de")
            .with_language(Language::new("x-klingon", "Klingon"))
    }

    #[test]
    fn test_configured_languages() {
        let registry = registry();
        let ids = registry.languages().iter().map(|l| l.id().to_owned()).collect::<Vec<_>>();

        assert_eq!(ids, vec!["en", "de", "x-klingon"]);
        assert!(registry.is_configured("de"));
        assert!(!registry.is_configured("fr"));
    }

    #[test]
    fn test_standard_without_configured() {
        let remaining = registry().standard_languages_without_configured();

        assert!(remaining.iter().all(|l| l.id() != "en" && l.id() != "de"));
        assert!(remaining.iter().any(|l| l.id() == "fr"));
        assert!(remaining.windows(2).all(|pair| pair[0].name() <= pair[1].name()));
    }

    #[test]
    fn test_default_language() {
        assert_eq!(registry().default_language(), Language::new("en", "English"));

        // not configured, resolved from the standard list
        assert_eq!(ConfigurableLanguageRegistry::new("fr").default_language(), Language::new("fr", "French"));

        assert_eq!(ConfigurableLanguageRegistry::new("x-elvish").default_language(), Language::new("x-elvish", "x-elvish"));
    }

    #[test]
    fn test_with_language_replaces_same_code() {
        let registry = ConfigurableLanguageRegistry::new("de")
            .with_language(Language::new("de", "Deutsch"))
            .with_language(Language::new("de", "German"));

        assert_eq!(registry.languages(), vec![Language::new("de", "German")]);
    }
}
