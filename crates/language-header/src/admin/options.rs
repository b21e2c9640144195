use serde::Serialize;

use crate::registry::{Language, LanguageRegistry};

pub const EXISTING_LANGUAGES: &str = "Existing languages";
pub const LANGUAGES_NOT_YET_ADDED: &str = "Languages not yet added";

/// The choices offered by the site language select of a mapping row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LanguageOptions {
    /// Used when the site has no configured language yet: only standard languages.
    Flat(Vec<Language>),
    Grouped(Vec<OptionGroup>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionGroup {
    pub label: &'static str,
    pub languages: Vec<Language>,
}

impl LanguageOptions {
    pub fn from_registry(registry: &dyn LanguageRegistry) -> Self {
        let existing = registry.languages();
        let not_yet_added = registry.standard_languages_without_configured();

        if existing.is_empty() {
            return Self::Flat(not_yet_added);
        }

        Self::Grouped(vec![
            OptionGroup { label: EXISTING_LANGUAGES, languages: existing },
            OptionGroup { label: LANGUAGES_NOT_YET_ADDED, languages: not_yet_added },
        ])
    }

    /// Iterates every selectable language regardless of grouping.
    pub fn languages(&self) -> Box<dyn Iterator<Item = &Language> + '_> {
        match self {
            Self::Flat(languages) => Box::new(languages.iter()),
            Self::Grouped(groups) => Box::new(groups.iter().flat_map(|group| group.languages.iter())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LanguageOptions, EXISTING_LANGUAGES, LANGUAGES_NOT_YET_ADDED};
    use crate::registry::{ConfigurableLanguageRegistry, Language, LanguageRegistry, MockLanguageRegistry};

    #[test]
    fn test_flat_when_no_language_configured() {
        let mut registry = MockLanguageRegistry::new();
        registry.expect_languages().returning(Vec::new);
        registry
            .expect_standard_languages_without_configured()
            .returning(|| vec![Language::new("de", "German"), Language::new("fr", "French")]);

        let options = LanguageOptions::from_registry(&registry);
        assert_eq!(options, LanguageOptions::Flat(vec![Language::new("de", "German"), Language::new("fr", "French")]));
    }

    #[test]
    fn test_grouped_when_languages_configured() {
        let registry = ConfigurableLanguageRegistry::new("en").with_standard_language("en");

        let LanguageOptions::Grouped(groups) = LanguageOptions::from_registry(&registry) else {
            panic!("expected grouped options");
        };

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, EXISTING_LANGUAGES);
        assert_eq!(groups[0].languages, vec![Language::new("en", "English")]);
        assert_eq!(groups[1].label, LANGUAGES_NOT_YET_ADDED);
        assert!(groups[1].languages.iter().all(|language| language.id() != "en"));
        assert!(groups[1].languages.iter().any(|language| language.id() == "de"));
    }

    #[test]
    fn test_languages_iterates_all_groups() {
        let registry = ConfigurableLanguageRegistry::new("en").with_standard_language("en");
        let options = LanguageOptions::from_registry(&registry);

        let remaining = registry.standard_languages_without_configured().len();
        assert_eq!(options.languages().count(), 1 + remaining);
        assert_eq!(options.languages().next().map(Language::id), Some("en"));

        let flat = LanguageOptions::Flat(vec![Language::new("de", "German")]);
        assert_eq!(flat.languages().map(Language::id).collect::<Vec<_>>(), vec!["de"]);
    }
}
