//! Text transforms used when naming resource routes.

/// Pluralize / singularize collaborator consulted by [`Router::resources`].
///
/// [`Router::resources`]: super::Router::resources
pub trait Inflector: Send + Sync {
    fn pluralize(&self, word: &str) -> String;
    fn singularize(&self, word: &str) -> String;
}

/// Small rule-based English inflector.
///
/// Covers regular nouns plus the common irregular endings; applications with
/// unusual resource names can plug in their own [`Inflector`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishInflector;

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
];

/// Plural endings the generic rules get wrong, with their singular form.
const SINGULAR_ENDINGS: &[(&str, &str)] = &[
    ("ovies", "ovie"),
    ("atuses", "atus"),
    ("iases", "ias"),
    ("buses", "bus"),
    ("viruses", "virus"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
];

impl Inflector for EnglishInflector {
    fn pluralize(&self, word: &str) -> String {
        let lower = word.to_ascii_lowercase();
        if UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_string();
        }
        if let Some((_, plural)) = IRREGULAR.iter().find(|(s, p)| *s == lower || *p == lower) {
            return (*plural).to_string();
        }
        if let Some(stem) = word.strip_suffix('y') {
            if !ends_with_vowel(stem) {
                return format!("{stem}ies");
            }
        }
        if ["s", "x", "z", "ch", "sh"].iter().any(|end| word.ends_with(end)) {
            return format!("{word}es");
        }
        format!("{word}s")
    }

    fn singularize(&self, word: &str) -> String {
        let lower = word.to_ascii_lowercase();
        if UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_string();
        }
        if let Some((singular, _)) = IRREGULAR.iter().find(|(s, p)| *p == lower || *s == lower) {
            return (*singular).to_string();
        }
        let ending = SINGULAR_ENDINGS.iter().find_map(|(plural, singular)| {
            word.strip_suffix(*plural).map(|stem| (stem, *singular))
        });
        if let Some((stem, singular)) = ending {
            return format!("{stem}{singular}");
        }
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
        for end in ["sses", "shes", "ches", "xes", "zes"] {
            if word.ends_with(end) {
                return word[..word.len() - 2].to_string();
            }
        }
        if word.ends_with("ss") {
            return word.to_string();
        }
        match word.strip_suffix('s') {
            Some(stem) => stem.to_string(),
            None => word.to_string(),
        }
    }
}

fn ends_with_vowel(s: &str) -> bool {
    matches!(s.chars().last(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_nouns() {
        let i = EnglishInflector;
        assert_eq!(i.singularize("videos"), "video");
        assert_eq!(i.pluralize("video"), "videos");
        assert_eq!(i.singularize("users"), "user");
    }

    #[test]
    fn test_y_and_sibilant_endings() {
        let i = EnglishInflector;
        assert_eq!(i.pluralize("category"), "categories");
        assert_eq!(i.singularize("categories"), "category");
        assert_eq!(i.pluralize("day"), "days");
        assert_eq!(i.pluralize("box"), "boxes");
        assert_eq!(i.singularize("boxes"), "box");
        assert_eq!(i.singularize("addresses"), "address");
    }

    #[test]
    fn test_irregular_and_uncountable() {
        let i = EnglishInflector;
        assert_eq!(i.singularize("people"), "person");
        assert_eq!(i.pluralize("person"), "people");
        assert_eq!(i.singularize("news"), "news");
    }

    #[test]
    fn test_irregular_endings_round_trip() {
        let i = EnglishInflector;
        for (plural, singular) in [
            ("movies", "movie"),
            ("statuses", "status"),
            ("aliases", "alias"),
            ("buses", "bus"),
            ("viruses", "virus"),
        ] {
            assert_eq!(i.singularize(plural), singular);
            assert_eq!(i.pluralize(singular), plural);
        }
        assert_eq!(i.singularize("categories"), "category");
    }
}
