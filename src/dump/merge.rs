/*!
 * Multilingual merging.
 *
 * Folds the primary-language record and the translation variants of one
 * entity into a single locale-keyed map.
 */

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::EntityError;
use crate::providers::PRIMARY_LOCALE;

/// One translation variant as returned by the translations endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// ISO 639-1 language code
    pub iso_639_1: String,
    /// ISO 3166-1 region code
    pub iso_3166_1: String,
    /// Localised texts
    pub data: TranslationData,
}

/// Localised texts of a translation variant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranslationData {
    /// Movie title, or TV show name
    #[serde(default, alias = "name", deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tagline: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Translation {
    /// Composite `"{language}-{region}"` key
    pub fn locale_key(&self) -> String {
        format!("{}-{}", self.iso_639_1, self.iso_3166_1)
    }
}

/// Title, overview and tagline in one locale
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub title: String,
    pub overview: String,
    pub tagline: String,
}

/// Locale key to texts, in first-insertion order.
///
/// Re-inserting an existing key replaces its entry but keeps its position.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct LanguageInfo {
    entries: IndexMap<String, LanguageEntry>,
}

impl LanguageInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry
    pub fn insert(&mut self, key: impl Into<String>, entry: LanguageEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&LanguageEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Locale keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read the primary-language texts out of a raw detail object.
///
/// A missing title field is a malformed payload; a missing or null overview
/// or tagline counts as empty.
pub fn primary_entry(detail: &Map<String, Value>, title_field: &str) -> Result<LanguageEntry, EntityError> {
    let text = |field: &str| -> Result<String, EntityError> {
        match detail.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Ok(String::new()),
            Some(other) => Err(EntityError::Data(format!("'{}' is not a string: {}", field, other))),
        }
    };

    if !detail.contains_key(title_field) {
        return Err(EntityError::Data(format!("detail has no '{}'", title_field)));
    }

    Ok(LanguageEntry {
        title: text(title_field)?,
        overview: text("overview")?,
        tagline: text("tagline")?,
    })
}

/// Merge the primary record with the translation variants.
///
/// The primary locale is seeded first and is never overwritten by a
/// translation carrying the same key. A blank translated title falls back to
/// the primary title; overview and tagline are copied verbatim. Later
/// translations with a repeated key overwrite earlier ones.
pub fn merge(primary: LanguageEntry, translations: &[Translation]) -> LanguageInfo {
    let mut info = LanguageInfo::new();
    let primary_title = primary.title.clone();
    info.insert(PRIMARY_LOCALE, primary);

    for translation in translations {
        let key = translation.locale_key();
        if key == PRIMARY_LOCALE {
            continue;
        }

        let title = if translation.data.title.trim().is_empty() {
            primary_title.clone()
        } else {
            translation.data.title.clone()
        };

        info.insert(
            key,
            LanguageEntry {
                title,
                overview: translation.data.overview.clone(),
                tagline: translation.data.tagline.clone(),
            },
        );
    }

    info
}
