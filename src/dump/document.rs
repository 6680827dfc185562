/*!
 * Document assembly and persistence.
 */

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::app_config::MediaKind;
use crate::errors::EntityError;

use super::merge::LanguageInfo;

/// Cast and crew, passed through untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Credits {
    pub cast: Vec<Value>,
    pub crew: Vec<Value>,
}

/// The unit persisted per entity
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Locale keys in merge order
    pub languages: Vec<String>,
    /// Which kind of entity `info` describes
    pub kind: MediaKind,
    /// Detail object with `language_info` and `credits` folded in
    pub info: Map<String, Value>,
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("languages", &self.languages)?;
        map.serialize_entry(self.kind.info_key(), &self.info)?;
        map.end()
    }
}

impl Document {
    /// Compact JSON, non-ASCII characters left unescaped
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, EntityError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Build the persisted document.
///
/// The per-language fields are dropped from the raw detail since they now live
/// under `language_info`; of the credits payload only `cast` and `crew` remain.
pub fn assemble(
    kind: MediaKind,
    mut detail: Map<String, Value>,
    language_info: &LanguageInfo,
    credits: Credits,
) -> Result<Document, EntityError> {
    for field in [kind.title_field(), "overview", "tagline"] {
        detail.shift_remove(field);
    }

    detail.insert("language_info".to_string(), serde_json::to_value(language_info)?);
    detail.insert("credits".to_string(), serde_json::to_value(credits)?);

    Ok(Document {
        languages: language_info.keys(),
        kind,
        info: detail,
    })
}

/// `{storage_root}/{id}.json`
pub fn document_path(storage_root: &Path, id: u64) -> PathBuf {
    storage_root.join(format!("{}.json", id))
}

/// Write the document in one call, replacing any previous file.
pub async fn write_document(storage_root: &Path, id: u64, document: &Document) -> Result<PathBuf, EntityError> {
    let path = document_path(storage_root, id);
    let bytes = document.to_json_bytes()?;
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
