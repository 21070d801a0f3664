//! Settings documents in YAML or JSON.
//!
//! A document is one scope's worth of settings:
//!
//! ```yaml
//! stop-bubbling: true
//! settings:
//!   editor.tab-width: 4          # authoritative value
//!   release.targets: [x86_64]    # authoritative list
//!   lint.exclude:                # list edits
//!     clear: true
//!     add: [target, vendor]
//!     remove: [build]
//! ```
//!
//! Documents are validated when loaded. Values are checked against the key
//! being resolved only at resolution time, since the set of keys is not known
//! to the document.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::key::{validate_key_name, KeyDescriptor, KeyKind, STOP_BUBBLING};
use crate::source::{ConfigurationSource, ListModification, SourceResult};
use crate::value::Value;

/// The parsed form of a settings document.
///
/// # Examples
///
/// ```
/// use strata::{Document, Entry, Value};
///
/// let document: Document = serde_yaml::from_str("settings:\n  editor.tab-width: 4\n").unwrap();
/// assert_eq!(document.settings["editor.tab-width"], Entry::Value(Value::Int(4)));
/// assert_eq!(document.stop_bubbling, None);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Document {
    /// Halt bubbling after this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_bubbling: Option<bool>,

    /// Settings by key name.
    #[serde(default)]
    pub settings: BTreeMap<String, Entry>,
}

impl Document {
    /// Checks setting names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyName`] for a malformed setting name, or
    /// [`Error::Validation`] if the reserved stop-bubbling key is used as a
    /// setting.
    pub fn validate(&self) -> Result<()> {
        for name in self.settings.keys() {
            validate_key_name(name)?;
            if name == STOP_BUBBLING.name() {
                return Err(Error::Validation {
                    field: format!("settings.{name}"),
                    message: "reserved key; use the top-level stop-bubbling field".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// One setting in a document.
///
/// The entry's shape picks the variant: a scalar, a sequence or a mapping.
/// A mapping must be a valid [`ListEdit`], and its field errors are reported
/// as they are.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Entry {
    /// A plain value: sets a scalar, or replaces a list with one item.
    Value(Value),
    /// A sequence: replaces a list.
    Items(Vec<Value>),
    /// An edit block for a list.
    Edit(ListEdit),
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(EntryVisitor)
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = Entry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a value, a sequence of values, or a list edit")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Entry, E> {
        Ok(Entry::Value(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Entry, E> {
        Ok(Entry::Value(Value::Int(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Entry, E> {
        i64::try_from(v)
            .map(|i| Entry::Value(Value::Int(i)))
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &"an integer that fits in i64"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Entry, E> {
        Ok(Entry::Value(Value::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Entry, E> {
        Ok(Entry::Value(Value::Str(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Entry, E> {
        Ok(Entry::Value(Value::Str(v)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Entry, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Entry::Items(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<Entry, A::Error> {
        ListEdit::deserialize(MapAccessDeserializer::new(map)).map(Entry::Edit)
    }
}

/// Edits to a list-valued setting.
///
/// Additions are applied before removals, so a value both added and removed
/// in the same block ends up removed.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ListEdit {
    /// Ignore broader scopes for this key.
    #[serde(default)]
    pub clear: bool,

    /// Values to add, in order.
    #[serde(default)]
    pub add: Vec<Value>,

    /// Values to remove, in order.
    #[serde(default)]
    pub remove: Vec<Value>,
}

impl ListEdit {
    fn is_clear_only(&self) -> bool {
        self.clear && self.add.is_empty() && self.remove.is_empty()
    }
}

/// Document syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl Format {
    /// Picks the format for `path` from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(OsStr::to_str) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A source backed by a validated [`Document`].
///
/// # Examples
///
/// ```
/// use strata::{BubblingResolver, ConfigurationResolver, DocumentSource, ListKey};
///
/// const EXCLUDE: ListKey<String> = ListKey::new("lint.exclude");
///
/// let project = DocumentSource::from_yaml_str(
///     "project",
///     "settings:\n  lint.exclude:\n    add: [generated]\n",
/// )
/// .unwrap();
/// let user = DocumentSource::from_json_str(
///     "user",
///     r#"{"settings": {"lint.exclude": {"add": ["target"]}}}"#,
/// )
/// .unwrap();
///
/// let resolver = BubblingResolver::builder()
///     .with_source(project)
///     .with_source(user)
///     .build();
/// assert_eq!(resolver.resolve(&EXCLUDE), vec!["target", "generated"]);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentSource {
    name: String,
    document: Document,
}

impl DocumentSource {
    /// Wraps an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document fails [`Document::validate`].
    pub fn new(name: impl Into<String>, document: Document) -> Result<Self> {
        document.validate()?;
        Ok(Self {
            name: name.into(),
            document,
        })
    }

    /// Parses a YAML document. Blank text is an empty document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the document is invalid.
    pub fn from_yaml_str(name: impl Into<String>, text: &str) -> Result<Self> {
        let document = if text.trim().is_empty() {
            Document::default()
        } else {
            serde_yaml::from_str(text)?
        };
        Self::new(name, document)
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the document is invalid.
    pub fn from_json_str(name: impl Into<String>, text: &str) -> Result<Self> {
        let document = serde_json::from_str(text)?;
        Self::new(name, document)
    }

    /// Reads and parses the document at `path`, named after the path.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not recognised, the file cannot
    /// be read, or its contents are malformed or invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let format = Format::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path.display().to_string();
        match format {
            Format::Yaml => Self::from_yaml_str(name, &text),
            Format::Json => Self::from_json_str(name, &text),
        }
    }

    /// The underlying document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    fn coerce(&self, key: &KeyDescriptor, raw: &Value) -> Option<Value> {
        let value = key.value_type.coerce(raw);
        if value.is_none() {
            log::warn!("{}: '{raw}' is not a valid {} for {}", self.name, key.value_type, key.name);
        }
        value
    }

    fn modifications(
        &self,
        key: &KeyDescriptor,
        values: &[Value],
        added: bool,
    ) -> Option<Vec<ListModification>> {
        values
            .iter()
            .map(|raw| {
                self.coerce(key, raw).map(|value| {
                    if added {
                        ListModification::added(value)
                    } else {
                        ListModification::removed(value)
                    }
                })
            })
            .collect()
    }
}

impl ConfigurationSource for DocumentSource {
    fn resolve(&self, key: &KeyDescriptor) -> Option<SourceResult> {
        if key.name == STOP_BUBBLING.name() {
            return self
                .document
                .stop_bubbling
                .map(|flag| SourceResult::scalar(flag, false));
        }

        let entry = self.document.settings.get(key.name)?;
        match (entry, key.kind) {
            (Entry::Value(raw), KeyKind::Scalar) => self.coerce(key, raw).map(SourceResult::set),
            (Entry::Value(raw), KeyKind::List) => {
                let modifications = self.modifications(key, std::slice::from_ref(raw), true)?;
                Some(SourceResult::list(modifications, true))
            }
            (Entry::Items(items), KeyKind::List) => {
                let modifications = self.modifications(key, items, true)?;
                Some(SourceResult::list(modifications, true))
            }
            (Entry::Edit(edit), KeyKind::List) => {
                let mut modifications = self.modifications(key, &edit.add, true)?;
                modifications.extend(self.modifications(key, &edit.remove, false)?);
                Some(SourceResult::list(modifications, edit.clear))
            }
            (Entry::Edit(edit), KeyKind::Scalar) if edit.is_clear_only() => {
                Some(SourceResult::cleared())
            }
            (Entry::Items(_) | Entry::Edit(_), KeyKind::Scalar) => {
                log::warn!("{}: {} is a scalar key but holds list settings", self.name, key.name);
                None
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
