//! Flat patch: the set of leaf-level mutations produced by a diff.

use std::collections::btree_map::{self, BTreeMap};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::TypeError;
use crate::node::Scalar;
use crate::path::Path;

/// What to do at one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchEntry {
    /// Set the field to this scalar.
    Set(Scalar),
    /// Unset the field.
    Clear,
}

impl PatchEntry {
    pub fn is_clear(&self) -> bool {
        matches!(self, PatchEntry::Clear)
    }

    /// The scalar being set, `None` for a clear.
    pub fn value(&self) -> Option<&Scalar> {
        match self {
            PatchEntry::Set(v) => Some(v),
            PatchEntry::Clear => None,
        }
    }
}

impl From<Option<Scalar>> for PatchEntry {
    fn from(value: Option<Scalar>) -> Self {
        value.map_or(PatchEntry::Clear, PatchEntry::Set)
    }
}

impl Serialize for PatchEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Mapping from [`Path`] to [`PatchEntry`].
///
/// Entry order carries no meaning; paths are kept sorted so output is
/// deterministic. Serializes as a JSON object whose values are the scalar to
/// set or `null` for a clear.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Patch {
    entries: BTreeMap<Path, PatchEntry>,
}

impl Patch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry, returning the one it displaced, if any.
    pub fn insert(&mut self, path: Path, entry: PatchEntry) -> Option<PatchEntry> {
        self.entries.insert(path, entry)
    }

    pub fn set(&mut self, path: Path, value: Scalar) -> Option<PatchEntry> {
        self.insert(path, PatchEntry::Set(value))
    }

    pub fn clear(&mut self, path: Path) -> Option<PatchEntry> {
        self.insert(path, PatchEntry::Clear)
    }

    pub fn get(&self, path: &str) -> Option<&PatchEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Path, PatchEntry> {
        self.entries.iter()
    }

    /// Entries that set a value.
    pub fn sets(&self) -> impl Iterator<Item = (&Path, &Scalar)> {
        self.entries
            .iter()
            .filter_map(|(path, entry)| entry.value().map(|v| (path, v)))
    }

    /// Paths that are cleared.
    pub fn clears(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_clear())
            .map(|(path, _)| path)
    }

    /// Number of set entries.
    pub fn set_count(&self) -> usize {
        self.sets().count()
    }

    /// Number of clear entries.
    pub fn clear_count(&self) -> usize {
        self.clears().count()
    }

    /// Render as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(path, entry)| {
                    let value = match entry {
                        PatchEntry::Set(Scalar::Bool(b)) => Value::Bool(*b),
                        PatchEntry::Set(Scalar::Number(n)) => Value::Number(n.clone()),
                        PatchEntry::Set(Scalar::String(s)) => Value::String(s.clone()),
                        PatchEntry::Clear => Value::Null,
                    };
                    (path.to_string(), value)
                })
                .collect(),
        )
    }

    /// Pretty-printed JSON text.
    pub fn to_json_pretty(&self) -> Result<String, TypeError> {
        serde_json::to_string_pretty(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

impl Serialize for Patch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, entry) in &self.entries {
            map.serialize_entry(path, entry)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = (&'a Path, &'a PatchEntry);
    type IntoIter = btree_map::Iter<'a, Path, PatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Patch {
    type Item = (Path, PatchEntry);
    type IntoIter = btree_map::IntoIter<Path, PatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(Path, PatchEntry)> for Patch {
    fn from_iter<I: IntoIterator<Item = (Path, PatchEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
