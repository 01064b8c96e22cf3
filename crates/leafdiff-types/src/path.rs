use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of a location inside a tree.
///
/// Object keys are joined with `.` (no leading separator at the root) and
/// array indices are appended as `[i]` with no separator, e.g. `a.b[2].c`.
/// The root is the empty path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(String);

impl Path {
    /// The empty root path.
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Descend into an object member.
    pub fn join_key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    /// Descend into an array element.
    pub fn push_index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for Path {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_empty() {
        assert!(Path::root().is_root());
        assert_eq!(Path::root().as_str(), "");
    }

    #[test]
    fn key_at_root_has_no_separator() {
        assert_eq!(Path::root().join_key("a").as_str(), "a");
    }

    #[test]
    fn nested_construction() {
        let path = Path::root().join_key("a").join_key("b").push_index(2).join_key("c");
        assert_eq!(path.to_string(), "a.b[2].c");
    }

    #[test]
    fn index_at_root() {
        assert_eq!(Path::root().push_index(0).as_str(), "[0]");
        assert_eq!(Path::root().push_index(1).push_index(3).as_str(), "[1][3]");
        assert_eq!(Path::root().push_index(0).join_key("x").as_str(), "[0].x");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Path::from("a[0]")).unwrap();
        assert_eq!(json, "\"a[0]\"");
    }
}
