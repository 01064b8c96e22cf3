use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{ParseError, TypeError};

/// The kind of a [`TreeNode`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "bool",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A node in a parsed hierarchical document.
///
/// Object members keep their insertion order so iteration is deterministic;
/// the diff output never depends on that order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum TreeNode {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<TreeNode>),
    Object(IndexMap<String, TreeNode>),
}

impl TreeNode {
    /// Parse a JSON document into a tree.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from(value))
    }

    /// An empty object node.
    pub fn object() -> Self {
        TreeNode::Object(IndexMap::new())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            TreeNode::Null => NodeKind::Null,
            TreeNode::Bool(_) => NodeKind::Bool,
            TreeNode::Number(_) => NodeKind::Number,
            TreeNode::String(_) => NodeKind::String,
            TreeNode::Array(_) => NodeKind::Array,
            TreeNode::Object(_) => NodeKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TreeNode::Null)
    }

    /// Returns `true` for arrays and objects.
    pub fn is_container(&self) -> bool {
        matches!(self, TreeNode::Array(_) | TreeNode::Object(_))
    }

    /// The scalar payload of a bool, number, or string node.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            TreeNode::Bool(b) => Some(Scalar::Bool(*b)),
            TreeNode::Number(n) => Some(Scalar::Number(n.clone())),
            TreeNode::String(s) => Some(Scalar::String(s.clone())),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[TreeNode]> {
        match self {
            TreeNode::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, TreeNode>> {
        match self {
            TreeNode::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Look up an object member. `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&TreeNode> {
        self.as_object().and_then(|members| members.get(key))
    }

    /// Look up an array element. `None` when out of range or not an array.
    pub fn index(&self, i: usize) -> Option<&TreeNode> {
        self.as_array().and_then(|items| items.get(i))
    }
}

impl From<Value> for TreeNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => TreeNode::Null,
            Value::Bool(b) => TreeNode::Bool(b),
            Value::Number(n) => TreeNode::Number(n),
            Value::String(s) => TreeNode::String(s),
            Value::Array(items) => TreeNode::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(members) => TreeNode::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<TreeNode> for Value {
    fn from(node: TreeNode) -> Self {
        match node {
            TreeNode::Null => Value::Null,
            TreeNode::Bool(b) => Value::Bool(b),
            TreeNode::Number(n) => Value::Number(n),
            TreeNode::String(s) => Value::String(s),
            TreeNode::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            TreeNode::Object(members) => Value::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Scalar> for TreeNode {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Bool(b) => TreeNode::Bool(b),
            Scalar::Number(n) => TreeNode::Number(n),
            Scalar::String(s) => TreeNode::String(s),
        }
    }
}

/// A leaf value that a patch entry can set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    String(String),
}

impl TryFrom<&TreeNode> for Scalar {
    type Error = TypeError;

    fn try_from(node: &TreeNode) -> Result<Self, Self::Error> {
        node.as_scalar()
            .ok_or_else(|| TypeError::NotScalar(node.kind().to_string()))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}
