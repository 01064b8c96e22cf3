use serde::{Deserialize, Serialize};

/// Configuration for a [`Differ`](crate::Differ).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Deepest nesting level the differ will descend to. The root is level 0.
    /// `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl DiffConfig {
    /// An unbounded configuration.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Limit traversal to `max_depth` levels below the root.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }
}
