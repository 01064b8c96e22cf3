//! Diff engine for leafdiff.
//!
//! Computes the flat set of changed leaf paths between an old and a current
//! document tree. The resulting [`Patch`] can be applied field by field to a
//! persisted document to bring it to the current values.
//!
//! # Key Types
//!
//! - [`deep_equal`] -- Structural equality, key order ignored, `1 == 1.0`
//! - [`diff_trees`] / [`diff_nodes`] -- Total diff over two trees
//! - [`find_changed_fields`] -- Parse two JSON texts and diff them
//! - [`Differ`] / [`DiffConfig`] -- Configured differ with an optional depth limit

pub mod config;
pub mod differ;
pub mod equality;
pub mod error;

pub use config::DiffConfig;
pub use differ::{diff_nodes, diff_trees, find_changed_fields, Differ};
pub use equality::{deep_equal, numbers_equal};
pub use error::{DiffError, DiffResult, Side};

pub use leafdiff_types::{Patch, PatchEntry, Path, Scalar, TreeNode};
