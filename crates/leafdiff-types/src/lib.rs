//! Foundation types for leafdiff.
//!
//! This crate provides the document tree, path, and patch types shared by the
//! diff engine and the command-line front end.
//!
//! # Key Types
//!
//! - [`TreeNode`] -- Parsed document node (null, bool, number, string, array, object)
//! - [`Scalar`] -- The leaf values a patch can set
//! - [`Path`] -- Dotted/bracketed address of a location inside a tree (`a.b[2].c`)
//! - [`Patch`] / [`PatchEntry`] -- Flat mapping from paths to set-or-clear instructions

pub mod error;
pub mod node;
pub mod patch;
pub mod path;

pub use error::{ParseError, TypeError};
pub use node::{NodeKind, Scalar, TreeNode};
pub use patch::{Patch, PatchEntry};
pub use path::Path;
