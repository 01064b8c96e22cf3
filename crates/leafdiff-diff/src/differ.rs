//! Tree diff: the flat set of leaf paths that changed between two trees.
//!
//! The traversal is driven by the kind of the current node and refined by
//! the kind of the old node. Every addressable leaf is stated individually,
//! so a consumer applying the patch field by field reaches the same values
//! as a full replacement, including when a node changes kind between
//! versions.
//!
//! Absent nodes and `Null` nodes are treated the same everywhere.

use leafdiff_types::{Patch, PatchEntry, Path, TreeNode};
use tracing::{debug, warn};

use crate::config::DiffConfig;
use crate::equality::deep_equal;
use crate::error::{DiffError, DiffResult, Side};

/// Diff two trees. Never fails.
pub fn diff_trees(old: &TreeNode, current: &TreeNode) -> Patch {
    diff_nodes(Some(old), Some(current))
}

/// Diff two optional trees, where `None` stands for a missing document.
pub fn diff_nodes(old: Option<&TreeNode>, current: Option<&TreeNode>) -> Patch {
    // Unbounded depth, so this never fails.
    Differ::default()
        .diff_nodes(old, current)
        .unwrap_or_default()
}

/// Parse two JSON documents and return the fields that changed.
pub fn find_changed_fields(old_text: &str, current_text: &str) -> DiffResult<Patch> {
    Differ::default().find_changed_fields(old_text, current_text)
}

/// A pending comparison on the work-list.
struct Frame<'a> {
    old: Option<&'a TreeNode>,
    current: Option<&'a TreeNode>,
    prefix: Path,
    depth: usize,
}

impl<'a> Frame<'a> {
    fn new(old: Option<&'a TreeNode>, current: Option<&'a TreeNode>, prefix: Path, depth: usize) -> Self {
        Self {
            old: old.filter(|n| !n.is_null()),
            current: current.filter(|n| !n.is_null()),
            prefix,
            depth,
        }
    }
}

/// Tree differ with a [`DiffConfig`].
///
/// Runs on an explicit work-list instead of the native call stack, so
/// document depth is bounded only by memory (or by `max_depth` when set).
#[derive(Clone, Debug, Default)]
pub struct Differ {
    config: DiffConfig,
}

impl Differ {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Diff two trees.
    pub fn diff(&self, old: &TreeNode, current: &TreeNode) -> DiffResult<Patch> {
        self.diff_nodes(Some(old), Some(current))
    }

    /// Parse both documents, then diff them.
    pub fn find_changed_fields(&self, old_text: &str, current_text: &str) -> DiffResult<Patch> {
        let old = TreeNode::parse(old_text).map_err(|source| DiffError::Parse {
            side: Side::Old,
            source,
        })?;
        let current = TreeNode::parse(current_text).map_err(|source| DiffError::Parse {
            side: Side::Current,
            source,
        })?;
        self.diff(&old, &current)
    }

    /// Diff two optional trees.
    pub fn diff_nodes(
        &self,
        old: Option<&TreeNode>,
        current: Option<&TreeNode>,
    ) -> DiffResult<Patch> {
        let mut patch = Patch::new();
        let mut pending = vec![Frame::new(old, current, Path::root(), 0)];
        let mut children = Vec::new();

        while let Some(frame) = pending.pop() {
            self.step(frame, &mut patch, &mut children)?;
            // Children are visited in the order they were produced.
            pending.extend(children.drain(..).rev());
        }

        debug!(
            entries = patch.len(),
            sets = patch.set_count(),
            clears = patch.clear_count(),
            "diff complete"
        );
        Ok(patch)
    }

    fn step<'a>(
        &self,
        frame: Frame<'a>,
        patch: &mut Patch,
        children: &mut Vec<Frame<'a>>,
    ) -> DiffResult<()> {
        let Frame {
            old,
            current,
            prefix,
            depth,
        } = frame;

        if deep_equal(old, current) {
            return Ok(());
        }

        if let Some(limit) = self.config.max_depth {
            if depth > limit {
                return Err(DiffError::DepthExceeded {
                    path: prefix,
                    limit,
                });
            }
        }

        let next = depth + 1;

        match current {
            Some(TreeNode::Object(members)) => {
                match old {
                    Some(TreeNode::Array(items)) => {
                        for i in 0..items.len() {
                            emit(patch, prefix.push_index(i), PatchEntry::Clear);
                        }
                    }
                    // A scalar yields its slot to the incoming object.
                    Some(TreeNode::Bool(_) | TreeNode::Number(_) | TreeNode::String(_)) => {
                        emit(patch, prefix.clone(), PatchEntry::Clear);
                    }
                    Some(TreeNode::Object(_)) | Some(TreeNode::Null) | None => {}
                }

                match old {
                    Some(TreeNode::Object(old_members)) => {
                        let added = members
                            .iter()
                            .filter(|(key, _)| !old_members.contains_key(key.as_str()));
                        for (key, value) in added {
                            children.push(Frame::new(None, Some(value), prefix.join_key(key), next));
                        }

                        let removed = old_members
                            .iter()
                            .filter(|(key, _)| !members.contains_key(key.as_str()));
                        for (key, value) in removed {
                            children.push(Frame::new(Some(value), None, prefix.join_key(key), next));
                        }

                        // Keys present on both sides; unchanged ones are skipped.
                        for (key, value) in members {
                            if let Some(old_value) = old_members.get(key) {
                                if !deep_equal(Some(old_value), Some(value)) {
                                    children.push(Frame::new(
                                        Some(old_value),
                                        Some(value),
                                        prefix.join_key(key),
                                        next,
                                    ));
                                }
                            }
                        }
                    }
                    _ => {
                        for (key, value) in members {
                            children.push(Frame::new(None, Some(value), prefix.join_key(key), next));
                        }
                    }
                }
            }

            Some(TreeNode::Array(items)) => match old {
                Some(TreeNode::Array(old_items)) => {
                    for (i, item) in items.iter().enumerate() {
                        children.push(Frame::new(old_items.get(i), Some(item), prefix.push_index(i), next));
                    }
                    for (i, old_item) in old_items.iter().enumerate().skip(items.len()) {
                        children.push(Frame::new(Some(old_item), None, prefix.push_index(i), next));
                    }
                }
                _ => {
                    if let Some(TreeNode::Object(_)) = old {
                        children.push(Frame::new(old, None, prefix.clone(), depth));
                    }
                    for (i, item) in items.iter().enumerate() {
                        children.push(Frame::new(None, Some(item), prefix.push_index(i), next));
                    }
                }
            },

            Some(TreeNode::Null) | None => match old {
                Some(TreeNode::Object(old_members)) => {
                    for (key, value) in old_members {
                        children.push(Frame::new(Some(value), None, prefix.join_key(key), next));
                    }
                }
                Some(TreeNode::Array(old_items)) => {
                    for i in 0..old_items.len() {
                        emit(patch, prefix.push_index(i), PatchEntry::Clear);
                    }
                }
                _ => emit(patch, prefix, PatchEntry::Clear),
            },

            Some(leaf @ (TreeNode::Bool(_) | TreeNode::Number(_) | TreeNode::String(_))) => {
                if let Some(value) = leaf.as_scalar() {
                    emit(patch, prefix, PatchEntry::Set(value));
                }
            }
        }

        Ok(())
    }
}

/// Record an entry. Paths only collide when object keys themselves contain
/// path syntax; the later entry wins.
fn emit(patch: &mut Patch, path: Path, entry: PatchEntry) {
    if let Some(previous) = patch.get(path.as_str()) {
        warn!(path = %path, ?previous, "patch path written twice; keeping the later entry");
    }
    patch.insert(path, entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafdiff_types::Scalar;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn diff(old: Value, current: Value) -> Patch {
        diff_trees(&TreeNode::from(old), &TreeNode::from(current))
    }

    fn patch(value: Value) -> Patch {
        value
            .as_object()
            .unwrap()
            .iter()
            .map(|(path, v)| {
                let entry = match TreeNode::from(v.clone()).as_scalar() {
                    Some(scalar) => PatchEntry::Set(scalar),
                    None => PatchEntry::Clear,
                };
                (Path::from(path.as_str()), entry)
            })
            .collect()
    }

    #[test]
    fn identical_trees_no_changes() {
        let doc = json!({"a": [1, {"b": null}], "c": "x"});
        assert!(diff(doc.clone(), doc).is_empty());
    }

    #[test]
    fn added_and_removed_keys() {
        let result = diff(json!({"a": 1, "b": 2}), json!({"b": 2, "c": 3}));
        assert_eq!(result, patch(json!({"a": null, "c": 3})));
        assert!(!result.contains("b"));
    }

    #[test]
    fn nested_path_construction() {
        let result = diff(json!({"a": {"b": 1}}), json!({"a": {"b": 2}}));
        assert_eq!(result, patch(json!({"a.b": 2})));
    }

    #[test]
    fn array_truncation() {
        assert_eq!(diff(json!([1, 2, 3]), json!([1, 2])), patch(json!({"[2]": null})));
    }

    #[test]
    fn array_extension() {
        assert_eq!(
            diff(json!([1]), json!([1, 2, 3])),
            patch(json!({"[1]": 2, "[2]": 3}))
        );
    }

    #[test]
    fn scalar_to_object() {
        assert_eq!(
            diff(json!({"a": 1}), json!({"a": {"b": 2}})),
            patch(json!({"a": null, "a.b": 2}))
        );
    }

    #[test]
    fn object_to_array_at_root() {
        let result = diff(json!({"a": 1}), json!([9, 8]));
        assert_eq!(result, patch(json!({"a": null, "[0]": 9, "[1]": 8})));
        assert!(!result.contains(""));
        assert_eq!(result.get("a"), Some(&PatchEntry::Clear));
    }

    #[test]
    fn array_to_object() {
        assert_eq!(
            diff(json!({"a": [1, {"z": 1}]}), json!({"a": {"x": 1}})),
            patch(json!({"a[0]": null, "a[1]": null, "a.x": 1}))
        );
    }

    #[test]
    fn object_to_array() {
        assert_eq!(
            diff(json!({"a": {"x": 1, "y": {"z": 2}}}), json!({"a": [true]})),
            patch(json!({"a.x": null, "a.y.z": null, "a[0]": true}))
        );
    }

    #[test]
    fn scalar_to_array_sets_elements_only() {
        assert_eq!(
            diff(json!({"a": 1}), json!({"a": [1, "two"]})),
            patch(json!({"a[0]": 1, "a[1]": "two"}))
        );
    }

    #[test]
    fn object_cleared_leaf_by_leaf() {
        assert_eq!(
            diff(json!({"a": {"b": 1, "c": [1, 2], "d": null}}), json!({"a": null})),
            patch(json!({"a.b": null, "a.c[0]": null, "a.c[1]": null}))
        );
    }

    #[test]
    fn scalar_cleared() {
        assert_eq!(diff(json!({"a": "x"}), json!({"a": null})), patch(json!({"a": null})));
        assert_eq!(diff(json!(5), json!(null)), patch(json!({"": null})));
    }

    #[test]
    fn removed_nested_object() {
        assert_eq!(
            diff(json!({"a": {"b": {"c": 1}}, "k": 0}), json!({"k": 0})),
            patch(json!({"a.b.c": null}))
        );
    }

    #[test]
    fn added_nested_structure() {
        assert_eq!(
            diff(json!({}), json!({"a": {"b": [1, {"c": true}, null]}})),
            patch(json!({"a.b[0]": 1, "a.b[1].c": true}))
        );
    }

    #[test]
    fn null_and_absent_are_equivalent() {
        assert!(diff(json!({"a": null}), json!({})).is_empty());
        assert!(diff(json!({}), json!({"a": null})).is_empty());
        assert_eq!(diff(json!({"a": null}), json!({"a": 1})), patch(json!({"a": 1})));
        assert_eq!(
            diff(json!({"a": null}), json!({"a": {"b": 1}})),
            patch(json!({"a.b": 1}))
        );
    }

    #[test]
    fn array_of_objects_element_change() {
        assert_eq!(
            diff(
                json!({"rows": [{"id": 1, "v": "a"}, {"id": 2, "v": "b"}]}),
                json!({"rows": [{"id": 1, "v": "a"}, {"id": 2, "v": "c"}]})
            ),
            patch(json!({"rows[1].v": "c"}))
        );
    }

    #[test]
    fn shrinking_array_clears_nested_leaves() {
        assert_eq!(
            diff(json!([1, {"x": 1, "y": [7]}]), json!([1])),
            patch(json!({"[1].x": null, "[1].y[0]": null}))
        );
    }

    #[test]
    fn extending_array_with_objects() {
        assert_eq!(
            diff(json!([]), json!([{"x": 1}, {}])),
            patch(json!({"[0].x": 1}))
        );
    }

    #[test]
    fn type_change_between_scalars() {
        assert_eq!(diff(json!({"a": "1"}), json!({"a": 1})), patch(json!({"a": 1})));
        assert_eq!(diff(json!({"a": 1}), json!({"a": false})), patch(json!({"a": false})));
    }

    #[test]
    fn numeric_representation_is_not_a_change() {
        assert!(diff(json!({"n": 2}), json!({"n": 2.0})).is_empty());
    }

    #[test]
    fn key_order_is_not_a_change() {
        let old = TreeNode::parse(r#"{"a": 1, "b": {"c": 2, "d": 3}}"#).unwrap();
        let current = TreeNode::parse(r#"{"b": {"d": 3, "c": 2}, "a": 1}"#).unwrap();
        assert!(diff_trees(&old, &current).is_empty());
    }

    #[test]
    fn missing_documents() {
        let doc = TreeNode::from(json!({"a": 1}));
        assert!(diff_nodes(None, None).is_empty());
        assert_eq!(diff_nodes(None, Some(&doc)), patch(json!({"a": 1})));
        assert_eq!(diff_nodes(Some(&doc), None), patch(json!({"a": null})));
    }

    #[test]
    fn colliding_keys_keep_later_entry() {
        // "a.b" as a literal key and as a nested path address the same field.
        let result = diff(json!({}), json!({"a.b": 1, "a": {"b": 2}}));
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("a.b"), Some(&PatchEntry::Set(Scalar::from(2i64))));
    }

    #[test]
    fn find_changed_fields_parses_text() {
        let result = find_changed_fields(r#"{"name": "old", "n": 1}"#, r#"{"name": "new", "n": 1}"#).unwrap();
        assert_eq!(result, patch(json!({"name": "new"})));
    }

    #[test]
    fn find_changed_fields_reports_side() {
        let err = find_changed_fields("{", "{}").unwrap_err();
        assert!(matches!(err, DiffError::Parse { side: Side::Old, .. }));

        let err = find_changed_fields("{}", "[1,").unwrap_err();
        assert!(matches!(err, DiffError::Parse { side: Side::Current, .. }));
        assert!(err.to_string().starts_with("failed to parse current document"));
    }

    #[test]
    fn depth_limit_exceeded() {
        let differ = Differ::new(DiffConfig::with_max_depth(1));
        let old = TreeNode::from(json!({"a": {"b": {"c": 1}}}));
        let current = TreeNode::from(json!({"a": {"b": {"c": 2}}}));

        match differ.diff(&old, &current) {
            Err(DiffError::DepthExceeded { path, limit }) => {
                assert_eq!(path.as_str(), "a.b");
                assert_eq!(limit, 1);
            }
            other => panic!("expected DepthExceeded, got {:?}", other),
        }
    }

    #[test]
    fn depth_limit_ignores_pruned_subtrees() {
        let differ = Differ::new(DiffConfig::with_max_depth(1));
        let old = TreeNode::from(json!({"a": {"b": {"c": 1}}, "x": 1}));
        let current = TreeNode::from(json!({"a": {"b": {"c": 1}}, "x": 2}));
        assert_eq!(differ.diff(&old, &current).unwrap(), patch(json!({"x": 2})));
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        const DEPTH: usize = 2_000;
        let mut node = TreeNode::Bool(true);
        for _ in 0..DEPTH {
            node = TreeNode::Array(vec![node]);
        }

        let result = diff_nodes(None, Some(&node));
        assert_eq!(result.len(), 1);
        let (path, entry) = result.iter().next().unwrap();
        assert_eq!(path.as_str(), "[0]".repeat(DEPTH));
        assert_eq!(entry, &PatchEntry::Set(Scalar::Bool(true)));
    }

    /// Clears produced when `node` is replaced by nothing.
    fn cleared_leaves(node: &TreeNode) -> usize {
        match node {
            TreeNode::Null => 0,
            TreeNode::Array(items) => items.len(),
            TreeNode::Object(members) => members.values().map(cleared_leaves).sum(),
            _ => 1,
        }
    }

    fn scalar_leaves(node: &TreeNode) -> usize {
        match node {
            TreeNode::Null => 0,
            TreeNode::Array(items) => items.iter().map(scalar_leaves).sum(),
            TreeNode::Object(members) => members.values().map(scalar_leaves).sum(),
            _ => 1,
        }
    }

    fn arb_tree() -> impl Strategy<Value = TreeNode> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-z]{0,4}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-c]{1,2}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
        .prop_map(TreeNode::from)
    }

    proptest! {
        #[test]
        fn prop_self_diff_is_empty(tree in arb_tree()) {
            prop_assert!(diff_trees(&tree, &tree.clone()).is_empty());
        }

        #[test]
        fn prop_clearing_addresses_each_leaf(tree in arb_tree()) {
            let result = diff_nodes(Some(&tree), None);
            prop_assert_eq!(result.set_count(), 0);
            prop_assert_eq!(result.len(), cleared_leaves(&tree));
        }

        #[test]
        fn prop_building_sets_each_scalar(tree in arb_tree()) {
            let result = diff_nodes(None, Some(&tree));
            prop_assert_eq!(result.clear_count(), 0);
            prop_assert_eq!(result.len(), scalar_leaves(&tree));
        }

        #[test]
        fn prop_bounded_matches_unbounded(old in arb_tree(), current in arb_tree()) {
            let bounded = Differ::new(DiffConfig::with_max_depth(64)).diff(&old, &current).unwrap();
            prop_assert_eq!(bounded, diff_trees(&old, &current));
        }
    }
}
