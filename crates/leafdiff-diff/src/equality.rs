//! Structural equality between document trees.

use leafdiff_types::TreeNode;
use serde_json::Number;

/// Compare two numbers by value, so `1` and `1.0` are equal.
///
/// Integers are compared exactly; anything involving a float is compared as
/// `f64`.
pub fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (integral(a), integral(b)) {
        (Some(x), Some(y)) => x == y,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

fn integral(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

static NULL: TreeNode = TreeNode::Null;

/// Structural equality of two optional nodes.
///
/// An absent node equals `Null`. Arrays compare element-wise in order,
/// objects by key set and per-key value with key order ignored. Any kind
/// mismatch is unequal.
pub fn deep_equal(a: Option<&TreeNode>, b: Option<&TreeNode>) -> bool {
    let mut pending = vec![(a, b)];

    while let Some((a, b)) = pending.pop() {
        let equal = match (a.unwrap_or(&NULL), b.unwrap_or(&NULL)) {
            (TreeNode::Null, TreeNode::Null) => true,
            (TreeNode::Bool(x), TreeNode::Bool(y)) => x == y,
            (TreeNode::Number(x), TreeNode::Number(y)) => numbers_equal(x, y),
            (TreeNode::String(x), TreeNode::String(y)) => x == y,
            (TreeNode::Array(xs), TreeNode::Array(ys)) => {
                if xs.len() == ys.len() {
                    pending.extend(xs.iter().zip(ys).map(|(x, y)| (Some(x), Some(y))));
                    true
                } else {
                    false
                }
            }
            (TreeNode::Object(xs), TreeNode::Object(ys)) => {
                if xs.len() == ys.len() {
                    let mut same_keys = true;
                    for (key, x) in xs {
                        match ys.get(key) {
                            Some(y) => pending.push((Some(x), Some(y))),
                            None => {
                                same_keys = false;
                                break;
                            }
                        }
                    }
                    same_keys
                } else {
                    false
                }
            }
            _ => false,
        };

        if !equal {
            return false;
        }
    }

    true
}
