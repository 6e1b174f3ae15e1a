//! Structural keys and the interning table.
//!
//! Every node is identified inside its model by a structural key: a string
//! derived from the variant tag, the operator and the children's keys. The
//! [`KeyTable`] maps those keys back to the canonical node.

use hashbrown::HashMap;

use crate::expr::ExprKind;
use crate::handle::NodeId;

/// Separates the parts of a composite key.
pub const KEY_SEPARATOR: char = '~';

/// Joins key parts under a variant tag: `tag(a~b~c)`.
///
/// Parts are embedded verbatim. Leaf keys carry a length prefix (see
/// [`leaf_key`]), so nested composite keys stay unambiguous.
#[must_use]
pub fn join<'a>(tag: &str, parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut key = String::with_capacity(tag.len() + 16);
    key.push_str(tag);
    key.push('(');
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(part);
    }
    key.push(')');
    key
}

/// Builds a leaf key: `tag:len:text`.
///
/// The length prefix makes the key self-delimiting whatever `text` contains.
#[must_use]
pub fn leaf_key(tag: &str, text: &str) -> String {
    format!("{tag}:{}:{text}", text.len())
}

/// Computes the structural key of `kind`, given a lookup for its children's keys.
pub fn structural_key<'a>(kind: &ExprKind, child_key: impl Fn(NodeId) -> &'a str) -> String {
    match kind {
        ExprKind::Literal { text, ty } => leaf_key(&format!("{}:{ty}", kind.tag()), text),
        ExprKind::Identifier { name, .. } => leaf_key(kind.tag(), name),
        ExprKind::Field { target, name } => join(kind.tag(), [child_key(*target), name.as_str()]),
        ExprKind::Math { left, op, right } => {
            join(kind.tag(), [child_key(*left), op.symbol(), child_key(*right)])
        }
        ExprKind::Unary { op, operand } => join(kind.tag(), [op.symbol(), child_key(*operand)]),
        ExprKind::Group(inner) => join(kind.tag(), [child_key(*inner)]),
        ExprKind::Cast { ty, operand } => join(kind.tag(), [ty.as_str(), child_key(*operand)]),
        ExprKind::Ternary {
            cond,
            then,
            otherwise,
        } => join(
            kind.tag(),
            [child_key(*cond), child_key(*then), child_key(*otherwise)],
        ),
        ExprKind::Assign {
            target,
            value,
            context,
        } => join(
            kind.tag(),
            [child_key(*target), child_key(*value), context.class_name()],
        ),
    }
}

/// Maps structural keys to canonical node handles.
#[derive(Debug, Default)]
pub struct KeyTable {
    map: HashMap<String, NodeId>,
}

impl KeyTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the node registered under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.map.get(key).copied()
    }

    /// Registers `key` for `id`.
    ///
    /// Returns the previously registered node if the key was already taken,
    /// in which case the table is left unchanged.
    pub fn insert(&mut self, key: String, id: NodeId) -> Option<NodeId> {
        match self.map.entry(key) {
            hashbrown::hash_map::Entry::Occupied(entry) => Some(*entry.get()),
            hashbrown::hash_map::Entry::Vacant(entry) => {
                entry.insert(id);
                None
            }
        }
    }

    /// Returns the number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no keys are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::MathOp;

    #[test]
    fn test_join() {
        assert_eq!(join("math", ["a", "+", "b"]), "math(a~+~b)");
        assert_eq!(join("group", ["x"]), "group(x)");
    }

    #[test]
    fn test_leaf_key_is_self_delimiting() {
        assert_eq!(leaf_key("id", "user"), "id:4:user");
        assert_ne!(leaf_key("lit", "a~b"), leaf_key("lit", "a"));
    }

    #[test]
    fn test_math_key_is_order_sensitive() {
        let keys = ["id:1:a", "id:1:b"];
        let lookup = |id: NodeId| keys[id.index() as usize];

        let ab = ExprKind::Math {
            left: NodeId::new(0),
            op: MathOp::Add,
            right: NodeId::new(1),
        };
        let ba = ExprKind::Math {
            left: NodeId::new(1),
            op: MathOp::Add,
            right: NodeId::new(0),
        };
        assert_eq!(structural_key(&ab, lookup), "math(id:1:a~+~id:1:b)");
        assert_ne!(structural_key(&ab, lookup), structural_key(&ba, lookup));
    }

    #[test]
    fn test_key_table() {
        let mut table = KeyTable::new();
        assert_eq!(table.insert("k".to_string(), NodeId::new(0)), None);
        assert_eq!(
            table.insert("k".to_string(), NodeId::new(1)),
            Some(NodeId::new(0))
        );
        assert_eq!(table.get("k"), Some(NodeId::new(0)));
        assert_eq!(table.len(), 1);
    }
}
