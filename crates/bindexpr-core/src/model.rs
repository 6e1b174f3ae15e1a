//! The expression model: arena storage, interning and node factories.
//!
//! All nodes of one compilation unit live contiguously in an [`ExprModel`],
//! with interning ensuring each structurally unique expression is stored
//! exactly once. Children are referenced by [`NodeId`], so the tree is a DAG
//! of indices and never owns pointers into another model.

use std::cell::OnceCell;
use std::collections::VecDeque;
use std::fmt;

use bindexpr_types::Ty;
use hashbrown::{HashMap, HashSet};
use log::{debug, trace, warn};
use smallvec::SmallVec;

use crate::expr::{BindingContext, ExprKind, MathOp, UnaryOp};
use crate::handle::NodeId;
use crate::intern::{structural_key, KeyTable};

/// A change-propagation edge: `dependant` must be re-evaluated when `other`
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// The node that reads the value.
    pub dependant: NodeId,
    /// The node whose value is read.
    pub other: NodeId,
}

#[derive(Debug)]
struct Node {
    kind: ExprKind,
    key: String,
    dynamic: bool,
    dependencies: SmallVec<[Dependency; 2]>,
    resolved: OnceCell<Ty>,
}

/// Owns every node of one compilation unit.
///
/// Nodes are created only through the factory methods, which route through
/// [`ExprModel::intern`]. Once created a node never changes, except for its
/// memoized type.
#[derive(Debug, Default)]
pub struct ExprModel {
    nodes: Vec<Node>,
    keys: KeyTable,
    /// Reverse dependency edges, indexed like `nodes`.
    dependants: Vec<SmallVec<[NodeId; 2]>>,
    roots: Vec<NodeId>,
}

impl ExprModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a model with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            keys: KeyTable::with_capacity(capacity),
            dependants: Vec::with_capacity(capacity),
            roots: Vec::new(),
        }
    }

    /// Interns a node, returning its handle.
    ///
    /// If a node with the same structural key already exists, returns the
    /// existing handle. Otherwise registers the node, computes its dynamic
    /// flag and wires its dependencies.
    ///
    /// # Panics
    ///
    /// Panics if a child handle does not belong to this model, or if the
    /// model outgrows `u32` indices.
    pub fn intern(&mut self, kind: ExprKind) -> NodeId {
        let key = structural_key(&kind, |child| self.key(child));
        if let Some(existing) = self.lookup(&key) {
            trace!("intern hit {existing} for {key}");
            return existing;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "Model capacity exceeded");
        let id = NodeId::new(index as u32);

        let children = kind.children();
        let dynamic = match &kind {
            ExprKind::Literal { .. } => false,
            ExprKind::Identifier { .. } => true,
            _ => children.iter().any(|&child| self.is_dynamic(child)),
        };
        let dependencies: SmallVec<[Dependency; 2]> = children
            .iter()
            .copied()
            .filter(|&child| self.is_dynamic(child))
            .map(|other| Dependency { dependant: id, other })
            .collect();
        for dependency in &dependencies {
            let slot = &mut self.dependants[dependency.other.index() as usize];
            if !slot.contains(&id) {
                slot.push(id);
            }
        }

        debug!("intern {id} = {key}");
        self.keys.insert(key.clone(), id);
        self.nodes.push(Node {
            kind,
            key,
            dynamic,
            dependencies,
            resolved: OnceCell::new(),
        });
        self.dependants.push(SmallVec::new());
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index() as usize]
    }

    /// Gets the expression at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &ExprKind {
        &self.node(id).kind
    }

    /// Returns the structural key of a node.
    #[must_use]
    pub fn key(&self, id: NodeId) -> &str {
        &self.node(id).key
    }

    /// Looks a node up by structural key.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        self.keys.get(key)
    }

    /// Returns true if the node's value can change at runtime.
    #[must_use]
    pub fn is_dynamic(&self, id: NodeId) -> bool {
        self.node(id).dynamic
    }

    /// Returns the edges from this node to its dynamic children.
    #[must_use]
    pub fn dependencies(&self, id: NodeId) -> &[Dependency] {
        &self.node(id).dependencies
    }

    /// Returns the nodes that directly depend on this one.
    #[must_use]
    pub fn dependants(&self, id: NodeId) -> &[NodeId] {
        &self.dependants[id.index() as usize]
    }

    /// Returns every node that must be re-evaluated when `id` changes,
    /// nearest first. The node itself is not included.
    #[must_use]
    pub fn invalidated_by(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<NodeId> = self.dependants(id).iter().copied().collect();
        while let Some(next) = queue.pop_front() {
            if seen.insert(next) {
                order.push(next);
                queue.extend(self.dependants(next).iter().copied());
            }
        }
        order
    }

    pub(crate) fn resolved_cell(&self, id: NodeId) -> &OnceCell<Ty> {
        &self.node(id).resolved
    }

    /// Records `id` as a root of the compilation unit.
    pub fn mark_root(&mut self, id: NodeId) {
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    /// Returns the roots in the order they were marked.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the number of nodes in the model.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the model is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in creation order. Children always precede
    /// their parents.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ExprKind)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i as u32), &node.kind))
    }

    /// Deep-clones `id` into another model.
    ///
    /// The destination interns every cloned node, so the result shares
    /// structure with whatever `dest` already holds. The source is never
    /// touched. Memoized types are not carried over.
    pub fn clone_into(&self, id: NodeId, dest: &mut ExprModel) -> NodeId {
        self.clone_shared(id, dest, &mut HashMap::new())
    }

    /// Copies each shared subexpression once.
    fn clone_shared(
        &self,
        id: NodeId,
        dest: &mut ExprModel,
        copied: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        if let Some(&existing) = copied.get(&id) {
            return existing;
        }
        let kind = self
            .get(id)
            .map_children(|child| self.clone_shared(child, dest, copied));
        let cloned = dest.intern(kind);
        copied.insert(id, cloned);
        cloned
    }

    /// Returns a displayable view of an expression, used in diagnostics.
    #[must_use]
    pub fn display(&self, id: NodeId) -> ExprDisplay<'_> {
        ExprDisplay { model: self, id }
    }

    // === Factories ===

    /// Creates a literal of the given declared type.
    pub fn literal(&mut self, text: &str, ty: &str) -> NodeId {
        self.intern(ExprKind::Literal {
            text: text.to_string(),
            ty: ty.to_string(),
        })
    }

    /// Creates a binding variable.
    ///
    /// Identifiers are keyed by name only; redeclaring a name returns the
    /// first declaration.
    pub fn identifier(&mut self, name: &str, ty: &str) -> NodeId {
        let kind = ExprKind::Identifier {
            name: name.to_string(),
            ty: ty.to_string(),
        };
        let id = self.intern(kind);
        if let ExprKind::Identifier { ty: declared, .. } = self.get(id) {
            if declared != ty {
                warn!("identifier `{name}` redeclared as {ty}, keeping {declared}");
            }
        }
        id
    }

    /// Creates a property access.
    pub fn field(&mut self, target: NodeId, name: &str) -> NodeId {
        self.intern(ExprKind::Field {
            target,
            name: name.to_string(),
        })
    }

    /// Creates a binary arithmetic expression.
    pub fn math(&mut self, left: NodeId, op: MathOp, right: NodeId) -> NodeId {
        self.intern(ExprKind::Math { left, op, right })
    }

    /// Creates a unary expression.
    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.intern(ExprKind::Unary { op, operand })
    }

    /// Wraps an expression in parentheses.
    pub fn group(&mut self, inner: NodeId) -> NodeId {
        self.intern(ExprKind::Group(inner))
    }

    /// Creates a cast to the named type.
    pub fn cast(&mut self, ty: &str, operand: NodeId) -> NodeId {
        self.intern(ExprKind::Cast {
            ty: ty.to_string(),
            operand,
        })
    }

    /// Creates a conditional expression.
    pub fn ternary(&mut self, cond: NodeId, then: NodeId, otherwise: NodeId) -> NodeId {
        self.intern(ExprKind::Ternary {
            cond,
            then,
            otherwise,
        })
    }

    /// Creates a write-back of `value` into `target`.
    pub fn assign(&mut self, target: NodeId, value: NodeId, context: BindingContext) -> NodeId {
        self.intern(ExprKind::Assign {
            target,
            value,
            context,
        })
    }
}

/// Human-readable rendering of an expression.
///
/// Binary operands are parenthesized the same way generated code is, so the
/// text is unambiguous.
pub struct ExprDisplay<'a> {
    model: &'a ExprModel,
    id: NodeId,
}

impl ExprDisplay<'_> {
    fn child(&self, id: NodeId) -> Self {
        Self {
            model: self.model,
            id,
        }
    }
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.model.get(self.id) {
            ExprKind::Literal { text, .. } => f.write_str(text),
            ExprKind::Identifier { name, .. } => f.write_str(name),
            ExprKind::Field { target, name } => {
                if self.model.get(*target).is_assignable() {
                    write!(f, "{}.{name}", self.child(*target))
                } else {
                    write!(f, "({}).{name}", self.child(*target))
                }
            }
            ExprKind::Math { left, op, right } => {
                write!(f, "({}) {op} ({})", self.child(*left), self.child(*right))
            }
            ExprKind::Unary { op, operand } => write!(f, "{op}({})", self.child(*operand)),
            ExprKind::Group(inner) => write!(f, "({})", self.child(*inner)),
            ExprKind::Cast { ty, operand } => write!(f, "({ty}) ({})", self.child(*operand)),
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => write!(
                f,
                "({}) ? ({}) : ({})",
                self.child(*cond),
                self.child(*then),
                self.child(*otherwise)
            ),
            ExprKind::Assign { target, value, .. } => {
                write!(f, "{} = {}", self.child(*target), self.child(*value))
            }
        }
    }
}
