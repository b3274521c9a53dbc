//! Reference-counted node handles and their decomposition into elements.
//!
//! A [`Node`] is a Boolean function over its manager's variables. Handles are
//! cheap to clone: clones share one engine reference, taken when the handle is
//! created and released when the last clone is dropped. Nodes nested inside an
//! [`Element`] follow the same rule, so a decomposition keeps its parts alive
//! exactly as long as it is held.
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use num_bigint::BigUint;

use crate::engine::Engine;
use crate::error::SddError;
use crate::reference::Ref;
use crate::types::{Literal, Variable};

/// One engine reference, released on drop.
struct Handle {
    engine: Rc<Engine>,
    raw: Ref,
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.engine.deref_node(self.raw);
    }
}

/// Structural kind of a node. Every node is exactly one of these.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeKind {
    Constant,
    Literal,
    Decision,
}

/// Handle to a node of a [`Manager`][crate::manager::Manager].
///
/// Two handles are equal iff they reference the same engine node; since the
/// engine is canonical, that is iff they denote the same function.
///
/// # Panics
///
/// Binary operations panic if the operands come from different managers.
#[derive(Clone)]
pub struct Node {
    handle: Rc<Handle>,
}

impl Node {
    pub(crate) fn new(engine: Rc<Engine>, raw: Ref) -> Self {
        let raw = engine.ref_node(raw);
        Self {
            handle: Rc::new(Handle { engine, raw }),
        }
    }

    /// Literal node for `lit`, range-checked against the engine's universe.
    pub(crate) fn lift(engine: &Rc<Engine>, lit: Literal) -> Result<Self, SddError> {
        let variable = lit.get().unsigned_abs();
        if variable == 0 || variable > engine.var_count() as u64 {
            return Err(SddError::VariableOutOfRange {
                variable,
                var_count: engine.var_count(),
            });
        }
        Ok(Self::new(engine.clone(), engine.literal_node(lit.get())))
    }

    fn engine(&self) -> &Rc<Engine> {
        &self.handle.engine
    }

    fn raw(&self) -> Ref {
        self.handle.raw
    }

    /// Wrap a result of this node's engine.
    fn make(&self, raw: Ref) -> Self {
        Self::new(self.engine().clone(), raw)
    }

    fn assert_same_manager(&self, other: &Node) {
        assert!(
            Rc::ptr_eq(self.engine(), other.engine()),
            "operands belong to different managers"
        );
    }

    /// Whether both nodes come from the same manager.
    pub fn same_manager(&self, other: &Node) -> bool {
        Rc::ptr_eq(self.engine(), other.engine())
    }

    /// Number of variables of the owning manager.
    pub fn manager_var_count(&self) -> usize {
        self.engine().var_count()
    }

    /// Lift a literal with this node's manager.
    pub fn lift_literal(&self, lit: Literal) -> Result<Node, SddError> {
        Self::lift(self.engine(), lit)
    }
}

// Algebra.
impl Node {
    /// Logical NOT.
    pub fn negate(&self) -> Node {
        self.make(self.engine().negate(self.raw()))
    }

    /// Logical AND.
    pub fn conjoin(&self, other: &Node) -> Node {
        self.assert_same_manager(other);
        self.make(self.engine().conjoin(self.raw(), other.raw()))
    }

    /// Logical OR.
    pub fn disjoin(&self, other: &Node) -> Node {
        self.assert_same_manager(other);
        self.make(self.engine().disjoin(self.raw(), other.raw()))
    }

    /// `self ∧ lit`, lifting `lit` through this node's manager.
    pub fn conjoin_literal(&self, lit: Literal) -> Result<Node, SddError> {
        Ok(self.conjoin(&self.lift_literal(lit)?))
    }

    /// `self ∨ lit`, lifting `lit` through this node's manager.
    pub fn disjoin_literal(&self, lit: Literal) -> Result<Node, SddError> {
        Ok(self.disjoin(&self.lift_literal(lit)?))
    }

    pub(crate) fn exists_var(&self, var: Variable) -> Node {
        self.make(self.engine().exists(var.index(), self.raw()))
    }

    pub(crate) fn forall_var(&self, var: Variable) -> Node {
        self.make(self.engine().forall(var.index(), self.raw()))
    }

    /// Eliminate every variable `v` with `mask[v]` set.
    pub(crate) fn exists_mask(&self, mask: &[bool]) -> Node {
        self.make(self.engine().exists_multiple(mask, self.raw()))
    }

    /// Restrict the function by asserting `lit`.
    ///
    /// # Panics
    ///
    /// Panics on [`Literal::UNDEFINED`].
    pub fn condition(&self, lit: Literal) -> Node {
        assert!(!lit.is_undefined(), "Cannot condition on the undefined literal");
        self.make(self.engine().condition(lit.get(), self.raw()))
    }

    /// Condition on each literal in turn, stopping early once the result is
    /// constant (conditioning a constant is a no-op).
    pub fn condition_all(&self, lits: impl IntoIterator<Item = Literal>) -> Node {
        let mut n = self.clone();
        for lit in lits {
            n = n.condition(lit);
            if n.is_valid() || n.is_unsat() {
                break;
            }
        }
        n
    }

    /// Whether `lit`'s variable is forced in this function.
    ///
    /// `Some(false)` if `lit` can never hold, `Some(true)` if `¬lit` can never
    /// hold, `None` if both are possible. An unsat node gives `None`.
    pub fn value(&self, lit: Literal) -> Option<bool> {
        if self.is_unsat() {
            return None;
        }
        if self.condition(lit).is_unsat() {
            return Some(false);
        }
        if self.condition(!lit).is_unsat() {
            return Some(true);
        }
        None
    }

    /// Rename every variable `1..=var_count` through `renaming`.
    ///
    /// # Panics
    ///
    /// Panics if `renaming` maps outside the universe, or if the manager's
    /// variable count changes while the renaming is evaluated.
    pub fn rename(&self, mut renaming: impl FnMut(Variable) -> Variable) -> Node {
        let engine = self.engine();
        let n = engine.var_count();

        let mut map = Vec::with_capacity(n + 1);
        map.push(0);
        for v in 1..=n as u32 {
            map.push(renaming(Variable::new(v)).index());
        }

        assert_eq!(
            engine.var_count(),
            n,
            "Variable count changed while renaming"
        );

        self.make(engine.rename_variables(self.raw(), &map))
    }

    /// Rename the variables present in `renaming`, leaving the others alone.
    pub fn rename_map(&self, renaming: &HashMap<Variable, Variable>) -> Node {
        self.rename(|v| renaming.get(&v).copied().unwrap_or(v))
    }
}

// Queries.
impl Node {
    /// Support: the variables occurring in the node, ascending.
    pub fn variables(&self) -> Vec<Variable> {
        self.engine()
            .variables(self.raw())
            .into_iter()
            .enumerate()
            .filter(|&(_, present)| present)
            .map(|(v, _)| Variable::new(v as u32))
            .collect()
    }

    /// Constant true.
    pub fn is_valid(&self) -> bool {
        self.engine().is_true(self.raw())
    }

    pub fn is_sat(&self) -> bool {
        !self.is_unsat()
    }

    /// Constant false.
    pub fn is_unsat(&self) -> bool {
        self.engine().is_false(self.raw())
    }

    pub fn is_literal(&self) -> bool {
        self.engine().is_literal(self.raw())
    }

    pub fn is_decision(&self) -> bool {
        self.engine().is_decision(self.raw())
    }

    pub fn kind(&self) -> NodeKind {
        if self.is_literal() {
            NodeKind::Literal
        } else if self.is_decision() {
            NodeKind::Decision
        } else {
            NodeKind::Constant
        }
    }

    /// The literal of a literal node, [`Literal::UNDEFINED`] for any other node.
    ///
    /// Check [`is_literal`][Node::is_literal] first.
    pub fn literal(&self) -> Literal {
        if !self.is_literal() {
            return Literal::UNDEFINED;
        }
        Literal::new(self.engine().node_literal(self.raw()))
    }

    /// `(prime, sub)` elements of a decision node; empty for any other node.
    pub fn elements(&self) -> Vec<Element> {
        if !self.is_decision() {
            return Vec::new();
        }
        self.engine()
            .node_elements(self.raw())
            .into_iter()
            .map(|(prime, sub)| Element {
                prime: self.make(prime),
                sub: self.make(sub),
            })
            .collect()
    }

    /// One satisfying assignment over the support, or `None` if unsat.
    ///
    /// Variables are fixed in support order, preferring the positive literal.
    /// The result has exactly one literal per support variable, and
    /// conditioning on all of them yields the valid node.
    pub fn model(&self) -> Option<Vec<Literal>> {
        if self.is_unsat() {
            return None;
        }

        let mut model = Vec::new();
        let mut n = self.clone();
        for var in self.variables() {
            if n.is_valid() {
                // Any value works from here on.
                model.push(var.positive());
                continue;
            }

            let mut lit = var.positive();
            let mut choice = n.condition(lit);
            if choice.is_unsat() {
                lit = !lit;
                choice = n.condition(lit);
            }
            debug_assert!(choice.is_sat());

            model.push(lit);
            n = choice;
        }
        debug_assert!(n.is_valid());

        Some(model)
    }

    /// Total number of elements over all decision nodes.
    pub fn size(&self) -> usize {
        self.engine().size(self.raw())
    }

    /// Number of decision nodes.
    pub fn count(&self) -> usize {
        self.engine().count(self.raw())
    }

    /// Number of satisfying assignments over all of the manager's variables.
    pub fn model_count(&self) -> BigUint {
        self.engine().model_count(self.raw())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.same_manager(other) && self.raw() == other.raw()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(self.engine()).hash(state);
        self.raw().hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("raw", &self.raw())
            .field("kind", &self.kind())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Constant if self.is_valid() => write!(f, "⊤"),
            NodeKind::Constant => write!(f, "⊥"),
            NodeKind::Literal => write!(f, "{}", self.literal()),
            NodeKind::Decision => write!(f, "{}", self.raw()),
        }
    }
}

/// One `(prime, sub)` pair of a decision node.
///
/// The node is the disjunction of `prime ∧ sub` over its elements; primes are
/// pairwise disjoint and cover every input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    prime: Node,
    sub: Node,
}

impl Element {
    pub fn prime(&self) -> &Node {
        &self.prime
    }

    pub fn sub(&self) -> &Node {
        &self.sub
    }

    pub fn into_parts(self) -> (Node, Node) {
        (self.prime, self.sub)
    }
}
