//! Derived logical operations: quantification, implication and equivalence.
//!
//! All of these are built from [`Node`] primitives only. The `*_literal`
//! variants lift the literal through the node operand's manager first.
use crate::error::SddError;
use crate::node::Node;
use crate::types::{Literal, Variable};

/// `∃var. n`
pub fn exists(var: Variable, n: &Node) -> Node {
    n.exists_var(var)
}

/// `∀var. n`
pub fn forall(var: Variable, n: &Node) -> Node {
    n.forall_var(var)
}

/// `∃vars. n`, eliminating all of `vars` in a single engine pass.
///
/// Variables outside the manager's universe do not occur in `n` and are ignored.
pub fn exists_many(vars: impl IntoIterator<Item = Variable>, n: &Node) -> Node {
    let count = n.manager_var_count();
    let mut mask = vec![false; count + 1];
    for var in vars {
        if let Some(slot) = mask.get_mut(var.index() as usize) {
            *slot = true;
        }
    }
    n.exists_mask(&mask)
}

/// `∀vars. n = ¬∃vars. ¬n`
pub fn forall_many(vars: impl IntoIterator<Item = Variable>, n: &Node) -> Node {
    exists_many(vars, &n.negate()).negate()
}

/// `a → b = ¬a ∨ b`
pub fn implies(a: &Node, b: &Node) -> Node {
    a.negate().disjoin(b)
}

/// `n → lit`
pub fn implies_literal(n: &Node, lit: Literal) -> Result<Node, SddError> {
    Ok(implies(n, &n.lift_literal(lit)?))
}

/// `lit → n`
pub fn literal_implies(lit: Literal, n: &Node) -> Result<Node, SddError> {
    Ok(implies(&n.lift_literal(lit)?, n))
}

/// `a ↔ b = (a → b) ∧ (b → a)`
pub fn iff(a: &Node, b: &Node) -> Node {
    implies(a, b).conjoin(&implies(b, a))
}

/// `n ↔ lit`
pub fn iff_literal(n: &Node, lit: Literal) -> Result<Node, SddError> {
    Ok(iff(n, &n.lift_literal(lit)?))
}

/// `lit ↔ n`
pub fn literal_iff(lit: Literal, n: &Node) -> Result<Node, SddError> {
    Ok(iff(&n.lift_literal(lit)?, n))
}
