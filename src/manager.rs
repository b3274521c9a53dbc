//! The [`Manager`]: owner of the engine state for one variable universe.
use std::rc::Rc;

use log::debug;

use crate::engine::Engine;
use crate::error::SddError;
use crate::node::Node;
use crate::types::{Literal, Variable};

/// Whether the engine reclaims unreferenced nodes on its own.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum GcMode {
    #[default]
    Disabled,
    Enabled,
}

/// Owner of the engine state for a variable universe `1..=var_count`.
///
/// A manager is a factory for constant and literal [`Node`]s, which then
/// combine among themselves. It cannot be cloned; moving it moves ownership of
/// the engine.
///
/// # Lifetime
///
/// The engine state is shared between the manager and every [`Node`] built
/// from it, and is released when the last of them is dropped. A node may thus
/// safely outlive the `Manager` value it came from.
///
/// # Examples
///
/// ```
/// use sdd_rs::manager::{GcMode, Manager};
/// use sdd_rs::types::Literal;
///
/// let mgr = Manager::new(2, GcMode::Disabled).unwrap();
/// let x1 = mgr.literal(Literal::new(1)).unwrap();
/// let x2 = mgr.literal(Literal::new(2)).unwrap();
///
/// let f = x1.conjoin(&x2.negate());
/// assert!(f.is_sat());
/// assert!(!f.is_valid());
/// assert_eq!(f.condition_all([Literal::new(1), Literal::new(-2)]), mgr.top());
/// ```
#[derive(Debug)]
pub struct Manager {
    engine: Rc<Engine>,
}

impl Manager {
    /// Create a manager for variables `1..=var_count`.
    ///
    /// Fails with [`SddError::Allocation`] if the engine cannot be allocated.
    pub fn new(var_count: usize, gc: GcMode) -> Result<Self, SddError> {
        let engine = Engine::new(var_count, gc)?;
        debug!("manager: created for {} variables", var_count);
        Ok(Self {
            engine: Rc::new(engine),
        })
    }

    pub(crate) fn engine(&self) -> &Rc<Engine> {
        &self.engine
    }

    pub fn gc_mode(&self) -> GcMode {
        self.engine.gc_mode()
    }

    /// Current number of variables.
    pub fn var_count(&self) -> usize {
        self.engine.var_count()
    }

    /// All variables, in ascending index order.
    pub fn variables(&self) -> Vec<Variable> {
        (1..=self.var_count() as u32).map(Variable::new).collect()
    }

    /// All variables, in the engine's current order.
    pub fn var_order(&self) -> Vec<Variable> {
        self.engine
            .var_order()
            .into_iter()
            .map(Variable::new)
            .collect()
    }

    fn check(&self, var: Variable) -> Result<(), SddError> {
        if var.index() as usize > self.var_count() {
            return Err(SddError::VariableOutOfRange {
                variable: var.index() as u64,
                var_count: self.var_count(),
            });
        }
        Ok(())
    }

    fn newest(&self) -> Variable {
        Variable::new(self.var_count() as u32)
    }

    /// Add a variable in front of the order. Returns the new variable.
    pub fn add_var_before_first(&self) -> Variable {
        self.engine.add_var_before_first();
        self.newest()
    }

    /// Add a variable at the end of the order. Returns the new variable.
    pub fn add_var_after_last(&self) -> Variable {
        self.engine.add_var_after_last();
        self.newest()
    }

    /// Add a variable right before `var` in the order. Returns the new variable.
    pub fn add_var_before(&self, var: Variable) -> Result<Variable, SddError> {
        self.check(var)?;
        self.engine.add_var_before(var.index());
        Ok(self.newest())
    }

    /// Add a variable right after `var` in the order. Returns the new variable.
    pub fn add_var_after(&self, var: Variable) -> Result<Variable, SddError> {
        self.check(var)?;
        self.engine.add_var_after(var.index());
        Ok(self.newest())
    }

    /// The literal node for `lit`.
    ///
    /// Fails with [`SddError::VariableOutOfRange`] if the literal's variable
    /// is not in `1..=var_count`.
    pub fn literal(&self, lit: Literal) -> Result<Node, SddError> {
        Node::lift(&self.engine, lit)
    }

    /// The constant-true node.
    pub fn top(&self) -> Node {
        Node::new(self.engine.clone(), self.engine.true_node())
    }

    /// The constant-false node.
    pub fn bottom(&self) -> Node {
        Node::new(self.engine.clone(), self.engine.false_node())
    }

    /// Reclaim every node not reachable from a live [`Node`] handle.
    ///
    /// Available regardless of [`GcMode`]. Returns the number of freed nodes.
    pub fn garbage_collect(&self) -> usize {
        self.engine.garbage_collect()
    }

    /// Number of nodes held by the engine, constants included.
    pub fn live_count(&self) -> usize {
        self.engine.live_count()
    }

    /// Computed-table `(hits, misses)` since creation.
    pub fn cache_stats(&self) -> (usize, usize) {
        self.engine.cache_stats()
    }

    /// Number of garbage collections run so far.
    pub fn collections(&self) -> usize {
        self.engine.collections()
    }
}
