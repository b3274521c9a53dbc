//! The decision-diagram engine behind [`Manager`][crate::manager::Manager].
//!
//! The engine keeps Sentential Decision Diagrams over a right-linear vtree whose
//! leaves follow the current variable order. For that vtree shape every
//! compressed, trimmed decision node on variable `x` has exactly two elements,
//! `(x, hi)` and `(¬x, lo)` with `hi ≠ lo`, so a node is stored as the triple
//! `(x, lo, hi)`:
//!
//! - nodes are hash-consed in a unique [`Table`], so equal functions share one slot;
//! - edges carry a complement bit ([`Ref`] sign), which makes negation free;
//! - the `high` edge of a stored node is never complemented (canonicity);
//! - `{(x, ⊤), (¬x, ⊥)}` is trimmed to the literal node `x`, stored as `(x, ⊥, ⊤)`.
//!
//! The node-handle layer only talks to the engine through its primitive set:
//! lifetime (`ref_node`/`deref_node`), constants and literals, the algebra in
//! [`apply`][crate::apply], structural queries, and variable-order queries.
//! Everything else here is engine housekeeping.
use std::cell::{Cell, RefCell};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::error::SddError;
use crate::manager::GcMode;
use crate::reference::Ref;
use crate::table::Table;
use crate::utils::{pairing3, MyHash};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Decision {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Default for Decision {
    fn default() -> Self {
        Self {
            variable: 0,
            low: Ref::ZERO,
            high: Ref::ZERO,
        }
    }
}

impl MyHash for Decision {
    fn hash(&self) -> u64 {
        pairing3(
            self.variable as u64,
            MyHash::hash(&self.low),
            MyHash::hash(&self.high),
        )
    }
}

type Storage = Table<Decision>;

/// Largest variable universe addressable with 31-bit node references.
const MAX_VAR_COUNT: usize = (i32::MAX as usize) / 2;

const STORAGE_BITS: usize = 12;
const CACHE_BITS: usize = 16;
const INITIAL_GC_THRESHOLD: usize = 1 << 14;

/// Level reported for the terminal: below every variable.
pub(crate) const TERMINAL_LEVEL: u32 = u32::MAX;

pub(crate) struct Engine {
    storage: RefCell<Storage>,
    /// External reference counts, indexed by slot.
    refs: RefCell<Vec<u32>>,
    pub(crate) cache: RefCell<Cache<(Ref, Ref, Ref), Ref>>,
    /// Position -> variable.
    order: RefCell<Vec<u32>>,
    /// Variable -> position; slot 0 is unused.
    levels: RefCell<Vec<u32>>,
    gc: GcMode,
    gc_threshold: Cell<usize>,
    collections: Cell<usize>,
}

impl Engine {
    pub fn new(var_count: usize, gc: GcMode) -> Result<Self, SddError> {
        if var_count > MAX_VAR_COUNT {
            return Err(SddError::Allocation { var_count });
        }

        let mut order = Vec::new();
        order
            .try_reserve_exact(var_count)
            .map_err(|_| SddError::Allocation { var_count })?;
        let mut levels = Vec::new();
        levels
            .try_reserve_exact(var_count + 1)
            .map_err(|_| SddError::Allocation { var_count })?;

        order.extend(1..=var_count as u32);
        levels.push(0);
        levels.extend(0..var_count as u32);

        let mut storage = Storage::new(STORAGE_BITS);
        // Allocate the terminal node:
        let one = storage.add(Decision::default());
        assert_eq!(one, 1); // Make sure the terminal node is (1).

        debug!("engine: created with {} variables, gc = {:?}", var_count, gc);

        Ok(Self {
            storage: RefCell::new(storage),
            refs: RefCell::new(vec![0; 2]),
            cache: RefCell::new(Cache::new(CACHE_BITS)),
            order: RefCell::new(order),
            levels: RefCell::new(levels),
            gc,
            gc_threshold: Cell::new(INITIAL_GC_THRESHOLD),
            collections: Cell::new(0),
        })
    }
}

impl Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("Engine")
            .field("var_count", &self.var_count())
            .field("capacity", &storage.capacity())
            .field("real_size", &storage.real_size())
            .field("gc", &self.gc)
            .finish()
    }
}

// Variable order.
impl Engine {
    pub fn var_count(&self) -> usize {
        self.order.borrow().len()
    }

    pub fn var_order(&self) -> Vec<u32> {
        self.order.borrow().clone()
    }

    /// Position of `var` in the current order.
    pub fn level(&self, var: u32) -> u32 {
        self.levels.borrow()[var as usize]
    }

    /// Variable at position `level` of the current order.
    pub fn var_at(&self, level: u32) -> u32 {
        self.order.borrow()[level as usize]
    }

    pub fn add_var_before_first(&self) {
        self.insert_var(0);
    }

    pub fn add_var_after_last(&self) {
        let n = self.var_count();
        self.insert_var(n);
    }

    pub fn add_var_before(&self, var: u32) {
        let position = self.level(var) as usize;
        self.insert_var(position);
    }

    pub fn add_var_after(&self, var: u32) {
        let position = self.level(var) as usize + 1;
        self.insert_var(position);
    }

    /// Insert a fresh variable at `position`.
    ///
    /// Relative order of the existing variables is unchanged, so every stored
    /// node keeps its children strictly below itself.
    fn insert_var(&self, position: usize) {
        let mut order = self.order.borrow_mut();
        let mut levels = self.levels.borrow_mut();

        let var = order.len() as u32 + 1;
        order.insert(position, var);
        levels.push(0);
        for (level, &v) in order.iter().enumerate().skip(position) {
            levels[v as usize] = level as u32;
        }

        debug!("engine: added x{} at position {}", var, position);
    }
}

// Node storage.
impl Engine {
    pub fn variable(&self, index: usize) -> u32 {
        self.storage.borrow()[index].variable
    }
    pub fn low(&self, index: usize) -> Ref {
        self.storage.borrow()[index].low
    }
    pub fn high(&self, index: usize) -> Ref {
        self.storage.borrow()[index].high
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.index());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.index());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    /// Level of the node's variable, [`TERMINAL_LEVEL`] for constants.
    pub fn node_level(&self, node: Ref) -> u32 {
        if node.is_terminal() {
            TERMINAL_LEVEL
        } else {
            self.level(self.variable(node.index()))
        }
    }

    pub fn true_node(&self) -> Ref {
        Ref::ONE
    }
    pub fn false_node(&self) -> Ref {
        Ref::ZERO
    }

    pub fn is_true(&self, node: Ref) -> bool {
        node == Ref::ONE
    }
    pub fn is_false(&self, node: Ref) -> bool {
        node == Ref::ZERO
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");

        // Handle canonicity
        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }

        // Handle duplicates
        if low == high {
            return low;
        }

        let i = self.storage.borrow_mut().put(Decision {
            variable: v,
            low,
            high,
        });

        let mut refs = self.refs.borrow_mut();
        if refs.len() <= i {
            refs.resize(i + 1, 0);
        }

        Ref::positive(i as u32)
    }

    /// The literal node for a signed literal.
    pub fn literal_node(&self, lit: i64) -> Ref {
        assert_ne!(lit, 0, "Literal should not be zero");
        let v = lit.unsigned_abs() as u32;
        assert!(
            v as usize <= self.var_count(),
            "Literal {} is outside of {} variables",
            lit,
            self.var_count()
        );
        self.maybe_collect();
        let x = self.mk_node(v, Ref::ZERO, Ref::ONE);
        if lit < 0 {
            -x
        } else {
            x
        }
    }

    pub fn is_literal(&self, node: Ref) -> bool {
        if node.is_terminal() {
            return false;
        }
        let i = node.index();
        self.low(i) == Ref::ZERO && self.high(i) == Ref::ONE
    }

    pub fn is_decision(&self, node: Ref) -> bool {
        !node.is_terminal() && !self.is_literal(node)
    }

    /// Signed literal of a literal node.
    pub fn node_literal(&self, node: Ref) -> i64 {
        assert!(self.is_literal(node), "Node {} is not a literal", node);
        let v = self.variable(node.index()) as i64;
        if node.is_negated() {
            -v
        } else {
            v
        }
    }

    /// Number of elements of a decision node.
    pub fn node_size(&self, node: Ref) -> usize {
        if self.is_decision(node) {
            2
        } else {
            0
        }
    }

    /// `(prime, sub)` pairs of a decision node: `(x, hi)` then `(¬x, lo)`.
    pub fn node_elements(&self, node: Ref) -> Vec<(Ref, Ref)> {
        assert!(self.is_decision(node), "Node {} is not a decision", node);
        let v = self.variable(node.index());
        let x = self.mk_node(v, Ref::ZERO, Ref::ONE);
        vec![(x, self.high_node(node)), (-x, self.low_node(node))]
    }
}

// Reference counting and garbage collection.
impl Engine {
    pub fn ref_node(&self, node: Ref) -> Ref {
        if !node.is_terminal() {
            self.refs.borrow_mut()[node.index()] += 1;
        }
        node
    }

    pub fn deref_node(&self, node: Ref) {
        if node.is_terminal() {
            return;
        }
        let mut refs = self.refs.borrow_mut();
        let count = &mut refs[node.index()];
        assert!(*count > 0, "Node {} is not referenced", node);
        *count -= 1;
    }

    #[cfg(test)]
    pub fn ref_count(&self, node: Ref) -> u32 {
        if node.is_terminal() {
            return 0;
        }
        self.refs.borrow()[node.index()]
    }

    /// Number of nodes currently held by the unique table, terminal included.
    pub fn live_count(&self) -> usize {
        self.storage.borrow().real_size()
    }

    /// Computed-table `(hits, misses)`.
    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.borrow();
        (cache.hits(), cache.misses())
    }

    pub fn collections(&self) -> usize {
        self.collections.get()
    }

    pub fn gc_mode(&self) -> GcMode {
        self.gc
    }

    /// Collect garbage if enabled and the table has grown past the threshold.
    ///
    /// Only called on entry to a node-producing primitive: at that point every
    /// node the caller still needs is externally referenced.
    pub fn maybe_collect(&self) {
        if self.gc != GcMode::Enabled {
            return;
        }
        let threshold = self.gc_threshold.get();
        if self.live_count() <= threshold {
            return;
        }
        self.garbage_collect();
        if self.live_count() > threshold / 2 {
            self.gc_threshold.set(threshold * 2);
            debug!("gc: threshold raised to {}", threshold * 2);
        }
    }

    /// Free every node not reachable from an externally referenced one.
    ///
    /// Returns the number of freed nodes.
    pub fn garbage_collect(&self) -> usize {
        debug!("Collecting garbage...");

        self.cache.borrow_mut().clear();

        let capacity = self.storage.borrow().capacity();
        let mut alive = vec![false; capacity];
        alive[1] = true;

        let mut stack: Vec<usize> = self
            .refs
            .borrow()
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(i, _)| i)
            .collect();
        while let Some(i) = stack.pop() {
            if alive[i] {
                continue;
            }
            alive[i] = true;
            stack.push(self.low(i).index());
            stack.push(self.high(i).index());
        }

        let dead: Vec<usize> = self
            .storage
            .borrow()
            .indices()
            .filter(|&i| !alive[i])
            .collect();
        let mut storage = self.storage.borrow_mut();
        for &i in &dead {
            storage.remove(i);
        }

        self.collections.set(self.collections.get() + 1);
        debug!(
            "gc: freed {} nodes, {} alive",
            dead.len(),
            storage.real_size()
        );
        dead.len()
    }
}
