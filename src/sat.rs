use std::collections::{HashMap, HashSet};

use num_bigint::BigUint;

use crate::engine::Engine;
use crate::reference::Ref;

impl Engine {
    /// Support bitmap: `result[v]` is set iff `v` occurs in `f`. Index 0 is unused.
    pub fn variables(&self, f: Ref) -> Vec<bool> {
        let mut support = vec![false; self.var_count() + 1];
        let mut visited = HashSet::new();
        let mut stack = vec![f.index()];

        while let Some(i) = stack.pop() {
            if i == Ref::ONE.index() || !visited.insert(i) {
                continue;
            }
            support[self.variable(i) as usize] = true;
            stack.push(self.low(i).index());
            stack.push(self.high(i).index());
        }

        support
    }

    /// Distinct decision nodes reachable from `f`.
    ///
    /// `x` and `¬x` of a complemented pair are distinct SDD nodes.
    fn decisions(&self, f: Ref) -> HashSet<Ref> {
        let mut visited = HashSet::new();
        let mut stack = vec![f];

        while let Some(node) = stack.pop() {
            if !self.is_decision(node) || !visited.insert(node) {
                continue;
            }
            stack.push(self.low_node(node));
            stack.push(self.high_node(node));
        }

        visited
    }

    /// Total number of elements over all decision nodes of `f`.
    pub fn size(&self, f: Ref) -> usize {
        self.decisions(f)
            .into_iter()
            .map(|node| self.node_size(node))
            .sum()
    }

    /// Number of decision nodes of `f`.
    pub fn count(&self, f: Ref) -> usize {
        self.decisions(f).len()
    }

    /// Number of satisfying assignments of `f` over all variables of the manager.
    pub fn model_count(&self, f: Ref) -> BigUint {
        let max = BigUint::from(1u32) << self.var_count();
        let mut cache = HashMap::new();
        self.model_count_(f, &max, &mut cache)
    }

    fn model_count_(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if node == Ref::ZERO {
            return BigUint::ZERO;
        } else if node == Ref::ONE {
            return max.clone();
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let low = self.low(node.index());
        let high = self.high(node.index());

        let count_low = self.model_count_(low, max, cache);
        let count_high = self.model_count_(high, max, cache);

        // Each level halves the share of the universe a branch covers.
        let count: BigUint = (count_low + count_high) >> 1;
        let count = if node.is_negated() { max - count } else { count };

        cache.insert(node, count.clone());
        count
    }
}
