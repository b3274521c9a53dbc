//! Algebra primitives of the engine: negation, ITE-based conjunction and
//! disjunction, quantification, conditioning and renaming.
//!
//! Every `pub` function here is a primitive entry point and may trigger a
//! garbage collection before it starts; the private helpers never do.
use std::collections::HashMap;

use log::debug;

use crate::engine::Engine;
use crate::reference::Ref;

impl Engine {
    pub fn negate(&self, f: Ref) -> Ref {
        debug!("negate(f = {})", f);
        -f
    }

    pub fn conjoin(&self, f: Ref, g: Ref) -> Ref {
        debug!("conjoin(f = {}, g = {})", f, g);
        self.maybe_collect();
        self.apply_ite(f, g, Ref::ZERO)
    }

    pub fn disjoin(&self, f: Ref, g: Ref) -> Ref {
        debug!("disjoin(f = {}, g = {})", f, g);
        self.maybe_collect();
        self.apply_ite(f, Ref::ONE, g)
    }

    /// `∃v. f = f|¬v ∨ f|v`
    pub fn exists(&self, v: u32, f: Ref) -> Ref {
        debug!("exists(v = {}, f = {})", v, f);
        if v == 0 || v as usize > self.var_count() {
            return f;
        }
        self.maybe_collect();
        let f0 = self.restrict(f, v, false);
        let f1 = self.restrict(f, v, true);
        self.apply_ite(f0, Ref::ONE, f1)
    }

    /// `∀v. f = f|¬v ∧ f|v`
    pub fn forall(&self, v: u32, f: Ref) -> Ref {
        debug!("forall(v = {}, f = {})", v, f);
        if v == 0 || v as usize > self.var_count() {
            return f;
        }
        self.maybe_collect();
        let f0 = self.restrict(f, v, false);
        let f1 = self.restrict(f, v, true);
        self.apply_ite(f0, f1, Ref::ZERO)
    }

    /// Existentially quantify every variable `v` with `mask[v]` in one pass.
    ///
    /// `mask` is indexed by variable; index 0 is ignored.
    pub fn exists_multiple(&self, mask: &[bool], f: Ref) -> Ref {
        debug!("exists_multiple(f = {})", f);

        let deepest = mask
            .iter()
            .enumerate()
            .skip(1)
            .take(self.var_count())
            .filter(|&(_, &eliminate)| eliminate)
            .map(|(v, _)| self.level(v as u32))
            .max();
        let Some(deepest) = deepest else {
            return f;
        };

        self.maybe_collect();
        let mut cache = HashMap::new();
        self.exists_multiple_(f, mask, deepest, &mut cache)
    }

    fn exists_multiple_(
        &self,
        f: Ref,
        mask: &[bool],
        deepest: u32,
        cache: &mut HashMap<Ref, Ref>,
    ) -> Ref {
        if f.is_terminal() || self.node_level(f) > deepest {
            // Nothing left to eliminate below this point.
            return f;
        }

        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let v = self.variable(f.index());
        let low = self.exists_multiple_(self.low_node(f), mask, deepest, cache);
        let high = self.exists_multiple_(self.high_node(f), mask, deepest, cache);
        let res = if mask.get(v as usize).copied().unwrap_or(false) {
            self.apply_ite(low, Ref::ONE, high)
        } else {
            self.mk_node(v, low, high)
        };
        cache.insert(f, res);
        res
    }

    /// Condition `f` on a signed literal.
    ///
    /// A variable outside the universe cannot occur in `f`, so `f` is returned.
    pub fn condition(&self, lit: i64, f: Ref) -> Ref {
        debug!("condition(lit = {}, f = {})", lit, f);
        assert_ne!(lit, 0, "Literal should not be zero");

        let v = lit.unsigned_abs();
        if v > self.var_count() as u64 {
            return f;
        }

        self.maybe_collect();
        self.restrict(f, v as u32, lit > 0)
    }

    /// Rename variables: `map[v]` is the new variable for `v`, index 0 unused.
    ///
    /// Built bottom-up with ITE, so `map` need not be a permutation.
    pub fn rename_variables(&self, f: Ref, map: &[u32]) -> Ref {
        debug!("rename_variables(f = {}, map = {:?})", f, map);

        let n = self.var_count();
        assert_eq!(map.len(), n + 1, "Renaming map must cover all variables");
        for (v, &w) in map.iter().enumerate().skip(1) {
            assert!(
                w >= 1 && w as usize <= n,
                "Variable {} is renamed to {}, outside of {} variables",
                v,
                w,
                n
            );
        }

        self.maybe_collect();
        let mut cache = HashMap::new();
        self.rename_(f, map, &mut cache)
    }

    fn rename_(&self, f: Ref, map: &[u32], cache: &mut HashMap<Ref, Ref>) -> Ref {
        if f.is_terminal() {
            return f;
        }
        if f.is_negated() {
            return -self.rename_(-f, map, cache);
        }

        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let i = f.index();
        let low = self.rename_(self.low(i), map, cache);
        let high = self.rename_(self.high(i), map, cache);
        let w = map[self.variable(i) as usize];
        let x = self.mk_node(w, Ref::ZERO, Ref::ONE);
        let res = self.apply_ite(x, high, low);
        cache.insert(f, res);
        res
    }

    /// Cofactors `(f0, f1)` of `f` with respect to the variable at `level`.
    fn top_cofactors(&self, f: Ref, level: u32) -> (Ref, Ref) {
        if self.node_level(f) > level {
            return (f, f);
        }
        debug_assert_eq!(self.node_level(f), level);
        (self.low_node(f), self.high_node(f))
    }

    /// `f|v<-b`
    fn restrict(&self, f: Ref, v: u32, b: bool) -> Ref {
        let level = self.level(v);
        let mut cache = HashMap::new();
        self.restrict_(f, level, b, &mut cache)
    }

    fn restrict_(&self, f: Ref, level: u32, b: bool, cache: &mut HashMap<Ref, Ref>) -> Ref {
        let i = self.node_level(f);

        if i > level {
            // 'f' does not depend on the variable
            return f;
        }

        if i == level {
            return if b {
                self.high_node(f)
            } else {
                self.low_node(f)
            };
        }

        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let low = self.restrict_(self.low_node(f), level, b, cache);
        let high = self.restrict_(self.high_node(f), level, b, cache);
        let res = self.mk_node(self.variable(f.index()), low, high);
        cache.insert(f, res);
        res
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)
    /// ```
    pub(crate) fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if f == Ref::ONE {
            return g;
        }
        if f == Ref::ZERO {
            return h;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,G,~F) => ite(F,G,1)
        let g = if g == f {
            Ref::ONE
        } else if g == -f {
            Ref::ZERO
        } else {
            g
        };
        let h = if h == f {
            Ref::ZERO
        } else if h == -f {
            Ref::ONE
        } else {
            h
        };

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        if g == h {
            return g;
        }
        if g == Ref::ONE && h == Ref::ZERO {
            return f;
        }
        if g == Ref::ZERO && h == Ref::ONE {
            return -f;
        }

        // Make sure the first two pointers (f and g) are regular (not negated)
        let (mut f, mut g, mut h) = (f, g, h);

        // ite(~F,G,H) => ite(F,H,G)
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }

        // ite(F,~G,H) => ~ite(F,G,~H)
        let mut n = false;
        if g.is_negated() {
            n = true;
            g = -g;
            h = -h;
        }

        let key = (f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            return if n { -res } else { res };
        }

        // Determine the top level:
        let m = self
            .node_level(f)
            .min(self.node_level(g))
            .min(self.node_level(h));
        let v = self.var_at(m);

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0);
        let t = self.apply_ite(f1, g1, h1);

        let res = self.mk_node(v, e, t);
        self.cache.borrow_mut().insert(key, res);

        if n {
            -res
        } else {
            res
        }
    }
}
