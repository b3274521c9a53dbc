//! End-to-end tests for node handles and the derived algorithms.

use std::collections::HashMap;

use num_bigint::BigUint;
use test_log::test;

use sdd_rs::error::SddError;
use sdd_rs::logic::{exists, exists_many, forall, forall_many, iff, implies};
use sdd_rs::manager::{GcMode, Manager};
use sdd_rs::node::{Node, NodeKind};
use sdd_rs::types::{Literal, Variable};

fn lit(mgr: &Manager, l: i64) -> Node {
    mgr.literal(Literal::new(l)).unwrap()
}

/// `(x1 ∧ x2) ∨ x3` on a fresh 3-variable manager.
fn sample() -> (Manager, Node) {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    let f = lit(&mgr, 1).conjoin(&lit(&mgr, 2)).disjoin(&lit(&mgr, 3));
    (mgr, f)
}

/// A handful of functions over three variables, constants included.
fn zoo(mgr: &Manager) -> Vec<Node> {
    let x1 = lit(mgr, 1);
    let x2 = lit(mgr, 2);
    let x3 = lit(mgr, 3);
    vec![
        mgr.top(),
        mgr.bottom(),
        x1.clone(),
        x2.negate(),
        x1.conjoin(&x2),
        x1.disjoin(&x3.negate()),
        iff(&x1, &x3),
        x1.conjoin(&x2).disjoin(&x3),
    ]
}

// ─── Literals ──────────────────────────────────────────────────────────────────

#[test]
fn literal_double_negation() {
    for l in [1, -1, 7, -42] {
        let x = Literal::new(l);
        assert_eq!(-(-x), x);
        assert_eq!(!!x, x);
        assert_eq!(x.negate().var(), x.var());
        assert_ne!(x.negate().polarity(), x.polarity());
    }
}

#[test]
fn literal_node_double_negation() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    for l in [1, -2, 3] {
        let x = lit(&mgr, l);
        assert_eq!(x.negate().negate(), x);
        assert_eq!(x.negate(), lit(&mgr, -l));
        assert_eq!(x.literal(), Literal::new(l));
    }
}

#[test]
fn literal_out_of_range() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    assert_eq!(
        mgr.literal(Literal::new(4)).unwrap_err(),
        SddError::VariableOutOfRange {
            variable: 4,
            var_count: 3
        }
    );
}

// ─── Algebra ───────────────────────────────────────────────────────────────────

#[test]
fn algebra_identities() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    let top = mgr.top();
    let bottom = mgr.bottom();

    for n in zoo(&mgr) {
        assert_eq!(n.conjoin(&top), n);
        assert_eq!(n.disjoin(&bottom), n);
        assert_eq!(n.conjoin(&bottom), bottom);
        assert_eq!(n.disjoin(&top), top);
        assert_eq!(n.conjoin(&n), n);
        assert_eq!(n.disjoin(&n), n);
        assert!(n.conjoin(&n.negate()).is_unsat());
        assert!(n.disjoin(&n.negate()).is_valid());
    }
}

#[test]
fn algebra_commutes() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    let nodes = zoo(&mgr);
    for a in &nodes {
        for b in &nodes {
            assert_eq!(a.conjoin(b), b.conjoin(a));
            assert_eq!(a.disjoin(b), b.disjoin(a));
            assert_eq!(a & b, a.conjoin(b));
            assert_eq!(a | b, a.disjoin(b));
        }
    }
}

#[test]
fn implies_and_iff_are_reflexive() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    for n in zoo(&mgr) {
        assert!(implies(&n, &n).is_valid());
        assert!(iff(&n, &n).is_valid());
        assert!(iff(&n, &!&n).is_unsat());
    }
}

// ─── Quantification ────────────────────────────────────────────────────────────

#[test]
fn exists_over_no_variables_is_identity() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    for n in zoo(&mgr) {
        assert_eq!(exists_many(Vec::new(), &n), n);
        assert_eq!(forall_many(Vec::new(), &n), n);
    }
}

#[test]
fn exists_over_all_variables_decides_satisfiability() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    for n in zoo(&mgr) {
        let e = exists_many(mgr.variables(), &n);
        if n.is_sat() {
            assert!(e.is_valid());
        } else {
            assert!(e.is_unsat());
        }
        let a = forall_many(mgr.variables(), &n);
        assert_eq!(a.is_valid(), n.is_valid());
    }
}

#[test]
fn forall_is_dual_of_exists() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    for n in zoo(&mgr) {
        for var in mgr.variables() {
            assert_eq!(forall(var, &n), exists(var, &n.negate()).negate());
        }
        let vars = [Variable::new(1), Variable::new(3)];
        assert_eq!(
            forall_many(vars, &n),
            exists_many(vars, &n.negate()).negate()
        );
    }
}

#[test]
fn exists_many_matches_repeated_exists() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    for n in zoo(&mgr) {
        let one_by_one = exists(Variable::new(2), &exists(Variable::new(1), &n));
        assert_eq!(exists_many([Variable::new(1), Variable::new(2)], &n), one_by_one);
    }
}

// ─── Conditioning ──────────────────────────────────────────────────────────────

#[test]
fn condition_all_matches_sequential_condition() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    let lits = [Literal::new(-3), Literal::new(1), Literal::new(2)];
    for n in zoo(&mgr) {
        let sequential = lits.iter().fold(n.clone(), |acc, &l| acc.condition(l));
        assert_eq!(n.condition_all(lits), sequential);
    }
}

#[test]
fn condition_removes_the_variable() {
    let (_mgr, f) = sample();
    let g = f.condition(Literal::new(-3));
    assert!(!g.variables().contains(&Variable::new(3)));
    assert_eq!(g.model_count(), BigUint::from(2u32));
}

#[test]
fn value_of_a_single_literal() {
    let mgr = Manager::new(2, GcMode::Disabled).unwrap();
    let n = lit(&mgr, 1);
    assert_eq!(n.value(Literal::new(1)), Some(true));
    assert_eq!(n.value(Literal::new(-1)), Some(false));
    assert_eq!(n.value(Literal::new(2)), None);
}

#[test]
fn value_on_two_variables() {
    let mgr = Manager::new(2, GcMode::Disabled).unwrap();
    let x1 = lit(&mgr, 1);
    let x2 = lit(&mgr, 2);
    let f = x1.conjoin(&x2.negate());

    assert_eq!(f.value(Literal::new(1)), Some(true));
    assert_eq!(f.value(Literal::new(-1)), Some(false));
    assert_eq!(f.value(Literal::new(2)), Some(false));
    assert_eq!(f.value(Literal::new(-2)), Some(true));

    let g = x1.disjoin(&x2);
    assert_eq!(g.value(Literal::new(1)), None);
    assert_eq!(mgr.top().value(Literal::new(2)), None);
    assert_eq!(mgr.bottom().value(Literal::new(2)), None);
}

// ─── Models ────────────────────────────────────────────────────────────────────

#[test]
fn unsat_has_no_model() {
    let mgr = Manager::new(2, GcMode::Disabled).unwrap();
    assert_eq!(mgr.bottom().model(), None);
    let x = lit(&mgr, 1);
    assert_eq!(x.conjoin(&x.negate()).model(), None);
}

#[test]
fn models_satisfy_and_cover_the_support() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    for n in zoo(&mgr).into_iter().filter(Node::is_sat) {
        let model = n.model().unwrap();
        assert!(n.condition_all(model.iter().copied()).is_valid());

        let vars: Vec<Variable> = model.iter().map(|l| l.var()).collect();
        assert_eq!(vars, n.variables());
    }
    assert_eq!(mgr.top().model(), Some(Vec::new()));
}

// ─── Decomposition ─────────────────────────────────────────────────────────────

#[test]
fn three_variable_scenario() {
    let (mgr, f) = sample();

    assert!(f.is_sat());
    assert!(!f.is_valid());
    assert!(f.is_decision());
    assert_eq!(f.kind(), NodeKind::Decision);
    assert_eq!(f.literal(), Literal::UNDEFINED);
    assert_eq!(f.variables(), mgr.variables());
    assert_eq!(f.model_count(), BigUint::from(5u32));

    let elements = f.elements();
    assert!(!elements.is_empty());

    let rebuilt = elements
        .iter()
        .map(|e| e.prime().conjoin(e.sub()))
        .fold(mgr.bottom(), |acc, p| acc.disjoin(&p));
    assert_eq!(rebuilt, f);

    // Primes are pairwise disjoint and exhaustive.
    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i + 1..] {
            assert!(a.prime().conjoin(b.prime()).is_unsat());
        }
    }
    let cover = elements
        .iter()
        .fold(mgr.bottom(), |acc, e| acc.disjoin(e.prime()));
    assert!(cover.is_valid());
}

#[test]
fn non_decisions_have_no_elements() {
    let mgr = Manager::new(2, GcMode::Disabled).unwrap();
    assert!(mgr.top().elements().is_empty());
    assert!(lit(&mgr, -1).elements().is_empty());
}

// ─── Renaming ──────────────────────────────────────────────────────────────────

#[test]
fn rename_identity() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    for n in zoo(&mgr) {
        assert_eq!(n.rename(|v| v), n);
        assert_eq!(n.rename_map(&HashMap::new()), n);
    }
}

#[test]
fn rename_partial_map() {
    let mgr = Manager::new(3, GcMode::Disabled).unwrap();
    let f = lit(&mgr, 1).conjoin(&lit(&mgr, -2));

    let swap: HashMap<Variable, Variable> = [
        (Variable::new(1), Variable::new(2)),
        (Variable::new(2), Variable::new(1)),
    ]
    .into_iter()
    .collect();
    assert_eq!(f.rename_map(&swap), lit(&mgr, 2).conjoin(&lit(&mgr, -1)));

    let shift: HashMap<Variable, Variable> =
        [(Variable::new(1), Variable::new(3))].into_iter().collect();
    assert_eq!(f.rename_map(&shift), lit(&mgr, 3).conjoin(&lit(&mgr, -2)));
}

// ─── Lifetime ──────────────────────────────────────────────────────────────────

#[test]
fn collected_manager_keeps_results_correct() {
    let mgr = Manager::new(14, GcMode::Enabled).unwrap();
    let n = mgr.var_count() as u32;

    // Every full cube over 14 variables: far more nodes than the first
    // collection threshold.
    let mut total = BigUint::from(0u32);
    for bits in 0u32..1 << n {
        let mut cube = mgr.top();
        for v in 1..=n {
            let l = if bits >> (v - 1) & 1 == 1 {
                v as i64
            } else {
                -(v as i64)
            };
            cube = cube.conjoin_literal(Literal::new(l)).unwrap();
        }
        total += cube.model_count();
    }
    assert_eq!(total, BigUint::from(1u32 << n));
    assert!(mgr.collections() > 0);

    let keep = lit(&mgr, 5).disjoin(&lit(&mgr, 9));
    mgr.garbage_collect();
    // terminal, x9 and x5 ∨ x9
    assert_eq!(mgr.live_count(), 3);
    assert_eq!(keep.model_count(), BigUint::from(3u32 << (n - 2)));
}
