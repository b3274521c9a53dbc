//! Operator sugar over the named [`Node`] methods.
//!
//! `!a`, `a & b` and `a | b` are exactly [`Node::negate`], [`Node::conjoin`]
//! and [`Node::disjoin`], for owned nodes and references alike.
use std::ops::{BitAnd, BitOr, Not};

use crate::node::Node;

impl Not for &Node {
    type Output = Node;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl Not for Node {
    type Output = Node;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl BitAnd for &Node {
    type Output = Node;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.conjoin(rhs)
    }
}

impl BitAnd for Node {
    type Output = Node;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.conjoin(&rhs)
    }
}

impl BitOr for &Node {
    type Output = Node;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.disjoin(rhs)
    }
}

impl BitOr for Node {
    type Output = Node;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.disjoin(&rhs)
    }
}
