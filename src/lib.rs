//! # sdd-rs: Sentential Decision Diagrams in Rust
//!
//! **`sdd-rs`** is a handle layer over a Sentential Decision Diagram (SDD) engine.
//! It gives you safe, reference-counted [`Node`][crate::node::Node] handles tied
//! to a [`Manager`][crate::manager::Manager], and a set of algorithms built on top
//! of the engine's primitive operations.
//!
//! ## What is an SDD?
//!
//! A Sentential Decision Diagram represents a Boolean function as a DAG of
//! *decision nodes*, each a disjunction of `(prime, sub)` *elements* whose primes
//! are pairwise disjoint and exhaustive. Like BDDs, SDDs are **canonical** for a
//! fixed vtree, so equivalence of two functions is a pointer comparison.
//!
//! ## Key Features
//!
//! - **Reference counting done for you**: every [`Node`][crate::node::Node] holds
//!   exactly one engine reference, shared by its clones and released when the last
//!   clone goes away. Nodes inside an [`Element`][crate::node::Element] count too.
//! - **Derived algorithms**: quantification, implication, equivalence,
//!   conditioning, model extraction and renaming (see [`logic`] and [`node`]).
//! - **1-Based Indexing**: variables are 1-indexed and literals are signed, as in DIMACS.
//!
//! ## Basic Usage
//!
//! ```rust
//! use sdd_rs::logic::{exists, implies};
//! use sdd_rs::manager::{GcMode, Manager};
//! use sdd_rs::types::{Literal, Variable};
//!
//! // 1. Create a manager for variables x1..x3
//! let mgr = Manager::new(3, GcMode::Disabled)?;
//!
//! // 2. Lift literals to nodes
//! let x1 = mgr.literal(Literal::new(1))?;
//! let x2 = mgr.literal(Literal::new(2))?;
//! let x3 = mgr.literal(Literal::new(3))?;
//!
//! // 3. Build f = (x1 ∧ x2) ∨ x3
//! let f = x1.conjoin(&x2).disjoin(&x3);
//! assert!(f.is_decision());
//!
//! // 4. Query it
//! assert!(implies(&x1.conjoin(&x2), &f).is_valid());
//! assert_eq!(exists(Variable::new(1), &f), x2.disjoin(&x3));
//!
//! let model = f.model().unwrap();
//! assert!(f.condition_all(model).is_valid());
//! # Ok::<(), sdd_rs::error::SddError>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`manager`]**: the [`Manager`][crate::manager::Manager], owner of the engine state.
//! - **[`node`]**: node handles, introspection and decomposition into elements.
//! - **[`logic`]**: quantification, implication and equivalence.
//! - **[`types`]**: [`Variable`][crate::types::Variable] and [`Literal`][crate::types::Literal].
//! - **[`ops`]**: `!`, `&` and `|` on nodes.
//!
//! ## Threading
//!
//! Managers and nodes are single-threaded (`!Send`, `!Sync`): the engine's
//! caches and reference counts are not synchronized.

mod apply;
mod cache;
mod engine;
mod reference;
mod sat;
mod table;
mod utils;

pub mod error;
pub mod logic;
pub mod manager;
pub mod node;
pub mod ops;
pub mod types;
