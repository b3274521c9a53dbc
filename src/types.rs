//! Variables and literals.
//!
//! Both are plain value types with no tie to any [`Manager`][crate::manager::Manager]:
//! a [`Variable`] is a 1-based index, a [`Literal`] is a signed index whose
//! sign carries the polarity (DIMACS-style).
use std::fmt;
use std::ops::{Neg, Not};

/// A Boolean variable (1-indexed).
///
/// # Invariants
///
/// - Variable indices are >= 1 (0 is reserved for the undefined literal)
/// - Ordering and hashing follow the index
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Variable(u32);

impl Variable {
    /// Creates a new variable with the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index == 0`. Variables are 1-indexed.
    pub fn new(index: u32) -> Self {
        assert_ne!(index, 0, "Variable indices must be >= 1");
        Variable(index)
    }

    /// Returns the raw variable index.
    pub const fn index(self) -> u32 {
        self.0
    }

    /// The literal asserting this variable.
    pub const fn positive(self) -> Literal {
        Literal(self.0 as i64)
    }

    /// The literal denying this variable.
    pub const fn negative(self) -> Literal {
        Literal(-(self.0 as i64))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Variable> for u32 {
    fn from(var: Variable) -> Self {
        var.0
    }
}

impl Not for Variable {
    type Output = Literal;

    fn not(self) -> Self::Output {
        self.negative()
    }
}

/// A signed literal: magnitude is the variable index, sign is the polarity.
///
/// The value `0` is [`Literal::UNDEFINED`], returned by introspection on
/// nodes that are not literals. It is never a valid input literal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Literal(i64);

impl Literal {
    /// Sentinel for "no literal".
    pub const UNDEFINED: Literal = Literal(0);

    /// Creates a literal from its signed (DIMACS) encoding.
    ///
    /// # Panics
    ///
    /// Panics if `lit == 0` or if `|lit|` does not fit a variable index.
    pub fn new(lit: i64) -> Self {
        assert_ne!(lit, 0, "Literal must be non-zero");
        assert!(
            lit.unsigned_abs() <= u32::MAX as u64,
            "Literal {} is out of the variable index range",
            lit
        );
        Literal(lit)
    }

    pub fn positive(var: Variable) -> Self {
        var.positive()
    }

    pub fn negative(var: Variable) -> Self {
        var.negative()
    }

    /// Signed (DIMACS) encoding of the literal.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this is the [`UNDEFINED`][Literal::UNDEFINED] sentinel.
    pub const fn is_undefined(self) -> bool {
        self.0 == 0
    }

    /// `true` if the literal asserts its variable.
    pub const fn polarity(self) -> bool {
        self.0 > 0
    }

    /// The variable of this literal.
    ///
    /// # Panics
    ///
    /// Panics on [`Literal::UNDEFINED`].
    pub fn var(self) -> Variable {
        Variable::new(self.0.unsigned_abs() as u32)
    }

    pub const fn negate(self) -> Self {
        Literal(-self.0)
    }
}

impl From<Variable> for Literal {
    fn from(var: Variable) -> Self {
        var.positive()
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            return write!(f, "?");
        }
        write!(
            f,
            "{}x{}",
            if self.polarity() { "" } else { "~" },
            self.0.unsigned_abs()
        )
    }
}
