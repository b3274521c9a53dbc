use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// Engine-internal reference to a node: a slot index in the unique table
/// plus a complement bit carried in the sign.
///
/// Slot `1` is the terminal, so `+1` is true and `-1` is false.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub(crate) struct Ref(i32);

impl Ref {
    pub const ONE: Ref = Ref(1);
    pub const ZERO: Ref = Ref(-1);

    pub const fn positive(index: u32) -> Self {
        Self(index as i32)
    }

    pub const fn is_negated(self) -> bool {
        self.0 < 0
    }

    pub const fn negate(self) -> Self {
        Self(-self.0)
    }

    pub const fn is_terminal(self) -> bool {
        self.0 == 1 || self.0 == -1
    }

    /// Return the internal representation of the reference.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Return the slot index of the reference.
    pub const fn index(self) -> usize {
        self.0.unsigned_abs() as usize
    }
}

impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}",
            if self.is_negated() { "~" } else { "" },
            self.index()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminals() {
        assert!(Ref::ONE.is_terminal());
        assert!(Ref::ZERO.is_terminal());
        assert_eq!(-Ref::ONE, Ref::ZERO);
        assert_eq!(Ref::ZERO.index(), Ref::ONE.index());
        assert!(!Ref::positive(2).is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(Ref::positive(5).to_string(), "@5");
        assert_eq!((-Ref::positive(5)).to_string(), "~@5");
    }
}
