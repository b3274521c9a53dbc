use crate::reference::Ref;

/// Szudzik pairing function.
///
/// ```text
/// (a, b) -> if (a<b) then (b^2 + a) else (a^2 + a + b)
/// ```
///
/// Wrapping arithmetic: the result only feeds bucket selection.
pub fn pairing2(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// Pairing function for three `u64` values.
pub fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    pairing2(pairing2(a, b), c)
}

/// Maps a signed reference onto `u64` without collisions between `x` and `-x`.
fn unsigned(r: Ref) -> u64 {
    let value = r.get();
    ((value.unsigned_abs() as u64) << 1) | (value < 0) as u64
}

pub trait MyHash {
    /// Hash used for bucket and cache-slot selection.
    fn hash(&self) -> u64;
}

impl MyHash for Ref {
    fn hash(&self) -> u64 {
        unsigned(*self)
    }
}

impl MyHash for (Ref, Ref, Ref) {
    fn hash(&self) -> u64 {
        pairing3(unsigned(self.0), unsigned(self.1), unsigned(self.2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_szudzik() {
        // a\b  0  1  2  3  4
        // ------------------
        // 0    0  1  4  9 16
        // 1    2  3  5 10 17
        // 2    6  7  8 11 18
        assert_eq!(pairing2(0, 0), 0);
        assert_eq!(pairing2(0, 1), 1);
        assert_eq!(pairing2(1, 0), 2);
        assert_eq!(pairing2(1, 1), 3);
        assert_eq!(pairing2(0, 2), 4);
        assert_eq!(pairing2(1, 2), 5);
        assert_eq!(pairing2(2, 0), 6);
        assert_eq!(pairing2(2, 2), 8);
        assert_eq!(pairing2(0, 4), 16);
    }

    #[test]
    fn test_sign_distinguished() {
        let r = Ref::positive(7);
        assert_ne!(MyHash::hash(&r), MyHash::hash(&-r));
    }
}
