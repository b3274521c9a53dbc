use std::ops::Index;

use crate::utils::MyHash;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
    occupied: bool,
    /// Whether the entry is linked into a bucket chain.
    chained: bool,
}

/// Hash-consing storage: every value lives in exactly one slot, and
/// [`put`][Table::put] returns the existing slot for an equal value.
///
/// Slot 0 is a sentinel and is never handed out. Buckets are chained through
/// `next`, with 0 terminating a chain.
pub struct Table<T> {
    data: Vec<Entry<T>>,

    buckets: Vec<usize>,
    bitmask: u64,

    /// Slots released by [`remove`][Table::remove], reused first.
    free: Vec<usize>,
    /// Number of occupied cells.
    real_size: usize,
}

/// Highest slot index: node references are signed 32-bit.
const MAX_INDEX: usize = i32::MAX as usize;

impl<T> Table<T>
where
    T: Default,
{
    /// Create a new table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bucket bits should be in the range 0..=31");

        let buckets_size = 1 << bits;
        let sentinel = Entry {
            value: T::default(),
            next: 0,
            occupied: true,
            chained: false,
        };

        Self {
            data: vec![sentinel],
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
            free: Vec::new(),
            real_size: 0,
        }
    }
}

impl<T> Table<T> {
    /// Get the number of allocated slots, including free ones.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
    /// Get the number of occupied cells.
    pub fn real_size(&self) -> usize {
        self.real_size
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        debug_assert!(self.is_occupied(index), "Slot {} is free", index);
        &self.data[index].value
    }

    /// Check if the cell at the given index is occupied.
    pub fn is_occupied(&self, index: usize) -> bool {
        assert_ne!(index, 0, "Index is 0");
        index < self.data.len() && self.data[index].occupied
    }

    /// Iterate over the indices of all occupied cells.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (1..self.data.len()).filter(move |&i| self.data[i].occupied)
    }

    /// Store a value outside of any bucket and return its index.
    pub fn add(&mut self, value: T) -> usize {
        let entry = Entry {
            value,
            next: 0,
            occupied: true,
            chained: false,
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.data[index] = entry;
                index
            }
            None => {
                if self.data.len() > MAX_INDEX {
                    panic!("Storage is full");
                }
                self.data.push(entry);
                self.data.len() - 1
            }
        };
        self.real_size += 1;
        index
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Find the slot holding a value equal to `value`.
    pub fn find(&self, value: &T) -> Option<usize> {
        let mut index = self.buckets[self.bucket_index(value)];
        while index != 0 {
            if &self.data[index].value == value {
                return Some(index);
            }
            index = self.data[index].next;
        }
        None
    }

    /// Put a value into the table and return its index, reusing the slot of
    /// an equal value if there is one.
    pub fn put(&mut self, value: T) -> usize {
        if let Some(index) = self.find(&value) {
            return index;
        }

        if self.real_size >= 2 * self.buckets.len() {
            self.grow();
        }

        let bucket = self.bucket_index(&value);
        let index = self.add(value);
        self.data[index].chained = true;
        self.data[index].next = self.buckets[bucket];
        self.buckets[bucket] = index;
        index
    }

    /// Drop the value at the given index and unlink it from its bucket.
    pub fn remove(&mut self, index: usize) {
        assert_ne!(index, 0, "Index is 0");
        assert!(self.data[index].occupied, "Slot {} is already free", index);

        if self.data[index].chained {
            let bucket = self.bucket_index(&self.data[index].value);
            let next = self.data[index].next;
            if self.buckets[bucket] == index {
                self.buckets[bucket] = next;
            } else {
                let mut prev = self.buckets[bucket];
                while prev != 0 && self.data[prev].next != index {
                    prev = self.data[prev].next;
                }
                if prev != 0 {
                    self.data[prev].next = next;
                }
            }
        }

        self.data[index].occupied = false;
        self.data[index].chained = false;
        self.data[index].next = 0;
        self.free.push(index);
        self.real_size -= 1;
    }

    /// Double the number of buckets and relink every chained value.
    fn grow(&mut self) {
        let size = self.buckets.len() * 2;
        self.buckets = vec![0; size];
        self.bitmask = (size - 1) as u64;

        let chained: Vec<usize> = (1..self.data.len())
            .filter(|&i| self.data[i].occupied && self.data[i].chained)
            .collect();
        for index in chained {
            let bucket = self.bucket_index(&self.data[index].value);
            self.data[index].next = self.buckets[bucket];
            self.buckets[bucket] = index;
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
    struct Item(i32);

    impl MyHash for Item {
        fn hash(&self) -> u64 {
            self.0.unsigned_abs() as u64
        }
    }

    #[test]
    fn test_add() {
        let mut table = Table::new(2);
        assert_eq!(table.add(Item(42)), 1);
        assert_eq!(table.add(Item(43)), 2);
        assert_eq!(table[1], Item(42));
        assert_eq!(table.real_size(), 2);
    }

    #[test]
    fn test_put_deduplicates() {
        let mut table = Table::new(2);
        let index1 = table.put(Item(5));
        let index2 = table.put(Item(-5));
        assert_ne!(index1, index2);
        assert_eq!(table.put(Item(5)), index1);
        assert_eq!(table.put(Item(-5)), index2);
        assert_eq!(table.real_size(), 2);
    }

    #[test]
    fn test_remove_and_reuse() {
        let mut table = Table::new(2);
        let a = table.put(Item(1));
        let b = table.put(Item(5)); // same bucket as 1 with 2 bits
        table.remove(a);
        assert!(!table.is_occupied(a));
        assert_eq!(table.find(&Item(1)), None);
        assert_eq!(table.find(&Item(5)), Some(b));
        let c = table.put(Item(9));
        assert_eq!(c, a);
        assert_eq!(table.real_size(), 2);
    }

    #[test]
    fn test_grow_keeps_values() {
        let mut table = Table::new(1);
        let indices: Vec<usize> = (1..100).map(|i| table.put(Item(i))).collect();
        for (i, &index) in (1..100).zip(&indices) {
            assert_eq!(table.find(&Item(i)), Some(index));
        }
        assert_eq!(table.indices().count(), 99);
    }
}
