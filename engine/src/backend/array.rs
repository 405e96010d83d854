//! Contiguous array backend.

use super::{Backend, BackendKind, Matcher};
use crate::{error::Result, ContactRecord, Field};

/// Capacity reserved for the first record.
const INITIAL_CAPACITY: usize = 10;

/// Records kept in one contiguous allocation.
///
/// Growth is explicit: the first insert reserves [`INITIAL_CAPACITY`] slots
/// and every later overflow doubles the reservation.
#[derive(Debug, Clone, Default)]
pub struct ArrayBackend {
    records: Vec<ContactRecord>,
}

impl ArrayBackend {
    /// Create an empty backend without allocating.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Number of records that fit before the next reallocation.
    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    fn reserve_for(&mut self, additional: usize) {
        let needed = self.records.len() + additional;
        if needed <= self.records.capacity() {
            return;
        }
        let mut target = self.records.capacity().max(INITIAL_CAPACITY);
        while target < needed {
            target *= 2;
        }
        self.records.reserve_exact(target - self.records.len());
    }
}

impl Backend for ArrayBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Array
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn push(&mut self, record: ContactRecord) {
        self.reserve_for(1);
        self.records.push(record);
    }

    fn extend(&mut self, records: Vec<ContactRecord>) {
        self.reserve_for(records.len());
        self.records.extend(records);
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &ContactRecord> + '_> {
        Box::new(self.records.iter())
    }

    fn find_first_mut(&mut self, matcher: Matcher<'_>) -> Option<&mut ContactRecord> {
        self.records.iter_mut().find(|r| matcher(&**r))
    }

    fn remove_first(&mut self, matcher: Matcher<'_>) -> Option<ContactRecord> {
        let index = self.records.iter().position(matcher)?;
        // Shifts the tail left by one, keeping relative order
        Some(self.records.remove(index))
    }

    fn clear(&mut self) {
        self.records.clear();
    }

    fn release(&mut self) {
        self.records = Vec::new();
    }

    fn sort_by(&mut self, field: Field) -> Result<()> {
        bubble_sort(&mut self.records, field);
        Ok(())
    }

    fn check_integrity(&self) -> Result<()> {
        Ok(())
    }
}

/// Stable in-place bubble sort on one field.
///
/// Each pass bubbles the largest remaining key to the end of the unsorted
/// prefix; the sort stops after the first pass without a swap. Only strictly
/// out-of-order neighbours are swapped, so equal keys keep their order.
fn bubble_sort(records: &mut [ContactRecord], field: Field) {
    let mut unsorted = records.len();
    while unsorted > 1 {
        let mut swapped = false;
        for j in 1..unsorted {
            if records[j - 1].get(field) > records[j].get(field) {
                records.swap(j - 1, j);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
        unsorted -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, phone: &str, email: &str) -> ContactRecord {
        ContactRecord::new(name, phone, email)
    }

    fn emails(backend: &ArrayBackend) -> Vec<&str> {
        backend.records.iter().map(|r| r.email.as_str()).collect()
    }

    #[test]
    fn starts_unallocated() {
        let backend = ArrayBackend::new();
        assert_eq!(backend.capacity(), 0);
        assert!(backend.is_empty());
    }

    #[test]
    fn capacity_doubles() {
        let mut backend = ArrayBackend::new();
        backend.push(record("A", "0000000000", "a@a.aa"));
        let first = backend.capacity();
        assert!(first >= INITIAL_CAPACITY);

        for i in 1..=first {
            backend.push(record("A", "0000000000", &format!("a{i}@a.aa")));
        }
        assert_eq!(backend.len(), first + 1);
        assert!(backend.capacity() >= first * 2);
    }

    #[test]
    fn extend_reserves_once() {
        let mut backend = ArrayBackend::new();
        let batch: Vec<_> = (0..25)
            .map(|i| record("A", "0000000000", &format!("a{i}@a.aa")))
            .collect();
        backend.extend(batch);
        assert_eq!(backend.len(), 25);
        assert!(backend.capacity() >= 25);
    }

    #[test]
    fn remove_shifts_left() {
        let mut backend = ArrayBackend::new();
        backend.extend(vec![
            record("A", "1", "a@x.io"),
            record("B", "2", "b@x.io"),
            record("C", "3", "c@x.io"),
            record("D", "4", "d@x.io"),
        ]);

        let removed = backend.remove_first(&|r| r.email == "b@x.io").unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(emails(&backend), ["a@x.io", "c@x.io", "d@x.io"]);

        assert!(backend.remove_first(&|r| r.email == "zz@x.io").is_none());
        assert_eq!(backend.len(), 3);
    }

    #[test]
    fn remove_first_of_duplicates() {
        let mut backend = ArrayBackend::new();
        backend.extend(vec![
            record("First", "1", "dup@x.io"),
            record("Second", "2", "dup@x.io"),
        ]);
        let removed = backend.remove_first(&|r| r.email == "dup@x.io").unwrap();
        assert_eq!(removed.name, "First");
        assert_eq!(backend.records[0].name, "Second");
    }

    #[test]
    fn find_first_mut_edits_in_place() {
        let mut backend = ArrayBackend::new();
        backend.push(record("A", "1", "a@x.io"));
        backend.find_first_mut(&|r| r.email == "a@x.io").unwrap().name = "Z".into();
        assert_eq!(backend.records[0].name, "Z");
    }

    #[test]
    fn bubble_sort_orders_by_field() {
        let mut records = vec![
            record("Cy", "3", "b@x.io"),
            record("Al", "2", "c@x.io"),
            record("Bo", "1", "a@x.io"),
        ];
        bubble_sort(&mut records, Field::Name);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Al", "Bo", "Cy"]);

        bubble_sort(&mut records, Field::Phone);
        let phones: Vec<_> = records.iter().map(|r| r.phone.as_str()).collect();
        assert_eq!(phones, ["1", "2", "3"]);

        bubble_sort(&mut records, Field::Email);
        let emails: Vec<_> = records.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, ["a@x.io", "b@x.io", "c@x.io"]);
    }

    #[test]
    fn bubble_sort_is_stable() {
        let mut records = vec![
            record("Same", "2", "first@x.io"),
            record("Alpha", "9", "a@x.io"),
            record("Same", "1", "second@x.io"),
        ];
        bubble_sort(&mut records, Field::Name);
        let emails: Vec<_> = records.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, ["a@x.io", "first@x.io", "second@x.io"]);
    }

    #[test]
    fn bubble_sort_is_bytewise() {
        // Uppercase sorts before lowercase
        let mut records = vec![record("bob", "1", "b@x.io"), record("Zed", "2", "z@x.io")];
        bubble_sort(&mut records, Field::Name);
        assert_eq!(records[0].name, "Zed");
    }

    #[test]
    fn bubble_sort_trivial_inputs() {
        let mut empty: Vec<ContactRecord> = Vec::new();
        bubble_sort(&mut empty, Field::Name);
        assert!(empty.is_empty());

        let mut one = vec![record("A", "1", "a@x.io")];
        bubble_sort(&mut one, Field::Name);
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn release_frees_storage() {
        let mut backend = ArrayBackend::new();
        backend.push(record("A", "1", "a@x.io"));
        backend.release();
        assert!(backend.is_empty());
        assert_eq!(backend.capacity(), 0);
        // Releasing twice is fine
        backend.release();
    }
}
