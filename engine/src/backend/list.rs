//! Singly linked list backend.
//!
//! Every node owns its successor through an `Option<Box<Node>>`, so removing
//! a node is a single relink followed by dropping the unlinked box. Nothing
//! holds a second reference into the chain.

use super::{Backend, BackendKind, Matcher};
use crate::{error::Result, ContactRecord, Error, Field};
use std::fmt;

type Link = Option<Box<Node>>;

struct Node {
    record: ContactRecord,
    next: Link,
}

impl Node {
    fn new(record: ContactRecord) -> Box<Self> {
        Box::new(Self { record, next: None })
    }
}

/// Records kept in a chain of heap nodes.
#[derive(Default)]
pub struct ListBackend {
    head: Link,
    len: usize,
}

impl ListBackend {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Link at the end of the chain.
    fn tail_link(&mut self) -> &mut Link {
        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            cursor = &mut node.next;
        }
        cursor
    }

    fn iter_records(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    fn iter_records_mut(&mut self) -> IterMut<'_> {
        IterMut {
            next: self.head.as_deref_mut(),
        }
    }

    fn count_nodes(&self) -> usize {
        self.iter_records().count()
    }
}

impl fmt::Debug for ListBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter_records()).finish()
    }
}

impl Drop for ListBackend {
    fn drop(&mut self) {
        // Unlink node by node; the default recursive drop could overflow the
        // stack on long chains.
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

impl Backend for ListBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::List
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, record: ContactRecord) {
        *self.tail_link() = Some(Node::new(record));
        self.len += 1;
    }

    fn extend(&mut self, records: Vec<ContactRecord>) {
        let added = records.len();
        let mut cursor = self.tail_link();
        for record in records {
            let node = cursor.insert(Node::new(record));
            cursor = &mut node.next;
        }
        self.len += added;
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &ContactRecord> + '_> {
        Box::new(self.iter_records())
    }

    fn find_first_mut(&mut self, matcher: Matcher<'_>) -> Option<&mut ContactRecord> {
        self.iter_records_mut().find(|r| matcher(&**r))
    }

    fn remove_first(&mut self, matcher: Matcher<'_>) -> Option<ContactRecord> {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|node| !matcher(&node.record)) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let mut removed = cursor.take()?;
        *cursor = removed.next.take();
        self.len -= 1;
        Some(removed.record)
    }

    fn clear(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
        self.len = 0;
    }

    fn sort_by(&mut self, field: Field) -> Result<()> {
        let head = self.head.take();
        self.head = merge_sort(head, self.len, field);
        self.check_integrity()
    }

    fn check_integrity(&self) -> Result<()> {
        let counted = self.count_nodes();
        if counted != self.len {
            return Err(Error::InvariantViolation(format!(
                "list holds {counted} nodes but tracks {}",
                self.len
            )));
        }
        Ok(())
    }
}

/// Borrowing iterator over the chain.
struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ContactRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.record
        })
    }
}

/// Mutably borrowing iterator over the chain.
struct IterMut<'a> {
    next: Option<&'a mut Node>,
}

impl<'a> Iterator for IterMut<'a> {
    type Item = &'a mut ContactRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.take().map(|node| {
            self.next = node.next.as_deref_mut();
            &mut node.record
        })
    }
}

/// Sort a chain of `len` nodes by relinking them.
fn merge_sort(head: Link, len: usize, field: Field) -> Link {
    if len < 2 {
        return head;
    }
    let mid = len / 2;
    let (front, back) = split_after(head, mid);
    let front = merge_sort(front, mid, field);
    let back = merge_sort(back, len - mid, field);
    merge(front, back, field)
}

/// Detach everything after the first `count` nodes.
fn split_after(mut head: Link, count: usize) -> (Link, Link) {
    let mut cursor = &mut head;
    for _ in 0..count {
        match cursor {
            Some(node) => cursor = &mut node.next,
            None => break,
        }
    }
    let back = cursor.take();
    (head, back)
}

/// Merge two sorted chains. Ties take from `front`, which keeps the sort
/// stable.
fn merge(mut front: Link, mut back: Link, field: Field) -> Link {
    let mut head: Link = None;
    let mut tail = &mut head;

    loop {
        let take_front = match (&front, &back) {
            (Some(a), Some(b)) => a.record.get(field) <= b.record.get(field),
            _ => break,
        };
        let source = if take_front { &mut front } else { &mut back };
        if let Some(mut node) = source.take() {
            *source = node.next.take();
            tail = &mut tail.insert(node).next;
        }
    }

    *tail = front.or(back);
    head
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, email: &str) -> ContactRecord {
        ContactRecord::new(name, "0000000000", email)
    }

    fn names(list: &ListBackend) -> Vec<&str> {
        list.iter_records().map(|r| r.name.as_str()).collect()
    }

    fn list_of(names: &[&str]) -> ListBackend {
        let mut list = ListBackend::new();
        list.extend(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| record(n, &format!("{i}@x.io")))
                .collect(),
        );
        list
    }

    #[test]
    fn push_appends_at_tail() {
        let mut list = ListBackend::new();
        list.push(record("A", "a@x.io"));
        list.push(record("B", "b@x.io"));
        list.push(record("C", "c@x.io"));
        assert_eq!(names(&list), ["A", "B", "C"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn extend_after_push_keeps_order() {
        let mut list = ListBackend::new();
        list.push(record("A", "a@x.io"));
        list.extend(vec![record("B", "b@x.io"), record("C", "c@x.io")]);
        list.push(record("D", "d@x.io"));
        assert_eq!(names(&list), ["A", "B", "C", "D"]);
        list.check_integrity().unwrap();
    }

    #[test]
    fn remove_head_middle_tail() {
        let mut list = list_of(&["A", "B", "C", "D"]);

        assert_eq!(list.remove_first(&|r| r.name == "A").unwrap().name, "A");
        assert_eq!(names(&list), ["B", "C", "D"]);

        assert_eq!(list.remove_first(&|r| r.name == "C").unwrap().name, "C");
        assert_eq!(names(&list), ["B", "D"]);

        assert_eq!(list.remove_first(&|r| r.name == "D").unwrap().name, "D");
        assert_eq!(names(&list), ["B"]);

        assert!(list.remove_first(&|r| r.name == "Z").is_none());
        assert_eq!(list.len(), 1);
        list.check_integrity().unwrap();
    }

    #[test]
    fn remove_from_empty() {
        let mut list = ListBackend::new();
        assert!(list.remove_first(&|_| true).is_none());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn remove_only_first_duplicate() {
        let mut list = ListBackend::new();
        list.extend(vec![record("First", "dup@x.io"), record("Second", "dup@x.io")]);
        let removed = list.remove_first(&|r| r.email == "dup@x.io").unwrap();
        assert_eq!(removed.name, "First");
        assert_eq!(names(&list), ["Second"]);
    }

    #[test]
    fn find_first_mut_edits_node() {
        let mut list = list_of(&["A", "B"]);
        list.find_first_mut(&|r| r.name == "B").unwrap().name = "Bee".into();
        assert_eq!(names(&list), ["A", "Bee"]);
    }

    #[test]
    fn merge_sort_orders_by_name() {
        let mut list = list_of(&["Dee", "Al", "Cy", "Bo", "Eve"]);
        list.sort_by(Field::Name).unwrap();
        assert_eq!(names(&list), ["Al", "Bo", "Cy", "Dee", "Eve"]);
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn merge_sort_is_stable() {
        let mut list = ListBackend::new();
        list.extend(vec![
            record("Same", "1@x.io"),
            record("Alpha", "2@x.io"),
            record("Same", "3@x.io"),
            record("Same", "4@x.io"),
        ]);
        list.sort_by(Field::Name).unwrap();
        let emails: Vec<_> = list.iter_records().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, ["2@x.io", "1@x.io", "3@x.io", "4@x.io"]);
    }

    #[test]
    fn merge_sort_trivial_inputs() {
        let mut empty = ListBackend::new();
        empty.sort_by(Field::Email).unwrap();
        assert!(empty.is_empty());

        let mut one = list_of(&["A"]);
        one.sort_by(Field::Email).unwrap();
        assert_eq!(names(&one), ["A"]);
    }

    #[test]
    fn split_after_counts_nodes() {
        let mut list = list_of(&["A", "B", "C"]);
        let (front, back) = split_after(list.head.take(), 1);
        list.len = 0;

        let front = front.unwrap();
        assert_eq!(front.record.name, "A");
        assert!(front.next.is_none());
        assert_eq!(back.unwrap().record.name, "B");
    }

    #[test]
    fn integrity_detects_bad_count() {
        let mut list = list_of(&["A", "B"]);
        list.len = 3;
        assert!(matches!(
            list.check_integrity(),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn long_list_drops_without_overflow() {
        let mut list = ListBackend::new();
        list.extend(
            (0..200_000)
                .map(|i| record("N", &format!("{i}@x.io")))
                .collect(),
        );
        assert_eq!(list.len(), 200_000);
        drop(list);
    }

    #[test]
    fn debug_lists_records() {
        let list = list_of(&["A"]);
        let debug = format!("{list:?}");
        assert!(debug.starts_with('['));
        assert!(debug.contains("\"A\""));
    }
}
