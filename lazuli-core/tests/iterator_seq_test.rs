// lazuli-core - Iterator sequence integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for cached sequences over single-use iterators.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::*;
use lazuli_core::{Error, Iterable, IteratorSeq, SeqHandle, iterator_sequence};

/// One-shot source that counts how many elements were pulled from it.
struct CountingSource {
    items: std::vec::IntoIter<Value>,
    pulls: Rc<Cell<usize>>,
}

impl Iterator for CountingSource {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let item = self.items.next();
        if item.is_some() {
            self.pulls.set(self.pulls.get() + 1);
        }
        item
    }
}

fn counting_source(ns: &[i64], pulls: &Rc<Cell<usize>>) -> CountingSource {
    let items: Vec<Value> = ns.iter().copied().map(Value::int).collect();
    CountingSource {
        items: items.into_iter(),
        pulls: Rc::clone(pulls),
    }
}

// =============================================================================
// Basic traversal
// =============================================================================

#[test]
fn test_basic_traversal() {
    let seq = IteratorSeq::new(vec![int(1), int(2), int(3)].into_iter());
    let handle = SeqHandle::new(seq);

    assert_eq!(handle.first().unwrap(), Some(int(1)));
    assert_eq!(handle.rest().unwrap().first().unwrap(), Some(int(2)));
    assert_eq!(handle.to_list().unwrap(), int_list(&[1, 2, 3]));
    assert_eq!(Value::Seq(handle), Value::List(int_list(&[1, 2, 3])));
}

#[test]
fn test_empty_source() {
    let seq = IteratorSeq::new(std::iter::empty());
    let handle = SeqHandle::new(seq.clone());

    assert!(handle.is_empty().unwrap());
    assert!(seq.is_exhausted());
    assert_eq!(handle.to_list().unwrap(), PersistentList::new());
}

// =============================================================================
// Caching
// =============================================================================

#[test]
fn test_elements_pulled_exactly_once() {
    let pulls = Rc::new(Cell::new(0));
    let handle = SeqHandle::new(IteratorSeq::new(counting_source(&[1, 2, 3], &pulls)));

    assert_eq!(handle.to_list().unwrap(), int_list(&[1, 2, 3]));
    assert_eq!(pulls.get(), 3);

    // A second traversal replays the cache.
    assert_eq!(handle.to_list().unwrap(), int_list(&[1, 2, 3]));
    assert_eq!(pulls.get(), 3);
}

#[test]
fn test_views_share_cache() {
    let pulls = Rc::new(Cell::new(0));
    let v0 = SeqHandle::new(IteratorSeq::new(counting_source(&[1, 2, 3], &pulls)));
    let v1 = v0.rest().unwrap();

    // Reading the later view pulls through both positions.
    assert_eq!(v1.first().unwrap(), Some(int(2)));
    assert_eq!(pulls.get(), 2);

    // The earlier view is already cached.
    assert_eq!(v0.first().unwrap(), Some(int(1)));
    assert_eq!(pulls.get(), 2);
}

#[test]
fn test_count_drains_source_once() {
    let pulls = Rc::new(Cell::new(0));
    let seq = IteratorSeq::new(counting_source(&[4, 5, 6], &pulls));
    let handle = SeqHandle::new(seq.clone());

    assert_eq!(handle.count().unwrap(), 3);
    assert_eq!(pulls.get(), 3);
    assert!(seq.is_exhausted());

    // Counting again replays the cache, as does equality.
    assert_eq!(handle.count().unwrap(), 3);
    assert_eq!(pulls.get(), 3);
    assert_eq!(Value::Seq(handle), Value::List(int_list(&[4, 5, 6])));
}

#[test]
fn test_exhaustion_requires_walking_past_the_end() {
    let pulls = Rc::new(Cell::new(0));
    let seq = IteratorSeq::new(counting_source(&[1], &pulls));
    let handle = SeqHandle::new(seq.clone());

    // Realizing the only element leaves the source open.
    assert_eq!(handle.first().unwrap(), Some(int(1)));
    assert!(!seq.is_exhausted());

    // Looking past the end closes it.
    assert!(handle.rest().unwrap().is_empty().unwrap());
    assert!(seq.is_exhausted());
}

#[test]
fn test_cons_does_not_pull() {
    let pulls = Rc::new(Cell::new(0));
    let consed = SeqHandle::new(IteratorSeq::new(counting_source(&[1, 2], &pulls))).cons(int(0));
    assert_eq!(pulls.get(), 0);

    assert_eq!(consed.first().unwrap(), Some(int(0)));
    assert_eq!(pulls.get(), 0);

    assert_eq!(consed.rest().unwrap().first().unwrap(), Some(int(1)));
    assert_eq!(pulls.get(), 1);
}

// =============================================================================
// Failing sources
// =============================================================================

#[test]
fn test_failed_pull_closes_source() {
    let seq = IteratorSeq::fallible(
        vec![Ok(int(1)), Ok(int(2)), Err(Error::thrown(kw("boom")))].into_iter(),
    );
    let handle = SeqHandle::new(seq.clone());

    let results: Vec<Result<Value, Error>> = handle.iter().collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap(), &int(1));
    assert!(results[2].is_err());

    assert!(seq.is_exhausted());
    assert_eq!(seq.cached_len(), 2);

    // The cached prefix stays readable; the sequence now ends there.
    assert_eq!(handle.first().unwrap(), Some(int(1)));
    assert_eq!(handle.count().unwrap(), 2);
}

// =============================================================================
// The iterator_sequence door
// =============================================================================

#[test]
fn test_iterator_sequence_wraps_one_shot_sources() {
    let source = Iterable::once(vec![int(1), int(2), int(3)].into_iter());
    let s = iterator_sequence(source).unwrap();
    assert_eq!(s.to_list().unwrap(), int_list(&[1, 2, 3]));
}

#[test]
fn test_iterator_sequence_consumes_its_source() {
    let source = Iterable::once(vec![int(1)].into_iter());
    let first = iterator_sequence(source.clone()).unwrap();

    let err = iterator_sequence(source).unwrap_err();
    assert!(matches!(err, Error::TypeError { .. }));

    assert_eq!(first.to_list().unwrap(), int_list(&[1]));
}

#[test]
fn test_iterator_sequence_accepts_repeatable_collections() {
    let s = iterator_sequence(vec![int(1), int(2)]).unwrap();
    assert_eq!(s.to_list().unwrap(), int_list(&[1, 2]));
}

// =============================================================================
// Printing and scale
// =============================================================================

#[test]
fn test_display_tracks_the_cache() {
    let handle = SeqHandle::new(IteratorSeq::new(vec![int(1), int(2), int(3)].into_iter()));
    assert_eq!(handle.to_string(), "(...)");

    handle.first().unwrap();
    assert_eq!(handle.to_string(), "(1 ...)");

    handle.count().unwrap();
    assert_eq!(handle.to_string(), "(1 2 3)");
}

#[test]
fn test_large_source_drains_incrementally() {
    let s = iterator_sequence(Iterable::once((0..10_000).map(Value::int))).unwrap();
    assert_eq!(s.count().unwrap(), 10_000);
    assert_eq!(s.first().unwrap(), Some(int(0)));

    let items: Vec<Value> = s.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(items.len(), 10_000);
    assert_eq!(items[9_999], int(9_999));
}
