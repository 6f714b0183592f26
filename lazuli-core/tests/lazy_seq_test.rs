// lazuli-core - Lazy sequence integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for lazy sequences: deferral, memoization, error
//! propagation, and interaction with cons cells.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::*;
use lazuli_core::{Cons, Error, LazySeq, SeqHandle, seq_equal, sequence};

/// Lazy sequence that counts how many times its thunk runs.
fn counting_lazy(elements: Vec<Value>, runs: &Rc<Cell<usize>>) -> LazySeq {
    let runs = Rc::clone(runs);
    LazySeq::new(move || {
        runs.set(runs.get() + 1);
        Ok(Some(sequence(elements.clone())?))
    })
}

/// Infinite ascending integers, one lazy cell per element.
fn ints_from(start: i64) -> LazySeq {
    LazySeq::new(move || {
        Ok(Some(SeqHandle::new(Cons::new(
            Value::int(start),
            SeqHandle::new(ints_from(start + 1)),
        ))))
    })
}

/// Finite chain counting down from `n` to 1.
fn countdown(n: i64) -> LazySeq {
    LazySeq::new(move || {
        if n == 0 {
            Ok(None)
        } else {
            Ok(Some(SeqHandle::new(Cons::new(
                Value::int(n),
                SeqHandle::new(countdown(n - 1)),
            ))))
        }
    })
}

// =============================================================================
// Deferral and realization
// =============================================================================

#[test]
fn test_creation_does_not_run_thunk() {
    let runs = Rc::new(Cell::new(0));
    let lazy = counting_lazy(vec![int(1), int(2)], &runs);
    assert_eq!(runs.get(), 0);
    assert!(!lazy.is_realized());
}

#[test]
fn test_access_runs_thunk_once() {
    let runs = Rc::new(Cell::new(0));
    let lazy = counting_lazy(vec![int(1), int(2), int(3)], &runs);
    let handle = SeqHandle::new(lazy.clone());

    assert_eq!(handle.first().unwrap(), Some(int(1)));
    assert!(lazy.is_realized());
    assert_eq!(runs.get(), 1);

    // Further access, including a full walk, reuses the stored result.
    assert_eq!(handle.first().unwrap(), Some(int(1)));
    assert!(!handle.is_empty().unwrap());
    assert_eq!(handle.count().unwrap(), 3);
    assert_eq!(runs.get(), 1);
}

#[test]
fn test_clones_share_realization() {
    let runs = Rc::new(Cell::new(0));
    let lazy = counting_lazy(vec![int(1)], &runs);
    let other = lazy.clone();

    assert_eq!(SeqHandle::new(other).first().unwrap(), Some(int(1)));
    assert!(lazy.is_realized());
    assert_eq!(SeqHandle::new(lazy).first().unwrap(), Some(int(1)));
    assert_eq!(runs.get(), 1);
}

#[test]
fn test_empty_thunk() {
    let lazy = LazySeq::new(|| Ok(None));
    assert!(!lazy.is_realized());

    let handle = SeqHandle::new(lazy.clone());
    assert!(handle.is_empty().unwrap());
    assert!(lazy.is_realized());
    assert_eq!(handle.first().unwrap(), None);
    assert!(handle.rest().unwrap().is_empty().unwrap());
    assert_eq!(Value::Seq(handle), Value::empty_list());
}

#[test]
fn test_forcing_is_one_level_deep() {
    let inner_runs = Rc::new(Cell::new(0));
    let inner = counting_lazy(vec![int(2), int(3)], &inner_runs);
    let inner_probe = inner.clone();

    let outer = LazySeq::new(move || Ok(Some(SeqHandle::new(inner.clone()))));
    assert!(!outer.is_realized());

    // Forcing the outer level leaves the inner thunk untouched.
    let delegate = outer.force().unwrap().expect("outer yields a sequence");
    assert!(outer.is_realized());
    assert_eq!(inner_runs.get(), 0);
    assert!(!inner_probe.is_realized());

    // Reading an element finally reaches the inner level.
    assert_eq!(delegate.first().unwrap(), Some(int(2)));
    assert_eq!(inner_runs.get(), 1);
    assert!(inner_probe.is_realized());
}

// =============================================================================
// cons never forces
// =============================================================================

#[test]
fn test_cons_preserves_laziness() {
    let runs = Rc::new(Cell::new(0));
    let lazy = counting_lazy(vec![int(1), int(2)], &runs);

    let consed = SeqHandle::new(lazy.clone()).cons(int(0));
    assert_eq!(runs.get(), 0);
    assert!(!lazy.is_realized());

    // The cell's own element and tail are available without forcing.
    assert_eq!(consed.first().unwrap(), Some(int(0)));
    let tail = consed.rest().unwrap();
    assert_eq!(runs.get(), 0);

    // Reading through the tail forces at last.
    assert_eq!(tail.first().unwrap(), Some(int(1)));
    assert_eq!(runs.get(), 1);
    assert_eq!(consed.to_list().unwrap(), int_list(&[0, 1, 2]));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_thunk_error_propagates_with_payload() {
    let lazy = LazySeq::new(|| Err(Error::thrown(kw("boom"))));
    let handle = SeqHandle::new(lazy.clone());

    let err = handle.first().unwrap_err();
    match err {
        Error::Thrown(payload) => assert_eq!(payload, kw("boom")),
        other => panic!("expected thrown payload, got {:?}", other),
    }
    assert!(!lazy.is_realized());
}

#[test]
fn test_failed_thunk_retries_on_next_access() {
    let attempts = Rc::new(Cell::new(0));
    let counter = Rc::clone(&attempts);
    let lazy = LazySeq::new(move || {
        counter.set(counter.get() + 1);
        if counter.get() == 1 {
            Err(Error::thrown(kw("flaky")))
        } else {
            Ok(Some(sequence(vec![int(1)])?))
        }
    });
    let handle = SeqHandle::new(lazy.clone());

    assert!(handle.first().is_err());
    assert!(!lazy.is_realized());

    // The failure was not memoized; the second attempt succeeds.
    assert_eq!(handle.first().unwrap(), Some(int(1)));
    assert!(lazy.is_realized());
    assert_eq!(attempts.get(), 2);
}

#[test]
fn test_error_mid_iteration_ends_the_walk() {
    let failing = SeqHandle::new(LazySeq::new(|| Err(Error::thrown(string("boom")))));
    let s = SeqHandle::new(Cons::new(int(1), failing));

    let results: Vec<Result<Value, Error>> = s.iter().collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), &int(1));
    assert!(results[1].is_err());
}

#[test]
fn test_equality_with_failing_sequence() {
    let failing = SeqHandle::new(LazySeq::new(|| Err(Error::thrown(kw("boom")))));
    let ok = sequence(vec![int(1)]).unwrap();

    // The fallible form propagates; the operator form reads not-equal.
    assert!(seq_equal(&failing, &ok).is_err());
    assert_ne!(Value::Seq(failing), Value::Seq(ok));
}

// =============================================================================
// Chained lazy sequences
// =============================================================================

#[test]
fn test_infinite_sequence_takes_finitely() {
    let s = SeqHandle::new(ints_from(0));
    let taken: Vec<Value> = s.iter().take(5).collect::<Result<_, _>>().unwrap();
    assert_eq!(taken, vec![int(0), int(1), int(2), int(3), int(4)]);
}

#[test]
fn test_finite_chain_realizes_fully() {
    let s = SeqHandle::new(countdown(500));
    assert_eq!(s.count().unwrap(), 500);
    assert_eq!(s.first().unwrap(), Some(int(500)));
    assert_eq!(s.rest().unwrap().first().unwrap(), Some(int(499)));
}

#[test]
fn test_chain_equality_with_list() {
    let s = SeqHandle::new(countdown(3));
    assert_eq!(Value::Seq(s), Value::List(int_list(&[3, 2, 1])));
}

// =============================================================================
// Printing
// =============================================================================

#[test]
fn test_display_shows_only_realized_elements() {
    let s = SeqHandle::new(countdown(3));
    assert_eq!(s.to_string(), "(...)");

    s.first().unwrap();
    assert_eq!(s.to_string(), "(3 ...)");

    s.count().unwrap();
    assert_eq!(s.to_string(), "(3 2 1)");
}
