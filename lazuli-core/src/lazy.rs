// lazuli-core - Lazy sequences with memoized thunks
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Deferred sequences.
//!
//! A [`LazySeq`] holds a thunk that runs the first time anything
//! demands an element. The thunk yields either None (an empty sequence)
//! or a sequence to delegate to, and the outcome is memoized: a
//! successful thunk runs exactly once no matter how many clones share
//! the state.
//!
//! A thunk that fails propagates its error unchanged and leaves the
//! sequence unrealized, so the next access runs it again. `is_realized`
//! therefore reports successful realization, not attempts.
//!
//! Forcing is shallow. A thunk that returns another lazy sequence
//! realizes only that one level; the inner sequence stays deferred
//! until something reads through it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::seq::{Cons, Seq, SeqHandle, SeqPeek};
use crate::value::Value;

type Thunk = Rc<dyn Fn() -> Result<Option<SeqHandle>>>;

enum LazyState {
    /// Not yet successfully forced.
    Pending(Thunk),
    /// Outcome of the one successful run: the sequence to delegate to,
    /// or None for empty.
    Realized(Option<SeqHandle>),
}

/// A sequence computed on first demand.
///
/// Clones share realization state: forcing through one clone realizes
/// them all.
#[derive(Clone)]
pub struct LazySeq {
    state: Rc<RefCell<LazyState>>,
}

impl LazySeq {
    /// Defer `thunk` until first access. The thunk returns the sequence
    /// to expose, or None for no elements.
    pub fn new(thunk: impl Fn() -> Result<Option<SeqHandle>> + 'static) -> Self {
        LazySeq {
            state: Rc::new(RefCell::new(LazyState::Pending(Rc::new(thunk)))),
        }
    }

    /// Whether the thunk has completed successfully.
    #[must_use]
    pub fn is_realized(&self) -> bool {
        matches!(&*self.state.borrow(), LazyState::Realized(_))
    }

    /// Run the thunk if still pending and return the delegate sequence
    /// (None meaning empty).
    ///
    /// The thunk is cloned out and the borrow released before it runs,
    /// so a thunk that touches this sequence again sees it pending
    /// instead of panicking on a held borrow. Only a successful run is
    /// stored.
    pub fn force(&self) -> Result<Option<SeqHandle>> {
        let thunk = match &*self.state.borrow() {
            LazyState::Realized(seq) => return Ok(seq.clone()),
            LazyState::Pending(thunk) => Rc::clone(thunk),
        };
        let seq = thunk()?;
        *self.state.borrow_mut() = LazyState::Realized(seq.clone());
        Ok(seq)
    }
}

impl Seq for LazySeq {
    fn first(&self) -> Result<Option<Value>> {
        match self.force()? {
            Some(seq) => seq.first(),
            None => Ok(None),
        }
    }

    fn rest(&self) -> Result<SeqHandle> {
        match self.force()? {
            Some(seq) => seq.rest(),
            None => Ok(SeqHandle::empty()),
        }
    }

    fn is_empty(&self) -> Result<bool> {
        match self.force()? {
            Some(seq) => seq.is_empty(),
            None => Ok(true),
        }
    }

    fn cons(&self, item: Value) -> SeqHandle {
        // Never forces: the receiver rides along untouched as the tail.
        SeqHandle::new(Cons::new(item, SeqHandle::new(self.clone())))
    }

    fn probe(&self) -> SeqPeek {
        match &*self.state.borrow() {
            LazyState::Pending(_) => SeqPeek::Deferred,
            LazyState::Realized(None) => SeqPeek::Empty,
            LazyState::Realized(Some(seq)) => seq.probe(),
        }
    }
}
