// lazuli-core - Cached sequences over single-use iterators
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Sequences over sources that can only be read once.
//!
//! An [`IteratorSeq`] owns a one-shot iterator and an append-only cache
//! of everything pulled so far. Views produced by `rest` share both, so
//! however many views exist and in whatever order they read, each
//! element is pulled from the source exactly once. Positions already
//! cached replay without touching the source.
//!
//! A pull that fails propagates its error to the caller that demanded
//! the element and closes the source; elements cached before the
//! failure stay readable, and the sequence ends where the cache ends.

use std::cell::RefCell;
use std::rc::Rc;

use crate::eager::{Iterable, IterableKind, SourceCursor};
use crate::error::{Error, Result};
use crate::seq::{Cons, Seq, SeqHandle, SeqPeek};
use crate::value::Value;

type Source = Box<dyn Iterator<Item = Result<Value>>>;

struct IterState {
    /// One-shot source; None once drained or closed by a failed pull.
    source: RefCell<Option<Source>>,
    /// Everything pulled so far, in order.
    cache: RefCell<Vec<Value>>,
}

impl IterState {
    /// Pull from the source until the cache covers `idx` or the source
    /// ends. The cache borrow is never held across a pull, so sources
    /// that re-enter sequence code cannot deadlock on it.
    fn realize_to(&self, idx: usize) -> Result<()> {
        while self.cache.borrow().len() <= idx {
            match self.pull()? {
                Some(value) => self.cache.borrow_mut().push(value),
                None => return Ok(()),
            }
        }
        Ok(())
    }

    /// One step against the source: the next element, or None when the
    /// source is gone or ends here.
    fn pull(&self) -> Result<Option<Value>> {
        let mut source = self.source.borrow_mut();
        let Some(iter) = source.as_mut() else {
            return Ok(None);
        };
        match iter.next() {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(e)) => {
                *source = None;
                Err(e)
            }
            None => {
                *source = None;
                Ok(None)
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        self.source.borrow().is_none()
    }
}

/// A view into a cached one-shot source.
///
/// Cloning and `rest` share the cache and the source; only the position
/// differs between views.
#[derive(Clone)]
pub struct IteratorSeq {
    state: Rc<IterState>,
    pos: usize,
}

impl IteratorSeq {
    /// Wrap a one-shot iterator.
    pub fn new(source: impl Iterator<Item = Value> + 'static) -> Self {
        IteratorSeq::fallible(source.map(Ok))
    }

    /// Wrap a one-shot iterator whose pulls can fail.
    pub fn fallible(source: impl Iterator<Item = Result<Value>> + 'static) -> Self {
        IteratorSeq {
            state: Rc::new(IterState {
                source: RefCell::new(Some(Box::new(source))),
                cache: RefCell::new(Vec::new()),
            }),
            pos: 0,
        }
    }

    /// Whether the source has been fully drained (or closed by a failed
    /// pull). Shared across all views of the same source.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Number of elements pulled into the shared cache so far.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.state.cache.borrow().len()
    }

    fn next_view(&self) -> IteratorSeq {
        IteratorSeq {
            state: Rc::clone(&self.state),
            pos: self.pos + 1,
        }
    }
}

impl Seq for IteratorSeq {
    fn first(&self) -> Result<Option<Value>> {
        self.state.realize_to(self.pos)?;
        Ok(self.state.cache.borrow().get(self.pos).cloned())
    }

    fn rest(&self) -> Result<SeqHandle> {
        // Advancing never pulls; the new view pulls on demand.
        Ok(SeqHandle::new(self.next_view()))
    }

    fn is_empty(&self) -> Result<bool> {
        self.state.realize_to(self.pos)?;
        Ok(self.state.cache.borrow().len() <= self.pos)
    }

    fn cons(&self, item: Value) -> SeqHandle {
        SeqHandle::new(Cons::new(item, SeqHandle::new(self.clone())))
    }

    fn probe(&self) -> SeqPeek {
        let cached = self.state.cache.borrow().get(self.pos).cloned();
        match cached {
            Some(item) => SeqPeek::Cons(item, SeqHandle::new(self.next_view())),
            None if self.state.is_exhausted() => SeqPeek::Empty,
            None => SeqPeek::Deferred,
        }
    }
}

/// Wrap a single-use source as a cached sequence.
///
/// This is the door [`sequence`](crate::eager::sequence) points one-shot
/// cursors at. A repeatable collection is accepted too and read through
/// a fresh cursor. A cursor that was already taken by an earlier call
/// is refused.
pub fn iterator_sequence(source: impl Into<Iterable>) -> Result<SeqHandle> {
    match source.into().kind {
        IterableKind::Once(cell) => {
            let taken = cell.borrow_mut().take();
            match taken {
                Some(iter) => Ok(SeqHandle::new(IteratorSeq::new(iter))),
                None => Err(Error::type_error_in(
                    "iterator_sequence",
                    "unconsumed iterator",
                    "already-consumed iterator",
                )),
            }
        }
        IterableKind::Repeatable(source) => Ok(SeqHandle::new(IteratorSeq::new(SourceCursor {
            source,
            idx: 0,
        }))),
    }
}
