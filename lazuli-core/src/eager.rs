// lazuli-core - Eager sequence views over repeatable collections
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Sequences over collections that can be re-read at will.
//!
//! A repeatable source advertises itself through [`Reiterable`]:
//! element fetches are independent reads, so a view over one needs no
//! cache and no deferred computation. A bare iterator cannot make that
//! promise, and [`sequence`] refuses it with a type error that names
//! the right door, [`iterator_sequence`].
//!
//! [`iterator_sequence`]: crate::iterator::iterator_sequence

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use im::Vector;

use crate::error::{Error, Result};
use crate::list::PersistentList;
use crate::seq::{Cons, Seq, SeqHandle, SeqPeek};
use crate::value::Value;

// =============================================================================
// Repeatable sources
// =============================================================================

/// Multi-pass traversal capability: every read is an independent pass
/// over the same elements.
///
/// A sequence view calls `nth` once per element, so reads must be
/// cheap positional lookups rather than scans from the front.
pub trait Reiterable {
    /// Number of elements in one full traversal.
    fn length(&self) -> usize;

    /// The element at `idx`, or None past the end.
    fn nth(&self, idx: usize) -> Option<Value>;
}

impl Reiterable for Vector<Value> {
    fn length(&self) -> usize {
        self.len()
    }

    fn nth(&self, idx: usize) -> Option<Value> {
        self.get(idx).cloned()
    }
}

impl Reiterable for Vec<Value> {
    fn length(&self) -> usize {
        self.len()
    }

    fn nth(&self, idx: usize) -> Option<Value> {
        self.get(idx).cloned()
    }
}

impl Reiterable for Range<i64> {
    fn length(&self) -> usize {
        if self.end > self.start {
            // Widen first: the span of a range near the i64 extremes
            // does not itself fit in an i64.
            let span = self.end as i128 - self.start as i128;
            span.min(usize::MAX as i128) as usize
        } else {
            0
        }
    }

    fn nth(&self, idx: usize) -> Option<Value> {
        if idx < self.length() {
            // idx < length keeps the sum within i64.
            Some(Value::Int((self.start as i128 + idx as i128) as i64))
        } else {
            None
        }
    }
}

// =============================================================================
// The interop boundary
// =============================================================================

/// An external traversal source, classified at the interop boundary.
///
/// Clones share the underlying source, so a one-shot source handed to
/// [`sequence`] and refused can still be routed to
/// [`iterator_sequence`](crate::iterator::iterator_sequence) afterwards.
#[derive(Clone)]
pub struct Iterable {
    pub(crate) kind: IterableKind,
}

#[derive(Clone)]
pub(crate) enum IterableKind {
    Repeatable(Rc<dyn Reiterable>),
    Once(Rc<RefCell<Option<Box<dyn Iterator<Item = Value>>>>>),
}

impl Iterable {
    /// A source supporting independent re-reads.
    pub fn repeatable(source: impl Reiterable + 'static) -> Self {
        Iterable {
            kind: IterableKind::Repeatable(Rc::new(source)),
        }
    }

    /// A one-shot cursor: the elements can be read out only once.
    pub fn once(source: impl Iterator<Item = Value> + 'static) -> Self {
        Iterable {
            kind: IterableKind::Once(Rc::new(RefCell::new(Some(Box::new(source))))),
        }
    }
}

impl From<Vec<Value>> for Iterable {
    fn from(v: Vec<Value>) -> Self {
        Iterable::repeatable(v)
    }
}

impl From<Vector<Value>> for Iterable {
    fn from(v: Vector<Value>) -> Self {
        Iterable::repeatable(v)
    }
}

impl From<Range<i64>> for Iterable {
    fn from(r: Range<i64>) -> Self {
        Iterable::repeatable(r)
    }
}

impl From<Rc<str>> for Iterable {
    fn from(s: Rc<str>) -> Self {
        // Collected once: UTF-8 has no positional char access.
        let chars: Vec<Value> = s.chars().map(Value::Char).collect();
        Iterable::repeatable(chars)
    }
}

impl From<PersistentList> for Iterable {
    fn from(list: PersistentList) -> Self {
        Iterable::from(&list)
    }
}

impl From<&PersistentList> for Iterable {
    fn from(list: &PersistentList) -> Self {
        // Collected once: a cons chain has no positional access either.
        let items: Vec<Value> = list.iter().cloned().collect();
        Iterable::repeatable(items)
    }
}

/// Fresh one-shot cursor over a repeatable source.
pub(crate) struct SourceCursor {
    pub(crate) source: Rc<dyn Reiterable>,
    pub(crate) idx: usize,
}

impl Iterator for SourceCursor {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let item = self.source.nth(self.idx);
        if item.is_some() {
            self.idx += 1;
        }
        item
    }
}

// =============================================================================
// EagerSeq
// =============================================================================

/// A position in a repeatable collection, viewed as a sequence.
///
/// `rest` advances the position and shares the source. Nothing is
/// cached and nothing is deferred: every element read is a direct
/// computation against the source.
#[derive(Clone)]
pub struct EagerSeq {
    source: Rc<dyn Reiterable>,
    pos: usize,
}

impl EagerSeq {
    /// View a repeatable collection from its first element.
    pub fn new(source: impl Reiterable + 'static) -> Self {
        EagerSeq {
            source: Rc::new(source),
            pos: 0,
        }
    }

    fn at(source: &Rc<dyn Reiterable>, pos: usize) -> Self {
        EagerSeq {
            source: Rc::clone(source),
            pos,
        }
    }

    fn rest_handle(&self) -> SeqHandle {
        if self.pos + 1 < self.source.length() {
            SeqHandle::new(EagerSeq::at(&self.source, self.pos + 1))
        } else {
            SeqHandle::empty()
        }
    }
}

impl Seq for EagerSeq {
    fn first(&self) -> Result<Option<Value>> {
        Ok(self.source.nth(self.pos))
    }

    fn rest(&self) -> Result<SeqHandle> {
        Ok(self.rest_handle())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.pos >= self.source.length())
    }

    fn cons(&self, item: Value) -> SeqHandle {
        SeqHandle::new(Cons::new(item, SeqHandle::new(self.clone())))
    }

    fn probe(&self) -> SeqPeek {
        // Eager views have nothing deferred, so the whole front is
        // always visible.
        match self.source.nth(self.pos) {
            Some(item) => SeqPeek::Cons(item, self.rest_handle()),
            None => SeqPeek::Empty,
        }
    }
}

/// Normalize a repeatable collection into the sequence protocol.
///
/// An empty source comes back as the canonical empty sequence. A
/// one-shot cursor is refused with a type error: wrapping it here and
/// traversing twice would silently mis-consume it, so those go through
/// [`iterator_sequence`](crate::iterator::iterator_sequence) instead.
pub fn sequence(coll: impl Into<Iterable>) -> Result<SeqHandle> {
    match coll.into().kind {
        IterableKind::Repeatable(source) => {
            if source.length() == 0 {
                Ok(SeqHandle::empty())
            } else {
                Ok(SeqHandle::new(EagerSeq { source, pos: 0 }))
            }
        }
        IterableKind::Once(_) => Err(Error::type_error_in(
            "sequence",
            "re-iterable collection (wrap one-shot sources with iterator_sequence)",
            "single-use iterator",
        )),
    }
}
