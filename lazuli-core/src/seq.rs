// lazuli-core - Sequence protocol and generic traversal
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The sequence protocol: one uniform view over every ordered producer.
//!
//! [`Seq`] is the capability trait. The persistent list, cons cells,
//! eager views, cached iterator sequences, and lazy sequences all
//! implement it, and host types outside this crate can join by
//! implementing it too. Traversal, equality, counting, and printing are
//! written against the trait alone.
//!
//! Forcing operations return [`Result`] because realizing a lazy tail
//! or pulling from an iterator source can fail. `cons` never forces and
//! never fails: it wraps the receiver untouched.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::eager::EagerSeq;
use crate::error::{Error, Result};
use crate::list::PersistentList;
use crate::value::{Meta, Value, get_print_length};

/// The sequence capability.
pub trait Seq {
    /// The first element, or None when empty. May force deferred work.
    fn first(&self) -> Result<Option<Value>>;

    /// The sequence past the first element, or the canonical empty
    /// sequence when nothing remains; never "no sequence". May force
    /// deferred work.
    fn rest(&self) -> Result<SeqHandle>;

    /// Whether any element remains. May force deferred work.
    fn is_empty(&self) -> Result<bool>;

    /// A sequence of `item` followed by this sequence. Must not force a
    /// deferred receiver.
    fn cons(&self, item: Value) -> SeqHandle;

    /// Non-forcing snapshot of the front, for printing. The default
    /// admits nothing.
    fn probe(&self) -> SeqPeek {
        SeqPeek::Deferred
    }
}

/// What a sequence will admit to holding without being forced.
#[derive(Clone)]
pub enum SeqPeek {
    /// Known empty.
    Empty,
    /// Realized first element and its tail.
    Cons(Value, SeqHandle),
    /// Answering would run deferred work.
    Deferred,
}

// =============================================================================
// SeqHandle
// =============================================================================

/// Shared handle to any sequence-protocol value.
///
/// Cloning is cheap and clones view the same underlying sequence state,
/// so forcing through one clone is visible through all.
#[derive(Clone)]
pub struct SeqHandle(Rc<dyn Seq>);

impl SeqHandle {
    /// Wrap a concrete sequence.
    pub fn new(seq: impl Seq + 'static) -> Self {
        SeqHandle(Rc::new(seq))
    }

    /// The canonical empty sequence.
    pub fn empty() -> Self {
        SeqHandle::new(PersistentList::new())
    }

    /// The first element, or None when empty.
    pub fn first(&self) -> Result<Option<Value>> {
        self.0.first()
    }

    /// The sequence past the first element.
    pub fn rest(&self) -> Result<SeqHandle> {
        self.0.rest()
    }

    /// Whether any element remains.
    pub fn is_empty(&self) -> Result<bool> {
        self.0.is_empty()
    }

    /// A sequence of `item` followed by this one, unforced.
    #[must_use]
    pub fn cons(&self, item: Value) -> SeqHandle {
        self.0.cons(item)
    }

    /// Non-forcing snapshot of the front.
    pub fn probe(&self) -> SeqPeek {
        self.0.probe()
    }

    /// Iterate the elements in order, forcing as it advances.
    pub fn iter(&self) -> SeqIter {
        SeqIter {
            seq: Some(self.clone()),
        }
    }

    /// Number of elements. Walks, and therefore fully realizes, the
    /// sequence. An iterator-backed sequence drains its source exactly
    /// once; later counts replay the cache.
    pub fn count(&self) -> Result<usize> {
        let mut n = 0;
        let mut cur = self.clone();
        loop {
            if cur.is_empty()? {
                return Ok(n);
            }
            n += 1;
            cur = cur.rest()?;
        }
    }

    /// Collect into a persistent list, realizing everything.
    pub fn to_list(&self) -> Result<PersistentList> {
        self.iter().collect()
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for SeqHandle {
    fn eq(&self, other: &Self) -> bool {
        // Same underlying sequence is equal without a walk; otherwise
        // traverse both. A forcing failure reads as not-equal here;
        // seq_equal is the fallible form.
        if self.addr() == other.addr() {
            return true;
        }
        seq_equal(self, other).unwrap_or(false)
    }
}

impl Eq for SeqHandle {}

impl PartialOrd for SeqHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SeqHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        // Identity order. A total order over sequences cannot force
        // (forcing can fail), so handles sort by allocation address and
        // maps keyed by sequences are identity-keyed.
        self.addr().cmp(&other.addr())
    }
}

impl Hash for SeqHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Realized elements only, matching element-wise equality. Like
        // equality this forces; a forcing failure truncates the hash.
        for item in self.iter() {
            match item {
                Ok(value) => value.hash(state),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Display for SeqHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printing never forces: realized elements are shown and any
        // deferred tail renders as "...".
        let cap = get_print_length().unwrap_or(32);
        write!(f, "(")?;
        let mut cur = self.clone();
        let mut shown = 0;
        loop {
            match cur.probe() {
                SeqPeek::Empty => break,
                SeqPeek::Deferred => {
                    if shown > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "...")?;
                    break;
                }
                SeqPeek::Cons(item, rest) => {
                    if shown >= cap {
                        write!(f, " ...")?;
                        break;
                    }
                    if shown > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                    shown += 1;
                    cur = rest;
                }
            }
        }
        write!(f, ")")
    }
}

impl fmt::Debug for SeqHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

// =============================================================================
// Cons cells
// =============================================================================

/// A single prepended cell: one element in front of any sequence.
///
/// This is what `cons` builds when the receiver is not itself a list.
/// The tail is held untouched, so consing onto a lazy sequence never
/// forces it.
#[derive(Clone)]
pub struct Cons {
    first: Value,
    rest: SeqHandle,
    meta: Option<Rc<Meta>>,
}

impl Cons {
    /// Create a cons cell.
    pub fn new(first: Value, rest: SeqHandle) -> Self {
        Cons {
            first,
            rest,
            meta: None,
        }
    }

    /// The cell's metadata, if any.
    #[must_use]
    pub fn meta(&self) -> Option<&Rc<Meta>> {
        self.meta.as_ref()
    }

    /// The same cell with different metadata.
    #[must_use]
    pub fn with_meta(&self, meta: Option<Rc<Meta>>) -> Self {
        Cons {
            first: self.first.clone(),
            rest: self.rest.clone(),
            meta,
        }
    }
}

impl Seq for Cons {
    fn first(&self) -> Result<Option<Value>> {
        Ok(Some(self.first.clone()))
    }

    fn rest(&self) -> Result<SeqHandle> {
        Ok(self.rest.clone())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(false)
    }

    fn cons(&self, item: Value) -> SeqHandle {
        SeqHandle::new(Cons::new(item, SeqHandle::new(self.clone())))
    }

    fn probe(&self) -> SeqPeek {
        SeqPeek::Cons(self.first.clone(), self.rest.clone())
    }
}

// =============================================================================
// Iteration
// =============================================================================

/// Iterator over a sequence's elements.
///
/// Yields `Result` because advancing can force deferred work; after an
/// error the iterator is exhausted.
pub struct SeqIter {
    seq: Option<SeqHandle>,
}

impl Iterator for SeqIter {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let seq = self.seq.take()?;
        match seq.is_empty() {
            Err(e) => Some(Err(e)),
            Ok(true) => None,
            Ok(false) => {
                let item = match seq.first() {
                    Ok(Some(value)) => value,
                    Ok(None) => Value::Nil,
                    Err(e) => return Some(Err(e)),
                };
                match seq.rest() {
                    Ok(rest) => {
                        self.seq = Some(rest);
                        Some(Ok(item))
                    }
                    Err(e) => Some(Err(e)),
                }
            }
        }
    }
}

// =============================================================================
// Generic operations
// =============================================================================

/// Element-wise equality between two sequences. Forces both as it
/// walks; forcing errors propagate.
pub fn seq_equal(a: &SeqHandle, b: &SeqHandle) -> Result<bool> {
    let mut a = a.clone();
    let mut b = b.clone();
    loop {
        let (a_empty, b_empty) = (a.is_empty()?, b.is_empty()?);
        if a_empty || b_empty {
            return Ok(a_empty && b_empty);
        }
        if a.first()? != b.first()? {
            return Ok(false);
        }
        a = a.rest()?;
        b = b.rest()?;
    }
}

/// Element-wise equality between a list and a sequence, walking the
/// list directly instead of through a handle.
pub(crate) fn list_seq_equal(list: &PersistentList, seq: &SeqHandle) -> Result<bool> {
    let mut rest = seq.clone();
    for item in list {
        if rest.is_empty()? {
            return Ok(false);
        }
        if rest.first()?.as_ref() != Some(item) {
            return Ok(false);
        }
        rest = rest.rest()?;
    }
    rest.is_empty()
}

/// View a value through the sequence protocol.
///
/// Returns None for nil and for empty collections ("no sequence"), and
/// a sequence positioned at the first element otherwise. Values with no
/// ordered traversal are a type error.
pub fn to_seq(value: &Value) -> Result<Option<SeqHandle>> {
    match value {
        Value::Nil => Ok(None),
        Value::List(list) => Ok(list.seq().map(SeqHandle::new)),
        Value::Seq(s) => {
            if s.is_empty()? {
                Ok(None)
            } else {
                Ok(Some(s.clone()))
            }
        }
        Value::Vector(v, _) => {
            if v.is_empty() {
                Ok(None)
            } else {
                Ok(Some(SeqHandle::new(EagerSeq::new(v.clone()))))
            }
        }
        Value::String(s) => {
            if s.is_empty() {
                Ok(None)
            } else {
                // Chars are collected once; UTF-8 has no positional
                // char access.
                let chars: Vec<Value> = s.chars().map(Value::Char).collect();
                Ok(Some(SeqHandle::new(EagerSeq::new(chars))))
            }
        }
        Value::Map(m, _) => {
            if m.is_empty() {
                Ok(None)
            } else {
                // Entries realize as [k v] pairs in key order.
                let entries: im::Vector<Value> = m
                    .iter()
                    .map(|(k, v)| Value::vector(vec![k.clone(), v.clone()]))
                    .collect();
                Ok(Some(SeqHandle::new(EagerSeq::new(entries))))
            }
        }
        other => Err(Error::type_error_in(
            "seq",
            "seqable collection",
            other.type_name(),
        )),
    }
}

/// Number of elements in a collection value.
///
/// Lists, vectors, and maps answer from their stored size; strings
/// count characters; nil counts as zero. A protocol sequence is walked,
/// which fully realizes it.
pub fn count(value: &Value) -> Result<usize> {
    match value {
        Value::Nil => Ok(0),
        Value::List(list) => Ok(list.len()),
        Value::Vector(v, _) => Ok(v.len()),
        Value::Map(m, _) => Ok(m.len()),
        Value::String(s) => Ok(s.chars().count()),
        Value::Seq(s) => s.count(),
        other => Err(Error::type_error_in(
            "count",
            "countable collection",
            other.type_name(),
        )),
    }
}
