// lazuli-core - Persistent singly-linked list
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The persistent cons list at the heart of the runtime.
//!
//! Lists are immutable chains of reference-counted nodes. `cons` shares
//! the entire receiver as the tail of the result, so prepending is O(1)
//! and lists built from a common tail share that structure. Every node
//! caches the length of the chain it heads, making `len` O(1).
//!
//! The empty list allocates nothing; every empty list is the canonical
//! empty. Metadata attaches to the list as a whole, propagates through
//! `cons` and `empty`, and never participates in equality, ordering, or
//! hashing.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::seq::{Seq, SeqHandle, SeqPeek};
use crate::value::{Meta, Value};

/// Immutable cons list with O(1) prepend and cached length.
#[derive(Clone)]
pub struct PersistentList {
    node: Option<Rc<Node>>,
    meta: Option<Rc<Meta>>,
}

struct Node {
    head: Value,
    tail: Option<Rc<Node>>,
    len: usize,
}

impl PersistentList {
    /// The canonical empty list.
    pub const fn new() -> Self {
        PersistentList {
            node: None,
            meta: None,
        }
    }

    /// Number of elements. O(1) from the cached node length.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.node.as_ref().map_or(0, |node| node.len)
    }

    /// Check if the list is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// Prepend an element. The receiver becomes the tail of the result,
    /// unchanged and fully shared; the result inherits the receiver's
    /// metadata.
    #[must_use]
    pub fn cons(&self, item: Value) -> Self {
        PersistentList {
            node: Some(Rc::new(Node {
                head: item,
                tail: self.node.clone(),
                len: self.len() + 1,
            })),
            meta: self.meta.clone(),
        }
    }

    /// Prepend each element in turn, so the last item given ends up at
    /// the head of the result.
    #[must_use]
    pub fn cons_all(&self, items: impl IntoIterator<Item = Value>) -> Self {
        items
            .into_iter()
            .fold(self.clone(), |list, item| list.cons(item))
    }

    /// The first element, or None when empty. Total: never fails.
    #[must_use]
    pub fn peek(&self) -> Option<&Value> {
        self.node.as_ref().map(|node| &node.head)
    }

    /// The list without its first element.
    ///
    /// Fails with an out-of-range error on the empty list. `peek` and
    /// `pop` are deliberately asymmetric: peeking nothing is an answer,
    /// removing nothing is a mistake.
    pub fn pop(&self) -> Result<Self> {
        match &self.node {
            Some(node) => Ok(PersistentList {
                node: node.tail.clone(),
                meta: None,
            }),
            None => Err(Error::out_of_range("pop", 0)),
        }
    }

    /// The tail of the list. The empty list's rest is itself.
    #[must_use]
    pub fn rest(&self) -> Self {
        match &self.node {
            Some(node) => PersistentList {
                node: node.tail.clone(),
                meta: None,
            },
            None => PersistentList::new(),
        }
    }

    /// The list itself if non-empty, else None. Distinguishes "empty
    /// collection" from "no sequence" for protocol consumers.
    #[must_use]
    pub fn seq(&self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self.clone())
        }
    }

    /// The list's metadata, if any.
    #[must_use]
    pub fn meta(&self) -> Option<&Rc<Meta>> {
        self.meta.as_ref()
    }

    /// The same list (all nodes shared) with different metadata. The
    /// result compares equal to the receiver.
    #[must_use]
    pub fn with_meta(&self, meta: Option<Rc<Meta>>) -> Self {
        PersistentList {
            node: self.node.clone(),
            meta,
        }
    }

    /// An empty list carrying this list's metadata.
    #[must_use]
    pub fn empty(&self) -> Self {
        PersistentList {
            node: None,
            meta: self.meta.clone(),
        }
    }

    /// The sublist after the first `n` elements, sharing the remaining
    /// nodes. Past the end, the empty list.
    #[must_use]
    pub fn skip(&self, n: usize) -> Self {
        let mut cur = &self.node;
        for _ in 0..n {
            match cur {
                Some(node) => cur = &node.tail,
                None => break,
            }
        }
        PersistentList {
            node: cur.clone(),
            meta: None,
        }
    }

    /// The first `n` elements as a new list. The tail differs, so no
    /// structure can be shared and the prefix is rebuilt.
    #[must_use]
    pub fn take(&self, n: usize) -> Self {
        self.iter().take(n).cloned().collect()
    }

    /// Borrowing iterator over the elements.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            node: self.node.as_deref(),
        }
    }
}

impl Default for PersistentList {
    fn default() -> Self {
        PersistentList::new()
    }
}

impl Drop for PersistentList {
    fn drop(&mut self) {
        // Unlink exclusively-owned nodes iteratively so dropping a long
        // chain cannot overflow the stack.
        let mut node = self.node.take();
        while let Some(rc) = node {
            match Rc::try_unwrap(rc) {
                Ok(mut inner) => node = inner.tail.take(),
                Err(_) => break,
            }
        }
    }
}

// =============================================================================
// Iteration
// =============================================================================

/// Borrowing iterator over a list's elements.
pub struct Iter<'a> {
    node: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node?;
        self.node = node.tail.as_deref();
        Some(&node.head)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.node.map_or(0, |node| node.len);
        (len, Some(len))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a PersistentList {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Owning iterator; elements are cloned out of the shared nodes.
pub struct IntoIter {
    node: Option<Rc<Node>>,
}

impl Iterator for IntoIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let node = self.node.take()?;
        self.node = node.tail.clone();
        Some(node.head.clone())
    }
}

impl Drop for IntoIter {
    fn drop(&mut self) {
        // Same iterative unlink as the list itself; a half-consumed
        // iterator may hold the only reference to a long chain.
        let mut node = self.node.take();
        while let Some(rc) = node {
            match Rc::try_unwrap(rc) {
                Ok(mut inner) => node = inner.tail.take(),
                Err(_) => break,
            }
        }
    }
}

impl IntoIterator for PersistentList {
    type Item = Value;
    type IntoIter = IntoIter;

    fn into_iter(mut self) -> IntoIter {
        IntoIter {
            node: self.node.take(),
        }
    }
}

impl FromIterator<Value> for PersistentList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let elements: Vec<Value> = iter.into_iter().collect();
        let mut node: Option<Rc<Node>> = None;
        let mut len = 0;
        for head in elements.into_iter().rev() {
            len += 1;
            node = Some(Rc::new(Node {
                head,
                tail: node,
                len,
            }));
        }
        PersistentList { node, meta: None }
    }
}

// =============================================================================
// Equality, Ordering, Hashing, Display
// =============================================================================

impl PartialEq for PersistentList {
    fn eq(&self, other: &Self) -> bool {
        // Metadata is intentionally ignored: lists are equal iff their
        // elements are pairwise equal.
        if self.len() != other.len() {
            return false;
        }
        self.iter().eq(other.iter())
    }
}

impl Eq for PersistentList {}

impl PartialOrd for PersistentList {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PersistentList {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl Hash for PersistentList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Elements only: consistent with metadata-ignoring equality and
        // with how protocol sequences hash.
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl fmt::Display for PersistentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for PersistentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

// =============================================================================
// Sequence protocol
// =============================================================================

impl Seq for PersistentList {
    fn first(&self) -> Result<Option<Value>> {
        Ok(self.peek().cloned())
    }

    fn rest(&self) -> Result<SeqHandle> {
        Ok(SeqHandle::new(PersistentList::rest(self)))
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.node.is_none())
    }

    fn cons(&self, item: Value) -> SeqHandle {
        SeqHandle::new(PersistentList::cons(self, item))
    }

    fn probe(&self) -> SeqPeek {
        match &self.node {
            Some(node) => SeqPeek::Cons(
                node.head.clone(),
                SeqHandle::new(PersistentList::rest(self)),
            ),
            None => SeqPeek::Empty,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
