// lazuli-core - Keyword type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Keywords are self-evaluating identifiers with optional namespaces.
//!
//! # Interning
//!
//! Keywords are interned through the shared name table: two keywords
//! with the same namespace and name are the same allocation, so
//! equality is a pointer comparison and hashing is a pointer hash.
//! Ordering still compares namespaces and names so keywords sort
//! usefully inside ordered maps.
//!
//! # Memory Behaviour
//!
//! Interned names live for the life of the thread. Programs use a
//! bounded set of keywords, so the table only grows while new names
//! keep appearing.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::intern::{Ident, intern};

/// A keyword with an optional namespace. Prints with a leading `:`.
#[derive(Clone)]
pub struct Keyword {
    inner: Rc<Ident>,
}

impl Keyword {
    /// Create a keyword with no namespace.
    pub fn new(name: &str) -> Self {
        Keyword {
            inner: intern(None, name),
        }
    }

    /// Create a keyword with a namespace.
    pub fn with_namespace(namespace: &str, name: &str) -> Self {
        Keyword {
            inner: intern(Some(namespace), name),
        }
    }

    /// Get the namespace, if any.
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.inner.namespace.as_deref()
    }

    /// Get the name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Check whether this keyword has a namespace.
    #[inline]
    #[must_use]
    pub fn has_namespace(&self) -> bool {
        self.inner.namespace.is_some()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace() {
            Some(ns) => write!(f, ":{}/{}", ns, self.name()),
            None => write!(f, ":{}", self.name()),
        }
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword({})", self)
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        // Interning makes pointer equality sufficient.
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Keyword {}

impl PartialOrd for Keyword {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Keyword {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp_by_name(&other.inner)
    }
}

impl Hash for Keyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.inner).hash(state);
    }
}

// =============================================================================
// Tests
// =============================================================================
