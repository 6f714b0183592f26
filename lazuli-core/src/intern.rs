// lazuli-core - Shared name interner for keywords and symbols
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Name interning shared by the keyword and symbol types.
//!
//! Interning maps each distinct (namespace, name) pair to a single
//! shared allocation, so equality on interned names is a pointer
//! comparison and hashing is a pointer hash. Namespace and name
//! strings are deduplicated as well: `:user/a` and `:user/b` share one
//! `"user"` allocation.
//!
//! The table lives in thread-local storage. The value types built on
//! it are `Rc`-based and never leave their thread, so neither do their
//! names. Interned names are never released; programs use a bounded
//! set of keywords and symbols in practice.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

/// An interned (namespace, name) pair.
///
/// Two `Ident`s with the same namespace and name are always the same
/// allocation.
#[derive(Debug)]
pub(crate) struct Ident {
    pub(crate) namespace: Option<Rc<str>>,
    pub(crate) name: Rc<str>,
}

impl Ident {
    /// Order by namespace first, then name. No namespace sorts before
    /// any namespace.
    pub(crate) fn cmp_by_name(&self, other: &Self) -> Ordering {
        match (&self.namespace, &other.namespace) {
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => self.name.cmp(&other.name),
            (Some(a), Some(b)) => a.cmp(b).then_with(|| self.name.cmp(&other.name)),
        }
    }
}

thread_local! {
    static TABLE: RefCell<InternTable> = RefCell::new(InternTable::new());
}

struct InternTable {
    idents: HashMap<(Option<Rc<str>>, Rc<str>), Rc<Ident>>,
    strings: HashMap<String, Rc<str>>,
}

impl InternTable {
    fn new() -> Self {
        InternTable {
            idents: HashMap::new(),
            strings: HashMap::new(),
        }
    }

    fn intern_string(&mut self, s: &str) -> Rc<str> {
        if let Some(existing) = self.strings.get(s) {
            return Rc::clone(existing);
        }
        let shared: Rc<str> = Rc::from(s);
        self.strings.insert(s.to_owned(), Rc::clone(&shared));
        shared
    }

    fn intern(&mut self, namespace: Option<&str>, name: &str) -> Rc<Ident> {
        let namespace = namespace.map(|ns| self.intern_string(ns));
        let name = self.intern_string(name);
        let key = (namespace.clone(), Rc::clone(&name));
        if let Some(existing) = self.idents.get(&key) {
            return Rc::clone(existing);
        }
        let ident = Rc::new(Ident { namespace, name });
        self.idents.insert(key, Rc::clone(&ident));
        ident
    }
}

/// Intern a (namespace, name) pair, returning the shared instance.
pub(crate) fn intern(namespace: Option<&str>, name: &str) -> Rc<Ident> {
    TABLE.with(|table| table.borrow_mut().intern(namespace, name))
}
