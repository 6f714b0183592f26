// lazuli-core - Persistent list and sequence core for the lazuli runtime
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Immutable data core for the lazuli runtime: a persistent cons list,
//! a uniform sequence protocol, and the eager, cached-iterator, and
//! lazy producers that feed it.
//!
//! Everything here is a value. "Modifying" a collection returns a new
//! one that shares structure with the old, and clones of a sequence
//! share its realization state. Equality, ordering, and hashing ignore
//! metadata throughout.
//!
//! The sequence protocol ([`Seq`]) is the single traversal surface;
//! [`sequence`] and [`iterator_sequence`] bring external collections
//! into it, and [`to_seq`] views existing values through it.

mod codec;
pub mod eager;
pub mod error;
mod intern;
pub mod iterator;
pub mod keyword;
pub mod lazy;
pub mod list;
pub mod seq;
pub mod symbol;
pub mod value;

pub use eager::{EagerSeq, Iterable, Reiterable, sequence};
pub use error::{Error, Result};
pub use iterator::{IteratorSeq, iterator_sequence};
pub use keyword::Keyword;
pub use lazy::LazySeq;
pub use list::PersistentList;
pub use seq::{Cons, Seq, SeqHandle, SeqIter, SeqPeek, count, seq_equal, to_seq};
pub use symbol::Symbol;
pub use value::{Meta, Value, get_print_length, set_print_length};

// The persistent collections backing the vector and map variants.
pub use im::{OrdMap, Vector};
