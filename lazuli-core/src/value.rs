// lazuli-core - Core value representation for the lazuli runtime
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value types for the lazuli runtime.
//!
//! [`Value`] is the element universe the persistent list and the
//! sequence protocol traffic in. Collections nest freely: a list can
//! hold vectors, maps, lazy sequences, or any other value. Metadata
//! attaches to the collection variants and is excluded from equality,
//! ordering, and hashing throughout.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::rc::Rc;

use im::{OrdMap, Vector};

use crate::keyword::Keyword;
use crate::list::PersistentList;
use crate::seq::{self, Seq, SeqHandle};
use crate::symbol::Symbol;

// Thread-local print settings (can be configured by the host)
thread_local! {
    /// Maximum number of sequence elements to print.
    /// None means unlimited, Some(n) prints at most n elements.
    static PRINT_LENGTH: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Get the current print-length setting.
pub fn get_print_length() -> Option<usize> {
    PRINT_LENGTH.with(|pl| pl.get())
}

/// Set the print-length setting, returning the previous value.
pub fn set_print_length(len: Option<usize>) -> Option<usize> {
    PRINT_LENGTH.with(|pl| pl.replace(len))
}

/// Metadata map attachable to collection values.
pub type Meta = OrdMap<Value, Value>;

/// A value in the lazuli runtime.
#[derive(Clone)]
pub enum Value {
    /// The absence of a value
    Nil,
    /// Boolean true/false
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Unicode character
    Char(char),
    /// Immutable string
    String(Rc<str>),
    /// Identifier, optionally namespaced
    Symbol(Symbol),
    /// Self-evaluating identifier, optionally namespaced
    Keyword(Keyword),
    /// Persistent cons list (carries its own metadata)
    List(PersistentList),
    /// Persistent vector with optional metadata
    Vector(Vector<Value>, Option<Rc<Meta>>),
    /// Persistent sorted map with optional metadata
    Map(OrdMap<Value, Value>, Option<Rc<Meta>>),
    /// Any sequence-protocol value: cons cells, eager, cached-iterator,
    /// and lazy sequences
    Seq(SeqHandle),
}

impl Value {
    /// Create a nil value.
    pub fn nil() -> Self {
        Value::Nil
    }

    /// Create a boolean value.
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an integer value.
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create a float value.
    pub fn float(x: f64) -> Self {
        Value::Float(x)
    }

    /// Create a character value.
    pub fn char(c: char) -> Self {
        Value::Char(c)
    }

    /// Create a string value.
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    /// Create a bare keyword value.
    pub fn keyword(name: &str) -> Self {
        Value::Keyword(Keyword::new(name))
    }

    /// Create a bare symbol value.
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    /// Create the empty list.
    pub fn empty_list() -> Self {
        Value::List(PersistentList::new())
    }

    /// Create a list from elements.
    pub fn list(elements: Vec<Value>) -> Self {
        Value::List(elements.into_iter().collect())
    }

    /// Create a list from elements with metadata attached.
    pub fn list_with_meta(elements: Vec<Value>, meta: Rc<Meta>) -> Self {
        let list: PersistentList = elements.into_iter().collect();
        Value::List(list.with_meta(Some(meta)))
    }

    /// Create a vector from elements.
    pub fn vector(elements: Vec<Value>) -> Self {
        Value::Vector(elements.into_iter().collect(), None)
    }

    /// Create a vector from elements with metadata attached.
    pub fn vector_with_meta(elements: Vec<Value>, meta: Rc<Meta>) -> Self {
        Value::Vector(elements.into_iter().collect(), Some(meta))
    }

    /// Create a map from key/value pairs.
    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(entries.into_iter().collect(), None)
    }

    /// Create a map from key/value pairs with metadata attached.
    pub fn map_with_meta(entries: Vec<(Value, Value)>, meta: Rc<Meta>) -> Self {
        Value::Map(entries.into_iter().collect(), Some(meta))
    }

    /// Wrap a concrete sequence as a value.
    pub fn seq(seq: impl Seq + 'static) -> Self {
        Value::Seq(SeqHandle::new(seq))
    }

    /// Check if this value is nil.
    #[inline]
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Truthiness: only nil and false are falsy. Empty collections,
    /// zero, and the empty string are all truthy.
    #[inline]
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// The name of this value's type, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::List(_) => "list",
            Value::Vector(..) => "vector",
            Value::Map(..) => "map",
            Value::Seq(_) => "seq",
        }
    }

    /// Get this value's metadata, if the value supports metadata and
    /// has any attached.
    #[must_use]
    pub fn meta(&self) -> Option<&Rc<Meta>> {
        match self {
            Value::List(list) => list.meta(),
            Value::Vector(_, meta) | Value::Map(_, meta) => meta.as_ref(),
            _ => None,
        }
    }

    /// Whether this value can carry metadata.
    #[must_use]
    pub fn supports_meta(&self) -> bool {
        matches!(self, Value::List(_) | Value::Vector(..) | Value::Map(..))
    }

    /// The same value with different metadata, or None if this value
    /// does not support metadata. The result compares equal to the
    /// receiver.
    #[must_use]
    pub fn with_meta(&self, meta: Option<Rc<Meta>>) -> Option<Value> {
        match self {
            Value::List(list) => Some(Value::List(list.with_meta(meta))),
            Value::Vector(v, _) => Some(Value::Vector(v.clone(), meta)),
            Value::Map(m, _) => Some(Value::Map(m.clone(), meta)),
            _ => None,
        }
    }
}

// =============================================================================
// Display
// =============================================================================

fn format_char(c: char) -> String {
    match c {
        '\n' => "\\newline".to_string(),
        '\t' => "\\tab".to_string(),
        '\r' => "\\return".to_string(),
        ' ' => "\\space".to_string(),
        _ => format!("\\{}", c),
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => {
                if x.is_nan() {
                    write!(f, "##NaN")
                } else if x.is_infinite() {
                    if *x > 0.0 {
                        write!(f, "##Inf")
                    } else {
                        write!(f, "##-Inf")
                    }
                } else if x.fract() == 0.0 {
                    write!(f, "{}.0", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Char(c) => write!(f, "{}", format_char(*c)),
            Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::Keyword(kw) => write!(f, "{}", kw),
            Value::List(list) => write!(f, "{}", list),
            Value::Vector(v, _) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(m, _) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Seq(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

// =============================================================================
// Equality, Ordering, Hashing
// =============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        // Note: Metadata is intentionally ignored in equality comparisons.
        // Sequence arms traverse through the protocol; a forcing failure
        // reads as not-equal here (seq_equal is the fallible form).
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64).to_bits() == b.to_bits()
            }
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Vector(a, _), Value::Vector(b, _)) => a == b,
            (Value::Map(a, _), Value::Map(b, _)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::List(a), Value::Seq(b)) | (Value::Seq(b), Value::List(a)) => {
                seq::list_seq_equal(a, b).unwrap_or(false)
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        fn type_order(value: &Value) -> u8 {
            match value {
                Value::Nil => 0,
                Value::Bool(_) => 1,
                Value::Int(_) | Value::Float(_) => 2,
                Value::Char(_) => 3,
                Value::String(_) => 4,
                Value::Symbol(_) => 5,
                Value::Keyword(_) => 6,
                Value::List(_) => 7,
                Value::Vector(..) => 8,
                Value::Map(..) => 9,
                Value::Seq(_) => 10,
            }
        }

        let (ta, tb) = (type_order(self), type_order(other));
        if ta != tb {
            return ta.cmp(&tb);
        }
        match (self, other) {
            (Value::Nil, Value::Nil) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Value::Int(a), Value::Float(b)) => {
                (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Value::Float(a), Value::Int(b)) => {
                a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
            }
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Symbol(a), Value::Symbol(b)) => a.cmp(b),
            (Value::Keyword(a), Value::Keyword(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Vector(a, _), Value::Vector(b, _)) => a.cmp(b),
            (Value::Map(a, _), Value::Map(b, _)) => a.iter().cmp(b.iter()),
            // Sequence handles order by identity; see SeqHandle's Ord.
            (Value::Seq(a), Value::Seq(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Metadata is intentionally ignored in hashing, matching equality.
        // Lists and protocol sequences hash by their elements alone so
        // that cross-variant sequence equality stays hash-consistent.
        match self {
            Value::List(list) => list.hash(state),
            Value::Seq(s) => s.hash(state),
            Value::Nil => mem::discriminant(self).hash(state),
            Value::Bool(b) => {
                mem::discriminant(self).hash(state);
                b.hash(state);
            }
            Value::Int(n) => {
                mem::discriminant(self).hash(state);
                n.hash(state);
            }
            Value::Float(x) => {
                mem::discriminant(self).hash(state);
                x.to_bits().hash(state);
            }
            Value::Char(c) => {
                mem::discriminant(self).hash(state);
                c.hash(state);
            }
            Value::String(s) => {
                mem::discriminant(self).hash(state);
                s.hash(state);
            }
            Value::Symbol(sym) => {
                mem::discriminant(self).hash(state);
                sym.hash(state);
            }
            Value::Keyword(kw) => {
                mem::discriminant(self).hash(state);
                kw.hash(state);
            }
            Value::Vector(v, _) => {
                mem::discriminant(self).hash(state);
                for item in v {
                    item.hash(state);
                }
            }
            Value::Map(m, _) => {
                mem::discriminant(self).hash(state);
                for (k, v) in m {
                    k.hash(state);
                    v.hash(state);
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
