// lazuli-core - Serialization support for core values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! serde round-trips for values and lists.
//!
//! Values serialize through a tagged mirror type so every variant
//! survives a generic format: ints stay ints, keywords stay keywords.
//! Metadata is not serialized. A protocol sequence serializes as the
//! list of its realized elements; if realizing fails, serialization
//! reports the failure as a serde error.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::Result;
use crate::keyword::Keyword;
use crate::list::PersistentList;
use crate::symbol::Symbol;
use crate::value::Value;

/// Self-describing wire form of a value.
#[derive(serde::Serialize, serde::Deserialize)]
enum Repr {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    Keyword(Option<String>, String),
    Symbol(Option<String>, String),
    List(Vec<Repr>),
    Vector(Vec<Repr>),
    Map(Vec<(Repr, Repr)>),
}

impl Repr {
    fn of_value(value: &Value) -> Result<Repr> {
        Ok(match value {
            Value::Nil => Repr::Nil,
            Value::Bool(b) => Repr::Bool(*b),
            Value::Int(n) => Repr::Int(*n),
            Value::Float(x) => Repr::Float(*x),
            Value::Char(c) => Repr::Char(*c),
            Value::String(s) => Repr::Str(s.to_string()),
            Value::Keyword(kw) => {
                Repr::Keyword(kw.namespace().map(str::to_owned), kw.name().to_owned())
            }
            Value::Symbol(sym) => {
                Repr::Symbol(sym.namespace().map(str::to_owned), sym.name().to_owned())
            }
            Value::List(list) => Repr::List(Self::of_list(list)?),
            Value::Vector(v, _) => Repr::Vector(v.iter().map(Self::of_value).collect::<Result<_>>()?),
            Value::Map(m, _) => Repr::Map(
                m.iter()
                    .map(|(k, v)| Ok((Self::of_value(k)?, Self::of_value(v)?)))
                    .collect::<Result<_>>()?,
            ),
            // Realizes the sequence; a lazy tail that fails surfaces here.
            Value::Seq(s) => Repr::List(
                s.iter()
                    .map(|item| Self::of_value(&item?))
                    .collect::<Result<_>>()?,
            ),
        })
    }

    fn of_list(list: &PersistentList) -> Result<Vec<Repr>> {
        list.iter().map(Self::of_value).collect()
    }

    fn into_value(self) -> Value {
        match self {
            Repr::Nil => Value::Nil,
            Repr::Bool(b) => Value::Bool(b),
            Repr::Int(n) => Value::Int(n),
            Repr::Float(x) => Value::Float(x),
            Repr::Char(c) => Value::Char(c),
            Repr::Str(s) => Value::string(s),
            Repr::Keyword(ns, name) => Value::Keyword(match ns {
                Some(ns) => Keyword::with_namespace(&ns, &name),
                None => Keyword::new(&name),
            }),
            Repr::Symbol(ns, name) => Value::Symbol(match ns {
                Some(ns) => Symbol::with_namespace(&ns, &name),
                None => Symbol::new(&name),
            }),
            Repr::List(items) => Value::List(items.into_iter().map(Repr::into_value).collect()),
            Repr::Vector(items) => {
                Value::Vector(items.into_iter().map(Repr::into_value).collect(), None)
            }
            Repr::Map(pairs) => Value::Map(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into_value(), v.into_value()))
                    .collect(),
                None,
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Repr::of_value(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Repr::deserialize(deserializer)?.into_value())
    }
}

impl Serialize for PersistentList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Repr::of_list(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PersistentList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let items = Vec::<Repr>::deserialize(deserializer)?;
        Ok(items.into_iter().map(Repr::into_value).collect())
    }
}
