// lazuli-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared helpers for lazuli-core integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`kw`] - Build a keyword value
//! - [`int`] - Build an integer value
//! - [`string`] - Build a string value
//! - [`list`] - Build a persistent list from values
//! - [`int_list`] - Build a persistent list of integers
//! - [`meta_map`] - Build a metadata map from keyword/value pairs

#![allow(dead_code)]

use std::rc::Rc;

pub use lazuli_core::{Keyword, Meta, PersistentList, Value};

/// Build a bare keyword value.
#[must_use]
pub fn kw(name: &str) -> Value {
    Value::keyword(name)
}

/// Build an integer value.
#[must_use]
pub fn int(n: i64) -> Value {
    Value::int(n)
}

/// Build a string value.
#[must_use]
pub fn string(s: &str) -> Value {
    Value::string(s)
}

/// Build a persistent list from values.
#[must_use]
pub fn list(items: Vec<Value>) -> PersistentList {
    items.into_iter().collect()
}

/// Build a persistent list of integers.
#[must_use]
pub fn int_list(ns: &[i64]) -> PersistentList {
    ns.iter().copied().map(Value::int).collect()
}

/// Build a metadata map from keyword-name/value pairs.
#[must_use]
pub fn meta_map(entries: &[(&str, Value)]) -> Rc<Meta> {
    Rc::new(
        entries
            .iter()
            .map(|(name, value)| (kw(name), value.clone()))
            .collect(),
    )
}
