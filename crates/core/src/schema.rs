// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema descriptions and the generic validator
//!
//! Every slice is described once as a static [`Schema`]. The same schema is
//! interpreted at load time (is the stored JSON trustworthy?), at save time
//! (may this value be persisted?) and on import.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Shape of a single field
#[derive(Debug)]
pub enum FieldKind {
    Bool,
    Text,
    NonEmptyText,
    /// Non-negative integer
    Count,
    /// Non-negative finite number
    Number,
    /// String drawn from a fixed set
    Choice(&'static [&'static str]),
    /// Like `Choice`, but `null` is also accepted
    OptionalChoice(&'static [&'static str]),
    /// String or `null`
    OptionalText,
    List {
        item: &'static FieldKind,
        unique: Uniqueness,
    },
    Record(&'static Schema),
    /// Object keyed by non-negative integers (as decimal strings)
    IndexMap(&'static Schema),
}

/// Uniqueness constraint on list items
#[derive(Debug, Clone, Copy)]
pub enum Uniqueness {
    None,
    Values,
    ByField(&'static str),
}

/// A named field and its shape
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Static description of an object shape
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

/// One reason a value failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path to the offending value, rooted at the schema name
    pub path: String,
    pub reason: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Render a violation list for log messages
pub fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Schema {
    /// Check every field; a value is valid only if all of them pass
    pub fn validate(&self, value: &Value) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        self.check_record(value, self.name, &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    /// Salvage what is usable from `candidate`, filling the rest from `default`
    ///
    /// A candidate field is kept only when it passes its own rule, so an
    /// out-of-set choice is never copied over. Nested records are salvaged
    /// recursively, index maps keep their valid entries, and lists keep their
    /// valid items (the first of any duplicates). The merged value
    /// is validated again; if it still fails, `default` is returned.
    pub fn sanitize(&self, candidate: &Value, default: &Value) -> Value {
        let merged = self.merge_valid_fields(candidate, default);
        if self.is_valid(&merged) {
            merged
        } else {
            default.clone()
        }
    }

    fn merge_valid_fields(&self, candidate: &Value, default: &Value) -> Value {
        let Some(candidate) = candidate.as_object() else {
            return default.clone();
        };
        let mut merged = default.as_object().cloned().unwrap_or_default();

        for field in self.fields {
            let Some(value) = candidate.get(field.name) else {
                continue;
            };
            let salvaged = match &field.kind {
                FieldKind::Record(schema) => {
                    let base = merged.get(field.name).cloned().unwrap_or(Value::Null);
                    Some(schema.merge_valid_fields(value, &base))
                }
                FieldKind::IndexMap(schema) => {
                    value.as_object().map(|entries| salvage_entries(schema, entries))
                }
                FieldKind::List { item, unique } => value
                    .as_array()
                    .map(|items| salvage_items(item, *unique, items)),
                kind if kind.accepts(value) => Some(value.clone()),
                _ => None,
            };
            if let Some(salvaged) = salvaged {
                merged.insert(field.name.to_string(), salvaged);
            }
        }

        Value::Object(merged)
    }

    fn check_record(&self, value: &Value, path: &str, out: &mut Vec<Violation>) {
        let Some(object) = value.as_object() else {
            out.push(Violation::new(path, "expected an object"));
            return;
        };

        for field in self.fields {
            let field_path = format!("{}.{}", path, field.name);
            match object.get(field.name) {
                Some(value) => field.kind.check(value, &field_path, out),
                None if field.required => out.push(Violation::new(field_path, "missing")),
                None => {}
            }
        }
    }
}

fn salvage_items(item: &FieldKind, unique: Uniqueness, items: &[Value]) -> Value {
    let mut seen = HashSet::new();
    let kept = items
        .iter()
        .filter(|entry| item.accepts(entry))
        .filter(|entry| match identity(entry, unique) {
            Some(id) => seen.insert(id),
            None => true,
        })
        .cloned()
        .collect();
    Value::Array(kept)
}

fn salvage_entries(schema: &Schema, entries: &Map<String, Value>) -> Value {
    let kept = entries
        .iter()
        .filter(|(key, value)| key.parse::<u64>().is_ok() && schema.is_valid(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Value::Object(kept)
}

impl FieldKind {
    /// Whether `value` alone satisfies this field's rule
    pub fn accepts(&self, value: &Value) -> bool {
        let mut violations = Vec::new();
        self.check(value, "", &mut violations);
        violations.is_empty()
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) {
        match self {
            FieldKind::Bool => {
                if !value.is_boolean() {
                    out.push(Violation::new(path, "expected a boolean"));
                }
            }
            FieldKind::Text => {
                if !value.is_string() {
                    out.push(Violation::new(path, "expected a string"));
                }
            }
            FieldKind::NonEmptyText => match value.as_str() {
                Some(s) if !s.trim().is_empty() => {}
                _ => out.push(Violation::new(path, "expected a non-empty string")),
            },
            FieldKind::Count => {
                if value.as_u64().is_none() {
                    out.push(Violation::new(path, "expected a non-negative integer"));
                }
            }
            FieldKind::Number => match value.as_f64() {
                Some(n) if n.is_finite() && n >= 0.0 => {}
                _ => out.push(Violation::new(path, "expected a non-negative number")),
            },
            FieldKind::Choice(allowed) => check_choice(value, allowed, path, out),
            FieldKind::OptionalChoice(allowed) => {
                if !value.is_null() {
                    check_choice(value, allowed, path, out);
                }
            }
            FieldKind::OptionalText => {
                if !value.is_null() && !value.is_string() {
                    out.push(Violation::new(path, "expected a string or null"));
                }
            }
            FieldKind::List { item, unique } => {
                let Some(items) = value.as_array() else {
                    out.push(Violation::new(path, "expected a list"));
                    return;
                };
                for (index, entry) in items.iter().enumerate() {
                    item.check(entry, &format!("{}[{}]", path, index), out);
                }
                check_unique(items, *unique, path, out);
            }
            FieldKind::Record(schema) => schema.check_record(value, path, out),
            FieldKind::IndexMap(schema) => {
                let Some(entries) = value.as_object() else {
                    out.push(Violation::new(path, "expected an object"));
                    return;
                };
                for (key, entry) in entries {
                    let entry_path = format!("{}.{}", path, key);
                    if key.parse::<u64>().is_err() {
                        out.push(Violation::new(entry_path, "key is not a chapter index"));
                        continue;
                    }
                    schema.check_record(entry, &entry_path, out);
                }
            }
        }
    }
}

fn check_choice(value: &Value, allowed: &[&str], path: &str, out: &mut Vec<Violation>) {
    match value.as_str() {
        Some(s) if allowed.contains(&s) => {}
        _ => out.push(Violation::new(
            path,
            format!("expected one of {}", allowed.join("|")),
        )),
    }
}

/// What makes two list items duplicates; `None` when uniqueness is not checked
fn identity(item: &Value, unique: Uniqueness) -> Option<String> {
    match unique {
        Uniqueness::None => None,
        Uniqueness::Values => Some(item.to_string()),
        Uniqueness::ByField(field) => item.get(field).map(Value::to_string),
    }
}

fn check_unique(items: &[Value], unique: Uniqueness, path: &str, out: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for id in items.iter().filter_map(|item| identity(item, unique)) {
        if !seen.insert(id.clone()) {
            out.push(Violation::new(path, format!("duplicate entry {}", id)));
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
