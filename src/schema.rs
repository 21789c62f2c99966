//! Schema tree produced by derivation or by parsing a wire document.
//!
//! A `JsonSchema` owns its sub-schemas outright (no sharing, no cycles) and is
//! never mutated after construction. The structural rules below are not
//! enforced when building a tree; `is_well_formed` exists to check them from
//! tests.
use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonSchema {
    Any,                          // every value
    Null,
    Bool,
    String,
    Number,
    Array(Box<JsonSchema>),       // every element matches
    Object(Vec<ObjectField>),     // closed; order kept for documentation
    Const(Value),                 // exactly this value
    Choice(Vec<JsonSchema>),      // at least two alternatives
    Comment(String, Box<JsonSchema>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRequirement {
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub key: String,
    pub requirement: KeyRequirement,
    pub schema: JsonSchema,
}

impl ObjectField {
    pub fn required(key: impl Into<String>, schema: JsonSchema) -> Self {
        Self { key: key.into(), requirement: KeyRequirement::Required, schema }
    }
    pub fn optional(key: impl Into<String>, schema: JsonSchema) -> Self {
        Self { key: key.into(), requirement: KeyRequirement::Optional, schema }
    }
    pub fn is_required(&self) -> bool {
        self.requirement == KeyRequirement::Required
    }
}

/// One broken structural rule, located by a JSON pointer into the schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    NestedComment { at: String },
    DuplicateKey { at: String, key: String },
    ShortChoice { at: String, alternatives: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NestedComment { at } => write!(f, "{at}: comment wraps another comment"),
            Violation::DuplicateKey { at, key } => write!(f, "{at}: key `{key}` declared twice"),
            Violation::ShortChoice { at, alternatives } => {
                write!(f, "{at}: choice has {alternatives} alternative(s), needs at least 2")
            }
        }
    }
}

impl JsonSchema {
    pub fn array(element: JsonSchema) -> Self {
        JsonSchema::Array(Box::new(element))
    }

    pub fn comment(text: impl Into<String>, inner: JsonSchema) -> Self {
        JsonSchema::Comment(text.into(), Box::new(inner))
    }

    pub fn is_well_formed(&self) -> bool {
        self.well_formedness_violations().is_empty()
    }

    pub fn well_formedness_violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        collect_violations(self, &mut crate::pointer::Pointer::root(), &mut out);
        out
    }
}

fn collect_violations(
    schema: &JsonSchema,
    at: &mut crate::pointer::Pointer,
    out: &mut Vec<Violation>,
) {
    match schema {
        JsonSchema::Any
        | JsonSchema::Null
        | JsonSchema::Bool
        | JsonSchema::String
        | JsonSchema::Number
        | JsonSchema::Const(_) => {}
        JsonSchema::Array(element) => {
            at.with("items", |at| collect_violations(element, at, out));
        }
        JsonSchema::Object(fields) => {
            let mut seen = BTreeSet::new();
            for field in fields {
                if !seen.insert(field.key.as_str()) {
                    out.push(Violation::DuplicateKey { at: at.to_string(), key: field.key.clone() });
                }
            }
            at.with("properties", |at| {
                for field in fields {
                    at.with(&field.key, |at| collect_violations(&field.schema, at, out));
                }
            });
        }
        JsonSchema::Choice(alternatives) => {
            if alternatives.len() < 2 {
                out.push(Violation::ShortChoice { at: at.to_string(), alternatives: alternatives.len() });
            }
            at.with("anyOf", |at| {
                for (ix, alternative) in alternatives.iter().enumerate() {
                    at.with(&ix.to_string(), |at| collect_violations(alternative, at, out));
                }
            });
        }
        JsonSchema::Comment(_, inner) => {
            if matches!(**inner, JsonSchema::Comment(..)) {
                out.push(Violation::NestedComment { at: at.to_string() });
            }
            collect_violations(inner, at, out);
        }
    }
}

impl fmt::Display for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::wire::to_document(self))
    }
}

impl serde::Serialize for JsonSchema {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::wire::to_document(self).serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for JsonSchema {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = Value::deserialize(deserializer)?;
        crate::wire::from_document(&document).map_err(serde::de::Error::custom)
    }
}
