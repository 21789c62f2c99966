//! Codec descriptions: how a host value converts to JSON.
//!
//! Host values are carried dynamically as `serde_json::Value`. Only the
//! encoding direction is executed here; schema derivation walks the same tree
//! in `crate::derive`.
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{kind_name, CodecError};
use crate::pointer::Pointer;

/// Host-side projection applied before the inner codec encodes.
pub type EncodeFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

#[derive(Clone)]
pub enum Codec {
    /// Any JSON value, passed through untouched.
    Value,
    Null,
    Bool,
    String,
    Number,
    Array {
        element: Box<Codec>,
        name: Option<String>,
    },
    Object {
        fields: ObjectCodec,
        name: Option<String>,
    },
    /// Always encodes `literal` through `codec`.
    Equal {
        literal: Value,
        codec: Box<Codec>,
    },
    Map {
        encode: EncodeFn,
        inner: Box<Codec>,
    },
    Either(Box<Codec>, Box<Codec>),
    /// Decodes with `inner`, retrying with `alternative`; encodes with `inner`.
    Fallback {
        inner: Box<Codec>,
        alternative: Box<Codec>,
    },
    Comment {
        text: String,
        inner: Box<Codec>,
    },
}

#[derive(Clone)]
pub enum ObjectCodec {
    Required { key: String, codec: Box<Codec> },
    Optional { key: String, codec: Box<Codec> },
    Map { encode: EncodeFn, inner: Box<ObjectCodec> },
    /// Consumes no keys.
    Pure(Value),
    /// Both sides contribute keys, left first.
    Ap(Box<ObjectCodec>, Box<ObjectCodec>),
}

// ————————————————————————————————————————————————————————————————————————————
// BUILDERS
// ————————————————————————————————————————————————————————————————————————————

impl Codec {
    pub fn value() -> Self {
        Codec::Value
    }

    pub fn null() -> Self {
        Codec::Null
    }

    pub fn bool() -> Self {
        Codec::Bool
    }

    pub fn string() -> Self {
        Codec::String
    }

    pub fn number() -> Self {
        Codec::Number
    }

    pub fn array_of(element: Codec) -> Self {
        Codec::Array { element: Box::new(element), name: None }
    }

    pub fn object(fields: ObjectCodec) -> Self {
        Codec::Object { fields, name: None }
    }

    pub fn literal(literal: impl Into<Value>, codec: Codec) -> Self {
        Codec::Equal { literal: literal.into(), codec: Box::new(codec) }
    }

    pub fn either(left: Codec, right: Codec) -> Self {
        Codec::Either(Box::new(left), Box::new(right))
    }

    /// Right-nested alternation over every codec given; `None` when empty.
    pub fn one_of(codecs: impl IntoIterator<Item = Codec>) -> Option<Self> {
        let mut codecs: Vec<Codec> = codecs.into_iter().collect();
        let mut acc = codecs.pop()?;
        while let Some(next) = codecs.pop() {
            acc = Codec::either(next, acc);
        }
        Some(acc)
    }

    pub fn map<F>(self, encode: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Codec::Map { encode: Arc::new(encode), inner: Box::new(self) }
    }

    pub fn fallback(self, alternative: Codec) -> Self {
        Codec::Fallback { inner: Box::new(self), alternative: Box::new(alternative) }
    }

    pub fn comment(self, text: impl Into<String>) -> Self {
        Codec::Comment { text: text.into(), inner: Box::new(self) }
    }

    /// Name an array or object codec; other codecs are returned unchanged.
    pub fn named(self, name: impl Into<String>) -> Self {
        match self {
            Codec::Array { element, .. } => Codec::Array { element, name: Some(name.into()) },
            Codec::Object { fields, .. } => Codec::Object { fields, name: Some(name.into()) },
            other => other,
        }
    }
}

impl ObjectCodec {
    pub fn required(key: impl Into<String>, codec: Codec) -> Self {
        ObjectCodec::Required { key: key.into(), codec: Box::new(codec) }
    }

    pub fn optional(key: impl Into<String>, codec: Codec) -> Self {
        ObjectCodec::Optional { key: key.into(), codec: Box::new(codec) }
    }

    pub fn pure(value: impl Into<Value>) -> Self {
        ObjectCodec::Pure(value.into())
    }

    pub fn and(self, right: ObjectCodec) -> Self {
        ObjectCodec::Ap(Box::new(self), Box::new(right))
    }

    pub fn map<F>(self, encode: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        ObjectCodec::Map { encode: Arc::new(encode), inner: Box::new(self) }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENCODING
// ————————————————————————————————————————————————————————————————————————————

impl Codec {
    pub fn encode(&self, host: &Value) -> Result<Value, CodecError> {
        self.encode_at(host, &mut Pointer::root())
    }

    fn encode_at(&self, host: &Value, at: &mut Pointer) -> Result<Value, CodecError> {
        match self {
            Codec::Value => Ok(host.clone()),
            Codec::Null => expect_kind(host, at, "null", Value::is_null),
            Codec::Bool => expect_kind(host, at, "boolean", Value::is_boolean),
            Codec::String => expect_kind(host, at, "string", Value::is_string),
            Codec::Number => expect_kind(host, at, "number", Value::is_number),
            Codec::Array { element, .. } => {
                let Value::Array(items) = host else {
                    return Err(mismatch(host, at, "array"));
                };
                items
                    .iter()
                    .enumerate()
                    .map(|(ix, item)| at.with(&ix.to_string(), |at| element.encode_at(item, at)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Codec::Object { fields, .. } => {
                let mut out = Map::new();
                fields.encode_into(host, at, &mut out)?;
                Ok(Value::Object(out))
            }
            Codec::Equal { literal, codec } => codec.encode_at(literal, at),
            Codec::Map { encode, inner } => {
                let mapped = apply(encode, host, at)?;
                inner.encode_at(&mapped, at)
            }
            Codec::Either(left, right) => left
                .encode_at(host, at)
                .or_else(|_| right.encode_at(host, at))
                .map_err(|_| CodecError::NoAlternative { at: at.to_string() }),
            Codec::Fallback { inner, .. } => inner.encode_at(host, at),
            Codec::Comment { inner, .. } => inner.encode_at(host, at),
        }
    }
}

impl ObjectCodec {
    fn encode_into(&self, host: &Value, at: &mut Pointer, out: &mut Map<String, Value>) -> Result<(), CodecError> {
        match self {
            ObjectCodec::Required { key, codec } => {
                let value = record(host, at)?
                    .get(key)
                    .ok_or_else(|| CodecError::MissingKey { at: at.to_string(), key: key.clone() })?;
                let encoded = at.with(key, |at| codec.encode_at(value, at))?;
                out.insert(key.clone(), encoded);
                Ok(())
            }
            ObjectCodec::Optional { key, codec } => {
                match record(host, at)?.get(key) {
                    None | Some(Value::Null) => {}
                    Some(value) => {
                        let encoded = at.with(key, |at| codec.encode_at(value, at))?;
                        out.insert(key.clone(), encoded);
                    }
                }
                Ok(())
            }
            ObjectCodec::Map { encode, inner } => {
                let mapped = apply(encode, host, at)?;
                inner.encode_into(&mapped, at, out)
            }
            ObjectCodec::Pure(_) => Ok(()),
            ObjectCodec::Ap(left, right) => {
                left.encode_into(host, at, out)?;
                right.encode_into(host, at, out)
            }
        }
    }
}

fn expect_kind(host: &Value, at: &Pointer, expected: &'static str, test: fn(&Value) -> bool) -> Result<Value, CodecError> {
    if test(host) {
        Ok(host.clone())
    } else {
        Err(mismatch(host, at, expected))
    }
}

fn record<'a>(host: &'a Value, at: &Pointer) -> Result<&'a Map<String, Value>, CodecError> {
    host.as_object().ok_or_else(|| mismatch(host, at, "object"))
}

fn mismatch(host: &Value, at: &Pointer, expected: &'static str) -> CodecError {
    CodecError::KindMismatch { at: at.to_string(), expected, found: kind_name(host) }
}

fn apply(encode: &EncodeFn, host: &Value, at: &Pointer) -> Result<Value, CodecError> {
    encode(host).map_err(|message| CodecError::Mapping { at: at.to_string(), message })
}

// ————————————————————————————————————————————————————————————————————————————
// DEBUG
// ————————————————————————————————————————————————————————————————————————————

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Value => f.write_str("Value"),
            Codec::Null => f.write_str("Null"),
            Codec::Bool => f.write_str("Bool"),
            Codec::String => f.write_str("String"),
            Codec::Number => f.write_str("Number"),
            Codec::Array { element, name } => {
                f.debug_struct("Array").field("element", element).field("name", name).finish()
            }
            Codec::Object { fields, name } => {
                f.debug_struct("Object").field("fields", fields).field("name", name).finish()
            }
            Codec::Equal { literal, codec } => {
                f.debug_struct("Equal").field("literal", literal).field("codec", codec).finish()
            }
            Codec::Map { inner, .. } => f.debug_struct("Map").field("inner", inner).finish_non_exhaustive(),
            Codec::Either(left, right) => f.debug_tuple("Either").field(left).field(right).finish(),
            Codec::Fallback { inner, alternative } => f
                .debug_struct("Fallback")
                .field("inner", inner)
                .field("alternative", alternative)
                .finish(),
            Codec::Comment { text, inner } => {
                f.debug_struct("Comment").field("text", text).field("inner", inner).finish()
            }
        }
    }
}

impl fmt::Debug for ObjectCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectCodec::Required { key, codec } => {
                f.debug_struct("Required").field("key", key).field("codec", codec).finish()
            }
            ObjectCodec::Optional { key, codec } => {
                f.debug_struct("Optional").field("key", key).field("codec", codec).finish()
            }
            ObjectCodec::Map { inner, .. } => f.debug_struct("Map").field("inner", inner).finish_non_exhaustive(),
            ObjectCodec::Pure(value) => f.debug_tuple("Pure").field(value).finish(),
            ObjectCodec::Ap(left, right) => f.debug_tuple("Ap").field(left).field(right).finish(),
        }
    }
}
