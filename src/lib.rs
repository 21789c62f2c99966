//! JSON Schema from codec descriptions.
//!
//! Describe once how a value becomes JSON (`codec`), then:
//! - derive the schema of everything it can produce (`derive`),
//! - write and read that schema as a JSON Schema document (`wire`),
//! - check arbitrary JSON values against a schema (`validate`).
pub mod catalog;
pub mod codec;
pub mod derive;
pub mod error;
pub mod pointer;
pub mod schema;
pub mod validate;
pub mod wire;

pub use codec::{Codec, ObjectCodec};
pub use derive::derive_schema;
pub use error::{CodecError, WireError};
pub use schema::{JsonSchema, KeyRequirement, ObjectField};
pub use validate::{check, validate, Mismatch};
