/// Errors raised while running the encoding direction of a codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The host value has the wrong JSON kind for the codec.
    #[error("at {at}: expected {expected}, found {found}")]
    KindMismatch {
        at: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A required field has no value in the host record.
    #[error("at {at}: required key `{key}` is missing")]
    MissingKey { at: String, key: String },

    /// Neither side of an alternation could encode the value.
    #[error("at {at}: no alternative could encode the value")]
    NoAlternative { at: String },

    /// A mapping function rejected the value.
    #[error("at {at}: {message}")]
    Mapping { at: String, message: String },
}

/// Errors raised while reading a JSON Schema document.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// `type` names a kind this crate never emits.
    #[error("at {at}: unrecognized schema type `{found}`")]
    UnknownType { at: String, found: String },

    /// A known keyword holds a value of the wrong shape.
    #[error("at {at}: `{keyword}` must be {expected}")]
    Malformed {
        at: String,
        keyword: &'static str,
        expected: &'static str,
    },

    /// `anyOf` lists no alternatives, which no schema can represent.
    #[error("at {at}: `anyOf` lists no alternatives")]
    EmptyChoice { at: String },

    /// The text is not JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
