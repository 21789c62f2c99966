//! JSON Schema documents: `JsonSchema` to and from the wire format.
//!
//! Only the keywords this crate emits are understood: `type`, `items`,
//! `properties`, `required`, `const`, `anyOf` and `$comment`. Any other key
//! is ignored on parse.
use serde_json::{json, Map, Value};

use crate::error::WireError;
use crate::pointer::Pointer;
use crate::schema::{JsonSchema, KeyRequirement, ObjectField};

// ————————————————————————————————————————————————————————————————————————————
// SERIALIZE
// ————————————————————————————————————————————————————————————————————————————

/// Render a schema as a JSON Schema document. Always an object.
pub fn to_document(schema: &JsonSchema) -> Value {
    Value::Object(to_map(schema))
}

fn to_map(schema: &JsonSchema) -> Map<String, Value> {
    let document = match schema {
        JsonSchema::Any => json!({}),
        JsonSchema::Null => json!({ "type": "null" }),
        JsonSchema::Bool => json!({ "type": "boolean" }),
        JsonSchema::String => json!({ "type": "string" }),
        JsonSchema::Number => json!({ "type": "number" }),
        JsonSchema::Array(element) => json!({
            "type": "array",
            "items": to_document(element),
        }),
        JsonSchema::Object(fields) => return object_map(fields),
        JsonSchema::Const(value) => json!({ "const": value }),
        JsonSchema::Choice(alternatives) => json!({
            "anyOf": alternatives.iter().map(to_document).collect::<Vec<_>>(),
        }),
        JsonSchema::Comment(text, inner) => {
            let mut inner = to_map(inner);
            // a nested comment (never derived) is folded into this one
            let text = match inner.shift_remove("$comment") {
                Some(Value::String(nested)) => format!("{text}\n{nested}"),
                _ => text.clone(),
            };
            let mut map = Map::new();
            map.insert("$comment".into(), Value::from(text));
            map.extend(inner);
            return map;
        }
    };
    match document {
        Value::Object(map) => map,
        _ => unreachable!("json! object literal"),
    }
}

fn object_map(fields: &[ObjectField]) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("type".into(), Value::from("object"));
    if fields.is_empty() {
        return map;
    }
    let properties: Map<String, Value> = fields
        .iter()
        .map(|f| (f.key.clone(), to_document(&f.schema)))
        .collect();
    map.insert("properties".into(), Value::Object(properties));
    let required: Vec<Value> = fields
        .iter()
        .filter(|f| f.is_required())
        .map(|f| Value::from(f.key.as_str()))
        .collect();
    if !required.is_empty() {
        map.insert("required".into(), Value::Array(required));
    }
    map
}

// ————————————————————————————————————————————————————————————————————————————
// PARSE
// ————————————————————————————————————————————————————————————————————————————

/// Parse JSON Schema text.
pub fn from_str(source: &str) -> Result<JsonSchema, WireError> {
    let document = serde_json::from_str::<Value>(source)?;
    from_document(&document)
}

/// Parse a JSON Schema document. Fails on a `type` this crate never emits
/// and on emitted keywords holding values of the wrong shape.
pub fn from_document(document: &Value) -> Result<JsonSchema, WireError> {
    let schema = parse(document, &mut Pointer::root())?;
    tracing::debug!(schema = %schema, "parsed schema document");
    Ok(schema)
}

fn parse(document: &Value, at: &mut Pointer) -> Result<JsonSchema, WireError> {
    let map = document
        .as_object()
        .ok_or_else(|| malformed(at, "schema", "a JSON object"))?;
    match text_keyword(map, "$comment", at)? {
        Some(text) => Ok(JsonSchema::comment(text, parse_uncommented(map, at)?)),
        None => parse_uncommented(map, at),
    }
}

fn parse_uncommented(map: &Map<String, Value>, at: &mut Pointer) -> Result<JsonSchema, WireError> {
    let Some(kind) = text_keyword(map, "type", at)? else {
        return parse_untyped(map, at);
    };
    match kind {
        "null" => Ok(JsonSchema::Null),
        "boolean" => Ok(JsonSchema::Bool),
        "string" => Ok(JsonSchema::String),
        "number" => Ok(JsonSchema::Number),
        "array" => match map.get("items") {
            None => Ok(JsonSchema::array(JsonSchema::Any)),
            Some(items) => Ok(JsonSchema::array(at.with("items", |at| parse(items, at))?)),
        },
        "object" => parse_object(map, at),
        other => Err(WireError::UnknownType { at: at.to_string(), found: other.to_owned() }),
    }
}

fn parse_untyped(map: &Map<String, Value>, at: &mut Pointer) -> Result<JsonSchema, WireError> {
    if let Some(any_of) = map.get("anyOf") {
        let documents = any_of
            .as_array()
            .ok_or_else(|| malformed(at, "anyOf", "a list of schemas"))?;
        let mut alternatives = at.with("anyOf", |at| {
            documents
                .iter()
                .enumerate()
                .map(|(ix, doc)| at.with(&ix.to_string(), |at| parse(doc, at)))
                .collect::<Result<Vec<_>, _>>()
        })?;
        return match alternatives.len() {
            0 => Err(WireError::EmptyChoice { at: at.to_string() }),
            1 => Ok(alternatives.remove(0)),
            _ => Ok(JsonSchema::Choice(alternatives)),
        };
    }
    if let Some(value) = map.get("const") {
        return Ok(JsonSchema::Const(value.clone()));
    }
    Ok(JsonSchema::Any)
}

fn parse_object(map: &Map<String, Value>, at: &mut Pointer) -> Result<JsonSchema, WireError> {
    let Some(properties) = map.get("properties") else {
        return Ok(JsonSchema::Object(Vec::new()));
    };
    let properties = properties
        .as_object()
        .ok_or_else(|| malformed(at, "properties", "an object of schemas"))?;
    let required = match map.get("required") {
        None => Vec::new(),
        Some(list) => list
            .as_array()
            .and_then(|items| items.iter().map(Value::as_str).collect::<Option<Vec<_>>>())
            .ok_or_else(|| malformed(at, "required", "a list of strings"))?,
    };
    let fields = at.with("properties", |at| {
        properties
            .iter()
            .map(|(key, doc)| -> Result<ObjectField, WireError> {
                let schema = at.with(key, |at| parse(doc, at))?;
                let requirement = if required.contains(&key.as_str()) {
                    KeyRequirement::Required
                } else {
                    KeyRequirement::Optional
                };
                Ok(ObjectField { key: key.clone(), requirement, schema })
            })
            .collect::<Result<Vec<_>, _>>()
    })?;
    Ok(JsonSchema::Object(fields))
}

fn text_keyword<'a>(
    map: &'a Map<String, Value>,
    keyword: &'static str,
    at: &Pointer,
) -> Result<Option<&'a str>, WireError> {
    match map.get(keyword) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(_) => Err(malformed(at, keyword, "a string")),
    }
}

fn malformed(at: &Pointer, keyword: &'static str, expected: &'static str) -> WireError {
    WireError::Malformed { at: at.to_string(), keyword, expected }
}
