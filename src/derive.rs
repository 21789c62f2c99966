//! Fold a codec description into the schema of the JSON it produces.
use crate::codec::{Codec, ObjectCodec};
use crate::error::CodecError;
use crate::schema::{JsonSchema, ObjectField};

/// Derive the schema of everything `codec` can encode to.
///
/// Fails only when the literal of a `Codec::Equal` cannot be encoded by its
/// own codec.
pub fn derive_schema(codec: &Codec) -> Result<JsonSchema, CodecError> {
    let schema = match codec {
        Codec::Value => JsonSchema::Any,
        Codec::Null => JsonSchema::Null,
        Codec::Bool => JsonSchema::Bool,
        Codec::String => JsonSchema::String,
        Codec::Number => JsonSchema::Number,
        Codec::Array { element, name } => {
            named(name.as_deref(), JsonSchema::array(derive_schema(element)?))
        }
        Codec::Object { fields, name } => {
            named(name.as_deref(), JsonSchema::Object(derive_fields(fields)?))
        }
        Codec::Equal { literal, codec } => JsonSchema::Const(codec.encode(literal)?),
        Codec::Map { inner, .. } => derive_schema(inner)?,
        Codec::Either(left, right) => choice(derive_schema(left)?, derive_schema(right)?),
        Codec::Fallback { inner, .. } => derive_schema(inner)?,
        Codec::Comment { text, inner } => comment(text, derive_schema(inner)?),
    };
    Ok(schema)
}

/// Field entries of an object codec, left to right. Duplicate keys are the
/// caller's mistake and pass through unchecked.
pub fn derive_fields(fields: &ObjectCodec) -> Result<Vec<ObjectField>, CodecError> {
    match fields {
        ObjectCodec::Required { key, codec } => Ok(vec![ObjectField::required(key.clone(), derive_schema(codec)?)]),
        ObjectCodec::Optional { key, codec } => Ok(vec![ObjectField::optional(key.clone(), derive_schema(codec)?)]),
        ObjectCodec::Map { inner, .. } => derive_fields(inner),
        ObjectCodec::Pure(_) => Ok(Vec::new()),
        ObjectCodec::Ap(left, right) => {
            let mut out = derive_fields(left)?;
            out.extend(derive_fields(right)?);
            Ok(out)
        }
    }
}

/// Build one n-ary `Choice`, splicing in the alternatives of either side
/// when that side is itself a `Choice`.
pub fn choice(left: JsonSchema, right: JsonSchema) -> JsonSchema {
    let mut alternatives = Vec::new();
    splice(left, &mut alternatives);
    splice(right, &mut alternatives);
    tracing::trace!(alternatives = alternatives.len(), "flattened choice");
    JsonSchema::Choice(alternatives)
}

fn splice(schema: JsonSchema, out: &mut Vec<JsonSchema>) {
    match schema {
        JsonSchema::Choice(alternatives) => {
            for alternative in alternatives {
                splice(alternative, out);
            }
        }
        other => out.push(other),
    }
}

/// Attach `text` to `inner`. An inner comment is merged into this one
/// (outer text first, newline separated) so comments never nest.
pub fn comment(text: &str, inner: JsonSchema) -> JsonSchema {
    match inner {
        JsonSchema::Comment(inner_text, schema) => {
            JsonSchema::Comment(format!("{text}\n{inner_text}"), schema)
        }
        other => JsonSchema::comment(text, other),
    }
}

fn named(name: Option<&str>, schema: JsonSchema) -> JsonSchema {
    match name {
        Some(name) => comment(name, schema),
        None => schema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn primitives_map_directly() {
        assert_eq!(derive_schema(&Codec::value()).unwrap(), JsonSchema::Any);
        assert_eq!(derive_schema(&Codec::string()).unwrap(), JsonSchema::String);
        assert_eq!(derive_schema(&Codec::null()).unwrap(), JsonSchema::Null);
    }

    #[test]
    fn annotated_array() {
        let codec = Codec::array_of(Codec::number()).comment("ids");
        assert_eq!(
            derive_schema(&codec).unwrap(),
            JsonSchema::comment("ids", JsonSchema::array(JsonSchema::Number)),
        );
    }

    #[test]
    fn three_way_alternation_flattens_either_way() {
        let expected = JsonSchema::Choice(vec![JsonSchema::String, JsonSchema::Number, JsonSchema::Bool]);
        let left = Codec::either(Codec::either(Codec::string(), Codec::number()), Codec::bool());
        let right = Codec::either(Codec::string(), Codec::either(Codec::number(), Codec::bool()));
        assert_eq!(derive_schema(&left).unwrap(), expected);
        assert_eq!(derive_schema(&right).unwrap(), expected);
    }

    #[test]
    fn long_chains_keep_source_order() {
        let codec = Codec::one_of((0..6).map(|n| Codec::literal(n, Codec::number()))).unwrap();
        let JsonSchema::Choice(alternatives) = derive_schema(&codec).unwrap() else {
            panic!("expected a choice");
        };
        let consts: Vec<_> = alternatives
            .iter()
            .map(|a| match a {
                JsonSchema::Const(v) => v.clone(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(consts, (0..6).map(|n| json!(n)).collect::<Vec<_>>());
    }

    #[test]
    fn commented_choice_is_an_opaque_alternative() {
        let codec = Codec::either(Codec::either(Codec::string(), Codec::null()).comment("maybe"), Codec::bool());
        let schema = derive_schema(&codec).unwrap();
        assert_eq!(
            schema,
            JsonSchema::Choice(vec![
                JsonSchema::comment("maybe", JsonSchema::Choice(vec![JsonSchema::String, JsonSchema::Null])),
                JsonSchema::Bool,
            ]),
        );
        assert!(schema.is_well_formed());
    }

    #[test]
    fn nested_annotations_merge() {
        let codec = Codec::string().comment("t2").comment("t1");
        assert_eq!(derive_schema(&codec).unwrap(), JsonSchema::comment("t1\nt2", JsonSchema::String));

        let codec = Codec::array_of(Codec::bool()).named("flags").comment("doc");
        let schema = derive_schema(&codec).unwrap();
        assert_eq!(schema, JsonSchema::comment("doc\nflags", JsonSchema::array(JsonSchema::Bool)));
        assert!(schema.is_well_formed());
    }

    #[test]
    fn object_fields_accumulate_in_order() {
        let fields = ObjectCodec::required("a", Codec::string())
            .and(ObjectCodec::pure(json!(null)))
            .and(ObjectCodec::optional("b", Codec::number()).map(|v| Ok(v.clone())));
        let codec = Codec::object(fields).named("thing");
        assert_eq!(
            derive_schema(&codec).unwrap(),
            JsonSchema::comment(
                "thing",
                JsonSchema::Object(vec![
                    ObjectField::required("a", JsonSchema::String),
                    ObjectField::optional("b", JsonSchema::Number),
                ]),
            ),
        );
    }

    #[test]
    fn literal_goes_through_the_encoding_direction() {
        let codec = Codec::literal(3, Codec::string().map(|v| Ok(Value::from(v.to_string()))));
        assert_eq!(derive_schema(&codec).unwrap(), JsonSchema::Const(json!("3")));

        let broken = Codec::literal("x", Codec::number());
        assert!(matches!(derive_schema(&broken), Err(CodecError::KindMismatch { .. })));
    }

    #[test]
    fn maps_and_fallbacks_are_transparent() {
        let codec = Codec::number().map(|v| Ok(v.clone())).fallback(Codec::string());
        assert_eq!(derive_schema(&codec).unwrap(), JsonSchema::Number);
    }
}
