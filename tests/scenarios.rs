use pretty_assertions::assert_eq;
use serde_json::json;

use codec_schema::{
    catalog, check, derive_schema, validate, wire, Codec, JsonSchema, ObjectCodec, ObjectField,
};

#[test]
fn primitive_end_to_end() {
    let schema = derive_schema(&Codec::string()).unwrap();
    assert_eq!(schema, JsonSchema::String);
    assert_eq!(wire::to_document(&schema), json!({"type": "string"}));
    assert!(validate(&json!("x"), &schema));
    assert!(!validate(&json!(1), &schema));
}

#[test]
fn annotated_array_end_to_end() {
    let schema = derive_schema(&Codec::array_of(Codec::number()).comment("ids")).unwrap();
    assert_eq!(schema, JsonSchema::comment("ids", JsonSchema::array(JsonSchema::Number)));
    assert_eq!(
        serde_json::to_string(&schema).unwrap(),
        r#"{"$comment":"ids","type":"array","items":{"type":"number"}}"#,
    );
    assert!(validate(&json!([1, 2.5]), &schema));
    assert!(!validate(&json!([1, "2"]), &schema));
}

#[test]
fn closed_objects_and_optional_omission() {
    let codec = Codec::object(
        ObjectCodec::required("a", Codec::string()).and(ObjectCodec::optional("b", Codec::number())),
    );
    let schema = derive_schema(&codec).unwrap();
    assert_eq!(
        schema,
        JsonSchema::Object(vec![
            ObjectField::required("a", JsonSchema::String),
            ObjectField::optional("b", JsonSchema::Number),
        ]),
    );
    assert!(validate(&json!({"a": "x"}), &schema));
    assert!(!validate(&json!({"a": "x", "c": 1}), &schema));

    let reparsed = wire::from_document(&wire::to_document(&schema)).unwrap();
    assert_eq!(reparsed, schema);
}

#[test]
fn nested_annotations_never_nest_on_the_wire() {
    let schema = derive_schema(&Codec::string().comment("t2").comment("t1")).unwrap();
    assert!(schema.is_well_formed());
    let document = wire::to_document(&schema);
    assert_eq!(document, json!({"$comment": "t1\nt2", "type": "string"}));
    assert_eq!(wire::from_document(&document).unwrap(), schema);
}

#[test]
fn tagged_union_rejects_the_wrong_tag() {
    let sample = catalog::catalog().into_iter().find(|s| s.name == "shape").unwrap();
    let schema = derive_schema(&sample.codec).unwrap();
    assert!(validate(&json!({"type": "circle", "radius": 1}), &schema));
    let err = check(&json!({"type": "square", "radius": 1}), &schema).unwrap_err();
    assert_eq!(err.at, "#");
    assert!(err.to_string().contains("none of 2 alternatives matched"));
}

#[test]
fn third_party_keywords_are_ignored() {
    let document = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": {
            "id": {"type": "number", "minimum": 0},
            "name": {"type": "string", "maxLength": 10}
        },
        "required": ["id"],
        "additionalProperties": false
    });
    let schema = wire::from_document(&document).unwrap();
    assert_eq!(
        schema,
        JsonSchema::Object(vec![
            ObjectField::required("id", JsonSchema::Number),
            ObjectField::optional("name", JsonSchema::String),
        ]),
    );
}
