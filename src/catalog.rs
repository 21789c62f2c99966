//! Built-in sample codecs, each with host values it can encode.
//!
//! Used by `codec-schema catalog` and by the dev test runner as a small
//! conformance corpus.
use serde_json::{json, Value};

use crate::codec::{Codec, ObjectCodec};

pub struct Sample {
    pub name: &'static str,
    pub codec: Codec,
    pub hosts: Vec<Value>,
}

pub fn catalog() -> Vec<Sample> {
    vec![
        Sample {
            name: "text",
            codec: Codec::string(),
            hosts: vec![json!("hello"), json!("")],
        },
        Sample {
            name: "ids",
            codec: Codec::array_of(Codec::number()).comment("ids"),
            hosts: vec![json!([1, 2, 3]), json!([])],
        },
        Sample {
            name: "scalar",
            codec: Codec::either(Codec::either(Codec::string(), Codec::number()), Codec::bool()),
            hosts: vec![json!("x"), json!(4.5), json!(false)],
        },
        Sample {
            name: "person",
            codec: person(),
            hosts: vec![
                json!({"name": "Ada", "age": 36, "tags": ["math"]}),
                json!({"name": "Grace", "nickname": null}),
                json!({"name": "Alan", "nickname": "Prof"}),
            ],
        },
        Sample {
            name: "shape",
            codec: shape(),
            hosts: vec![
                json!({"radius": 2}),
                json!({"width": 3, "height": 4}),
            ],
        },
        Sample {
            name: "timestamp",
            codec: Codec::number()
                .map(|host| {
                    host.get("seconds")
                        .cloned()
                        .ok_or_else(|| "timestamp without `seconds`".to_owned())
                })
                .comment("seconds since the unix epoch"),
            hosts: vec![json!({"seconds": 1_700_000_000}), json!({"seconds": 0})],
        },
        Sample {
            name: "flag",
            codec: Codec::bool()
                .fallback(Codec::string())
                .comment("legacy documents spell it \"yes\"/\"no\""),
            hosts: vec![json!(true), json!(false)],
        },
        Sample {
            name: "payload",
            codec: Codec::value(),
            hosts: vec![json!(null), json!({"nested": [1, {"x": "y"}]})],
        },
    ]
}

fn person() -> Codec {
    let fields = ObjectCodec::required("kind", Codec::literal("person", Codec::string()))
        .map(|host| {
            let mut host = host.clone();
            if let Some(record) = host.as_object_mut() {
                record.insert("kind".into(), Value::Null);
            }
            Ok(host)
        })
        .and(ObjectCodec::required("name", Codec::string()))
        .and(ObjectCodec::optional("age", Codec::number()))
        .and(ObjectCodec::optional("nickname", Codec::either(Codec::string(), Codec::null())))
        .and(ObjectCodec::optional("tags", Codec::array_of(Codec::string()).named("tags")));
    Codec::object(fields).named("Person")
}

fn shape() -> Codec {
    let circle = ObjectCodec::required("type", Codec::literal("circle", Codec::string()))
        .and(ObjectCodec::required("radius", Codec::number()));
    let rectangle = ObjectCodec::required("type", Codec::literal("rectangle", Codec::string()))
        .and(ObjectCodec::required("width", Codec::number()))
        .and(ObjectCodec::required("height", Codec::number()));
    Codec::either(
        Codec::object(tagged(circle, "circle")).named("Circle"),
        Codec::object(tagged(rectangle, "rectangle")).named("Rectangle"),
    )
}

/// Host records carry no tag; supply one so the required `type` key is present.
fn tagged(fields: ObjectCodec, tag: &'static str) -> ObjectCodec {
    fields.map(move |host| {
        let mut host = host.clone();
        if let Some(record) = host.as_object_mut() {
            record.insert("type".into(), Value::from(tag));
        }
        Ok(host)
    })
}
