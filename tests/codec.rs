mod common;

use chrono::{TimeZone, Utc};
use common::fixtures::{TestEdge, TestVertex};
use pathloom::codec::{
    CodecError, CodecModule, CodecWriter, ExchangeCodec, TYPE_TAG, registry,
};
use pathloom::element::{DetachedEdge, DetachedVertex, EntityId, Vertex};
use pathloom::value::TraversalValue;
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use std::io::Read;
use std::sync::Arc;

fn tagged_codec() -> ExchangeCodec {
    ExchangeCodec::build()
        .embed_type_tags(true)
        .normalize_key_order(true)
        .create()
}

fn sample_vertex() -> TraversalValue {
    let v = TestVertex::new(1, "person")
        .with_prop("name", json!("marko"))
        .with_prop("age", json!(29));
    TraversalValue::DetachedVertex(DetachedVertex::from_vertex(&v))
}

fn sample_edge() -> TraversalValue {
    let e = TestEdge::new(7, "knows", 1, 2).with_prop("weight", json!(0.5));
    TraversalValue::DetachedEdge(DetachedEdge::from_edge(&e))
}

#[test]
fn scalar_round_trip_with_type_tags() {
    let codec = tagged_codec();
    let values = vec![
        TraversalValue::Null,
        TraversalValue::Bool(true),
        TraversalValue::Int(42),
        TraversalValue::Float(2.5),
        TraversalValue::Text("marko".into()),
        TraversalValue::Timestamp(Utc.with_ymd_and_hms(2015, 7, 14, 12, 0, 0).unwrap()),
    ];
    for value in values {
        let doc = codec.encode(&value).unwrap();
        assert_eq!(codec.decode(&doc).unwrap(), value);
    }
}

#[test]
fn entity_round_trip_with_type_tags() {
    let codec = tagged_codec();
    for value in [sample_vertex(), sample_edge()] {
        let doc = codec.encode(&value).unwrap();
        let obj = doc.as_object().unwrap();
        assert!(obj.contains_key(TYPE_TAG));
        assert_eq!(codec.decode(&doc).unwrap(), value);
    }
}

#[test]
fn collections_round_trip_with_type_tags() {
    let codec = tagged_codec();
    let mut map = FxHashMap::default();
    map.insert("creator".to_string(), sample_vertex());
    map.insert("count".to_string(), TraversalValue::Int(2));
    let value = TraversalValue::List(vec![
        TraversalValue::Map(map),
        sample_edge(),
        TraversalValue::Text("tail".into()),
    ]);

    let doc = codec.encode(&value).unwrap();
    assert_eq!(codec.decode(&doc).unwrap(), value);
}

#[test]
fn live_entities_encode_as_snapshots() {
    let codec = tagged_codec();
    let live: Arc<dyn Vertex> =
        Arc::new(TestVertex::new(1, "person").with_prop("name", json!("marko")));
    let doc = codec.encode(&TraversalValue::Vertex(live)).unwrap();

    // The document is indistinguishable from one made of a snapshot.
    assert_eq!(doc, codec.encode(&sample_vertex_named_only()).unwrap());
}

fn sample_vertex_named_only() -> TraversalValue {
    let v = TestVertex::new(1, "person").with_prop("name", json!("marko"));
    TraversalValue::DetachedVertex(DetachedVertex::from_vertex(&v))
}

#[test]
fn untagged_encoding_is_plain_json() {
    let codec = ExchangeCodec::build().create();
    assert_eq!(
        codec.encode(&TraversalValue::Int(5)).unwrap(),
        json!(5)
    );
    assert_eq!(
        codec
            .encode(&TraversalValue::List(vec![
                TraversalValue::Int(1),
                TraversalValue::Text("x".into()),
            ]))
            .unwrap(),
        json!([1, "x"])
    );

    let vertex_doc = codec.encode(&sample_vertex()).unwrap();
    let obj = vertex_doc.as_object().unwrap();
    assert!(!obj.contains_key(TYPE_TAG));
    assert_eq!(obj.get("label"), Some(&json!("person")));
}

#[test]
fn untagged_decode_is_structural() {
    let codec = ExchangeCodec::build().create();
    let doc = json!({"a": 1, "b": [true, "x"], "c": 2.5});
    match codec.decode(&doc).unwrap() {
        TraversalValue::Map(entries) => {
            assert_eq!(entries.get("a"), Some(&TraversalValue::Int(1)));
            assert_eq!(
                entries.get("b"),
                Some(&TraversalValue::List(vec![
                    TraversalValue::Bool(true),
                    TraversalValue::Text("x".into()),
                ]))
            );
            assert_eq!(entries.get("c"), Some(&TraversalValue::Float(2.5)));
        }
        other => panic!("expected map, got {other:?}"),
    }
}

#[test]
fn non_finite_floats_fall_back_to_text_and_still_decode() {
    let codec = tagged_codec();
    let doc = codec.encode(&TraversalValue::Float(f64::NAN)).unwrap();
    match codec.decode(&doc).unwrap() {
        TraversalValue::Float(x) => assert!(x.is_nan()),
        other => panic!("expected float, got {other:?}"),
    }

    let doc = codec
        .encode(&TraversalValue::Float(f64::INFINITY))
        .unwrap();
    match codec.decode(&doc).unwrap() {
        TraversalValue::Float(x) => assert!(x.is_infinite() && x > 0.0),
        other => panic!("expected float, got {other:?}"),
    }
}

#[test]
fn unknown_type_tag_is_a_serialization_error() {
    let codec = tagged_codec();
    let doc = json!({ "@type": "quaternion", "@value": [1, 2, 3, 4] });
    let err = codec.decode(&doc).unwrap_err();
    assert!(matches!(
        err,
        CodecError::UnknownTypeTag { tag } if tag == "quaternion"
    ));
}

#[test]
fn normalized_output_is_byte_identical_across_field_orders() {
    let codec = tagged_codec();

    let mut forward = FxHashMap::default();
    forward.insert("alpha".to_string(), TraversalValue::Int(1));
    forward.insert("beta".to_string(), TraversalValue::Int(2));
    forward.insert("gamma".to_string(), TraversalValue::Int(3));

    let mut reverse = FxHashMap::default();
    reverse.insert("gamma".to_string(), TraversalValue::Int(3));
    reverse.insert("beta".to_string(), TraversalValue::Int(2));
    reverse.insert("alpha".to_string(), TraversalValue::Int(1));

    let a = codec
        .encode_to_string(&TraversalValue::Map(forward))
        .unwrap();
    let b = codec
        .encode_to_string(&TraversalValue::Map(reverse))
        .unwrap();
    assert_eq!(a, b);

    // And stable across repeated encodings of the same value.
    let again = codec.encode_to_string(&sample_vertex()).unwrap();
    assert_eq!(again, codec.encode_to_string(&sample_vertex()).unwrap());
}

#[test]
fn writer_streams_multiple_values_through_one_open_sink() {
    let codec = tagged_codec();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut writer = CodecWriter::new(codec.clone(), file);

    writer.write_value(&TraversalValue::Int(1)).unwrap();
    writer.write_value(&sample_vertex()).unwrap();
    writer.write_value(&TraversalValue::Text("done".into())).unwrap();
    writer.flush().unwrap();
    assert_eq!(writer.values_written(), 3);

    // The sink comes back open; reread it from the start.
    let mut file = writer.into_inner();
    let mut raw = String::new();
    use std::io::Seek;
    file.seek(std::io::SeekFrom::Start(0)).unwrap();
    file.read_to_string(&mut raw).unwrap();

    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(codec.decode_str(lines[0]).unwrap(), TraversalValue::Int(1));
    assert_eq!(codec.decode_str(lines[1]).unwrap(), sample_vertex());
    assert_eq!(
        codec.decode_str(lines[2]).unwrap(),
        TraversalValue::Text("done".into())
    );
}

/// Extension that renders entity ids as bare strings under its own tag.
struct IdOnlyVertices;

impl CodecModule for IdOnlyVertices {
    fn name(&self) -> &'static str {
        "id-only-vertices"
    }

    fn encode(&self, value: &TraversalValue) -> Option<Result<Value, CodecError>> {
        match value {
            TraversalValue::DetachedVertex(v) => Some(Ok(json!({
                TYPE_TAG: "vertex_ref",
                "@value": v.id.to_string(),
            }))),
            _ => None,
        }
    }

    fn decode(&self, tag: &str, payload: &Value) -> Option<Result<TraversalValue, CodecError>> {
        if tag != "vertex_ref" {
            return None;
        }
        let raw = payload.as_str()?;
        let id = raw
            .parse::<i64>()
            .map(EntityId::Int)
            .unwrap_or_else(|_| EntityId::Text(raw.to_string()));
        Some(Ok(TraversalValue::DetachedVertex(DetachedVertex {
            id,
            label: String::new(),
            properties: FxHashMap::default(),
        })))
    }
}

#[test]
fn extension_modules_get_first_crack() {
    let codec = ExchangeCodec::build()
        .embed_type_tags(true)
        .extra_module(Arc::new(IdOnlyVertices))
        .create();

    let doc = codec.encode(&sample_vertex()).unwrap();
    assert_eq!(doc.get(TYPE_TAG), Some(&json!("vertex_ref")));
    assert_eq!(doc.get("@value"), Some(&json!("1")));

    match codec.decode(&doc).unwrap() {
        TraversalValue::DetachedVertex(v) => assert_eq!(v.id, EntityId::Int(1)),
        other => panic!("expected vertex ref, got {other:?}"),
    }
}

#[test]
fn auto_discovery_layers_registered_extensions() {
    registry::register_extension(Arc::new(IdOnlyVertices));

    let plain = ExchangeCodec::build().create();
    assert!(plain.module_names().is_empty());

    let discovered = ExchangeCodec::build()
        .auto_discover_extensions(true)
        .create();
    assert!(discovered.module_names().contains(&"id-only-vertices"));
}
