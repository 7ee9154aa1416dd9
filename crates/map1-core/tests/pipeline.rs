//! End-to-end pipeline properties: JSON text in, identifiers out.

use map1_core::{
    canonical_bytes, canonical_bytes_from_json, identifier, identifier_from_canonical_bytes,
    identifier_from_json, parse_strict_text, ErrorKind, Projection, Value,
};

const WORKED_VECTOR_JSON: &[u8] = br#"{"b":"2","a":"1"}"#;
const WORKED_VECTOR_HEX: &str =
    "4d415031000400000002010000000161010000000131010000000162010000000132";
const WORKED_VECTOR_ID: &str =
    "map1:3fe8cedb14c67bdd9d974819386a7a3f9d5c6edffaf458c41dd0b2441753c21d";

#[test]
fn worked_vector_through_the_json_path() {
    let bytes = canonical_bytes_from_json(WORKED_VECTOR_JSON, &Projection::Full).unwrap();
    assert_eq!(hex::encode(&bytes), WORKED_VECTOR_HEX);

    let id = identifier_from_json(WORKED_VECTOR_JSON, &Projection::Full).unwrap();
    assert_eq!(id.as_str(), WORKED_VECTOR_ID);
}

#[test]
fn identifiers_are_deterministic() {
    let raw = br#"{"outer":{"flag":true,"n":-7},"list":["x",false]}"#;
    let first = identifier_from_json(raw, &Projection::Full).unwrap();
    let second = identifier_from_json(raw, &Projection::Full).unwrap();
    assert_eq!(first, second);
}

#[test]
fn key_order_in_source_text_does_not_matter() {
    let one = identifier_from_json(br#"{"a":"1","b":"2"}"#, &Projection::Full).unwrap();
    let other = identifier_from_json(WORKED_VECTOR_JSON, &Projection::Full).unwrap();
    assert_eq!(one, other);
}

#[test]
fn fast_path_agrees_with_the_long_way_round() {
    let value = parse_strict_text(br#"{"k":[1,2,{"inner":"v"}]}"#).unwrap();
    let bytes = canonical_bytes(&value, &Projection::Full).unwrap();
    assert_eq!(
        identifier_from_canonical_bytes(&bytes).unwrap(),
        identifier(&value, &Projection::Full).unwrap()
    );
}

#[test]
fn boolean_and_string_spellings_stay_distinct() {
    let typed = identifier_from_json(br#"{"v":true}"#, &Projection::Full).unwrap();
    let quoted = identifier_from_json(br#"{"v":"true"}"#, &Projection::Full).unwrap();
    assert_ne!(typed, quoted);

    let number = identifier_from_json(br#"{"v":42}"#, &Projection::Full).unwrap();
    let digits = identifier_from_json(br#"{"v":"42"}"#, &Projection::Full).unwrap();
    assert_ne!(number, digits);
}

#[test]
fn absent_key_empty_map_and_empty_string_all_differ() {
    let absent = identifier_from_json(br#"{}"#, &Projection::Full).unwrap();
    let empty_map = identifier_from_json(br#"{"a":{}}"#, &Projection::Full).unwrap();
    let empty_string = identifier_from_json(br#"{"a":""}"#, &Projection::Full).unwrap();
    assert_ne!(absent, empty_map);
    assert_ne!(absent, empty_string);
    assert_ne!(empty_map, empty_string);
}

#[test]
fn scalar_roots_are_identifiable_under_full() {
    let a = identifier_from_json(b"true", &Projection::Full).unwrap();
    let b = identifier_from_json(br#""true""#, &Projection::Full).unwrap();
    assert_ne!(a, b);
}

#[test]
fn depth_limit_applies_to_json_and_native_values_alike() {
    let ok = format!("{}{{}}{}", "[".repeat(31), "]".repeat(31));
    assert!(identifier_from_json(ok.as_bytes(), &Projection::Full).is_ok());

    let deep = format!("{}{{}}{}", "[".repeat(32), "]".repeat(32));
    let err = identifier_from_json(deep.as_bytes(), &Projection::Full).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthLimit);

    let mut native = Value::empty_map();
    for _ in 0..32 {
        native = Value::List(vec![native]);
    }
    let err = identifier(&native, &Projection::Full).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthLimit);
}

#[test]
fn bind_selects_the_minimal_enclosing_subtree() {
    let raw = br#"{"a":{"x":"1","y":"2"},"b":"keep"}"#;
    let projected = canonical_bytes_from_json(raw, &Projection::Bind(&["/a/x"])).unwrap();
    let expected =
        canonical_bytes_from_json(br#"{"a":{"x":"1"}}"#, &Projection::Full).unwrap();
    assert_eq!(projected, expected);
}

#[test]
fn bind_with_no_match_is_the_empty_map() {
    let raw = br#"{"a":"1"}"#;
    let projected = identifier_from_json(raw, &Projection::Bind(&["/zzz"])).unwrap();
    let empty = identifier_from_json(br#"{}"#, &Projection::Full).unwrap();
    assert_eq!(projected, empty);
}

#[test]
fn bind_mixed_match_fails_closed() {
    let raw = br#"{"a":"1"}"#;
    let err = identifier_from_json(raw, &Projection::Bind(&["/a", "/zzz"])).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidShape);
}

#[test]
fn bind_escape_decoding_reaches_awkward_keys() {
    let raw = br#"{"m~n":{"p/q":"v"},"other":"drop"}"#;
    let projected =
        canonical_bytes_from_json(raw, &Projection::Bind(&["/m~0n/p~1q"])).unwrap();
    let expected = canonical_bytes_from_json(br#"{"m~n":{"p/q":"v"}}"#, &Projection::Full).unwrap();
    assert_eq!(projected, expected);
}

#[test]
fn unsupported_type_outranks_duplicate_key_across_the_document() {
    let err =
        identifier_from_json(br#"{"a":1,"a":2,"z":null}"#, &Projection::Full).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedType);
}

#[test]
fn projection_shape_error_outranks_duplicate_key() {
    // The duplicate is found by the adapter, the shape fault by BIND; the
    // shape fault has higher precedence and must win.
    let err = identifier_from_json(
        br#"{"a":1,"a":2,"b":3}"#,
        &Projection::Bind(&["/b", "/zzz"]),
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidShape);
}

#[test]
fn duplicate_key_survives_a_lower_precedence_terminal() {
    let raw = format!(
        "{{\"a\":1,\"a\":2,\"deep\":{}1{}}}",
        "[".repeat(40),
        "]".repeat(40)
    );
    let err = identifier_from_json(raw.as_bytes(), &Projection::Full).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateKey);
}

#[test]
fn duplicate_keys_collide_after_escape_resolution() {
    // The escape \u0061 spells the same key as the literal "a".
    let err =
        identifier_from_json(br#"{"\u0061":1,"a":2}"#, &Projection::Full).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateKey);
}

#[test]
fn json_strictness_reaches_the_pipeline() {
    let mut bom = vec![0xEF, 0xBB, 0xBF];
    bom.extend(br#"{}"#);
    let err = identifier_from_json(&bom, &Projection::Full).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidShape);

    let err = identifier_from_json(br#"{} {}"#, &Projection::Full).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedStructure);

    let err = identifier_from_json(b"9223372036854775808", &Projection::Full).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedType);

    let err = identifier_from_json(br#"{"v":null}"#, &Projection::Full).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedType);
}

#[test]
fn corrupted_canonical_bytes_reject_on_the_fast_path() {
    let mut bytes = hex::decode(WORKED_VECTOR_HEX).unwrap();
    bytes[0] ^= 0xFF;
    let err = identifier_from_canonical_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedHeader);

    let mut truncated = hex::decode(WORKED_VECTOR_HEX).unwrap();
    truncated.truncate(truncated.len() - 1);
    let err = identifier_from_canonical_bytes(&truncated).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedStructure);
}
