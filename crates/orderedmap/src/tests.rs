use crate::{decode, encode, from_json, to_json, Node, OrderedMapError};

fn rows(node: &Node) -> &Vec<Vec<String>> {
    match node {
        Node::Rows(r) => r,
        other => panic!("expected leaf rows, got {other:?}"),
    }
}

#[test]
fn empty_object_round_trips() {
    let bytes = encode(b"{}").unwrap();
    assert!(!bytes.is_empty(), "empty map must still carry its header");
    assert_eq!(decode(&bytes, false).unwrap(), Node::Map(vec![]));
}

#[test]
fn empty_array_round_trips() {
    let bytes = encode(b"[]").unwrap();
    // An empty leaf is zlib-compressed empty CSV, not empty bytes.
    assert!(!bytes.is_empty());
    assert_eq!(decode(&bytes, false).unwrap(), Node::Rows(vec![]));
}

#[test]
fn empty_input_encodes_to_empty_bytes() {
    assert!(encode(b"").unwrap().is_empty());
    assert!(encode(b"  \t\r\n").unwrap().is_empty());
}

#[test]
fn single_entry_map() {
    let bytes = encode(br#"{"k":[["v"]]}"#).unwrap();
    let node = decode(&bytes, false).unwrap();
    let Node::Map(entries) = &node else {
        panic!("expected map")
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "k");
    assert_eq!(rows(&entries[0].1), &vec![vec!["v".to_string()]]);
}

#[test]
fn leaf_csv_with_commas_quotes_and_crlf() {
    let json = br#"[["a,b","say \"hi\"","line\r\nbreak"],["plain","x","y"]]"#;
    let bytes = encode(json).unwrap();
    let node = decode(&bytes, false).unwrap();
    assert_eq!(
        rows(&node)[0],
        vec![
            "a,b".to_string(),
            "say \"hi\"".to_string(),
            "line\r\nbreak".to_string()
        ]
    );
}

#[test]
fn deeply_nested_map_round_trips() {
    // Nine levels of maps ending in a one-cell leaf.
    let json = br#"{"l1":{"l2":{"l3":{"l4":{"l5":{"l6":{"l7":{"l8":{"l9":[["deep"]]}}}}}}}}}"#;
    let bytes = encode(json).unwrap();
    let root = decode(&bytes, false).unwrap();
    let mut node = &root;
    for level in 1..=8 {
        node = node.get(&format!("l{level}")).expect("level missing");
    }
    let leaf = node.get("l9").expect("leaf missing");
    assert_eq!(rows(leaf), &vec![vec!["deep".to_string()]]);
}

#[test]
fn key_order_survives_repeated_cycles() {
    let json = br#"{"zeta":[["1"]],"alpha":[["2"]],"mid":{"b":[["3"]],"a":[["4"]]}}"#;

    let mut bytes = encode(json).unwrap();
    let reference = decode(&bytes, false).unwrap();
    for _ in 0..3 {
        let rendered = to_json(&bytes, 0, false).unwrap();
        bytes = from_json(&rendered).unwrap();
        assert_eq!(decode(&bytes, false).unwrap(), reference);
    }

    let Node::Map(entries) = reference else {
        panic!("expected map")
    };
    let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn decode_encode_decode_is_identity() {
    let json =
        br#"{"table":[["id","name"],["1","hero"]],"nested":{"inner":[["x"]],"other":[[]]}}"#;
    let raw = encode(json).unwrap();
    let first = decode(&raw, false).unwrap();
    let re_encoded = from_json(&to_json(&raw, 0, false).unwrap()).unwrap();
    assert_eq!(decode(&re_encoded, false).unwrap(), first);
}

#[test]
fn flatten_csv_collapses_rows() {
    let bytes = encode(br#"[["a","b"],["c"]]"#).unwrap();
    let node = decode(&bytes, true).unwrap();
    assert_eq!(
        node,
        Node::Flat(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
}

#[test]
fn indented_json_output() {
    let bytes = encode(br#"{"k":[["v"]]}"#).unwrap();
    let pretty = String::from_utf8(to_json(&bytes, 2, false).unwrap()).unwrap();
    assert!(pretty.contains("\n  \"k\""));
    let compact = to_json(&bytes, 0, false).unwrap();
    assert!(!compact.contains(&b'\n'));
}

#[test]
fn header_size_past_buffer_is_malformed() {
    // header_size = 1000 but only a few bytes follow.
    let mut raw = vec![0xe8, 0x03, 0x00, 0x00];
    raw.extend_from_slice(&[1, 2, 3]);
    match decode(&raw, false) {
        Err(OrderedMapError::Malformed(_)) => {}
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[test]
fn non_zlib_header_is_malformed() {
    // Plausible header_size pointing at bytes that are not a zlib stream.
    let mut raw = vec![4, 0, 0, 0];
    raw.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    assert!(matches!(
        decode(&raw, false),
        Err(OrderedMapError::Malformed(_))
    ));
}

#[test]
fn short_buffer_is_malformed() {
    assert!(matches!(
        decode(&[0x01, 0x02], false),
        Err(OrderedMapError::Malformed(_))
    ));
    assert!(matches!(
        decode(&[], false),
        Err(OrderedMapError::Malformed(_))
    ));
}

#[test]
fn leaf_that_inflates_to_bad_csv_is_an_error() {
    let bad = codec::zlib::compress(b"a\"b\r\n").unwrap();
    assert!(matches!(
        decode(&bad, false),
        Err(OrderedMapError::Codec(_))
    ));
}

#[test]
fn scalar_json_is_rejected_by_encode() {
    assert!(matches!(
        encode(b"42"),
        Err(OrderedMapError::Malformed(_))
    ));
    assert!(matches!(
        encode(br#""just a string""#),
        Err(OrderedMapError::Malformed(_))
    ));
}

#[test]
fn offsets_are_cumulative_across_entries() {
    // Two entries whose keys and values have different lengths; a decoder
    // slicing with absolute instead of cumulative offsets would misalign.
    let json = br#"{"a":[["1"]],"longerkey":[["22","333"]]}"#;
    let bytes = encode(json).unwrap();
    let node = decode(&bytes, false).unwrap();
    assert_eq!(
        rows(node.get("longerkey").unwrap()),
        &vec![vec!["22".to_string(), "333".to_string()]]
    );
}
