use std::path::PathBuf;

use crate::config::ExtractorConfig;
use crate::handler::{extract_handlers, Amf3Handler, Handler, OrderedMapHandler, PngHandler};

fn config() -> ExtractorConfig {
    ExtractorConfig {
        src_path: PathBuf::from("/dump"),
        dest_path: PathBuf::from("/out"),
        ..ExtractorConfig::default()
    }
}

#[test]
fn each_format_hashes_to_a_distinct_shard() {
    let cfg = config();
    let logical = "character/pyrgas";

    let om = OrderedMapHandler.source_path(logical, &cfg);
    let dsl = Amf3Handler { ext: ".action.dsl" }.source_path(logical, &cfg);
    let esdl = Amf3Handler { ext: ".esdl" }.source_path(logical, &cfg);
    let png = PngHandler.source_path(logical, &cfg);

    let all = [&om, &dsl, &esdl, &png];
    for (i, a) in all.iter().enumerate() {
        assert!(a.starts_with("/dump/upload"), "{}", a.display());
        for b in &all[i + 1..] {
            assert_ne!(a, b, "two formats collided on the same shard");
        }
    }
}

#[test]
fn source_path_matches_the_hash_by_hand() {
    let cfg = config();
    let hex = hasher::content_address("master/item/item.orderedmap");
    let expected = PathBuf::from("/dump")
        .join("upload")
        .join(&hex[0..2])
        .join(&hex[2..]);
    assert_eq!(OrderedMapHandler.source_path("item/item", &cfg), expected);
}

#[test]
fn dest_paths_follow_the_output_layout() {
    let cfg = config();
    assert_eq!(
        OrderedMapHandler.dest_path("item/item", &cfg),
        PathBuf::from("/out/orderedmap/item/item.json")
    );
    assert_eq!(
        Amf3Handler { ext: ".action.dsl" }.dest_path("a/b", &cfg),
        PathBuf::from("/out/assets/a/b.action.dsl.json")
    );
    assert_eq!(
        Amf3Handler { ext: ".esdl" }.dest_path("a/b", &cfg),
        PathBuf::from("/out/assets/a/b.esdl.json")
    );
    assert_eq!(
        PngHandler.dest_path("ui/icon", &cfg),
        PathBuf::from("/out/assets/ui/icon.png")
    );
}

#[test]
fn probe_order_is_fixed() {
    let cfg = config();
    let shapes: Vec<PathBuf> = extract_handlers()
        .iter()
        .map(|h| h.dest_path("x/y", &cfg))
        .collect();
    assert_eq!(
        shapes,
        vec![
            PathBuf::from("/out/orderedmap/x/y.json"),
            PathBuf::from("/out/assets/x/y.action.dsl.json"),
            PathBuf::from("/out/assets/x/y.esdl.json"),
            PathBuf::from("/out/assets/x/y.png"),
        ]
    );
}

#[test]
fn indent_flows_through_decode() {
    let mut cfg = config();
    cfg.indent = 2;
    let raw = orderedmap::from_json(br#"{"k":[["v"]]}"#).unwrap();
    let pretty = OrderedMapHandler.decode(&raw, &cfg).unwrap();
    assert!(pretty.windows(4).any(|w| w == b"\n  \""));
}
