use std::fs;
use std::path::Path;

/// Plants raw bytes at the content-addressed location of `transformed`
/// under a dump root.
pub fn plant(src_root: &Path, transformed: &str, bytes: &[u8]) {
    let hex = hasher::content_address(transformed);
    let dest = hasher::shard_path(src_root, &hex);
    fs::create_dir_all(dest.parent().unwrap()).unwrap();
    fs::write(dest, bytes).unwrap();
}

/// Encodes `json` as an ordered map and plants it for `logical`.
pub fn plant_orderedmap(src_root: &Path, logical: &str, json: &[u8]) {
    let bytes = orderedmap::from_json(json).unwrap();
    plant(src_root, &hasher::master_table_path(logical), &bytes);
}

/// Encodes `json` as deflate-wrapped AMF3 and plants it for `logical`
/// with the given extension.
pub fn plant_amf3(src_root: &Path, logical: &str, ext: &str, json: &[u8]) {
    let bytes = amf3::from_json(json).unwrap();
    let transformed = hasher::add_ext(logical, &format!("{ext}.amf3.deflate"));
    plant(src_root, &transformed, &bytes);
}

/// Plants a minimal obfuscated PNG for `logical` and returns the bytes the
/// decoder should produce.
pub fn plant_png(src_root: &Path, logical: &str) -> Vec<u8> {
    let stored = vec![0x89, 0x70, 0x6e, 0x67, 0x0d, 0x0a, 0x1a, 0x0a, 0x00];
    plant(src_root, &hasher::add_ext(logical, ".png"), &stored);
    let mut restored = stored;
    restored[1..4].copy_from_slice(&[0x50, 0x4e, 0x47]);
    restored
}
