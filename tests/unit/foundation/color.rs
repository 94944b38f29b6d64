use super::*;
use serde_json::json;

#[test]
fn parses_names_case_insensitively() {
    let c: Rgba8 = serde_json::from_value(json!("Black")).unwrap();
    assert_eq!(c, Rgba8::BLACK);

    let c: Rgba8 = serde_json::from_value(json!("white")).unwrap();
    assert_eq!(c, Rgba8::WHITE);
}

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba8 = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 0, 0));

    let c: Rgba8 = serde_json::from_value(json!("0000ff80")).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 255, 128));
}

#[test]
fn parses_byte_arrays() {
    let c: Rgba8 = serde_json::from_value(json!([10, 20, 30])).unwrap();
    assert_eq!(c, Rgba8::rgb(10, 20, 30));

    let c: Rgba8 = serde_json::from_value(json!([10, 20, 30, 40])).unwrap();
    assert_eq!(c, Rgba8::rgba(10, 20, 30, 40));

    assert!(serde_json::from_value::<Rgba8>(json!([1, 2])).is_err());
}

#[test]
fn rejects_unknown_names() {
    assert!("chartreuse-ish".parse::<Rgba8>().is_err());
    assert!("#12345".parse::<Rgba8>().is_err());
}

#[test]
fn serializes_as_hex() {
    let v = serde_json::to_value(Rgba8::rgb(1, 2, 255)).unwrap();
    assert_eq!(v, json!("#0102ffff"));
}
