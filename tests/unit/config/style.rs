use super::*;

#[test]
fn defaults_match_the_stock_caption_look() {
    let s = CaptionStyle::default();
    assert_eq!(s.font_size_px, 90.0);
    assert_eq!(s.fg, Rgba8::BLACK);
    assert_eq!(s.bg, Rgba8::WHITE);
    assert_eq!((s.top_margin_px, s.bottom_margin_px), (50, 50));
    assert_eq!(s.line_spacing_pad_px, 10);
    assert_eq!(s.wrap_margin_px, 100.0);
    assert!(s.validate().is_ok());
}

#[test]
fn partial_json_keeps_defaults_for_missing_keys() {
    let json = r##"{ "font_size_px": 48, "fg": "#ff0000", "bg": [0, 0, 0] }"##;
    let s = CaptionStyle::from_reader(json.as_bytes()).unwrap();
    assert_eq!(s.font_size_px, 48.0);
    assert_eq!(s.fg, Rgba8::rgb(255, 0, 0));
    assert_eq!(s.bg, Rgba8::BLACK);
    assert_eq!(s.top_margin_px, 50);
    assert_eq!(s.font_path, PathBuf::from(DEFAULT_FONT_PATH));
}

#[test]
fn unknown_keys_are_rejected() {
    let json = r#"{ "font_sz": 48 }"#;
    let err = CaptionStyle::from_reader(json.as_bytes()).unwrap_err();
    assert!(matches!(err, HookreelError::Validation(_)));
}

#[test]
fn validation_catches_bad_values() {
    let s = CaptionStyle {
        font_size_px: 0.0,
        ..CaptionStyle::default()
    };
    assert!(s.validate().is_err());

    let s = CaptionStyle {
        wrap_margin_px: f32::NAN,
        ..CaptionStyle::default()
    };
    assert!(s.validate().is_err());

    let s = CaptionStyle {
        overlay_top_fraction: 1.5,
        ..CaptionStyle::default()
    };
    assert!(s.validate().is_err());

    let s = CaptionStyle {
        font_path: PathBuf::new(),
        ..CaptionStyle::default()
    };
    assert!(s.validate().is_err());
}

#[test]
fn overlay_offset_is_floored_fraction_of_height() {
    let s = CaptionStyle::default();
    assert_eq!(s.overlay_top_px(1920), 288);
    assert_eq!(s.overlay_top_px(1081), 162);
    assert_eq!(s.overlay_top_px(0), 0);
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = CaptionStyle::from_path("target/does-not-exist/style.json").unwrap_err();
    assert!(err.to_string().contains("open caption style"));
}
