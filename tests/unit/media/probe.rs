use super::*;

const PROBE_WITH_AUDIO: &str = r#"{
    "streams": [
        {"codec_type": "video", "width": 1080, "height": 1920, "r_frame_rate": "30000/1001", "duration": "9.9"},
        {"codec_type": "audio", "sample_rate": "48000"}
    ],
    "format": {"duration": "10.010000"}
}"#;

#[test]
fn parses_dimensions_rate_and_duration() {
    let info = parse_probe_json(Path::new("t.mp4"), PROBE_WITH_AUDIO.as_bytes()).unwrap();
    assert_eq!((info.width, info.height), (1080, 1920));
    assert_eq!((info.fps_num, info.fps_den), (30000, 1001));
    assert!((info.duration_sec - 10.01).abs() < 1e-9);
    assert!(info.has_audio);
    assert_eq!(info.source_path, PathBuf::from("t.mp4"));
    assert!((info.source_fps() - 29.97).abs() < 0.01);
}

#[test]
fn falls_back_to_stream_duration() {
    let json = r#"{
        "streams": [{"codec_type": "video", "width": 64, "height": 64, "r_frame_rate": "25/1", "duration": "2.0"}]
    }"#;
    let info = parse_probe_json(Path::new("t.mp4"), json.as_bytes()).unwrap();
    assert_eq!(info.duration_sec, 2.0);
    assert!(!info.has_audio);
}

#[test]
fn missing_video_stream_is_a_compositor_error() {
    let json = r#"{"streams": [{"codec_type": "audio"}], "format": {"duration": "1.0"}}"#;
    let err = parse_probe_json(Path::new("a.m4a"), json.as_bytes()).unwrap_err();
    assert!(matches!(err, HookreelError::Compositor(_)));
}

#[test]
fn zero_duration_is_rejected() {
    let json = r#"{
        "streams": [{"codec_type": "video", "width": 64, "height": 64, "r_frame_rate": "25/1"}],
        "format": {"duration": "0.000"}
    }"#;
    assert!(parse_probe_json(Path::new("t.mp4"), json.as_bytes()).is_err());
}

#[test]
fn malformed_json_is_rejected() {
    assert!(parse_probe_json(Path::new("t.mp4"), b"not json").is_err());
}

#[test]
fn ratio_parsing() {
    assert_eq!(parse_ff_ratio("30/1"), Some((30, 1)));
    assert_eq!(parse_ff_ratio("24000/1001"), Some((24000, 1001)));
    assert_eq!(parse_ff_ratio("30/0"), None);
    assert_eq!(parse_ff_ratio("abc"), None);
}

#[test]
fn missing_template_file_fails_before_running_ffprobe() {
    let err = probe_video(Path::new("target/no-such-template.mp4")).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}
