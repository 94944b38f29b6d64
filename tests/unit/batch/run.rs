use super::*;

fn template(width: u32, height: u32) -> VideoSourceInfo {
    VideoSourceInfo {
        source_path: PathBuf::from("template.mp4"),
        width,
        height,
        fps_num: 30,
        fps_den: 1,
        duration_sec: 12.5,
        has_audio: true,
    }
}

fn image(width: u32, height: u32) -> CaptionImage {
    CaptionImage {
        width,
        height,
        data: vec![255; width as usize * height as usize * 4],
    }
}

#[test]
fn hashed_names_are_stable_and_short() {
    let mut namer = HashedOutputNamer::new("videos");
    let a = namer.output_path(0, "Stop scrolling");
    let b = namer.output_path(0, "Stop scrolling");
    assert_eq!(a, b);
    assert_eq!(a.parent(), Some(Path::new("videos")));

    let name = a.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("output_") && name.ends_with(".mp4"), "{name}");
    let hex = &name["output_".len()..name.len() - ".mp4".len()];
    assert_eq!(hex.len(), 8);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn hashed_names_differ_by_index_and_text() {
    let mut namer = HashedOutputNamer::new("out");
    let same_text = [namer.output_path(0, "x"), namer.output_path(1, "x")];
    assert_ne!(same_text[0], same_text[1]);
    assert_ne!(namer.output_path(0, "x"), namer.output_path(0, "y"));
    assert_eq!(namer.dir(), Path::new("out"));
}

#[test]
fn closures_are_output_namers() {
    let mut seen = Vec::new();
    let mut namer = |i: usize, hook: &str| {
        seen.push(hook.to_string());
        PathBuf::from(format!("clip-{i}.mp4"))
    };
    assert_eq!(namer.output_path(4, "hi"), PathBuf::from("clip-4.mp4"));
    drop(namer);
    assert_eq!(seen, vec!["hi"]);
}

#[test]
fn report_serializes_status_and_files() {
    let report = BatchReport::success(vec![PathBuf::from("videos/output_1.mp4")]);
    let v: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(v["status"], "success");
    assert_eq!(v["files"][0], "videos/output_1.mp4");
}

#[test]
fn overlay_sits_fifteen_percent_down_and_centered() {
    let style = CaptionStyle::default();
    let (x, y) = overlay_position(&template(1080, 1920), &image(1080, 300), &style);
    assert_eq!((x, y), (0, 288));

    let (x, y) = overlay_position(&template(1081, 1001), &image(100, 10), &style);
    assert_eq!(x, 490);
    assert_eq!(y, 150);
}

#[test]
fn overlay_x_goes_negative_for_wide_images() {
    let (x, _) = overlay_position(&template(100, 100), &image(103, 10), &CaptionStyle::default());
    assert_eq!(x, -2);
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert_eq!(build_thread_pool(Some(2)).unwrap().current_num_threads(), 2);
}
