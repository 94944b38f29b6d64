use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HookreelError::font_load("x")
            .to_string()
            .contains("font load error:")
    );
    assert!(
        HookreelError::empty_input("x")
            .to_string()
            .contains("empty input:")
    );
    assert!(
        HookreelError::compositor("x")
            .to_string()
            .contains("compositor error:")
    );
    assert!(
        HookreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HookreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn with_item_keeps_kind_and_names_index() {
    let err = HookreelError::compositor("ffmpeg exited").with_item(3);
    assert!(matches!(err, HookreelError::Compositor(_)));
    assert_eq!(err.to_string(), "compositor error: hook #3: ffmpeg exited");

    let err = HookreelError::empty_input("caption text is empty").with_item(0);
    assert!(matches!(err, HookreelError::EmptyInput(_)));
    assert!(err.to_string().contains("hook #0"));
}

#[test]
fn with_item_adds_context_to_wrapped_errors() {
    let err = HookreelError::Other(anyhow::anyhow!("disk full")).with_item(7);
    let HookreelError::Other(inner) = &err else {
        panic!("expected Other");
    };
    assert_eq!(inner.to_string(), "hook #7");
    assert!(format!("{inner:#}").contains("disk full"));
}
