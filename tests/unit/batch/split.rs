use super::*;

#[test]
fn splits_on_blank_lines_in_order() {
    let hooks = split_hooks("First hook\n\nSecond hook\n\nThird").unwrap();
    assert_eq!(hooks, vec!["First hook", "Second hook", "Third"]);
}

#[test]
fn single_newlines_stay_inside_a_hook() {
    let hooks = split_hooks("line a\nline b\n\nnext").unwrap();
    assert_eq!(hooks, vec!["line a\nline b", "next"]);
}

#[test]
fn blank_pieces_are_dropped_and_pieces_trimmed() {
    let hooks = split_hooks("\n\n  one  \n\n   \n\n\n\ntwo\n\n").unwrap();
    assert_eq!(hooks, vec!["one", "two"]);
}

#[test]
fn crlf_payloads_split_like_lf() {
    let hooks = split_hooks("a\r\n\r\nb").unwrap();
    assert_eq!(hooks, vec!["a", "b"]);
}

#[test]
fn all_blank_payload_is_empty_input() {
    for payload in ["", "   ", "\n\n\n\n", " \n\n \t "] {
        let err = split_hooks(payload).unwrap_err();
        assert!(matches!(err, HookreelError::EmptyInput(_)), "{payload:?}");
    }
}
