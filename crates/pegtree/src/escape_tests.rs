use super::*;

#[test]
fn plain_text_passes_through() {
    assert_eq!(unescape("hello"), "hello");
}

#[test]
fn common_escapes_decode() {
    assert_eq!(unescape(r"a\nb\tc\rd"), "a\nb\tc\rd");
    assert_eq!(unescape(r"\\"), "\\");
    assert_eq!(unescape(r"\'\""), "'\"");
}

#[test]
fn hex_escape_decodes_byte() {
    assert_eq!(unescape(r"\x41"), "A");
}

#[test]
fn unicode_escape_decodes_code_point() {
    assert_eq!(unescape(r"é"), "\u{e9}");
}

#[test]
fn truncated_hex_escape_is_dropped() {
    assert_eq!(unescape(r"a\x4"), "a");
}

#[test]
fn unrecognized_escape_keeps_the_letter() {
    assert_eq!(unescape(r"\q"), "q");
}

#[test]
fn class_expands_ranges_and_singles() {
    let set = parse_class("a-z0-9_");
    assert!(set.contains('m'));
    assert!(set.contains('5'));
    assert!(set.contains('_'));
    assert!(!set.contains('!'));
}

#[test]
fn class_supports_escaped_members() {
    let set = parse_class(r"\n\-a");
    assert!(set.contains('\n'));
    assert!(set.contains('-'));
    assert!(set.contains('a'));
}

#[test]
fn class_trailing_dash_is_literal() {
    let set = parse_class("a-");
    assert!(set.contains('a'));
    assert!(set.contains('-'));
}
