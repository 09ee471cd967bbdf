//! Character-literal and class-body unquoting.
//!
//! The escape table matches the lexical promise the bootstrap grammar's
//! `CharLit`/`Class` terms make: `\n \t \r \v \f \b \\ \' \" \xHH \uHHHH`.
//! An escape this table does not recognize drops its backslash and is
//! copied through verbatim; a `\x`/`\u` whose digits don't parse to a
//! valid code point is dropped entirely.

#[cfg(test)]
mod escape_tests;

use pegtree_core::expr::RangeSet;

/// Unquote a `Char` literal's body (already stripped of its surrounding
/// `'...'`/`"..."` delimiters).
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '\\' || i + 1 >= chars.len() {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let (c, next) = read_escape(&chars, i + 1);
        if let Some(c) = c {
            out.push(c);
        }
        i = next;
    }
    out
}

/// Parse a `Class` body (already stripped of its surrounding `[...]`) into
/// a `RangeSet`, expanding `lo-hi` ranges and the same escape table
/// `unescape` uses.
pub fn parse_class(s: &str) -> RangeSet {
    let chars: Vec<char> = s.chars().collect();
    let mut singles = Vec::new();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (lo, next) = read_class_char(&chars, i);
        i = next;
        let Some(lo) = lo else { continue };
        if i + 1 < chars.len() && chars[i] == '-' {
            let (hi, next2) = read_class_char(&chars, i + 1);
            if let Some(hi) = hi {
                ranges.push((lo, hi));
                i = next2;
                continue;
            }
        }
        singles.push(lo);
    }
    RangeSet::new(singles, ranges)
}

/// Read one (possibly escaped) character starting at `chars[i]`, which
/// must not be a bare backslash at end-of-input. Returns `None` for a
/// dropped (unrecognized hex) escape.
fn read_class_char(chars: &[char], i: usize) -> (Option<char>, usize) {
    if chars[i] != '\\' || i + 1 >= chars.len() {
        return (Some(chars[i]), i + 1);
    }
    read_escape(chars, i + 1)
}

/// Decode the escape whose introducing character is `chars[at]` (the
/// character immediately after the backslash). Returns the decoded
/// character (`None` if dropped) and the index just past the escape.
fn read_escape(chars: &[char], at: usize) -> (Option<char>, usize) {
    match chars[at] {
        'n' => (Some('\n'), at + 1),
        't' => (Some('\t'), at + 1),
        'r' => (Some('\r'), at + 1),
        'v' => (Some('\u{0B}'), at + 1),
        'f' => (Some('\u{0C}'), at + 1),
        'b' => (Some('\u{08}'), at + 1),
        '\\' => (Some('\\'), at + 1),
        '\'' => (Some('\''), at + 1),
        '"' => (Some('"'), at + 1),
        ']' => (Some(']'), at + 1),
        '-' => (Some('-'), at + 1),
        'x' => read_hex_escape(chars, at + 1, 2),
        'u' => read_hex_escape(chars, at + 1, 4),
        other => (Some(other), at + 1),
    }
}

fn read_hex_escape(chars: &[char], at: usize, len: usize) -> (Option<char>, usize) {
    if at + len > chars.len() {
        return (None, chars.len());
    }
    let digits: String = chars[at..at + len].iter().collect();
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return (None, at + len);
    }
    let c = u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32);
    (c, at + len)
}
