// src/core/sanitize.rs

/// ASCII digit for `0-9` and full-width `０-９`, otherwise None.
pub fn ascii_digit(ch: char) -> Option<char> {
    match ch {
        '0'..='9' => Some(ch),
        '０'..='９' => char::from_u32(ch as u32 - '０' as u32 + '0' as u32),
        _ => None,
    }
}

/// Keep only (possibly full-width) digits, as ASCII.
pub fn digits_only(s: &str) -> String {
    s.chars().filter_map(ascii_digit).collect()
}

/// File-name safe stem. Non-ASCII letters (area names) are kept;
/// separators, reserved characters and controls become `_`.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.trim().chars() {
        let bad = matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            || ch.is_control()
            || ch.is_whitespace();
        if bad {
            if !last_us { out.push('_'); last_us = true; }
        } else {
            out.push(ch);
            last_us = false;
        }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!("unnamed") } else { out }
}
