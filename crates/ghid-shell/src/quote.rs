//! Value quoting for `eval`-consumed output. Every rendered value reads back
//! as exactly one word with the original bytes, and never spans lines.

use std::fmt::Write as _;

/// Quotes a value for bash/zsh.
///
/// Plain values go through `shell_words::quote`; values carrying control
/// characters use `$'...'` so the statement stays on one line.
pub fn posix_quote(value: &str) -> String {
    if !value.chars().any(char::is_control) {
        return shell_words::quote(value).into_owned();
    }
    let mut quoted = String::with_capacity(value.len() + 3);
    quoted.push_str("$'");
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            ch if ch.is_control() => push_code_point_escape(&mut quoted, ch),
            ch => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/// Quotes a value for fish. Inside single quotes fish only honors `\\` and
/// `\'`; control characters are emitted as unquoted escapes between quoted runs.
pub fn fish_quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }
    if value.chars().all(is_fish_safe) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    let mut open = false;
    for ch in value.chars() {
        if ch.is_control() {
            if open {
                quoted.push('\'');
                open = false;
            }
            match ch {
                '\n' => quoted.push_str("\\n"),
                '\t' => quoted.push_str("\\t"),
                '\r' => quoted.push_str("\\r"),
                ch => push_code_point_escape(&mut quoted, ch),
            }
            continue;
        }
        if !open {
            quoted.push('\'');
            open = true;
        }
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            ch => quoted.push(ch),
        }
    }
    if open {
        quoted.push('\'');
    }
    quoted
}

fn is_fish_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '@' | '+' | ',' | '=')
}

fn push_code_point_escape(out: &mut String, ch: char) {
    let code = u32::from(ch);
    if code < 0x80 {
        let _ = write!(out, "\\x{code:02x}");
    } else {
        let _ = write!(out, "\\u{code:04x}");
    }
}
