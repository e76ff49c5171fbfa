// src/core/sanitize.rs

/// Collapse every whitespace run (including NBSP and the newlines innerText leaves
/// behind) into one ASCII space, and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Filesystem-safe stem for a table id or player name.
/// Falls back to `fallback` when nothing usable is left.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch == '-' || ch == '_' { if !(last_us && ch == '_') { out.push(ch); } last_us = ch == '_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { fallback.to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nbsp_and_newlines_collapse() {
        assert_eq!(normalize_ws("  msiebert\u{a0}gains 3\n appeal "), "msiebert gains 3 appeal");
    }

    #[test]
    fn filename_keeps_digits_and_falls_back() {
        assert_eq!(sanitize_filename("612345678", "game"), "612345678");
        assert_eq!(sanitize_filename("a b/c", "game"), "a_bc");
        assert_eq!(sanitize_filename("///", "game"), "game");
    }
}
