// src/util.rs — Shared utility functions

/// Keep at most `max_chars` characters of `s` (a hard cutoff, UTF-8 safe).
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
