/// Longest prefix of `s` that fits in `max_bytes` without splitting a char.
pub fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

pub fn format_kib(kib: u64) -> String {
    const MB: u64 = 1024;
    const GB: u64 = 1024 * 1024;

    if kib >= GB {
        format!("{:.1} GB", kib as f64 / GB as f64)
    } else if kib >= MB {
        format!("{:.1} MB", kib as f64 / MB as f64)
    } else {
        format!("{} KB", kib)
    }
}
