use itertools::Itertools;

/// Cache key for an address: trimmed, lowercased, inner whitespace collapsed.
pub fn normalize_address(address: &str) -> String {
    address.split_whitespace().map(str::to_lowercase).join(" ")
}

/// Escape a string for use in HTML text and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
