//! HTML escaping for user supplied text interpolated into email bodies.

/// Escapes `& < > " '` into their entities, ampersand first so inserted
/// entities are not escaped twice. Absent input yields an empty string.
pub fn escape_html(input: Option<&str>) -> String {
    let Some(input) = input else {
        return String::new();
    };

    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Shorthand for [`escape_html`] on a present value.
pub fn escape(input: &str) -> String {
    escape_html(Some(input))
}
