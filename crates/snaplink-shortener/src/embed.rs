use snaplink_core::FileType;

/// HTML snippet embedding a short URL in a page.
///
/// Images become `<img>`, videos a `<video>` with one source, everything
/// else a link labelled with `description`.
pub fn snippet(short_url: &str, file_type: FileType, description: &str) -> String {
    let src = escape(short_url);
    match file_type {
        FileType::Image => format!(r#"<img src="{src}" alt="{}" />"#, escape(description)),
        FileType::Video => format!(r#"<video controls><source src="{src}" /></video>"#),
        _ => format!(
            r#"<a href="{src}" target="_blank">{}</a>"#,
            escape(description)
        ),
    }
}

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
