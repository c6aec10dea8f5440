//! Text helpers shared by the renderer and the controller.

use crate::state::DirectoryKind;

/// Escape the five HTML-significant characters.
pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a bot message and turn line breaks into `<br>`.
pub fn format_message(message: &str) -> String {
    escape_html(message).replace('\n', "<br>")
}

/// Upper-case the first character of every space-separated word.
pub fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `oral_surgeon` -> `Oral Surgeon`.
pub fn format_specialization(tag: &str) -> String {
    capitalize_words(&tag.replace('_', " "))
}

/// Label shown for a directory entry.
pub fn directory_label(kind: DirectoryKind, entry: &str) -> String {
    match kind {
        DirectoryKind::Doctor => format!("Dr. {}", capitalize_words(entry)),
        DirectoryKind::Specialization => format_specialization(entry),
    }
}

/// Question pre-filled into the message box when an entry is clicked.
pub fn directory_query(kind: DirectoryKind, entry: &str) -> String {
    match kind {
        DirectoryKind::Doctor => {
            format!("Is Dr. {} available tomorrow?", capitalize_words(entry))
        }
        DirectoryKind::Specialization => format!(
            "Show me available {}s for tomorrow",
            format_specialization(entry).to_lowercase()
        ),
    }
}
