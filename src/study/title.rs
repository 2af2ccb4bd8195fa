//! Small helpers for titles and export filenames.

/// Derive a session title from the raw input notes: the first 8
/// whitespace-normalized words, with an ellipsis when truncated.
pub fn derive_title(input: &str) -> String {
    let words: Vec<&str> = input.split_whitespace().collect();
    if words.is_empty() {
        return "Study material".to_string();
    }
    let mut title = words[..words.len().min(8)].join(" ");
    if words.len() > 8 {
        title.push_str("...");
    }
    title
}

/// Sanitize input text into a filename stem: keep only ASCII
/// alphanumerics and spaces, trim, truncate to `max_len` characters.
pub fn sanitize_filename_stem(input: &str, max_len: usize) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    let trimmed = cleaned.trim();
    let stem: String = trimmed.chars().take(max_len).collect();
    let stem = stem.trim_end().to_string();
    if stem.is_empty() {
        "Notes".to_string()
    } else {
        stem
    }
}
