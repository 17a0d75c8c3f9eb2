/// Turns free text into a single path component: separators and characters
/// that cannot appear in a file name become `_`, and a name made only of dots
/// is replaced so it cannot point at a parent directory. Returns an empty
/// string for blank input.
pub fn file_stem(text: &str) -> String {
    let cleaned: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.chars().all(|c| c == '.') {
        true => "_".repeat(cleaned.len()),
        false => cleaned,
    }
}
