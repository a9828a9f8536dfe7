//! Bracket-aware splitting of type and argument text.

/// Split `text` on `sep` wherever it is not nested inside `()`, `[]`, `<>`
/// or `{}`. Pieces are trimmed; empty pieces are kept.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut prev = '\0';

    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '<' | '{' => depth += 1,
            // `->` is not a closing bracket
            '>' if prev == '-' => {}
            ')' | ']' | '>' | '}' => depth -= 1,
            _ if c == sep && depth == 0 => {
                pieces.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
        prev = c;
    }
    pieces.push(text[start..].trim());
    pieces
}

/// Whether `sep` occurs outside any brackets.
pub fn contains_top_level(text: &str, sep: char) -> bool {
    split_top_level(text, sep).len() > 1
}
