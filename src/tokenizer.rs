/// Splits a single line into the atomic units the wrapper packs: runs of
/// whitespace, runs of word characters (alphanumerics and underscores),
/// and punctuation.
///
/// A whitespace run never merges with neighbouring text, word characters
/// extend the current token freely (so punctuation attaches to the word it
/// follows), and a run of identical punctuation characters such as `...`
/// stays a single token. Concatenating the returned tokens reproduces the
/// line exactly.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut previous: Option<char> = None;

    for (i, c) in line.char_indices() {
        if let Some(last) = previous {
            if !continues_token(last, c) {
                tokens.push(&line[start..i]);
                start = i;
            }
        }
        previous = Some(c);
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }

    tokens
}

fn continues_token(last: char, next: char) -> bool {
    if last.is_whitespace() && next.is_whitespace() {
        true
    } else if last.is_whitespace() || next.is_whitespace() {
        false
    } else if last.is_alphanumeric() || last == '_' {
        true
    } else {
        last == next
    }
}
