use std::mem::take;

/// Splits source text into a flat sequence of token strings.
///
/// A double quote toggles string mode. Inside a string every character is
/// copied verbatim into the current token, parentheses, whitespace, and
/// backslashes included (there are no escape sequences), and the closing
/// quote ends the token. Both quote characters stay in the token so the
/// parser can tell a string literal from a bare symbol. Outside a string,
/// `(` and `)` are single-character tokens that flush any pending token,
/// and whitespace flushes the pending token and is dropped.
///
/// Tokenizing cannot fail: an unterminated string absorbs the rest of the
/// input as one token.
pub fn tokenize(source: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut pending = String::new();
    let mut in_string = false;
    for c in source.chars() {
        if c == '"' {
            pending.push(c);
            if in_string {
                tokens.push(take(&mut pending));
            }
            in_string = !in_string;
        } else if in_string {
            pending.push(c);
        } else if c == '(' || c == ')' {
            if !pending.is_empty() {
                tokens.push(take(&mut pending));
            }
            tokens.push(c.to_string());
        } else if c.is_whitespace() {
            if !pending.is_empty() {
                tokens.push(take(&mut pending));
            }
        } else {
            pending.push(c);
        }
    }
    if !pending.is_empty() {
        tokens.push(pending);
    }
    tokens
}
