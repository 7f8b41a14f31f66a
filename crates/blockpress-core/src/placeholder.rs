//! Placeholder substitution
//!
//! Templates are scanned once from left to right. Substituted values are never
//! rescanned, so user text containing `[URL]` or `[TEXT_P_2]` stays literal.
//! Bracket tokens without a value are left untouched.

/// Replaces `[NAME]` tokens using `lookup`
///
/// `lookup` receives the token name without brackets and returns `None` to
/// keep the token as written.
///
/// # Example
///
/// ```
/// use blockpress_core::placeholder::substitute;
///
/// let out = substitute("<a href=\"[URL]\">[TEXT]</a>[X]", |name| match name {
///     "TEXT" => Some("[URL]".to_string()),
///     "URL" => Some("https://e.com".to_string()),
///     _ => None,
/// });
/// assert_eq!(out, "<a href=\"https://e.com\">[URL]</a>[X]");
/// ```
pub fn substitute<F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('[') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start + 1..];

        match candidate.find(']') {
            Some(end) if is_token_name(&candidate[..end]) => {
                let name = &candidate[..end];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('[');
                        out.push_str(name);
                        out.push(']');
                    }
                }
                rest = &candidate[end + 1..];
            }
            _ => {
                out.push('[');
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Substitutes a fixed set of `(token, value)` pairs, tokens written with brackets
pub fn substitute_pairs(template: &str, pairs: &[(&str, &str)]) -> String {
    substitute(template, |name| {
        pairs
            .iter()
            .find(|(token, _)| token.len() == name.len() + 2 && &token[1..token.len() - 1] == name)
            .map(|(_, value)| value.to_string())
    })
}

/// Token names are upper-case letters, digits and underscores
fn is_token_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
