//! Escape sequence decoding for string literals

/// Replace the escape sequences in the raw text of a string literal.  Returns
/// the decoded text and every escape character that was not recognised,
/// unrecognised sequences are kept as they were written.
pub(super) fn decode_escapes(raw: &[char]) -> (String, Vec<char>) {
    let mut result = String::with_capacity(raw.len());
    let mut unknown = vec![];

    let mut idx = 0;
    while idx < raw.len() {
        let ch = raw[idx];
        if ch != '\\' {
            result.push(ch);
            idx += 1;
            continue;
        }

        let decoded = match raw.get(idx + 1) {
            Some('\\') => Some('\\'),
            Some('"') => Some('"'),
            Some('n') => Some('\n'),
            Some('t') => Some('\t'),
            Some(&other) => {
                unknown.push(other);
                None
            }
            None => None,
        };

        match decoded {
            Some(decoded) => {
                result.push(decoded);
                idx += 2;
            }
            // keep the backslash, the next character is handled on its own
            None => {
                result.push('\\');
                idx += 1;
            }
        }
    }

    (result, unknown)
}
