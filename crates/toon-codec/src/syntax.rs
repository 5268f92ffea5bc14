//! Lexical rules shared by the encoder, decoder and key folding.

use crate::error::{ToonError, ToonResult};

/// A path segment that may take part in key folding or path expansion.
pub(crate) fn is_identifier_segment(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A key that can be written without quotes.
pub(crate) fn is_bare_key(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// `-?\d+(\.\d+)?([eE][+-]?\d+)?`: anything a reader could mistake for a number,
/// including forms with leading zeros.
pub(crate) fn looks_numeric(s: &str) -> bool {
    let bytes = s.strip_prefix('-').unwrap_or(s).as_bytes();
    let mut i = count_digits(bytes, 0);
    if i == 0 {
        return false;
    }
    if bytes.get(i) == Some(&b'.') {
        let frac = count_digits(bytes, i + 1);
        if frac == 0 {
            return false;
        }
        i += 1 + frac;
    }
    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let exp = count_digits(bytes, i);
        if exp == 0 {
            return false;
        }
        i += exp;
    }
    i == bytes.len()
}

/// JSON number grammar: like [`looks_numeric`] but without leading zeros.
pub(crate) fn is_json_number(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let bytes = unsigned.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit() {
        return false;
    }
    looks_numeric(s)
}

fn count_digits(bytes: &[u8], start: usize) -> usize {
    bytes
        .iter()
        .skip(start)
        .take_while(|b| b.is_ascii_digit())
        .count()
}

/// Wrap `s` in quotes, escaping the five characters TOON knows escapes for.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Parse a quoted string at the start of `s`, returning the unescaped text and the
/// remainder after the closing quote.
pub(crate) fn parse_quoted(s: &str, line: usize) -> ToonResult<(String, &str)> {
    let body = s
        .strip_prefix('"')
        .ok_or(ToonError::UnterminatedString { line })?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((out, &body[i + 1..])),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, other)) => {
                    return Err(ToonError::InvalidEscape {
                        line,
                        sequence: other.to_string(),
                    })
                }
                None => return Err(ToonError::UnterminatedString { line }),
            },
            _ => out.push(c),
        }
    }

    Err(ToonError::UnterminatedString { line })
}

/// Byte offset of the first `target` outside quoted sections.
pub(crate) fn find_unquoted(s: &str, target: char) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == target {
            return Some(i);
        }
    }
    None
}

/// Split on `delimiter` outside quoted sections. Pieces are trimmed of spaces.
pub(crate) fn split_delimited(s: &str, delimiter: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = s;
    while let Some(i) = find_unquoted(rest, delimiter) {
        pieces.push(rest[..i].trim_matches(' '));
        rest = &rest[i + delimiter.len_utf8()..];
    }
    pieces.push(rest.trim_matches(' '));
    pieces
}
