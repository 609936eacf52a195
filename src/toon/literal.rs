use serde_json::{Number, Value};

use super::decode::DecodeError;

pub fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(is_key_char)
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

pub fn encode_key(key: &str) -> String {
    if is_plain_key(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn looks_numeric(s: &str) -> bool {
    s.parse::<f64>().is_ok() || parse_number(s).is_some()
}

/// Quoting is always safe to over-apply: a quoted token decodes to a string.
fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.trim() != s
        || matches!(s, "true" | "false" | "null")
        || s.starts_with('-')
        || looks_numeric(s)
        || s.chars().any(|c| {
            matches!(c, ':' | '"' | '\\' | '[' | ']' | '{' | '}' | ',' | '|' | '#') || c.is_control()
        })
}

pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn encode_string(s: &str) -> String {
    if needs_quotes(s) {
        quote(s)
    } else {
        s.to_string()
    }
}

/// Literal for a scalar node. Callers only pass scalars; containers are
/// written by the encoder's structural paths.
pub fn encode_scalar(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => encode_string(s),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

pub fn is_scalar(v: &Value) -> bool {
    !matches!(v, Value::Array(_) | Value::Object(_))
}

pub fn parse_number(tok: &str) -> Option<Number> {
    let first = tok.chars().next()?;
    if first != '-' && !first.is_ascii_digit() {
        return None;
    }
    match serde_json::from_str::<Value>(tok) {
        Ok(Value::Number(n)) => Some(n),
        _ => None,
    }
}

/// Parses a quoted string at the start of `s`. Returns the unescaped text
/// and the byte length consumed, closing quote included.
pub fn parse_quoted(s: &str, line: usize) -> Result<(String, usize), DecodeError> {
    let mut out = String::new();
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, '"')) => {}
        _ => return Err(DecodeError::UnterminatedString { line }),
    }
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((out, i + 1)),
            '\\' => {
                let (_, esc) = chars
                    .next()
                    .ok_or(DecodeError::UnterminatedString { line })?;
                match esc {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    '/' => out.push('/'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'u' => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let (_, h) = chars.next().ok_or(DecodeError::BadEscape { line })?;
                            let digit = h.to_digit(16).ok_or(DecodeError::BadEscape { line })?;
                            code = code * 16 + digit;
                        }
                        out.push(char::from_u32(code).ok_or(DecodeError::BadEscape { line })?);
                    }
                    _ => return Err(DecodeError::BadEscape { line }),
                }
            }
            c => out.push(c),
        }
    }
    Err(DecodeError::UnterminatedString { line })
}

pub fn parse_scalar(tok: &str, line: usize) -> Result<Value, DecodeError> {
    let tok = tok.trim();
    if tok.starts_with('"') {
        let (s, used) = parse_quoted(tok, line)?;
        if used != tok.len() {
            return Err(DecodeError::TrailingContent { line });
        }
        return Ok(Value::String(s));
    }
    Ok(match tok {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => match parse_number(tok) {
            Some(n) => Value::Number(n),
            None => Value::String(tok.to_string()),
        },
    })
}

/// Parses a key at the start of `s`, quoted or plain. Returns `None` when
/// `s` does not start with a key.
pub fn parse_key(s: &str, line: usize) -> Result<Option<(String, usize)>, DecodeError> {
    if s.starts_with('"') {
        return parse_quoted(s, line).map(Some);
    }
    let first = match s.chars().next() {
        Some(c) => c,
        None => return Ok(None),
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Ok(None);
    }
    let end = s.find(|c: char| !is_key_char(c)).unwrap_or(s.len());
    Ok(Some((s[..end].to_string(), end)))
}

/// Splits on `delim` outside quoted strings.
pub fn split_delimited(s: &str, delim: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
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
        } else if c == delim {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}
