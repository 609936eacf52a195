use serde_json::{Map, Value};

use super::literal::{parse_key, parse_scalar, split_delimited};
use super::{DecodeOptions, Delimiter};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("line {line}: indentation must be a multiple of {indent} spaces")]
    BadIndent { line: usize, indent: usize },
    #[error("line {line}: tabs are not allowed in indentation")]
    TabIndent { line: usize },
    #[error("line {line}: unexpected indentation")]
    UnexpectedIndent { line: usize },
    #[error("line {line}: unterminated quoted string")]
    UnterminatedString { line: usize },
    #[error("line {line}: invalid escape sequence")]
    BadEscape { line: usize },
    #[error("line {line}: malformed array header")]
    BadHeader { line: usize },
    #[error("line {line}: array declares {expected} items, found {found}")]
    CountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: row has {found} values, header declares {expected}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: expected `key: value`")]
    MissingColon { line: usize },
    #[error("line {line}: unexpected trailing content")]
    TrailingContent { line: usize },
    #[error("line {line}: duplicate key {key:?}")]
    DuplicateKey { line: usize, key: String },
    #[error("line {line}: expected a `- ` list item")]
    ExpectedListItem { line: usize },
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    no: usize,
    depth: usize,
    text: &'a str,
}

#[derive(Debug)]
struct Header {
    len: usize,
    delim: Delimiter,
    fields: Option<Vec<String>>,
}

#[derive(Debug)]
enum Entry<'a> {
    Scalar(&'a str),
    Nested,
    Array(Header, &'a str),
}

/// Decodes a TOON document. An empty document is an empty object.
pub fn decode(doc: &str, opts: &DecodeOptions) -> Result<Value, DecodeError> {
    let lines = scan(doc, opts.indent.max(1))?;
    let first = match lines.first() {
        Some(l) => *l,
        None => return Ok(Value::Object(Map::new())),
    };
    if first.depth != 0 {
        return Err(DecodeError::UnexpectedIndent { line: first.no });
    }

    let mut p = Parser { lines, pos: 0 };
    let value = if first.text.starts_with('[') {
        p.pos = 1;
        let (header, rest) = parse_header(first.text, first.no)?;
        p.array_body(header, rest, first.no, 1)?
    } else if p.lines.len() == 1 && parse_entry(first.text, first.no)?.is_none() {
        p.pos = 1;
        parse_scalar(first.text, first.no)?
    } else {
        Value::Object(p.object(0)?)
    };

    match p.peek() {
        Some(extra) => Err(DecodeError::TrailingContent { line: extra.no }),
        None => Ok(value),
    }
}

fn scan(doc: &str, indent: usize) -> Result<Vec<Line<'_>>, DecodeError> {
    let mut out = Vec::new();
    for (i, raw) in doc.split('\n').enumerate() {
        let no = i + 1;
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if raw.trim().is_empty() {
            continue;
        }
        let body = raw.trim_start_matches(' ');
        if body.starts_with('\t') {
            return Err(DecodeError::TabIndent { line: no });
        }
        let spaces = raw.len() - body.len();
        if spaces % indent != 0 {
            return Err(DecodeError::BadIndent { line: no, indent });
        }
        out.push(Line {
            no,
            depth: spaces / indent,
            text: body.trim_end(),
        });
    }
    Ok(out)
}

/// Parses `[N]`, `[N|]`, `[N\t]` with an optional `{fields}` and the closing
/// colon. Returns the header and the trimmed text after the colon.
fn parse_header(s: &str, line: usize) -> Result<(Header, &str), DecodeError> {
    let bad = DecodeError::BadHeader { line };
    let inner = s.strip_prefix('[').ok_or(bad.clone())?;
    let close = inner.find(']').ok_or(bad.clone())?;
    let bracket = &inner[..close];
    let (digits, delim) = match bracket.chars().last() {
        Some(c) => match Delimiter::from_marker(c) {
            Some(d) => (&bracket[..bracket.len() - c.len_utf8()], d),
            None => (bracket, Delimiter::Comma),
        },
        None => return Err(bad),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad);
    }
    let len: usize = digits.parse().map_err(|_| bad.clone())?;

    let mut rest = &inner[close + 1..];
    let mut fields = None;
    if let Some(after) = rest.strip_prefix('{') {
        let end = find_closing_brace(after).ok_or(bad.clone())?;
        let mut names = Vec::new();
        for raw in split_delimited(&after[..end], delim.as_char()) {
            let raw = raw.trim();
            let (name, used) = parse_key(raw, line)?.ok_or(bad.clone())?;
            if used != raw.len() {
                return Err(bad);
            }
            if names.contains(&name) {
                return Err(DecodeError::DuplicateKey { line, key: name });
            }
            names.push(name);
        }
        fields = Some(names);
        rest = &after[end + 1..];
    }
    let rest = rest.strip_prefix(':').ok_or(bad)?;
    Ok((
        Header {
            len,
            delim,
            fields,
        },
        rest.trim(),
    ))
}

fn find_closing_brace(s: &str) -> Option<usize> {
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
        } else if c == '}' {
            return Some(i);
        }
    }
    None
}

/// Splits a `key: ...` / `key[N]...:` line. `None` means the text is not a
/// field line at all (a bare scalar).
fn parse_entry(text: &str, line: usize) -> Result<Option<(String, Entry<'_>)>, DecodeError> {
    let (key, used) = match parse_key(text, line) {
        Ok(Some(k)) => k,
        Ok(None) => return Ok(None),
        // An unterminated quote here is decided by the scalar parser.
        Err(_) => return Ok(None),
    };
    let rest = &text[used..];
    if rest.starts_with('[') {
        let (header, inline) = parse_header(rest, line)?;
        return Ok(Some((key, Entry::Array(header, inline))));
    }
    match rest.strip_prefix(':') {
        Some(value) => {
            let value = value.trim();
            if value.is_empty() {
                Ok(Some((key, Entry::Nested)))
            } else {
                Ok(Some((key, Entry::Scalar(value))))
            }
        }
        None => Ok(None),
    }
}

fn is_list_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

fn insert_unique(
    map: &mut Map<String, Value>,
    key: String,
    value: Value,
    line: usize,
) -> Result<(), DecodeError> {
    if map.contains_key(&key) {
        return Err(DecodeError::DuplicateKey { line, key });
    }
    map.insert(key, value);
    Ok(())
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    /// Reads field lines at exactly `depth` until a shallower line.
    fn object(&mut self, depth: usize) -> Result<Map<String, Value>, DecodeError> {
        let mut map = Map::new();
        while let Some(line) = self.peek() {
            if line.depth < depth {
                break;
            }
            if line.depth > depth {
                return Err(DecodeError::UnexpectedIndent { line: line.no });
            }
            self.pos += 1;
            let (key, entry) =
                parse_entry(line.text, line.no)?.ok_or(DecodeError::MissingColon { line: line.no })?;
            let value = self.entry_value(entry, line.no, depth + 1)?;
            insert_unique(&mut map, key, value, line.no)?;
        }
        Ok(map)
    }

    fn entry_value(
        &mut self,
        entry: Entry<'a>,
        line: usize,
        child_depth: usize,
    ) -> Result<Value, DecodeError> {
        match entry {
            Entry::Scalar(tok) => parse_scalar(tok, line),
            Entry::Nested => Ok(Value::Object(self.object(child_depth)?)),
            Entry::Array(header, inline) => self.array_body(header, inline, line, child_depth),
        }
    }

    fn array_body(
        &mut self,
        header: Header,
        inline: &str,
        line: usize,
        body_depth: usize,
    ) -> Result<Value, DecodeError> {
        let expected = header.len;
        let delim = header.delim.as_char();

        if let Some(fields) = header.fields {
            if !inline.is_empty() {
                return Err(DecodeError::TrailingContent { line });
            }
            let mut rows = Vec::new();
            for _ in 0..expected {
                let row = self.next_at(body_depth).ok_or(DecodeError::CountMismatch {
                    line,
                    expected,
                    found: rows.len(),
                })?;
                let cells = split_delimited(row.text, delim);
                if cells.len() != fields.len() {
                    return Err(DecodeError::RowWidth {
                        line: row.no,
                        expected: fields.len(),
                        found: cells.len(),
                    });
                }
                let mut obj = Map::new();
                for (name, cell) in fields.iter().zip(cells) {
                    obj.insert(name.clone(), parse_scalar(cell, row.no)?);
                }
                rows.push(Value::Object(obj));
            }
            self.reject_extra(body_depth, line, expected)?;
            return Ok(Value::Array(rows));
        }

        if !inline.is_empty() {
            let cells = split_delimited(inline, delim);
            if cells.len() != expected {
                return Err(DecodeError::CountMismatch {
                    line,
                    expected,
                    found: cells.len(),
                });
            }
            return cells
                .into_iter()
                .map(|c| parse_scalar(c, line))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array);
        }

        let mut items = Vec::new();
        for _ in 0..expected {
            let item = self.next_at(body_depth).ok_or(DecodeError::CountMismatch {
                line,
                expected,
                found: items.len(),
            })?;
            items.push(self.list_item(item)?);
        }
        self.reject_extra(body_depth, line, expected)?;
        Ok(Value::Array(items))
    }

    fn next_at(&mut self, depth: usize) -> Option<Line<'a>> {
        let line = self.peek()?;
        if line.depth != depth {
            return None;
        }
        self.pos += 1;
        Some(line)
    }

    /// Lines left at the body depth mean the header undercounted.
    fn reject_extra(&self, depth: usize, line: usize, expected: usize) -> Result<(), DecodeError> {
        let extra = self.lines[self.pos..]
            .iter()
            .take_while(|l| l.depth >= depth)
            .filter(|l| l.depth == depth)
            .count();
        if extra > 0 {
            return Err(DecodeError::CountMismatch {
                line,
                expected,
                found: expected + extra,
            });
        }
        Ok(())
    }

    fn list_item(&mut self, item: Line<'a>) -> Result<Value, DecodeError> {
        if !is_list_item(item.text) {
            return Err(DecodeError::ExpectedListItem { line: item.no });
        }
        if item.text == "-" {
            return Ok(Value::Object(Map::new()));
        }
        let content = &item.text[2..];

        if content.starts_with('[') {
            let (header, inline) = parse_header(content, item.no)?;
            return self.array_body(header, inline, item.no, item.depth + 1);
        }

        match parse_entry(content, item.no)? {
            Some((key, entry)) => {
                let mut map = Map::new();
                let first = self.entry_value(entry, item.no, item.depth + 2)?;
                map.insert(key, first);
                for (k, v) in self.object(item.depth + 1)? {
                    insert_unique(&mut map, k, v, item.no)?;
                }
                Ok(Value::Object(map))
            }
            None => parse_scalar(content, item.no),
        }
    }
}
