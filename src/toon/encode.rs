use serde_json::{Map, Value};

use super::literal::{encode_key, encode_scalar, is_scalar};
use super::EncodeOptions;

/// Encodes a tree as a TOON document. Lines are joined with `\n` and the
/// document has no trailing newline.
pub fn encode(value: &Value, opts: &EncodeOptions) -> String {
    let mut w = Writer {
        lines: Vec::new(),
        opts: *opts,
    };
    match value {
        Value::Object(map) => w.fields(map, 0),
        Value::Array(items) => w.array("", items, 0, 1),
        scalar => w.lines.push(encode_scalar(scalar)),
    }
    w.lines.join("\n")
}

struct Writer {
    lines: Vec<String>,
    opts: EncodeOptions,
}

impl Writer {
    fn push(&mut self, depth: usize, text: String) {
        let pad = " ".repeat(depth * self.opts.indent);
        self.lines.push(format!("{}{}", pad, text));
    }

    fn fields(&mut self, map: &Map<String, Value>, depth: usize) {
        for (k, v) in map {
            self.field(&encode_key(k), v, depth);
        }
    }

    fn field(&mut self, key: &str, v: &Value, depth: usize) {
        match v {
            Value::Object(m) => {
                self.push(depth, format!("{}:", key));
                self.fields(m, depth + 1);
            }
            Value::Array(items) => self.array(key, items, depth, depth + 1),
            scalar => self.push(depth, format!("{}: {}", key, encode_scalar(scalar))),
        }
    }

    /// Writes an array header at `line_depth` and its body at `body_depth`.
    /// `prefix` is whatever precedes `[N]` on the header line.
    fn array(&mut self, prefix: &str, items: &[Value], line_depth: usize, body_depth: usize) {
        let delim = self.opts.delimiter;
        let sep = delim.as_char().to_string();
        let head = format!("{}[{}{}]", prefix, items.len(), delim.header_marker());

        if items.iter().all(is_scalar) {
            if items.is_empty() {
                self.push(line_depth, format!("{}:", head));
            } else {
                let joined = items
                    .iter()
                    .map(encode_scalar)
                    .collect::<Vec<_>>()
                    .join(&sep);
                self.push(line_depth, format!("{}: {}", head, joined));
            }
            return;
        }

        if let Some(fields) = tabular_fields(items) {
            let header = fields
                .iter()
                .map(|f| encode_key(f))
                .collect::<Vec<_>>()
                .join(&sep);
            self.push(line_depth, format!("{}{{{}}}:", head, header));
            for item in items {
                if let Value::Object(m) = item {
                    let row = m.values().map(encode_scalar).collect::<Vec<_>>().join(&sep);
                    self.push(body_depth, row);
                }
            }
            return;
        }

        self.push(line_depth, format!("{}:", head));
        for item in items {
            self.list_item(item, body_depth);
        }
    }

    fn list_item(&mut self, item: &Value, depth: usize) {
        match item {
            Value::Array(inner) => self.array("- ", inner, depth, depth + 1),
            Value::Object(m) => {
                let mut entries = m.iter();
                let (first_key, first_value) = match entries.next() {
                    Some(entry) => entry,
                    None => {
                        self.push(depth, "-".to_string());
                        return;
                    }
                };
                // The first field shares the hyphen line, so its children
                // sit one level deeper than the sibling fields.
                let key = format!("- {}", encode_key(first_key));
                match first_value {
                    Value::Object(nested) => {
                        self.push(depth, format!("{}:", key));
                        self.fields(nested, depth + 2);
                    }
                    Value::Array(inner) => self.array(&key, inner, depth, depth + 2),
                    scalar => self.push(depth, format!("{}: {}", key, encode_scalar(scalar))),
                }
                for (k, v) in entries {
                    self.field(&encode_key(k), v, depth + 1);
                }
            }
            scalar => self.push(depth, format!("- {}", encode_scalar(scalar))),
        }
    }
}

/// Field names when every element is a non-empty object with the same keys
/// in the same order and only scalar values.
fn tabular_fields(items: &[Value]) -> Option<Vec<&String>> {
    let first = match items.first()? {
        Value::Object(m) if !m.is_empty() => m,
        _ => return None,
    };
    let fields: Vec<&String> = first.keys().collect();
    for item in items {
        let m = match item {
            Value::Object(m) => m,
            _ => return None,
        };
        if m.len() != fields.len() {
            return None;
        }
        for ((k, v), f) in m.iter().zip(&fields) {
            if k != *f || !is_scalar(v) {
                return None;
            }
        }
    }
    Some(fields)
}
