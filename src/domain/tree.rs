use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Runtime kind of a data tree node.
///
/// Numbers are split into integer and float: `1` and `1.0` are different
/// kinds, so a codec that turns one into the other is caught as a type
/// mismatch rather than passing silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Object,
    Array,
    String,
    Integer,
    Float,
    Boolean,
    Null,
}

impl Kind {
    pub fn of(v: &Value) -> Kind {
        match v {
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
            Value::String(_) => Kind::String,
            Value::Number(n) if n.is_f64() => Kind::Float,
            Value::Number(_) => Kind::Integer,
            Value::Bool(_) => Kind::Boolean,
            Value::Null => Kind::Null,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

/// Location inside a data tree, rendered as `$`, `$.a.b[0]` or `$["odd key"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: &str) -> Path {
        let mut steps = self.steps.clone();
        steps.push(PathStep::Key(key.to_string()));
        Path { steps }
    }

    pub fn index(&self, i: usize) -> Path {
        let mut steps = self.steps.clone();
        steps.push(PathStep::Index(i));
        Path { steps }
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for step in &self.steps {
            match step {
                PathStep::Key(k) if is_plain_key(k) => write!(f, ".{}", k)?,
                PathStep::Key(k) => write!(f, "[{}]", Value::String(k.clone()))?,
                PathStep::Index(i) => write!(f, "[{}]", i)?,
            }
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MismatchKind {
    TypeMismatch {
        left: Kind,
        right: Kind,
    },
    MappingSize {
        left_len: usize,
        right_len: usize,
        only_in_left: Vec<String>,
        only_in_right: Vec<String>,
    },
    MissingKey {
        key: String,
        only_in_left: Vec<String>,
        only_in_right: Vec<String>,
    },
    SequenceLength {
        left_len: usize,
        right_len: usize,
    },
    ValueMismatch {
        left: Value,
        right: Value,
    },
}

/// First point of divergence between two data trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MismatchReport {
    pub path: Path,
    #[serde(flatten)]
    pub kind: MismatchKind,
}

fn key_list(keys: &[String]) -> String {
    if keys.is_empty() {
        return "none".to_string();
    }
    keys.iter()
        .map(|k| Value::String(k.clone()).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = &self.path;
        match &self.kind {
            MismatchKind::TypeMismatch { left, right } => {
                write!(f, "type mismatch at {}: {} vs {}", path, left, right)
            }
            MismatchKind::MappingSize {
                left_len,
                right_len,
                only_in_left,
                only_in_right,
            } => write!(
                f,
                "mapping size mismatch at {}: {} keys vs {} keys (only in left: {}; only in right: {})",
                path,
                left_len,
                right_len,
                key_list(only_in_left),
                key_list(only_in_right)
            ),
            MismatchKind::MissingKey {
                key,
                only_in_left,
                only_in_right,
            } => write!(
                f,
                "key {} missing at {} (only in left: {}; only in right: {})",
                Value::String(key.clone()),
                path,
                key_list(only_in_left),
                key_list(only_in_right)
            ),
            MismatchKind::SequenceLength {
                left_len,
                right_len,
            } => write!(
                f,
                "sequence length mismatch at {}: {} vs {}",
                path, left_len, right_len
            ),
            MismatchKind::ValueMismatch { left, right } => {
                write!(f, "value mismatch at {}: {} vs {}", path, left, right)
            }
        }
    }
}
