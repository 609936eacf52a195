//! Structural equality over data trees.
//!
//! Depth-first and short-circuiting: the first mismatch is returned as-is
//! from the level that found it. Mapping order never matters, sequence order
//! always does, and the node kind is part of equality.

use crate::domain::tree::{Kind, MismatchKind, MismatchReport, Path};
use serde_json::{Map, Value};

pub fn compare_root(a: &Value, b: &Value) -> Result<(), MismatchReport> {
    compare(a, b, &Path::root())
}

pub fn compare(a: &Value, b: &Value, path: &Path) -> Result<(), MismatchReport> {
    let (left, right) = (Kind::of(a), Kind::of(b));
    if left != right {
        return Err(mismatch(path.clone(), MismatchKind::TypeMismatch { left, right }));
    }

    match (a, b) {
        (Value::Object(ma), Value::Object(mb)) => compare_maps(ma, mb, path),
        (Value::Array(xa), Value::Array(xb)) => {
            if xa.len() != xb.len() {
                return Err(mismatch(
                    path.clone(),
                    MismatchKind::SequenceLength {
                        left_len: xa.len(),
                        right_len: xb.len(),
                    },
                ));
            }
            for (i, (x, y)) in xa.iter().zip(xb).enumerate() {
                compare(x, y, &path.index(i))?;
            }
            Ok(())
        }
        _ if scalars_equal(a, b) => Ok(()),
        _ => Err(mismatch(
            path.clone(),
            MismatchKind::ValueMismatch {
                left: a.clone(),
                right: b.clone(),
            },
        )),
    }
}

fn compare_maps(
    ma: &Map<String, Value>,
    mb: &Map<String, Value>,
    path: &Path,
) -> Result<(), MismatchReport> {
    if ma.len() != mb.len() {
        let (only_in_left, only_in_right) = key_difference(ma, mb);
        return Err(mismatch(
            path.clone(),
            MismatchKind::MappingSize {
                left_len: ma.len(),
                right_len: mb.len(),
                only_in_left,
                only_in_right,
            },
        ));
    }
    for (key, va) in ma {
        let child = path.key(key);
        match mb.get(key) {
            Some(vb) => compare(va, vb, &child)?,
            None => {
                let (only_in_left, only_in_right) = key_difference(ma, mb);
                return Err(mismatch(
                    child,
                    MismatchKind::MissingKey {
                        key: key.clone(),
                        only_in_left,
                        only_in_right,
                    },
                ));
            }
        }
    }
    Ok(())
}

/// Keys only in `a` and keys only in `b`, each sorted.
fn key_difference(a: &Map<String, Value>, b: &Map<String, Value>) -> (Vec<String>, Vec<String>) {
    let mut left: Vec<String> = a.keys().filter(|k| !b.contains_key(*k)).cloned().collect();
    let mut right: Vec<String> = b.keys().filter(|k| !a.contains_key(*k)).cloned().collect();
    left.sort();
    right.sort();
    (left, right)
}

/// Kinds already match here. Floats compare numerically so `-0.0 == 0.0`.
fn scalars_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_f64() => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn mismatch(path: Path, kind: MismatchKind) -> MismatchReport {
    MismatchReport { path, kind }
}
