//! Classification of JSON values.

use serde_json::{Number, Value};

use crate::{FalsyKind, Testable};

impl Testable for Number {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        let zero = match (self.as_i64(), self.as_u64(), self.as_f64()) {
            (Some(i), _, _) => i == 0,
            (_, Some(u), _) => u == 0,
            (_, _, Some(f)) => f == 0.0,
            _ => false,
        };
        zero.then_some(FalsyKind::Zero)
    }
}

impl Testable for Value {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        match self {
            Value::Null => Some(FalsyKind::Null),
            Value::Bool(b) => b.falsy_kind(),
            Value::Number(n) => n.falsy_kind(),
            Value::String(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }
}
