//! Validation of configuration documents against a composed schema
//!
//! [`validate`] checks every key of a [`ConfigDocument`] against a
//! [`Schema`] and produces a [`NormalizedDocument`] holding typed values,
//! with defaults filled in for absent optional keys. All problems of one
//! document are collected rather than stopping at the first.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::document::ConfigDocument;
use crate::helpers::suggest;
use crate::schema::{EnumChoice, Schema, ValueKind};

mod error;
mod identifier;
mod lambda;
mod time_period;

pub use error::{ValidationError, ValidationErrors};
pub use identifier::Identifier;
pub use lambda::Lambda;
pub use time_period::TimePeriod;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Identifier(Identifier),
    Int(i64),
    Float(f64),
    Bool(bool),
    TimePeriod(TimePeriod),
    Choice(EnumChoice),
    Lambda(Lambda),
    Nested(NormalizedDocument),
}

/// Typed, default-filled view of a validated document
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedDocument {
    values: BTreeMap<String, TypedValue>,
}

impl NormalizedDocument {
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: TypedValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn identifier(&self, key: &str) -> Option<&Identifier> {
        match self.get(key) {
            Some(TypedValue::Identifier(id)) => Some(id),
            _ => None,
        }
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(TypedValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(TypedValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(TypedValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn time_period(&self, key: &str) -> Option<TimePeriod> {
        match self.get(key) {
            Some(TypedValue::TimePeriod(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn choice(&self, key: &str) -> Option<&EnumChoice> {
        match self.get(key) {
            Some(TypedValue::Choice(v)) => Some(v),
            _ => None,
        }
    }

    pub fn lambda(&self, key: &str) -> Option<&Lambda> {
        match self.get(key) {
            Some(TypedValue::Lambda(v)) => Some(v),
            _ => None,
        }
    }

    pub fn nested(&self, key: &str) -> Option<&NormalizedDocument> {
        match self.get(key) {
            Some(TypedValue::Nested(v)) => Some(v),
            _ => None,
        }
    }
}

/// Validate a document against a schema
///
/// Unknown keys are reported in document order, then every schema node is
/// checked in schema order.
pub fn validate(
    schema: &Schema,
    document: &ConfigDocument,
) -> Result<NormalizedDocument, ValidationErrors> {
    let mut errors = Vec::new();

    for key in document.keys() {
        if !schema.contains(key) {
            errors.push(ValidationError::UnknownField {
                key: key.to_string(),
                suggestions: suggest(key, schema.keys()),
            });
        }
    }

    let mut normalized = NormalizedDocument::default();
    for node in schema.nodes() {
        if let Some(actual) = document.unreadable(node.key) {
            errors.push(ValidationError::InvalidType {
                key: node.key.to_string(),
                expected: node.kind.describe(),
                actual: actual.to_string(),
            });
            continue;
        }
        let supplied = document.get(node.key).filter(|v| !v.is_null());
        match supplied.or(node.default.as_ref()) {
            Some(raw) => match normalize_value(node.key, &node.kind, raw) {
                Ok(value) => normalized.insert(node.key, value),
                Err(mut node_errors) => errors.append(&mut node_errors),
            },
            None if node.is_required() => errors.push(ValidationError::MissingRequiredField {
                key: node.key.to_string(),
            }),
            None => {}
        }
    }

    match ValidationErrors::new(errors) {
        Some(errors) => {
            log::debug!("Document rejected with {} error(s)", errors.len());
            Err(errors)
        }
        None => {
            log::trace!("Document normalized to {} field(s)", normalized.len());
            Ok(normalized)
        }
    }
}

fn normalize_value(
    key: &str,
    kind: &ValueKind,
    raw: &Value,
) -> Result<TypedValue, Vec<ValidationError>> {
    let value = match kind {
        ValueKind::IdDeclaration { .. } | ValueKind::IdReference => {
            parse_identifier(key, raw).map(TypedValue::Identifier)
        }
        ValueKind::IntRange { min, max } => parse_int(key, raw).and_then(|value| {
            if (*min..=*max).contains(&value) {
                Ok(TypedValue::Int(value))
            } else {
                Err(ValidationError::RangeError {
                    key: key.to_string(),
                    value,
                    min: *min,
                    max: *max,
                })
            }
        }),
        ValueKind::Float => parse_float(key, raw).map(TypedValue::Float),
        ValueKind::Boolean => parse_bool(key, raw).map(TypedValue::Bool),
        ValueKind::Duration => TimePeriod::from_value(raw)
            .map(TypedValue::TimePeriod)
            .map_err(|reason| ValidationError::InvalidTimePeriod {
                key: key.to_string(),
                value: display_value(raw),
                reason,
            }),
        ValueKind::Enumerated { choices } => parse_choice(key, raw, choices).map(TypedValue::Choice),
        ValueKind::Lambda { signature } => {
            lambda::check_lambda(key, raw, signature).map(TypedValue::Lambda)
        }
        ValueKind::Nested { schema } => {
            return match raw {
                Value::Object(map) => validate(schema, &ConfigDocument::from_map(map.clone()))
                    .map(TypedValue::Nested)
                    .map_err(|errors| {
                        errors
                            .into_vec()
                            .into_iter()
                            .map(|e| e.nested_under(key))
                            .collect()
                    }),
                other => Err(vec![type_error(key, kind, other)]),
            };
        }
    };
    value.map_err(|e| vec![e])
}

fn type_error(key: &str, kind: &ValueKind, raw: &Value) -> ValidationError {
    ValidationError::InvalidType {
        key: key.to_string(),
        expected: kind.describe(),
        actual: describe_value(raw),
    }
}

fn parse_identifier(key: &str, raw: &Value) -> Result<Identifier, ValidationError> {
    let Value::String(s) = raw else {
        return Err(ValidationError::InvalidType {
            key: key.to_string(),
            expected: "an identifier",
            actual: describe_value(raw),
        });
    };
    Identifier::parse(s).map_err(|reason| ValidationError::InvalidIdentifier {
        key: key.to_string(),
        value: s.clone(),
        reason,
    })
}

fn parse_int(key: &str, raw: &Value) -> Result<i64, ValidationError> {
    let parsed = match raw {
        Value::Number(n) => whole_number(n),
        Value::String(s) => parse_int_literal(s),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::InvalidType {
        key: key.to_string(),
        expected: "an integer",
        actual: describe_value(raw),
    })
}

/// Integers, and floats without a fractional part
fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Decimal, or `0x`/`0o`/`0b` prefixed, with an optional sign
fn parse_int_literal(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, digits) = match digits.get(..2) {
        Some("0x") | Some("0X") => (16, &digits[2..]),
        Some("0o") | Some("0O") => (8, &digits[2..]),
        Some("0b") | Some("0B") => (2, &digits[2..]),
        _ => (10, digits),
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_float(key: &str, raw: &Value) -> Result<f64, ValidationError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::InvalidType {
        key: key.to_string(),
        expected: "a number",
        actual: describe_value(raw),
    })
}

fn parse_bool(key: &str, raw: &Value) -> Result<bool, ValidationError> {
    let parsed = match raw {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "enable" => Some(true),
            "false" | "no" | "off" | "disable" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::InvalidType {
        key: key.to_string(),
        expected: "a boolean",
        actual: describe_value(raw),
    })
}

fn parse_choice(key: &str, raw: &Value, choices: &[EnumChoice]) -> Result<EnumChoice, ValidationError> {
    let label = match raw {
        Value::Number(n) => whole_number(n).map_or_else(|| n.to_string(), |i| i.to_string()),
        Value::String(s) => s.trim().trim_end_matches('°').to_string(),
        other => return Err(type_error(key, &ValueKind::Enumerated { choices: vec![] }, other)),
    };
    choices
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(&label))
        .cloned()
        .ok_or_else(|| ValidationError::InvalidChoice {
            key: key.to_string(),
            value: display_value(raw),
            choices: choices.iter().map(|c| c.name.to_string()).collect(),
        })
}

/// The raw value as the author wrote it
fn display_value(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The raw value with a hint of its type, for type errors
pub(crate) fn describe_value(raw: &Value) -> String {
    match raw {
        Value::Null => "nothing".to_string(),
        Value::String(s) => format!("string '{s}'"),
        Value::Array(_) => "a list".to_string(),
        Value::Object(_) => "a mapping".to_string(),
        other => other.to_string(),
    }
}
