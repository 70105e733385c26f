//! Writer lambda checks
//!
//! A writer is either a bare body string, which takes the expected
//! signature, or a mapping spelling out `body`, `params` and `return_type`.
//! Declared signatures are compared against the expected one; bodies are
//! scanned for balanced delimiters and for `return` statements that yield a
//! value.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::keys;
use crate::schema::{LambdaParam, LambdaSignature};

use super::ValidationError;

const LAMBDA_KEYS: [&str; 3] = [keys::LAMBDA_BODY, keys::LAMBDA_PARAMS, keys::LAMBDA_RETURN_TYPE];

// Return type reported for bodies that return a value
const VALUE_RETURN_TYPE: &str = "auto";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Lambda {
    pub signature: LambdaSignature,
    pub body: String,
}

pub(super) fn check_lambda(
    key: &str,
    value: &Value,
    expected: &LambdaSignature,
) -> Result<Lambda, ValidationError> {
    let (body, declared) = match value {
        Value::String(body) => (body.clone(), expected.clone()),
        Value::Object(map) => parse_lambda_object(key, map, expected)?,
        other => {
            return Err(ValidationError::InvalidType {
                key: key.to_string(),
                expected: "a lambda",
                actual: super::describe_value(other),
            })
        }
    };

    if !signatures_match(&declared, expected) {
        return Err(signature_error(key, expected, &declared));
    }

    let facts = scan_body(&body).map_err(|reason| ValidationError::LambdaSyntaxError {
        key: key.to_string(),
        reason,
    })?;
    if facts.returns_value && normalize_type(&expected.return_type) == "void" {
        let actual = LambdaSignature::new(declared.params.clone(), VALUE_RETURN_TYPE);
        return Err(signature_error(key, expected, &actual));
    }

    log::trace!("Writer lambda '{key}' matches {expected}");
    Ok(Lambda {
        signature: declared,
        body: body.trim().to_string(),
    })
}

fn signature_error(key: &str, expected: &LambdaSignature, actual: &LambdaSignature) -> ValidationError {
    ValidationError::LambdaSignatureError {
        key: key.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

fn parse_lambda_object(
    key: &str,
    map: &Map<String, Value>,
    expected: &LambdaSignature,
) -> Result<(String, LambdaSignature), ValidationError> {
    if let Some(unknown) = map.keys().find(|k| !LAMBDA_KEYS.contains(&k.as_str())) {
        return Err(ValidationError::UnknownField {
            key: format!("{key}.{unknown}"),
            suggestions: crate::helpers::suggest(unknown, LAMBDA_KEYS),
        });
    }

    let body = match map.get(keys::LAMBDA_BODY) {
        Some(Value::String(body)) => body.clone(),
        Some(other) => {
            return Err(ValidationError::InvalidType {
                key: format!("{key}.{}", keys::LAMBDA_BODY),
                expected: "a string",
                actual: super::describe_value(other),
            })
        }
        None => {
            return Err(ValidationError::MissingRequiredField {
                key: format!("{key}.{}", keys::LAMBDA_BODY),
            })
        }
    };

    let params = match map.get(keys::LAMBDA_PARAMS) {
        None => expected.params.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| parse_param(key, item))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ValidationError::InvalidType {
                key: format!("{key}.{}", keys::LAMBDA_PARAMS),
                expected: "a list of parameters",
                actual: super::describe_value(other),
            })
        }
    };

    let return_type = match map.get(keys::LAMBDA_RETURN_TYPE) {
        None => expected.return_type.clone(),
        Some(Value::String(t)) => t.clone(),
        Some(other) => {
            return Err(ValidationError::InvalidType {
                key: format!("{key}.{}", keys::LAMBDA_RETURN_TYPE),
                expected: "a type name",
                actual: super::describe_value(other),
            })
        }
    };

    Ok((body, LambdaSignature::new(params, return_type)))
}

fn parse_param(key: &str, item: &Value) -> Result<LambdaParam, ValidationError> {
    let type_name = item.get(keys::LAMBDA_PARAM_TYPE).and_then(Value::as_str);
    let name = item.get(keys::LAMBDA_PARAM_NAME).and_then(Value::as_str);
    match (type_name, name) {
        (Some(type_name), Some(name)) => Ok(LambdaParam::new(type_name, name)),
        _ => Err(ValidationError::InvalidType {
            key: format!("{key}.{}", keys::LAMBDA_PARAMS),
            expected: "parameters with 'type' and 'name'",
            actual: super::describe_value(item),
        }),
    }
}

fn signatures_match(declared: &LambdaSignature, expected: &LambdaSignature) -> bool {
    normalize_type(&declared.return_type) == normalize_type(&expected.return_type)
        && declared.params.len() == expected.params.len()
        && declared.params.iter().zip(&expected.params).all(|(d, e)| {
            normalize_type(&d.type_name) == normalize_type(&e.type_name) && d.name.trim() == e.name
        })
}

/// Collapse whitespace so `Foo&`, `Foo &` and `Foo  &` compare equal
fn normalize_type(type_name: &str) -> String {
    let mut out = String::new();
    for word in type_name.split_whitespace() {
        let joins = out.ends_with(|c: char| "&*:<>,".contains(c))
            || word.starts_with(|c: char| "&*:<>,".contains(c));
        if !out.is_empty() && !joins {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[derive(Debug, Default, PartialEq, Eq)]
struct BodyFacts {
    returns_value: bool,
}

struct Frame {
    open: char,
    // '(' directly after ']' holds lambda parameters; '{' opened a lambda body
    lambda: bool,
}

fn scan_body(body: &str) -> Result<BodyFacts, String> {
    let chars: Vec<char> = body.chars().collect();
    let mut facts = BodyFacts::default();
    let mut stack: Vec<Frame> = Vec::new();
    let mut prev: Option<char> = None;
    let mut pending_lambda = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i = skip_block_comment(&chars, i)?;
                continue;
            }
            '"' => {
                i = skip_quoted(&chars, i, '"')?;
                prev = Some('"');
                continue;
            }
            '\'' if !prev.is_some_and(|p| p.is_ascii_digit()) => {
                i = skip_quoted(&chars, i, '\'')?;
                prev = Some('\'');
                continue;
            }
            '(' | '[' => stack.push(Frame {
                open: c,
                lambda: c == '(' && prev == Some(']'),
            }),
            '{' => {
                stack.push(Frame {
                    open: c,
                    lambda: pending_lambda || prev == Some(']'),
                });
                pending_lambda = false;
            }
            ')' | ']' | '}' => {
                let open = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some(frame) if frame.open == open => {
                        if c == ')' && frame.lambda {
                            pending_lambda = true;
                        }
                    }
                    Some(frame) => {
                        return Err(format!("'{c}' does not close '{}'", frame.open));
                    }
                    None => return Err(format!("unexpected '{c}'")),
                }
            }
            ';' => pending_lambda = false,
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let in_nested_lambda = stack.iter().any(|f| f.open == '{' && f.lambda);
                if word == "return" && !in_nested_lambda && next_significant(&chars, i) != Some(';') {
                    facts.returns_value = true;
                }
                prev = chars.get(i - 1).copied();
                continue;
            }
            _ => {}
        }
        if !c.is_whitespace() {
            prev = Some(c);
        }
        i += 1;
    }

    match stack.last() {
        Some(frame) => Err(format!("'{}' is never closed", frame.open)),
        None => Ok(facts),
    }
}

fn skip_block_comment(chars: &[char], start: usize) -> Result<usize, String> {
    let mut i = start + 2;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return Ok(i + 2);
        }
        i += 1;
    }
    Err("unterminated block comment".to_string())
}

fn skip_quoted(chars: &[char], start: usize, quote: char) -> Result<usize, String> {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return Ok(i + 1),
            '\n' => break,
            _ => i += 1,
        }
    }
    Err(if quote == '"' {
        "unterminated string literal".to_string()
    } else {
        "unterminated character literal".to_string()
    })
}

fn next_significant(chars: &[char], mut i: usize) -> Option<char> {
    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => match skip_block_comment(chars, i) {
                Ok(next) => i = next,
                Err(_) => return None,
            },
            c => return Some(c),
        }
    }
    None
}
