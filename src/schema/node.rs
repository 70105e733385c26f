use serde::Serialize;
use serde_json::Value;

use super::Schema;

/// One accepted choice of an enumerated node
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnumChoice {
    /// Literal accepted in the configuration document
    pub name: &'static str,
    /// Symbol emitted into generated code
    pub symbol: &'static str,
}

/// Signature a writer lambda has to match
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LambdaSignature {
    pub params: Vec<LambdaParam>,
    pub return_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LambdaParam {
    pub type_name: String,
    pub name: String,
}

impl LambdaSignature {
    pub fn new(params: Vec<LambdaParam>, return_type: impl Into<String>) -> Self {
        Self {
            params,
            return_type: return_type.into(),
        }
    }
}

impl LambdaParam {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for LambdaSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self
            .params
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}({})", self.return_type, params)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueKind {
    /// Declares a new driver instance of the given C++ type
    IdDeclaration { type_name: &'static str },
    /// Refers to an identifier declared elsewhere in the build
    IdReference,
    IntRange { min: i64, max: i64 },
    Float,
    Boolean,
    /// Time period, normalized to milliseconds
    Duration,
    Enumerated { choices: Vec<EnumChoice> },
    Nested { schema: Schema },
    Lambda { signature: LambdaSignature },
}

impl ValueKind {
    /// Short human-readable name used in type errors
    pub fn describe(&self) -> &'static str {
        match self {
            ValueKind::IdDeclaration { .. } | ValueKind::IdReference => "an identifier",
            ValueKind::IntRange { .. } => "an integer",
            ValueKind::Float => "a number",
            ValueKind::Boolean => "a boolean",
            ValueKind::Duration => "a time period",
            ValueKind::Enumerated { .. } => "one of a fixed set of values",
            ValueKind::Nested { .. } => "a mapping",
            ValueKind::Lambda { .. } => "a lambda",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
}

/// Describes one accepted configuration key
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SchemaNode {
    pub key: &'static str,
    #[serde(flatten)]
    pub kind: ValueKind,
    pub presence: Presence,
    /// Raw default, normalized the same way as user input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Locked nodes keep their first definition when schemas are merged
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
}

impl SchemaNode {
    pub fn required(key: &'static str, kind: ValueKind) -> Self {
        Self {
            key,
            kind,
            presence: Presence::Required,
            default: None,
            locked: false,
        }
    }

    pub fn optional(key: &'static str, kind: ValueKind) -> Self {
        Self {
            key,
            kind,
            presence: Presence::Optional,
            default: None,
            locked: false,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}
