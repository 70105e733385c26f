use itertools::Itertools;
use thiserror::Error;

/// A user-facing problem with one configured instance
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("required field '{key}' is missing")]
    MissingRequiredField { key: String },

    #[error("unknown field '{key}'{}", did_you_mean(.suggestions))]
    UnknownField {
        key: String,
        suggestions: Vec<String>,
    },

    #[error("value {value} for '{key}' is out of range [{min}, {max}]")]
    RangeError {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("lambda '{key}' has signature {actual}, expected {expected}")]
    LambdaSignatureError {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("lambda '{key}' is malformed: {reason}")]
    LambdaSyntaxError { key: String, reason: String },

    #[error("'{key}' expects {expected}, got {actual}")]
    InvalidType {
        key: String,
        expected: &'static str,
        actual: String,
    },

    #[error("'{value}' is not a valid choice for '{key}' (one of: {})", .choices.join(", "))]
    InvalidChoice {
        key: String,
        value: String,
        choices: Vec<String>,
    },

    #[error("'{value}' is not a valid identifier for '{key}': {reason}")]
    InvalidIdentifier {
        key: String,
        value: String,
        reason: String,
    },

    #[error("'{value}' is not a valid time period for '{key}': {reason}")]
    InvalidTimePeriod {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown platform '{platform}'{}", did_you_mean(.suggestions))]
    UnknownPlatform {
        platform: String,
        suggestions: Vec<String>,
    },

    #[error("identifier '{id}' is already in use")]
    DuplicateIdentifier { id: String },

    #[error("'{key}' refers to '{id}', which is a display, not an I2C bus")]
    BusIsDisplay { key: String, id: String },

    #[error("malformed display entry: {reason}")]
    MalformedInstance { reason: String },
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(
            " (did you mean {}?)",
            suggestions.iter().map(|s| format!("'{s}'")).join(" or ")
        )
    }
}

impl ValidationError {
    /// The configuration key the error refers to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            ValidationError::MissingRequiredField { key }
            | ValidationError::UnknownField { key, .. }
            | ValidationError::RangeError { key, .. }
            | ValidationError::LambdaSignatureError { key, .. }
            | ValidationError::LambdaSyntaxError { key, .. }
            | ValidationError::InvalidType { key, .. }
            | ValidationError::InvalidChoice { key, .. }
            | ValidationError::InvalidIdentifier { key, .. }
            | ValidationError::InvalidTimePeriod { key, .. }
            | ValidationError::BusIsDisplay { key, .. } => Some(key),
            ValidationError::UnknownPlatform { .. }
            | ValidationError::DuplicateIdentifier { .. }
            | ValidationError::MalformedInstance { .. } => None,
        }
    }

    /// Prefix the key with the path of the enclosing mapping
    pub(crate) fn nested_under(mut self, parent: &str) -> Self {
        match &mut self {
            ValidationError::MissingRequiredField { key }
            | ValidationError::UnknownField { key, .. }
            | ValidationError::RangeError { key, .. }
            | ValidationError::LambdaSignatureError { key, .. }
            | ValidationError::LambdaSyntaxError { key, .. }
            | ValidationError::InvalidType { key, .. }
            | ValidationError::InvalidChoice { key, .. }
            | ValidationError::InvalidIdentifier { key, .. }
            | ValidationError::InvalidTimePeriod { key, .. }
            | ValidationError::BusIsDisplay { key, .. } => {
                *key = format!("{parent}.{key}");
            }
            ValidationError::UnknownPlatform { .. }
            | ValidationError::DuplicateIdentifier { .. }
            | ValidationError::MalformedInstance { .. } => {}
        }
        self
    }
}

/// All errors found for one instance; never empty
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", .0.iter().map(|e| format!("  - {e}")).join("\n"))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn single(error: ValidationError) -> Self {
        Self(vec![error])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> &ValidationError {
        &self.0[0]
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_message() {
        let error = ValidationError::RangeError {
            key: "width".into(),
            value: 0,
            min: 1,
            max: 144,
        };
        assert_eq!(error.to_string(), "value 0 for 'width' is out of range [1, 144]");
    }

    #[test]
    fn unknown_field_lists_suggestions() {
        let error = ValidationError::UnknownField {
            key: "widht".into(),
            suggestions: vec!["width".into()],
        };
        assert_eq!(error.to_string(), "unknown field 'widht' (did you mean 'width'?)");

        let error = ValidationError::UnknownField {
            key: "colour".into(),
            suggestions: vec![],
        };
        assert_eq!(error.to_string(), "unknown field 'colour'");
    }

    #[test]
    fn nested_errors_carry_the_path() {
        let error = ValidationError::MissingRequiredField { key: "x".into() }.nested_under("outer");
        assert_eq!(error.key(), Some("outer.x"));
    }

    #[test]
    fn empty_error_list_is_not_an_error() {
        assert!(ValidationErrors::new(vec![]).is_none());
    }
}
