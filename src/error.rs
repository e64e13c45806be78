//! Error types for resource resolution.
//!
//! All errors that can occur while configuring, loading or reading a
//! statistic are represented by the `StatError` enum.

use crate::field::FieldType;
use thiserror::Error;

/// Format a list of fields as a readable string.
fn format_fields(fields: &[FieldType]) -> String {
    if fields.is_empty() {
        return String::from("(none)");
    }
    fields
        .iter()
        .map(|field| field.param_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur during resource resolution.
///
/// # Examples
///
/// ```rust
/// use courtstat::StatError;
///
/// let err = StatError::NotLoaded(String::from("boxscoresummaryv2"));
/// println!("{}", err); // "Statistic boxscoresummaryv2 has not been loaded"
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatError {
    /// One or more required fields are absent (or `null`) in the field map.
    ///
    /// Raised by `load`. Lists every missing field in the order the
    /// statistic declares them.
    #[error("Missing required fields for {endpoint}: {}", format_fields(.fields))]
    MissingRequiredField {
        endpoint: String,
        fields: Vec<FieldType>,
    },

    /// A field value could not be encoded as JSON.
    ///
    /// Raised by `FieldMap::set`; the previous value is kept.
    #[error("Invalid value for field {field}: {reason}")]
    InvalidField { field: FieldType, reason: String },

    /// A type description did not match any known type of the statistic kind.
    #[error("Unknown {kind} type: {value:?}")]
    UnknownType { kind: &'static str, value: String },

    /// An item was read before the statistic was loaded, or after the
    /// cache went stale.
    #[error("Statistic {0} has not been loaded")]
    NotLoaded(String),

    /// The loaded response has no result set at the requested index.
    #[error("Item index {index} out of range for {endpoint} ({available} result sets)")]
    IndexOutOfRange {
        endpoint: String,
        index: usize,
        available: usize,
    },

    /// The element has no statistic registered for the feature, or the
    /// registered statistic is of another kind.
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// The connection failed to deliver a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Connection configuration was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StatError::NotLoaded(String::from("teamdetails"));
        assert!(err.to_string().contains("teamdetails"));
    }

    #[test]
    fn test_missing_fields_display() {
        let err = StatError::MissingRequiredField {
            endpoint: String::from("boxscoresummaryv2"),
            fields: vec![FieldType::GameId, FieldType::Season],
        };
        let display = err.to_string();
        assert!(display.contains("boxscoresummaryv2"));
        assert!(display.contains("GameID, Season"));
    }

    #[test]
    fn test_unknown_type_display() {
        let err = StatError::UnknownType {
            kind: "box score",
            value: String::from("bogus"),
        };
        assert_eq!(err.to_string(), "Unknown box score type: \"bogus\"");
    }

    #[test]
    fn test_invalid_field_display() {
        let err = StatError::InvalidField {
            field: FieldType::Season,
            reason: String::from("key must be a string"),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for field Season: key must be a string"
        );
    }
}
