//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty or blank when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Field was explicitly null but must have a value
    Null { field: &'static str },

    /// Value doesn't parse (e.g., a non-numeric id)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Number above the accepted maximum
    TooLarge { field: &'static str, max: u32 },

    /// Value isn't one of the accepted variants
    InvalidVariant {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::Null { field } => write!(f, "{} cannot be null", field),
            Self::TooLarge { field, max } => write!(f, "{} must be at most {}", field, max),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant {
                field,
                value,
                expected,
            } => {
                write!(f, "invalid {} value: '{}' (expected {})", field, value, expected)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "name",
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "name exceeds maximum length of 255 characters"
        );

        let err = ValidationError::TooLarge {
            field: "limit",
            max: 100,
        };
        assert_eq!(err.to_string(), "limit must be at most 100");

        let err = ValidationError::InvalidVariant {
            field: "order_by",
            value: "price".into(),
            expected: "id, name or created_at",
        };
        assert_eq!(
            err.to_string(),
            "invalid order_by value: 'price' (expected id, name or created_at)"
        );
    }
}
