//! Boundary validation.
//!
//! Everything here runs before a submission reaches the store; the store
//! assumes its inputs already passed.

/// Rejection of a malformed submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: at most {max} entries allowed, got {len}")]
    TooManyItems {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field}: {detail}")]
    OutOfRange { field: &'static str, detail: String },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field}: {detail}")]
    Malformed { field: &'static str, detail: String },

    #[error("unknown record kind '{0}'")]
    UnknownKind(String),
}

/// Checked at the API boundary.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl<T: Validate> Validate for [T] {
    fn validate(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Validate::validate)
    }
}

pub(crate) fn check_len(field: &'static str, len: usize, max: usize) -> Result<(), ValidationError> {
    if len > max {
        return Err(ValidationError::TooManyItems { field, len, max });
    }
    Ok(())
}

pub(crate) fn check_not_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

pub(crate) fn check_positive(field: &'static str, value: u32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::OutOfRange {
            field,
            detail: "must be greater than zero".into(),
        });
    }
    Ok(())
}

pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::OutOfRange {
            field,
            detail: format!("must be a non-negative number, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn check_latitude(value: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "latitude",
            detail: format!("{value} outside [-90, 90]"),
        });
    }
    Ok(())
}

pub(crate) fn check_longitude(value: f64) -> Result<(), ValidationError> {
    if !(-180.0..=180.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "longitude",
            detail: format!("{value} outside [-180, 180]"),
        });
    }
    Ok(())
}

/// Validate an optional patch field.
pub(crate) fn check_some<T>(
    value: Option<&T>,
    check: impl FnOnce(&T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), check)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len_boundary() {
        assert!(check_len("items", 10, 10).is_ok());
        assert_eq!(
            check_len("items", 11, 10),
            Err(ValidationError::TooManyItems {
                field: "items",
                len: 11,
                max: 10
            })
        );
    }

    #[test]
    fn test_coordinates() {
        assert!(check_latitude(12.97).is_ok());
        assert!(check_latitude(90.5).is_err());
        assert!(check_longitude(-180.0).is_ok());
        assert!(check_longitude(f64::NAN).is_err());
    }

    #[test]
    fn test_blank_is_empty() {
        assert_eq!(
            check_not_empty("centre_code", "  "),
            Err(ValidationError::Empty {
                field: "centre_code"
            })
        );
    }
}
