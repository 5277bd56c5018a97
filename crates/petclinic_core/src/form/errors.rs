//! Caller-owned field error accumulator.

/// Form field names as exposed to the view layer.
pub const NAME_FIELD: &str = "name";
pub const TYPE_FIELD: &str = "type";
pub const BIRTH_DATE_FIELD: &str = "birthDate";

/// Error codes registered against fields.
pub const REQUIRED_CODE: &str = "required";
pub const DUPLICATE_CODE: &str = "duplicate";
pub const TYPE_MISMATCH_CODE: &str = "typeMismatch";

/// One error attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Accumulates field errors across binding, validation and workflow checks.
///
/// Errors are kept in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an error on `field`.
    pub fn reject_value(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.errors.push(FieldError {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_field_errors(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    /// Returns the first error registered on `field`.
    pub fn field_error(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    pub fn field_errors<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |error| error.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}
