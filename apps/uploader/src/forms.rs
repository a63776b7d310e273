use validator::{Validate, ValidationError, ValidationErrors};

/// A field-scoped validation failure, rendered next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn alphabetic(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphabetic"))
    }
}

fn positive_number(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(()),
        _ => Err(ValidationError::new("positive_number")),
    }
}

/// Gallery form as entered by the user. Width and height stay strings here;
/// the create request forwards them verbatim and the server coerces.
#[derive(Debug, Clone, Default, Validate)]
pub struct GalleryForm {
    #[validate(
        length(min = 2, message = "Please enter an identifier"),
        custom(function = alphabetic, message = "Identifier should only contain alphabets")
    )]
    pub identifier: String,

    #[validate(custom(function = positive_number, message = "Width must be a positive number"))]
    pub width: String,

    #[validate(custom(function = positive_number, message = "Height must be a positive number"))]
    pub height: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ResumeForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 2, message = "Please enter your first name"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Please enter your last name"))]
    pub last_name: String,
}

impl GalleryForm {
    /// Synchronous, no I/O. Violations block submission.
    pub fn check(&self) -> Result<(), Vec<FieldError>> {
        self.validate().map_err(|e| field_errors(&e))
    }
}

impl ResumeForm {
    pub fn check(&self) -> Result<(), Vec<FieldError>> {
        self.validate().map_err(|e| field_errors(&e))
    }
}

/// Flattens `validator`'s error map into field-scoped messages, preferring
/// the declared message over the bare constraint code.
pub fn field_errors(errs: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, kind) in errs.errors() {
        if let validator::ValidationErrorsKind::Field(list) = kind {
            for e in list {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                out.push(FieldError::new(field.to_string(), message));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery(identifier: &str, width: &str, height: &str) -> GalleryForm {
        GalleryForm {
            identifier: identifier.to_string(),
            width: width.to_string(),
            height: height.to_string(),
        }
    }

    #[test]
    fn accepts_a_well_formed_gallery_form() {
        assert!(gallery("alice", "800", "600").check().is_ok());
    }

    #[test]
    fn rejects_identifier_with_digits() {
        let errs = gallery("bob1", "800", "600").check().unwrap_err();
        assert!(errs.iter().any(|e| e.field == "identifier"
            && e.message == "Identifier should only contain alphabets"));
    }

    #[test]
    fn rejects_too_short_identifier() {
        let errs = gallery("a", "800", "600").check().unwrap_err();
        assert!(errs.iter().any(|e| e.field == "identifier"));
    }

    #[test]
    fn rejects_zero_and_non_numeric_dimensions() {
        let errs = gallery("alice", "0", "abc").check().unwrap_err();
        assert!(errs
            .iter()
            .any(|e| e.field == "width" && e.message == "Width must be a positive number"));
        assert!(errs.iter().any(|e| e.field == "height"));
    }

    #[test]
    fn rejects_malformed_email() {
        let form = ResumeForm {
            email: "not-an-email".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        };
        let errs = form.check().unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "email");
        assert_eq!(errs[0].message, "Please enter a valid email address");
    }

    #[test]
    fn rejects_missing_names() {
        let form = ResumeForm {
            email: "ada@example.com".to_string(),
            first_name: "A".to_string(),
            last_name: String::new(),
        };
        let errs = form.check().unwrap_err();
        assert!(errs.iter().any(|e| e.field == "first_name"));
        assert!(errs.iter().any(|e| e.field == "last_name"));
    }
}
