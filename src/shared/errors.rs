use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Not found: {entity} ids [{}]", .missing.join(", "))]
    PartialNotFound {
        entity: &'static str,
        missing: Vec<String>,
    },

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Scope {level} {id} is missing")]
    ScopeNotFound { level: &'static str, id: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::StoreUnavailable(_))
    }
}

/// Collects the names of required fields that are absent.
///
/// ```ignore
/// RequiredFields::new()
///     .check("email_id", !draft.email_id.trim().is_empty())
///     .check("password", !draft.password.is_empty())
///     .finish()?;
/// ```
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(mut self, field: &'static str, present: bool) -> Self {
        if !present {
            self.missing.push(field);
        }
        self
    }

    pub fn text(self, field: &'static str, value: &str) -> Self {
        self.check(field, !value.trim().is_empty())
    }

    pub fn missing(self) -> Vec<&'static str> {
        self.missing
    }

    pub fn finish(self) -> Result<(), DomainError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::MissingFields(self.missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_lists_every_gap() {
        let err = RequiredFields::new()
            .text("email_id", "  ")
            .text("username", "ops")
            .check("role_id", false)
            .finish()
            .unwrap_err();

        match err {
            DomainError::MissingFields(fields) => assert_eq!(fields, vec!["email_id", "role_id"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_store_unavailable_is_transient() {
        assert!(DomainError::StoreUnavailable("pool timed out".into()).is_transient());
        assert!(!DomainError::Storage("syntax error".into()).is_transient());
        assert!(!DomainError::InvalidCredentials.is_transient());
    }

    #[test]
    fn partial_not_found_names_missing_ids() {
        let err = DomainError::PartialNotFound {
            entity: "charger",
            missing: vec!["CP-9".into(), "CP-11".into()],
        };
        assert_eq!(err.to_string(), "Not found: charger ids [CP-9, CP-11]");
    }
}
