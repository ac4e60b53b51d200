use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::authoring::AuthoringStep;
use crate::recipe::ContainerId;

/// One unmet requirement or broken invariant, tied to the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A step gate or draft invariant check failed. Violations keep the order in
/// which they were found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation::new(field, message)],
        }
    }

    /// Fields named by the violations, in order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn names(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Which gateway call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GatewayOperation {
    CreateDraft,
    UpdateDraft,
    FetchDraft,
    UploadImage,
}

impl fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayOperation::CreateDraft => write!(f, "createDraft"),
            GatewayOperation::UpdateDraft => write!(f, "updateDraft"),
            GatewayOperation::FetchDraft => write!(f, "fetchDraft"),
            GatewayOperation::UploadImage => write!(f, "uploadImage"),
        }
    }
}

/// A persistence gateway or media host call failed. Never retried
/// automatically; the draft is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {reason}")]
pub struct PersistenceError {
    pub operation: GatewayOperation,
    pub reason: String,
}

impl PersistenceError {
    pub fn new(operation: GatewayOperation, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }

    /// Message shown to the author.
    pub fn user_message(&self) -> &'static str {
        match self.operation {
            GatewayOperation::FetchDraft => "could not load the recipe, nothing was changed",
            _ => "could not save, no changes lost",
        }
    }
}

/// Errors from the local session draft store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Every failure the authoring core can report. All of them are recoverable:
/// the draft is unchanged when any of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthoringError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid quantity '{input}' for {bucket}")]
    InvalidQuantity { bucket: String, input: String },

    #[error("'{ingredient_id}' is already in {bucket}")]
    DuplicateIngredient { bucket: String, ingredient_id: String },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("container #{0} does not exist")]
    ContainerNotFound(ContainerId),

    #[error("'{ingredient_id}' is not in {bucket}")]
    AdditionNotFound { bucket: String, ingredient_id: String },

    #[error("no placement in progress")]
    NoPendingPlacement,

    #[error("cannot {action} from the {step} step")]
    InvalidTransition {
        action: &'static str,
        step: AuthoringStep,
    },

    #[error("instruction context {0} does not exist")]
    UnknownContext(usize),

    #[error("authoring session already finished")]
    SessionComplete,
}

impl AuthoringError {
    /// Whether retrying the same call later could succeed without changing input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthoringError::Persistence(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_fields_in_order() {
        let err = ValidationError {
            violations: vec![
                Violation::new("name", "is required"),
                Violation::new("cuisine", "is required"),
            ],
        };
        assert_eq!(err.fields(), vec!["name", "cuisine"]);
        assert!(err.names("cuisine"));
        assert!(!err.names("author"));
        assert_eq!(
            err.to_string(),
            "validation failed: name: is required; cuisine: is required"
        );
    }

    #[test]
    fn test_persistence_error_display_names_operation() {
        let err = PersistenceError::new(GatewayOperation::CreateDraft, "status 500");
        assert_eq!(err.to_string(), "createDraft failed: status 500");
        assert_eq!(err.user_message(), "could not save, no changes lost");
    }

    #[test]
    fn test_duplicate_error_names_bucket() {
        let err = AuthoringError::DuplicateIngredient {
            bucket: "container #1".to_string(),
            ingredient_id: "onion".to_string(),
        };
        assert_eq!(err.to_string(), "'onion' is already in container #1");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
