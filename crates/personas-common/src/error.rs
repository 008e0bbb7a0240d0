//! Error types and error codes for Personas
//!
//! This module defines:
//! - `PersonaError`: Domain error enum raised by the service layer. Every
//!   variant is a failure the client can fix; storage failures travel as
//!   `sea_orm::DbErr` inside `anyhow::Error`.
//! - `ErrorCode`: Structured error codes for API responses

use serde::{Deserialize, Serialize};

/// Domain error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PersonaError {
    #[error("persona '{0}' not found")]
    PersonaNotFound(i32),

    #[error("email '{0}' already exists")]
    EmailAlreadyExists(String),

    #[error("caused: {0}")]
    IllegalArgument(String),
}

/// Looks for a `PersonaError` anywhere in an `anyhow` error chain.
pub fn find_persona_error(err: &anyhow::Error) -> Option<&PersonaError> {
    err.chain().find_map(|cause| cause.downcast_ref::<PersonaError>())
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_persona_error_display() {
        let err = PersonaError::PersonaNotFound(42);
        assert_eq!(format!("{}", err), "persona '42' not found");

        let err = PersonaError::EmailAlreadyExists("ana@x.com".to_string());
        assert_eq!(format!("{}", err), "email 'ana@x.com' already exists");

        let err = PersonaError::IllegalArgument("bad".to_string());
        assert_eq!(format!("{}", err), "caused: bad");
    }

    #[test]
    fn test_find_persona_error_through_context() {
        let err = anyhow::Error::from(PersonaError::PersonaNotFound(7)).context("loading persona");
        assert_eq!(
            find_persona_error(&err),
            Some(&PersonaError::PersonaNotFound(7))
        );

        let other = anyhow::anyhow!("plain failure");
        assert!(find_persona_error(&other).is_none());
    }

    #[test]
    fn test_error_code_constants() {
        assert_eq!(DATA_ACCESS_ERROR.code, 10002);
        assert_eq!(PARAMETER_VALIDATE_ERROR.code, 20002);
        assert_eq!(RESOURCE_NOT_FOUND.code, 20004);
        assert_eq!(RESOURCE_CONFLICT.code, 20005);
        assert_eq!(SERVER_ERROR.code, 30000);
    }

    #[test]
    fn test_error_code_default() {
        let default_code = ErrorCode::default();
        assert_eq!(default_code.code, 0);
        assert_eq!(default_code.message, "");
    }

    proptest! {
        #[test]
        fn not_found_message_names_the_id(id in any::<i32>()) {
            let message = PersonaError::PersonaNotFound(id).to_string();
            prop_assert!(message.contains(&id.to_string()));
        }
    }
}
