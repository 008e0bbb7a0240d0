// Error handling for the Personas HTTP layer
// Maps domain errors and extractor failures to the `Result` envelope

use std::fmt::{Display, Formatter};

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError},
};
use validator::ValidationErrors;

pub use personas_common::error::{
    DATA_ACCESS_ERROR, PARAMETER_VALIDATE_ERROR, RESOURCE_CONFLICT, RESOURCE_NOT_FOUND,
    SERVER_ERROR,
};
pub use personas_common::{ErrorCode, PersonaError, find_persona_error};

use crate::model::response as common;

// Local wrapper for application errors to implement actix-web error handling
// (Cannot impl foreign trait for foreign type due to orphan rules)
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<PersonaError> for AppError {
    fn from(value: PersonaError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        PersonaError::IllegalArgument(validation_message(&value)).into()
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn persona_error(&self) -> Option<&PersonaError> {
        find_persona_error(&self.inner)
    }
}

/// Joins the messages of every failed field, falling back to `field: code`.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

fn bad_request(message: String) -> HttpResponse {
    common::Result::<String>::http_response(
        400,
        PARAMETER_VALIDATE_ERROR.code,
        message,
        String::new(),
    )
}

impl actix_web::error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self.persona_error() {
            Some(PersonaError::PersonaNotFound(_)) => common::Result::<String>::http_response(
                404,
                RESOURCE_NOT_FOUND.code,
                self.inner.to_string(),
                String::new(),
            ),
            Some(PersonaError::EmailAlreadyExists(_)) => common::Result::<String>::http_response(
                409,
                RESOURCE_CONFLICT.code,
                self.inner.to_string(),
                String::new(),
            ),
            Some(PersonaError::IllegalArgument(message)) => bad_request(message.to_string()),
            None => {
                let storage = self
                    .inner
                    .chain()
                    .any(|cause| cause.downcast_ref::<sea_orm::DbErr>().is_some());
                if storage {
                    common::Result::<String>::http_response(
                        500,
                        DATA_ACCESS_ERROR.code,
                        self.inner.to_string(),
                        String::new(),
                    )
                } else {
                    common::Result::<String>::http_response(
                        500,
                        SERVER_ERROR.code,
                        self.inner.to_string(),
                        String::new(),
                    )
                }
            }
        }
    }
}

// Extractor error handlers, registered through `JsonConfig`, `QueryConfig` and `PathConfig`

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use actix_web::{ResponseError, body::to_bytes, http::StatusCode};
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 1, max = 10, message = "out of range"))]
        value: i64,
        #[validate(length(min = 1))]
        name: String,
    }

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_from_anyhow() {
        let app_err = AppError::from(anyhow::anyhow!("test error"));
        assert_eq!(format!("{}", app_err), "test error");
        assert!(app_err.persona_error().is_none());
    }

    #[actix_web::test]
    async fn test_not_found_maps_to_404() {
        let err = AppError::from(PersonaError::PersonaNotFound(9));
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["code"], RESOURCE_NOT_FOUND.code);
        assert_eq!(json["message"], "persona '9' not found");
    }

    #[actix_web::test]
    async fn test_conflict_maps_to_409() {
        let err = AppError::from(
            anyhow::Error::from(PersonaError::EmailAlreadyExists("a@x.com".to_string()))
                .context("creating persona"),
        );
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["code"], RESOURCE_CONFLICT.code);
    }

    #[test]
    fn test_other_errors_map_to_500() {
        let err = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let err = AppError::from(anyhow::Error::from(sea_orm::DbErr::Custom(
            "locked".to_string(),
        )));
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_storage_and_unknown_errors_use_distinct_codes() {
        let err = AppError::from(
            anyhow::Error::from(sea_orm::DbErr::Custom("disk full".to_string()))
                .context("inserting persona"),
        );
        assert_eq!(
            body_json(err.error_response()).await["code"],
            DATA_ACCESS_ERROR.code
        );

        let err = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(
            body_json(err.error_response()).await["code"],
            SERVER_ERROR.code
        );
    }

    #[actix_web::test]
    async fn test_validation_errors_map_to_400() {
        let sample = Sample {
            value: 0,
            name: "ok".to_string(),
        };
        let err = AppError::from(sample.validate().unwrap_err());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], PARAMETER_VALIDATE_ERROR.code);
        assert_eq!(json["message"], "out of range");
    }

    #[test]
    fn test_validation_message_without_custom_message() {
        let sample = Sample {
            value: 5,
            name: String::new(),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(validation_message(&errors), "name: length");
    }
}
