use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use aress_core::AppError;

fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request("Missing 'Content-Type: application/json' header");
    }

    let error_msg = rejection.body_text();

    if let Some(rest) = error_msg.split("missing field `").nth(1) {
        let field = rest.split('`').next().unwrap_or("unknown");
        return AppError::bad_request(format!("{field} is required"));
    }

    if error_msg.contains("unknown variant") {
        return AppError::bad_request("Invalid field value in request");
    }

    if error_msg.contains("invalid type") {
        return AppError::bad_request("Invalid field type in request");
    }

    AppError::bad_request("Invalid request body")
}

/// JSON body extractor that also runs `validator` rules.
///
/// Every failure is a 400 with a readable message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::bad_request(format_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aress_core::ErrorKind;
    use aress_models::{DeleteUserRequest, UpdateUserDto};
    use axum::body::Body;
    use axum::http::header;

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_user_id_is_required() {
        let err = ValidatedJson::<DeleteUserRequest>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
        assert_eq!(err.public_message(), "userId is required");
    }

    #[tokio::test]
    async fn test_unknown_role_is_bad_request() {
        let err =
            ValidatedJson::<UpdateUserDto>::from_request(json_request(r#"{"role":"root"}"#), &())
                .await
                .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{}"))
            .unwrap();
        let err = ValidatedJson::<DeleteUserRequest>::from_request(req, &())
            .await
            .unwrap_err();
        assert!(err.public_message().contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let ValidatedJson(body) = ValidatedJson::<DeleteUserRequest>::from_request(
            json_request(r#"{"userId":"2f1a3c1e-5d6b-4f0e-8a9b-1c2d3e4f5a6b"}"#),
            &(),
        )
        .await
        .unwrap();
        assert!(body.user_id.is_some());
    }
}
