//! Error-to-status translation.
//!
//! Every error-carrying response (handler error returns, body decoding
//! failures, configuration errors) goes through a [`StatusTranslator`]
//! so that status codes and error bodies stay uniform.

use crate::exception::{Error, FieldError, FieldErrors};
use hyper::StatusCode;
use serde::Serialize;
use std::error::Error as StdError;

/// Serializable error body with its status.
///
/// # Examples
///
/// ```
/// use reinhardt_http::ApiStatus;
/// use hyper::StatusCode;
///
/// let status = ApiStatus::new(StatusCode::NOT_FOUND, "no such post");
/// let json = serde_json::to_value(&status).unwrap();
/// assert_eq!(json, serde_json::json!({
///     "status": 404,
///     "reason": "Not Found",
///     "message": "no such post",
/// }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiStatus {
	status: u16,
	reason: &'static str,
	message: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	details: Vec<FieldError>,
}

impl ApiStatus {
	pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self {
			status: status.as_u16(),
			reason: status.canonical_reason().unwrap_or("Unknown"),
			message: message.into(),
			details: Vec::new(),
		}
	}

	pub fn with_details(mut self, details: impl IntoIterator<Item = FieldError>) -> Self {
		self.details.extend(details);
		self
	}

	pub fn status_code(&self) -> StatusCode {
		StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn details(&self) -> &[FieldError] {
		&self.details
	}
}

/// Maps an arbitrary error to a status code and serializable body.
pub trait StatusTranslator: Send + Sync {
	fn translate(&self, error: &(dyn StdError + 'static)) -> ApiStatus;
}

/// Translator that understands the framework's own error types.
///
/// - [`Error`] maps to its own status code.
/// - [`FieldErrors`] maps to 415, 400 or 422 and lists the entries as details.
/// - Anything else is a 500 carrying the error's display text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStatusTranslator;

impl StatusTranslator for DefaultStatusTranslator {
	fn translate(&self, error: &(dyn StdError + 'static)) -> ApiStatus {
		if let Some(errors) = error.downcast_ref::<FieldErrors>() {
			return field_errors_status(errors);
		}
		if let Some(error) = error.downcast_ref::<Error>() {
			if let Error::Validation(errors) = error {
				return field_errors_status(errors);
			}
			let status = StatusCode::from_u16(error.status_code())
				.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
			return ApiStatus::new(status, error.to_string());
		}
		ApiStatus::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
	}
}

fn field_errors_status(errors: &FieldErrors) -> ApiStatus {
	let status =
		StatusCode::from_u16(errors.status_code()).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY);
	ApiStatus::new(status, errors.to_string()).with_details(errors.iter().cloned())
}
