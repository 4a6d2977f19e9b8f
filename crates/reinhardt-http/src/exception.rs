//! Framework error type and the field-level error list shared by body
//! decoders and struct validation.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result alias used across handlers and middleware.
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP-facing errors. Every variant maps to a status code.
#[derive(Debug, Error)]
pub enum Error {
	/// Malformed request
	#[error("Bad request: {0}")]
	BadRequest(String),

	/// Resource not found
	#[error("Not found: {0}")]
	NotFound(String),

	/// Request body has a content type nobody can decode
	#[error("Unsupported media type: {0}")]
	UnsupportedMediaType(String),

	/// Payload decoded but failed field validation
	#[error("Validation failed: {0}")]
	Validation(FieldErrors),

	/// Response body could not be serialized
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// The request pipeline is wired incorrectly (missing scope, unseeded type)
	#[error("Improperly configured: {0}")]
	ImproperlyConfigured(String),

	/// Arbitrary status with a message
	#[error("{message}")]
	Status {
		/// HTTP status code
		status: u16,
		/// Human readable message
		message: String,
	},

	/// Internal error
	#[error("Internal error: {0}")]
	Internal(String),
}

impl Error {
	/// Returns the HTTP status code for this error.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_http::Error;
	///
	/// assert_eq!(Error::NotFound("user".into()).status_code(), 404);
	/// assert_eq!(Error::ImproperlyConfigured("scope".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::BadRequest(_) => 400,
			Error::NotFound(_) => 404,
			Error::UnsupportedMediaType(_) => 415,
			Error::Validation(errors) => errors.status_code(),
			Error::Status { status, .. } => *status,
			Error::Serialization(_) | Error::ImproperlyConfigured(_) | Error::Internal(_) => 500,
		}
	}
}

impl From<FieldErrors> for Error {
	fn from(errors: FieldErrors) -> Self {
		Error::Validation(errors)
	}
}

/// A single field-level failure.
///
/// `field_names` may be empty for errors that concern the payload as a
/// whole or span several fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
	#[serde(rename = "fields")]
	field_names: Vec<String>,
	classification: String,
	message: String,
}

impl FieldError {
	pub fn new(
		field_names: Vec<String>,
		classification: impl Into<String>,
		message: impl Into<String>,
	) -> Self {
		Self {
			field_names,
			classification: classification.into(),
			message: message.into(),
		}
	}

	/// Names of the fields implicated by this error.
	pub fn fields(&self) -> &[String] {
		&self.field_names
	}

	/// Stable tag naming the rule that failed.
	pub fn kind(&self) -> &str {
		&self.classification
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

impl fmt::Display for FieldError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)
	}
}

impl std::error::Error for FieldError {}

/// Ordered list of field errors produced by decoding or validation.
///
/// # Examples
///
/// ```
/// use reinhardt_http::FieldErrors;
///
/// let mut errors = FieldErrors::new();
/// errors.add(["title"], FieldErrors::REQUIRED, "title is required");
///
/// assert_eq!(errors.len(), 1);
/// assert!(errors.has(FieldErrors::REQUIRED));
/// assert_eq!(errors.status_code(), 422);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
	/// A required value was absent.
	pub const REQUIRED: &'static str = "required";
	/// The request content type cannot be decoded.
	pub const CONTENT_TYPE: &'static str = "content_type";
	/// The body could not be parsed into the target shape.
	pub const DESERIALIZATION: &'static str = "deserialization";

	pub fn new() -> Self {
		Self(Vec::new())
	}

	/// Appends an error implicating `field_names`.
	pub fn add<I, S>(&mut self, field_names: I, classification: &str, message: impl Into<String>)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.0.push(FieldError::new(
			field_names.into_iter().map(Into::into).collect(),
			classification,
			message,
		));
	}

	pub fn push(&mut self, error: FieldError) {
		self.0.push(error);
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if any entry carries `classification`.
	pub fn has(&self, classification: &str) -> bool {
		self.0.iter().any(|e| e.classification == classification)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
		self.0.iter()
	}

	/// Status code for a response carrying these errors.
	///
	/// Content type failures win over parse failures, which win over
	/// validation failures.
	pub fn status_code(&self) -> u16 {
		if self.has(Self::CONTENT_TYPE) {
			415
		} else if self.has(Self::DESERIALIZATION) {
			400
		} else {
			422
		}
	}

	pub fn into_inner(self) -> Vec<FieldError> {
		self.0
	}
}

impl fmt::Display for FieldErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, error) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str("; ")?;
			}
			fmt::Display::fmt(error, f)?;
		}
		Ok(())
	}
}

impl std::error::Error for FieldErrors {}

impl FromIterator<FieldError> for FieldErrors {
	fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl IntoIterator for FieldErrors {
	type Item = FieldError;
	type IntoIter = std::vec::IntoIter<FieldError>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a FieldErrors {
	type Item = &'a FieldError;
	type IntoIter = std::slice::Iter<'a, FieldError>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn sample() -> FieldErrors {
		let mut errors = FieldErrors::new();
		errors.add(Vec::<String>::new(), "ClassA", "Foobar");
		errors.add(Vec::<String>::new(), "ClassB", "Foo");
		errors.add(["field1", "field2"], "ClassB", "Foobar");
		errors.add(["field2"], "ClassA", "Foobar");
		errors.add(["field2"], "ClassB", "Foobar");
		errors
	}

	#[test]
	fn test_add_records_entry() {
		let mut errors = FieldErrors::new();
		errors.add(["Field1", "Field2"], "ErrorClass", "Some message");

		assert_eq!(errors.len(), 1);
		let entry = errors.iter().next().unwrap();
		assert_eq!(entry.fields(), ["Field1", "Field2"]);
		assert_eq!(entry.kind(), "ErrorClass");
		assert_eq!(entry.message(), "Some message");
	}

	#[test]
	fn test_len_and_has() {
		let errors = sample();
		assert_eq!(errors.len(), 5);
		assert!(errors.has("ClassA"));
		assert!(!errors.has("ClassQ"));
	}

	#[rstest]
	#[case(FieldErrors::CONTENT_TYPE, 415)]
	#[case(FieldErrors::DESERIALIZATION, 400)]
	#[case(FieldErrors::REQUIRED, 422)]
	#[case("length", 422)]
	fn test_status_code_by_classification(#[case] kind: &str, #[case] expected: u16) {
		let mut errors = FieldErrors::new();
		errors.add(["title"], kind, "bad");
		assert_eq!(errors.status_code(), expected);
		assert_eq!(Error::from(errors).status_code(), expected);
	}

	#[test]
	fn test_display_joins_messages() {
		let mut errors = FieldErrors::new();
		errors.add(["a"], "x", "first");
		errors.add(["b"], "y", "second");
		assert_eq!(errors.to_string(), "first; second");
	}

	#[test]
	fn test_serializes_as_list() {
		let mut errors = FieldErrors::new();
		errors.add(["name"], FieldErrors::REQUIRED, "name is required");
		let json = serde_json::to_value(&errors).unwrap();
		assert_eq!(
			json,
			serde_json::json!([{
				"fields": ["name"],
				"classification": "required",
				"message": "name is required"
			}])
		);
	}
}
