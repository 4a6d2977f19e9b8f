//! Bridge from `validator` errors to [`FieldErrors`].

use regex::Regex;
use reinhardt_http::FieldErrors;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Key `validator` uses for struct-level (schema) errors.
const SCHEMA_KEY: &str = "__all__";

// Letters first, then runs of letters and digits joined by single `.`, `_`
// or `-` separators. No separator at either end.
static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^([a-zA-Z]+([a-zA-Z0-9]*[._-][a-zA-Z0-9]+)*)$")
		.expect("USERNAME_REGEX: invalid regex pattern")
});

/// `username` rule for `#[validate(custom(...))]`.
///
/// # Examples
///
/// ```
/// use reinhardt_params::{validate, validate_username};
/// use validator::Validate;
///
/// #[derive(Validate)]
/// struct Signup {
///     #[validate(custom(function = "validate_username"))]
///     username: String,
/// }
///
/// assert!(validate(&Signup { username: "matt.holt".into() }).is_ok());
///
/// let errors = validate(&Signup { username: "1matt".into() }).unwrap_err();
/// assert!(errors.has("username"));
/// ```
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
	if USERNAME_REGEX.is_match(value) {
		Ok(())
	} else {
		Err(ValidationError::new("username").with_message(Cow::Borrowed(
			"must start with a letter and use only letters, digits and single . _ - separators",
		)))
	}
}

/// Validate `value`, flattening nested errors into one list sorted by
/// field path.
///
/// Nested structs join paths with `.`, list items with `[i]`. The
/// validator code (`length`, `email`, `range`, ...) becomes the
/// classification.
///
/// # Examples
///
/// ```
/// use reinhardt_params::validate;
/// use validator::Validate;
///
/// #[derive(Validate)]
/// struct Signup {
///     #[validate(length(min = 3))]
///     username: String,
///     #[validate(email)]
///     email: String,
/// }
///
/// let signup = Signup { username: "al".into(), email: "nope".into() };
/// let errors = validate(&signup).unwrap_err();
/// let fields: Vec<_> = errors.iter().map(|e| e.fields()[0].clone()).collect();
/// assert_eq!(fields, ["email", "username"]);
/// ```
pub fn validate<T: Validate>(value: &T) -> Result<(), FieldErrors> {
	match value.validate() {
		Ok(()) => Ok(()),
		Err(errors) => Err(to_field_errors(&errors)),
	}
}

/// Flatten `ValidationErrors` into [`FieldErrors`].
pub fn to_field_errors(errors: &ValidationErrors) -> FieldErrors {
	let mut flat = Vec::new();
	collect(errors, "", &mut flat);
	flat.sort_by(|a, b| a.0.cmp(&b.0));

	let mut result = FieldErrors::new();
	for (path, code, message) in flat {
		let fields = if path.is_empty() { Vec::new() } else { vec![path] };
		result.add(fields, &code, message);
	}
	result
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<(String, String, String)>) {
	for (field, kind) in errors.errors() {
		let path = join(prefix, &field.to_string());
		match kind {
			ValidationErrorsKind::Field(field_errors) => {
				for error in field_errors {
					let message = match &error.message {
						Some(message) => message.to_string(),
						None => default_message(&path, &error.code),
					};
					out.push((path.clone(), error.code.to_string(), message));
				}
			}
			ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
			ValidationErrorsKind::List(items) => {
				for (index, nested) in items {
					collect(nested, &format!("{path}[{index}]"), out);
				}
			}
		}
	}
}

fn join(prefix: &str, field: &str) -> String {
	match (prefix.is_empty(), field == SCHEMA_KEY) {
		(_, true) => prefix.to_string(),
		(true, false) => field.to_string(),
		(false, false) => format!("{prefix}.{field}"),
	}
}

fn default_message(path: &str, code: &str) -> String {
	if path.is_empty() {
		format!("failed {code} validation")
	} else {
		format!("{path} failed {code} validation")
	}
}
