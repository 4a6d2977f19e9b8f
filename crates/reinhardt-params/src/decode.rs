//! Request body decoders.
//!
//! Failures come back as [`FieldErrors`]: an empty body or a missing field
//! is `required`, anything the deserializer rejects is `deserialization`.

use reinhardt_http::FieldErrors;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

const EMPTY_BODY: &str = "request body is empty";

/// Decode a JSON body.
///
/// # Examples
///
/// ```
/// use reinhardt_params::decode_json;
/// use reinhardt_http::FieldErrors;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Post {
///     title: String,
/// }
///
/// let post: Post = decode_json(br#"{"title": "Hello"}"#).unwrap();
/// assert_eq!(post.title, "Hello");
///
/// let errors = decode_json::<Post>(b"{}").unwrap_err();
/// assert!(errors.has(FieldErrors::REQUIRED));
/// assert_eq!(errors.iter().next().unwrap().fields(), ["title"]);
/// ```
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, FieldErrors> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Err(empty_body());
	}
	serde_json::from_slice(body).map_err(|e| match e.classify() {
		Category::Data => classify_message(&e.to_string()),
		Category::Syntax | Category::Eof | Category::Io => {
			deserialization(format!("malformed JSON body: {e}"))
		}
	})
}

/// Decode an `application/x-www-form-urlencoded` body.
///
/// # Examples
///
/// ```
/// use reinhardt_params::decode_form;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Login {
///     username: String,
///     remember: bool,
/// }
///
/// let login: Login = decode_form(b"username=alice&remember=true").unwrap();
/// assert_eq!(login.username, "alice");
/// assert!(login.remember);
/// ```
pub fn decode_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, FieldErrors> {
	decode_form_with_query(None, body)
}

/// Decode a urlencoded body together with the URL query string.
///
/// A name present in the body hides the same name in the query. With
/// neither carrying a value the input is `required`.
///
/// # Examples
///
/// ```
/// use reinhardt_params::decode_form_with_query;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Search {
///     q: String,
///     page: u32,
/// }
///
/// let search: Search = decode_form_with_query(Some("page=2&q=old"), b"q=rust").unwrap();
/// assert_eq!(search.q, "rust");
/// assert_eq!(search.page, 2);
/// ```
pub fn decode_form_with_query<T: DeserializeOwned>(
	query: Option<&str>,
	body: &[u8],
) -> Result<T, FieldErrors> {
	let pairs = merge_query(parse_pairs(body)?, query)?;
	if pairs.is_empty() {
		return Err(empty_body());
	}
	decode_pairs(&pairs)
}

/// Append query pairs whose name the body does not already carry.
pub(crate) fn merge_query(
	mut pairs: Vec<(String, String)>,
	query: Option<&str>,
) -> Result<Vec<(String, String)>, FieldErrors> {
	let Some(query) = query.filter(|query| !query.is_empty()) else {
		return Ok(pairs);
	};
	for (name, value) in parse_pairs(query.as_bytes())? {
		if !pairs.iter().any(|(existing, _)| *existing == name) {
			pairs.push((name, value));
		}
	}
	Ok(pairs)
}

/// Deserialize name/value pairs the way a urlencoded body would be.
pub(crate) fn decode_pairs<T: DeserializeOwned>(
	pairs: &[(String, String)],
) -> Result<T, FieldErrors> {
	let encoded = serde_urlencoded::to_string(pairs).map_err(|e| deserialization(e.to_string()))?;
	serde_urlencoded::from_str(&encoded).map_err(|e| classify_message(&e.to_string()))
}

fn parse_pairs(input: &[u8]) -> Result<Vec<(String, String)>, FieldErrors> {
	serde_urlencoded::from_bytes(input).map_err(|e| deserialization(e.to_string()))
}

pub(crate) fn empty_body() -> FieldErrors {
	let mut errors = FieldErrors::new();
	errors.add(Vec::<String>::new(), FieldErrors::REQUIRED, EMPTY_BODY);
	errors
}

pub(crate) fn deserialization(message: String) -> FieldErrors {
	let mut errors = FieldErrors::new();
	errors.add(Vec::<String>::new(), FieldErrors::DESERIALIZATION, message);
	errors
}

/// serde reports a missing field as "missing field `name`", with the
/// position appended by serde_json.
fn classify_message(message: &str) -> FieldErrors {
	if let Some(rest) = message.strip_prefix("missing field `") {
		if let Some((field, _)) = rest.split_once('`') {
			let mut errors = FieldErrors::new();
			errors.add([field], FieldErrors::REQUIRED, format!("{field} is required"));
			return errors;
		}
	}
	deserialization(message.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::Deserialize;

	#[derive(Debug, Deserialize)]
	#[allow(dead_code)]
	struct Post {
		title: String,
		views: u32,
	}

	#[rstest]
	#[case::empty(b"", FieldErrors::REQUIRED)]
	#[case::whitespace(b"  \n", FieldErrors::REQUIRED)]
	#[case::syntax(b"{\"title\": ", FieldErrors::DESERIALIZATION)]
	#[case::garbage(b"not json", FieldErrors::DESERIALIZATION)]
	#[case::wrong_type(br#"{"title": 1, "views": 2}"#, FieldErrors::DESERIALIZATION)]
	#[case::missing(br#"{"title": "x"}"#, FieldErrors::REQUIRED)]
	fn test_json_failures(#[case] body: &[u8], #[case] classification: &str) {
		let errors = decode_json::<Post>(body).unwrap_err();
		assert_eq!(errors.len(), 1);
		assert!(errors.has(classification), "{errors}");
	}

	#[test]
	fn test_json_missing_field_names_field() {
		let errors = decode_json::<Post>(br#"{"title": "x"}"#).unwrap_err();
		let entry = errors.iter().next().unwrap();
		assert_eq!(entry.fields(), ["views"]);
		assert_eq!(entry.message(), "views is required");
	}

	#[test]
	fn test_empty_body_message() {
		let errors = decode_json::<Post>(b"").unwrap_err();
		let entry = errors.iter().next().unwrap();
		assert!(entry.fields().is_empty());
		assert_eq!(entry.message(), "request body is empty");
	}

	#[rstest]
	#[case::empty(b"", FieldErrors::REQUIRED)]
	#[case::missing(b"title=x", FieldErrors::REQUIRED)]
	#[case::wrong_type(b"title=x&views=many", FieldErrors::DESERIALIZATION)]
	fn test_form_failures(#[case] body: &[u8], #[case] classification: &str) {
		let errors = decode_form::<Post>(body).unwrap_err();
		assert!(errors.has(classification), "{errors}");
	}

	#[test]
	fn test_form_success() {
		let post: Post = decode_form(b"title=Hello+World&views=3").unwrap();
		assert_eq!(post.title, "Hello World");
		assert_eq!(post.views, 3);
	}

	#[rstest]
	#[case::query_only(Some("title=Hi&views=2"), "", "Hi", 2)]
	#[case::split(Some("views=7"), "title=Hi", "Hi", 7)]
	#[case::body_wins(Some("title=Old&views=1"), "title=New", "New", 1)]
	#[case::empty_query(Some(""), "title=Hi&views=4", "Hi", 4)]
	fn test_form_with_query(
		#[case] query: Option<&str>,
		#[case] body: &str,
		#[case] title: &str,
		#[case] views: u32,
	) {
		let post: Post = decode_form_with_query(query, body.as_bytes()).unwrap();
		assert_eq!(post.title, title);
		assert_eq!(post.views, views);
	}

	#[rstest]
	#[case::nothing(None, FieldErrors::REQUIRED)]
	#[case::empty_query(Some(""), FieldErrors::REQUIRED)]
	#[case::query_missing_field(Some("title=Hi"), FieldErrors::REQUIRED)]
	#[case::query_wrong_type(Some("title=Hi&views=lots"), FieldErrors::DESERIALIZATION)]
	fn test_form_with_query_failures(#[case] query: Option<&str>, #[case] classification: &str) {
		let errors = decode_form_with_query::<Post>(query, b"").unwrap_err();
		assert!(errors.has(classification), "{errors}");
	}
}
