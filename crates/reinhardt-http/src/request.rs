//! HTTP request representation

use crate::{Error, Extensions, Result};
use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri, Version};

/// HTTP Request representation
///
/// Cloning is cheap: the body is reference counted and the extensions are
/// shared between clones.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub extensions: Extensions,
}

impl Request {
	/// Create a new request
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_http::Request;
	/// use hyper::{Method, Uri, Version, HeaderMap};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/users?page=2"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.path(), "/users");
	/// assert_eq!(request.query(), Some("page=2"));
	/// ```
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			extensions: Extensions::new(),
		}
	}

	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	pub fn query(&self) -> Option<&str> {
		self.uri.query()
	}

	/// Media type of the body without parameters, lowercased.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/posts")
	///     .header("content-type", "Application/JSON; charset=utf-8")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.content_type().as_deref(), Some("application/json"));
	/// ```
	pub fn content_type(&self) -> Option<String> {
		let raw = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
		let media_type = raw.split(';').next()?.trim();
		if media_type.is_empty() {
			return None;
		}
		Some(media_type.to_ascii_lowercase())
	}
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: std::result::Result<Uri, String>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: Ok(Uri::from_static("/")),
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: &str) -> Self {
		self.uri = uri.parse::<Uri>().map_err(|e| format!("{uri}: {e}"));
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Add a single header. Invalid names or values are ignored.
	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Build the request.
	///
	/// # Errors
	///
	/// Returns `Error::BadRequest` if the URI did not parse.
	pub fn build(self) -> Result<Request> {
		let uri = self.uri.map_err(Error::BadRequest)?;
		Ok(Request::new(
			self.method,
			uri,
			self.version,
			self.headers,
			self.body,
		))
	}
}
