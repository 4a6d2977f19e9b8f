//! Response writer seeded into every request scope.
//!
//! Handlers that return nothing write through it directly; the response
//! marshaler writes return values through it. Once the handler finishes the
//! adapter turns the accumulated state into a [`Response`].

use crate::exception::Error;
use crate::status::{DefaultStatusTranslator, StatusTranslator};
use crate::Response;
use bytes::{Bytes, BytesMut};
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use parking_lot::Mutex;
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Rendering options shared by every writer a binder hands out.
#[derive(Clone)]
pub struct RenderOptions {
	/// Pretty-print JSON bodies
	pub indent_json: bool,
	/// Content type sent with JSON bodies
	pub json_content_type: String,
	/// Translator applied to every error written through a writer
	pub translator: Arc<dyn StatusTranslator>,
}

impl RenderOptions {
	pub fn with_translator(mut self, translator: Arc<dyn StatusTranslator>) -> Self {
		self.translator = translator;
		self
	}

	pub fn with_indent_json(mut self, indent: bool) -> Self {
		self.indent_json = indent;
		self
	}
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			indent_json: false,
			json_content_type: "application/json; charset=utf-8".to_string(),
			translator: Arc::new(DefaultStatusTranslator),
		}
	}
}

impl fmt::Debug for RenderOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RenderOptions")
			.field("indent_json", &self.indent_json)
			.field("json_content_type", &self.json_content_type)
			.finish_non_exhaustive()
	}
}

#[derive(Default)]
struct WriterState {
	status: Option<StatusCode>,
	headers: HeaderMap,
	body: BytesMut,
}

/// Shared handle to the response being built for one request.
///
/// Clones write into the same response.
///
/// # Examples
///
/// ```
/// use reinhardt_http::ResponseWriter;
/// use hyper::StatusCode;
///
/// let writer = ResponseWriter::default();
/// writer.write_header(StatusCode::CREATED);
/// writer.write(b"done");
///
/// let response = writer.take_response();
/// assert_eq!(response.status, StatusCode::CREATED);
/// assert_eq!(&response.body[..], b"done");
/// ```
#[derive(Clone)]
pub struct ResponseWriter {
	state: Arc<Mutex<WriterState>>,
	render: Arc<RenderOptions>,
}

impl ResponseWriter {
	pub fn new(render: Arc<RenderOptions>) -> Self {
		Self {
			state: Arc::new(Mutex::new(WriterState::default())),
			render,
		}
	}

	pub fn render(&self) -> &RenderOptions {
		&self.render
	}

	/// Set the status code. Only the first call has an effect.
	pub fn write_header(&self, status: StatusCode) {
		let mut state = self.state.lock();
		if state.status.is_none() {
			state.status = Some(status);
		}
	}

	pub fn insert_header(&self, name: HeaderName, value: HeaderValue) {
		self.state.lock().headers.insert(name, value);
	}

	/// Append bytes to the body, committing a 200 status if none was set.
	pub fn write(&self, data: &[u8]) {
		let mut state = self.state.lock();
		state.status.get_or_insert(StatusCode::OK);
		state.body.extend_from_slice(data);
	}

	/// Serialize `value` as JSON and write it with `status`.
	///
	/// A value that fails to serialize produces a 500 error body instead.
	pub fn json<T: Serialize + ?Sized>(&self, status: StatusCode, value: &T) {
		let encoded = if self.render.indent_json {
			serde_json::to_vec_pretty(value)
		} else {
			serde_json::to_vec(value)
		};
		match encoded {
			Ok(body) => self.write_json(status, &body),
			Err(e) => {
				tracing::error!("Failed to serialize response body: {}", e);
				self.api_error(&Error::Serialization(e.to_string()));
			}
		}
	}

	/// Write an already encoded JSON body.
	pub fn write_json(&self, status: StatusCode, body: &[u8]) {
		if let Ok(value) = HeaderValue::from_str(&self.render.json_content_type) {
			self.insert_header(CONTENT_TYPE, value);
		}
		self.write_header(status);
		self.write(body);
	}

	/// Write `error` through the configured translator.
	pub fn api_error(&self, error: &(dyn StdError + 'static)) {
		let status = self.render.translator.translate(error);
		tracing::debug!(
			"Writing error response {}: {}",
			status.status_code(),
			status.message()
		);
		match serde_json::to_vec(&status) {
			Ok(body) => self.write_json(status.status_code(), &body),
			Err(e) => {
				tracing::error!("Failed to serialize error body: {}", e);
				self.write_header(StatusCode::INTERNAL_SERVER_ERROR);
			}
		}
	}

	/// True once a status or any body bytes were written.
	pub fn is_written(&self) -> bool {
		let state = self.state.lock();
		state.status.is_some() || !state.body.is_empty()
	}

	pub fn status(&self) -> Option<StatusCode> {
		self.state.lock().status
	}

	/// Take the accumulated response, leaving the writer empty.
	///
	/// The status defaults to 200 when nothing set it.
	pub fn take_response(&self) -> Response {
		let state = std::mem::take(&mut *self.state.lock());
		let mut response = Response::new(state.status.unwrap_or(StatusCode::OK));
		response.headers = state.headers;
		response.body = Bytes::from(state.body);
		response
	}
}

impl Default for ResponseWriter {
	fn default() -> Self {
		Self::new(Arc::new(RenderOptions::default()))
	}
}

impl fmt::Debug for ResponseWriter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResponseWriter")
			.field("status", &self.status())
			.finish_non_exhaustive()
	}
}
