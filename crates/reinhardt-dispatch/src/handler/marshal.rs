//! Writes handler return values into the response.

use super::output::Returned;
use super::signature::ReturnShape;
use hyper::StatusCode;
use reinhardt_http::{Error, ResponseWriter};

/// Write `returned` through `writer` following the rules for `shape`.
///
/// - `NoReturn` writes nothing.
/// - `SingleError` writes a present error through the status translator.
/// - `SingleValue` writes bytes verbatim and anything else as JSON; an
///   absent value is JSON `null`.
/// - `DualValueError` writes a present error and drops the value, otherwise
///   writes the value like `SingleValue`.
pub fn marshal(shape: ReturnShape, returned: Vec<Returned>, writer: &ResponseWriter) {
	let mut returned = returned.into_iter();
	match shape {
		ReturnShape::NoReturn => {}
		ReturnShape::SingleError => {
			if let Some(Returned::Error(error)) = returned.next() {
				writer.api_error(&*error);
			}
		}
		ReturnShape::SingleValue => write_value(returned.next().unwrap_or(Returned::Nil), writer),
		ReturnShape::DualValueError => {
			let value = returned.next().unwrap_or(Returned::Nil);
			if let Some(Returned::Error(error)) = returned.next() {
				writer.api_error(&*error);
				return;
			}
			write_value(value, writer);
		}
	}
}

fn write_value(value: Returned, writer: &ResponseWriter) {
	match value {
		Returned::Bytes(bytes) => writer.write(&bytes),
		Returned::Json(value) => match value.to_json(writer.render().indent_json) {
			Ok(body) => writer.write_json(StatusCode::OK, &body),
			Err(e) => {
				tracing::error!("Failed to serialize handler return value: {}", e);
				writer.api_error(&Error::Serialization(e.to_string()));
			}
		},
		Returned::Nil => writer.write_json(StatusCode::OK, b"null"),
		Returned::Error(error) => writer.api_error(&*error),
	}
}
