//! Values a handler may return.
//!
//! Every return type declares one [`Capability`] up front, so the handler
//! signature can be checked once when the handler is adapted. At call time
//! the value is converted into a [`Returned`] for the response marshaler.

use bytes::Bytes;
use reinhardt_http::{BoxError, FieldErrors};
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;

/// What a return type can stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
	/// A value written into the response body
	Value,
	/// An error routed through the status translator
	Error,
	/// A type that only dereferences to an error without being one
	IndirectError,
}

/// Type-erased JSON serialization for handler values.
pub trait JsonValue: Send {
	fn to_json(&self, indent: bool) -> serde_json::Result<Vec<u8>>;
}

impl<T: Serialize + Send> JsonValue for T {
	fn to_json(&self, indent: bool) -> serde_json::Result<Vec<u8>> {
		if indent {
			serde_json::to_vec_pretty(self)
		} else {
			serde_json::to_vec(self)
		}
	}
}

/// One handler return value, ready for marshaling.
pub enum Returned {
	/// Absent value or absent error
	Nil,
	/// Raw body bytes, written verbatim
	Bytes(Bytes),
	/// A value serialized as JSON
	Json(Box<dyn JsonValue>),
	/// An error
	Error(BoxError),
}

impl Returned {
	pub fn json<T: Serialize + Send + 'static>(value: T) -> Self {
		Self::Json(Box::new(value))
	}

	pub fn error<E: StdError + Send + Sync + 'static>(error: E) -> Self {
		Self::Error(Box::new(error))
	}

	pub fn is_nil(&self) -> bool {
		matches!(self, Self::Nil)
	}
}

impl fmt::Debug for Returned {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Nil => f.write_str("Nil"),
			Self::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
			Self::Json(_) => f.write_str("Json(..)"),
			Self::Error(error) => f.debug_tuple("Error").field(error).finish(),
		}
	}
}

/// A type a handler can return.
///
/// Implement it for your own types with [`impl_json_output!`](crate::impl_json_output)
/// or [`impl_error_output!`](crate::impl_error_output).
pub trait Output: Send + 'static {
	const CAPABILITY: Capability = Capability::Value;

	fn into_returned(self) -> Returned;

	/// What an absent value of this type marshals to.
	fn nil() -> Returned {
		Returned::Nil
	}
}

/// Declare types that are written to the response as JSON.
///
/// ```
/// use reinhardt_dispatch::impl_json_output;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Person {
///     name: String,
/// }
///
/// impl_json_output!(Person);
/// ```
#[macro_export]
macro_rules! impl_json_output {
	($($ty:ty),+ $(,)?) => {
		$(
			impl $crate::handler::Output for $ty {
				fn into_returned(self) -> $crate::handler::Returned {
					$crate::handler::Returned::json(self)
				}
			}
		)+
	};
}

/// Declare error types that are written through the status translator.
///
/// ```
/// use reinhardt_dispatch::impl_error_output;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("post {0} is locked")]
/// struct Locked(u64);
///
/// impl_error_output!(Locked);
/// ```
#[macro_export]
macro_rules! impl_error_output {
	($($ty:ty),+ $(,)?) => {
		$(
			impl $crate::handler::Output for $ty {
				const CAPABILITY: $crate::handler::Capability = $crate::handler::Capability::Error;

				fn into_returned(self) -> $crate::handler::Returned {
					$crate::handler::Returned::error(self)
				}
			}
		)+
	};
}

/// Wrapper that writes any serializable value as JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T: Serialize + Send + 'static> Output for Json<T> {
	fn into_returned(self) -> Returned {
		Returned::json(self.0)
	}
}

impl Output for Bytes {
	fn into_returned(self) -> Returned {
		Returned::Bytes(self)
	}

	fn nil() -> Returned {
		Returned::Bytes(Bytes::new())
	}
}

impl Output for Vec<u8> {
	fn into_returned(self) -> Returned {
		Returned::Bytes(Bytes::from(self))
	}

	fn nil() -> Returned {
		Returned::Bytes(Bytes::new())
	}
}

impl Output for &'static [u8] {
	fn into_returned(self) -> Returned {
		Returned::Bytes(Bytes::from_static(self))
	}

	fn nil() -> Returned {
		Returned::Bytes(Bytes::new())
	}
}

impl_json_output!(
	String,
	&'static str,
	bool,
	char,
	i8,
	i16,
	i32,
	i64,
	isize,
	u8,
	u16,
	u32,
	u64,
	usize,
	f32,
	f64,
	serde_json::Value,
);

impl<T: Output> Output for Option<T> {
	const CAPABILITY: Capability = T::CAPABILITY;

	fn into_returned(self) -> Returned {
		match self {
			Some(value) => value.into_returned(),
			None => T::nil(),
		}
	}

	fn nil() -> Returned {
		T::nil()
	}
}

impl_error_output!(
	reinhardt_http::Error,
	FieldErrors,
	std::io::Error,
	serde_json::Error,
);

impl Output for BoxError {
	const CAPABILITY: Capability = Capability::Error;

	fn into_returned(self) -> Returned {
		Returned::Error(self)
	}
}

impl Output for anyhow::Error {
	const CAPABILITY: Capability = Capability::IndirectError;

	fn into_returned(self) -> Returned {
		Returned::Error(self.into())
	}
}
