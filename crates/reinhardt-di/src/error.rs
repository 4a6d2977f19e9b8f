use thiserror::Error;

/// Errors raised while binding or resolving scoped values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
	/// Nothing was bound under the requested type
	#[error("No value bound for type `{0}`")]
	NotFound(&'static str),

	/// A raw binding carried a value of the wrong type
	#[error("Value bound for `{expected}` is not an `Arc<{expected}>`")]
	TypeMismatch { expected: &'static str },

	/// The scope was returned to its pool
	#[error("Request scope has already been released")]
	ScopeReleased,
}

pub type DiResult<T> = std::result::Result<T, DiError>;
