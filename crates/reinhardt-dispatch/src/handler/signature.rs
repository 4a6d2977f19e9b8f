//! Handler signature analysis.
//!
//! Runs once when a handler is adapted. Malformed return lists are rejected
//! there, so they surface at startup instead of on a request.

use super::output::Capability;
use super::returns::OutputSlot;
use reinhardt_di::TypeKey;
use thiserror::Error;

/// How the marshaler treats a handler's outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
	/// The handler writes the response itself
	NoReturn,
	/// One value written as the body
	SingleValue,
	/// One error, written through the translator when present
	SingleError,
	/// A value followed by an error that takes precedence when present
	DualValueError,
}

/// A handler return list that cannot be marshaled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
	#[error(
		"return value {position} `{type_name}` only dereferences to an error; return a type implementing std::error::Error"
	)]
	IndirectError {
		position: usize,
		type_name: &'static str,
	},

	#[error("second return value must be an error-like type, found `{0}`")]
	SecondNotError(&'static str),

	#[error("first of two return values must not be an error-like type, found `{0}`")]
	FirstIsError(&'static str),

	#[error("at most two return values are allowed, found {0}")]
	TooManyOutputs(usize),
}

/// Classify a handler's declared outputs.
///
/// # Examples
///
/// ```
/// use reinhardt_dispatch::handler::{classify, Capability, OutputSlot, ReturnShape};
///
/// let value = OutputSlot { type_name: "Person", capability: Capability::Value };
/// let error = OutputSlot { type_name: "Error", capability: Capability::Error };
///
/// assert_eq!(classify(&[]), Ok(ReturnShape::NoReturn));
/// assert_eq!(classify(&[value]), Ok(ReturnShape::SingleValue));
/// assert_eq!(classify(&[error]), Ok(ReturnShape::SingleError));
/// assert_eq!(classify(&[value, error]), Ok(ReturnShape::DualValueError));
/// assert!(classify(&[value, value]).is_err());
/// ```
pub fn classify(outputs: &[OutputSlot]) -> Result<ReturnShape, SignatureError> {
	match outputs {
		[] => Ok(ReturnShape::NoReturn),
		[only] => match only.capability {
			Capability::Error => Ok(ReturnShape::SingleError),
			Capability::IndirectError => Err(SignatureError::IndirectError {
				position: 1,
				type_name: only.type_name,
			}),
			Capability::Value => Ok(ReturnShape::SingleValue),
		},
		[first, second] => {
			match second.capability {
				Capability::Error => {}
				Capability::IndirectError => {
					return Err(SignatureError::IndirectError {
						position: 2,
						type_name: second.type_name,
					});
				}
				Capability::Value => return Err(SignatureError::SecondNotError(second.type_name)),
			}
			if first.capability != Capability::Value {
				return Err(SignatureError::FirstIsError(first.type_name));
			}
			Ok(ReturnShape::DualValueError)
		}
		more => Err(SignatureError::TooManyOutputs(more.len())),
	}
}

/// Everything known about an adapted handler, fixed at adaptation time.
#[derive(Debug, Clone)]
pub struct HandlerDescriptor {
	name: &'static str,
	inputs: Vec<TypeKey>,
	outputs: Vec<OutputSlot>,
	shape: ReturnShape,
}

impl HandlerDescriptor {
	pub fn analyze(
		name: &'static str,
		inputs: Vec<TypeKey>,
		outputs: Vec<OutputSlot>,
	) -> Result<Self, SignatureError> {
		let shape = classify(&outputs)?;
		Ok(Self {
			name,
			inputs,
			outputs,
			shape,
		})
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn inputs(&self) -> &[TypeKey] {
		&self.inputs
	}

	pub fn outputs(&self) -> &[OutputSlot] {
		&self.outputs
	}

	pub fn shape(&self) -> ReturnShape {
		self.shape
	}
}
