//! Handler return lists.

use super::output::{Capability, Output, Returned};
use std::any::type_name;

/// Declared type of one handler output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSlot {
	pub type_name: &'static str,
	pub capability: Capability,
}

impl OutputSlot {
	pub fn of<T: Output>() -> Self {
		Self {
			type_name: type_name::<T>(),
			capability: T::CAPABILITY,
		}
	}
}

/// The full return type of a handler, seen as an ordered list of outputs.
///
/// Implemented for `()`, any single [`Output`], `Result<T, E>`,
/// `Result<(), E>` and tuples of up to four outputs.
pub trait HandlerReturn: Send + 'static {
	fn outputs() -> Vec<OutputSlot>;

	fn into_returned(self) -> Vec<Returned>;
}

impl HandlerReturn for () {
	fn outputs() -> Vec<OutputSlot> {
		Vec::new()
	}

	fn into_returned(self) -> Vec<Returned> {
		Vec::new()
	}
}

impl<T: Output> HandlerReturn for T {
	fn outputs() -> Vec<OutputSlot> {
		vec![OutputSlot::of::<T>()]
	}

	fn into_returned(self) -> Vec<Returned> {
		vec![Output::into_returned(self)]
	}
}

impl<T: Output, E: Output> HandlerReturn for Result<T, E> {
	fn outputs() -> Vec<OutputSlot> {
		vec![OutputSlot::of::<T>(), OutputSlot::of::<E>()]
	}

	fn into_returned(self) -> Vec<Returned> {
		match self {
			Ok(value) => vec![value.into_returned(), Returned::Nil],
			Err(error) => vec![Returned::Nil, error.into_returned()],
		}
	}
}

impl<E: Output> HandlerReturn for Result<(), E> {
	fn outputs() -> Vec<OutputSlot> {
		vec![OutputSlot::of::<E>()]
	}

	fn into_returned(self) -> Vec<Returned> {
		match self {
			Ok(()) => vec![Returned::Nil],
			Err(error) => vec![error.into_returned()],
		}
	}
}

macro_rules! impl_handler_return_tuple {
	($($out:ident),+) => {
		impl<$($out: Output),+> HandlerReturn for ($($out,)+) {
			fn outputs() -> Vec<OutputSlot> {
				vec![$(OutputSlot::of::<$out>()),+]
			}

			#[allow(non_snake_case)]
			fn into_returned(self) -> Vec<Returned> {
				let ($($out,)+) = self;
				vec![$($out.into_returned()),+]
			}
		}
	};
}

impl_handler_return_tuple!(A, B);
impl_handler_return_tuple!(A, B, C);
impl_handler_return_tuple!(A, B, C, D);
