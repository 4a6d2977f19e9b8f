//! Handler parameters resolved from the request registry.

use crate::context::RequestContext;
use reinhardt_di::{DiResult, Registry, TypeKey};
use reinhardt_http::{Request, ResponseWriter};
use std::sync::Arc;

/// A type a handler can take as a parameter.
///
/// `Arc<T>` resolves whatever was bound under `T`, including trait objects
/// bound with `bind_as`. The seeded request values can also be taken by
/// value.
pub trait Resolve: Sized + Send + 'static {
	/// Key the value is looked up under.
	fn type_key() -> TypeKey;

	fn resolve(registry: &Registry) -> DiResult<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Resolve for Arc<T> {
	fn type_key() -> TypeKey {
		TypeKey::of::<T>()
	}

	fn resolve(registry: &Registry) -> DiResult<Self> {
		registry.resolve::<T>()
	}
}

macro_rules! impl_resolve_cloned {
	($($ty:ty),+) => {
		$(
			impl Resolve for $ty {
				fn type_key() -> TypeKey {
					TypeKey::of::<$ty>()
				}

				fn resolve(registry: &Registry) -> DiResult<Self> {
					registry.resolve::<$ty>().map(|value| (*value).clone())
				}
			}
		)+
	};
}

impl_resolve_cloned!(ResponseWriter, RequestContext, Request);
