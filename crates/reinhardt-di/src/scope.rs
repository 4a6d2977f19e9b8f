//! Request scope handle

use crate::{DiError, DiResult, Registry, TypeKey};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to the registry of one request.
///
/// Clones refer to the same registry. Once the owning
/// [`PooledScope`](crate::PooledScope) is dropped, the registry goes back to
/// its pool and every operation on the handle fails with
/// [`DiError::ScopeReleased`].
#[derive(Clone)]
pub struct Scope {
	registry: Arc<Mutex<Option<Registry>>>,
}

impl Scope {
	pub(crate) fn new(registry: Registry) -> Self {
		Self {
			registry: Arc::new(Mutex::new(Some(registry))),
		}
	}

	/// A scope with its own registry that belongs to no pool.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_di::Scope;
	///
	/// let scope = Scope::detached();
	/// scope.bind(3u8).unwrap();
	/// assert_eq!(*scope.resolve::<u8>().unwrap(), 3);
	/// ```
	pub fn detached() -> Self {
		Self::new(Registry::new())
	}

	/// Run `f` against the registry.
	///
	/// The registry is locked for the duration of `f`; `f` must not use
	/// this scope again.
	pub fn with<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> DiResult<R> {
		let mut guard = self.registry.lock();
		let registry = guard.as_mut().ok_or(DiError::ScopeReleased)?;
		Ok(f(registry))
	}

	pub fn bind<T: Send + Sync + 'static>(&self, value: T) -> DiResult<()> {
		self.with(|registry| registry.bind(value))
	}

	pub fn bind_arc<T: ?Sized + Send + Sync + 'static>(&self, value: Arc<T>) -> DiResult<()> {
		self.with(|registry| registry.bind_arc(value))
	}

	pub fn bind_as<I: ?Sized + Send + Sync + 'static>(&self, value: Arc<I>) -> DiResult<()> {
		self.with(|registry| registry.bind_as(value))
	}

	pub fn bind_raw(&self, key: TypeKey, value: Box<dyn Any + Send + Sync>) -> DiResult<()> {
		self.with(|registry| registry.bind_raw(key, value))?
	}

	pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
		self.with(|registry| registry.resolve::<T>())?
	}

	pub fn is_released(&self) -> bool {
		self.registry.lock().is_none()
	}

	/// Detach the registry from every handle.
	pub(crate) fn take(&self) -> Option<Registry> {
		self.registry.lock().take()
	}
}

impl fmt::Debug for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &*self.registry.lock() {
			Some(registry) => f.debug_tuple("Scope").field(registry).finish(),
			None => f.write_str("Scope(<released>)"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_clones_share_registry() {
		let scope = Scope::detached();
		scope.clone().bind("shared".to_string()).unwrap();
		assert_eq!(*scope.resolve::<String>().unwrap(), "shared");
	}

	#[test]
	fn test_released_scope_rejects_everything() {
		let scope = Scope::detached();
		let handle = scope.clone();
		scope.bind(1u8).unwrap();

		assert!(scope.take().is_some());

		assert!(handle.is_released());
		assert_eq!(handle.bind(2u8), Err(DiError::ScopeReleased));
		assert_eq!(handle.resolve::<u8>().err(), Some(DiError::ScopeReleased));
		assert_eq!(handle.with(|_| ()), Err(DiError::ScopeReleased));
	}
}
