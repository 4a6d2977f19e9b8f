//! Type-keyed storage attached to a request.
//!
//! Middleware use it to hand values to later stages without widening the
//! `Handler` signature. The request scope handle travels this way.

use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Type-safe extension storage.
///
/// Clones share the same underlying map, so a value inserted through one
/// clone of a request is visible through every other clone.
#[derive(Clone, Default)]
pub struct Extensions {
	map: Arc<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl Extensions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a value, returning the previous value of the same type.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_http::Extensions;
	///
	/// let extensions = Extensions::new();
	/// assert_eq!(extensions.insert(42u32), None);
	/// assert_eq!(extensions.insert(7u32), Some(42));
	/// ```
	pub fn insert<T: Send + Sync + 'static>(&self, value: T) -> Option<T> {
		self.map
			.lock()
			.insert(TypeId::of::<T>(), Box::new(value))
			.and_then(|previous| previous.downcast::<T>().ok())
			.map(|previous| *previous)
	}

	/// Get a cloned value.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_http::Extensions;
	///
	/// let extensions = Extensions::new();
	/// extensions.insert("hello".to_string());
	///
	/// assert_eq!(extensions.get::<String>().as_deref(), Some("hello"));
	/// assert_eq!(extensions.get::<u32>(), None);
	/// ```
	pub fn get<T>(&self) -> Option<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.map
			.lock()
			.get(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_ref::<T>())
			.cloned()
	}

	pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
		self.map.lock().contains_key(&TypeId::of::<T>())
	}

	/// Remove a value and return it.
	pub fn remove<T: Send + Sync + 'static>(&self) -> Option<T> {
		self.map
			.lock()
			.remove(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast::<T>().ok())
			.map(|boxed| *boxed)
	}

	pub fn clear(&self) {
		self.map.lock().clear();
	}
}

impl std::fmt::Debug for Extensions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Extensions")
			.field("len", &self.map.lock().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_clones_share_storage() {
		let extensions = Extensions::new();
		let clone = extensions.clone();

		clone.insert(5i64);

		assert!(extensions.contains::<i64>());
		assert_eq!(extensions.remove::<i64>(), Some(5));
		assert!(!clone.contains::<i64>());
	}

	#[test]
	fn test_clear() {
		let extensions = Extensions::new();
		extensions.insert(1u8);
		extensions.insert("x".to_string());
		extensions.clear();
		assert!(!extensions.contains::<u8>());
		assert!(!extensions.contains::<String>());
	}
}
