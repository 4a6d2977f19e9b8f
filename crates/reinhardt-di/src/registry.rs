//! Per-request typed value store.

use crate::{DiError, DiResult, TypeKey};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Slot = Box<dyn Any + Send + Sync>;

/// Mapping from [`TypeKey`] to one shared value.
///
/// Every entry holds an `Arc<T>` for its key's type, so trait objects can be
/// stored and resolved as `Arc<dyn Trait>`. Binding the same key again
/// replaces the previous value. Lookups are exact: a value bound as a
/// concrete type is not visible under a trait it implements unless it was
/// also bound with [`Registry::bind_as`].
///
/// # Examples
///
/// ```
/// use reinhardt_di::Registry;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// let mut registry = Registry::new();
/// registry.bind(42u32);
/// registry.bind_as::<dyn Greeter>(Arc::new(English));
///
/// assert_eq!(*registry.resolve::<u32>().unwrap(), 42);
/// assert_eq!(registry.resolve::<dyn Greeter>().unwrap().greet(), "hello");
/// assert!(registry.resolve::<English>().is_err());
/// ```
#[derive(Default)]
pub struct Registry {
	entries: HashMap<TypeKey, Slot>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind `value` under its own type.
	pub fn bind<T: Send + Sync + 'static>(&mut self, value: T) {
		self.bind_arc(Arc::new(value));
	}

	/// Bind an already shared value under `T`.
	pub fn bind_arc<T: ?Sized + Send + Sync + 'static>(&mut self, value: Arc<T>) {
		self.entries.insert(TypeKey::of::<T>(), Box::new(value));
	}

	/// Bind `value` under the interface type `I`.
	///
	/// The value must coerce to `Arc<I>`, so a value that does not implement
	/// the interface is rejected by the compiler. Use [`Registry::bind_raw`]
	/// when the key is only known at runtime.
	pub fn bind_as<I: ?Sized + Send + Sync + 'static>(&mut self, value: Arc<I>) {
		self.bind_arc(value);
	}

	/// Bind a type-erased value under an explicit key.
	///
	/// `value` must be the `Arc<T>` for the key's type `T`.
	///
	/// # Errors
	///
	/// Returns [`DiError::TypeMismatch`] and leaves the registry untouched
	/// when `value` has any other type.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_di::{DiError, Registry, TypeKey};
	/// use std::sync::Arc;
	///
	/// let mut registry = Registry::new();
	/// registry.bind_raw(TypeKey::of::<u32>(), Box::new(Arc::new(7u32))).unwrap();
	/// assert_eq!(*registry.resolve::<u32>().unwrap(), 7);
	///
	/// let err = registry.bind_raw(TypeKey::of::<u32>(), Box::new(7u32)).unwrap_err();
	/// assert!(matches!(err, DiError::TypeMismatch { .. }));
	/// ```
	pub fn bind_raw(&mut self, key: TypeKey, value: Slot) -> DiResult<()> {
		let erased: &dyn Any = &*value;
		if erased.type_id() != key.slot() {
			return Err(DiError::TypeMismatch {
				expected: key.name(),
			});
		}
		self.entries.insert(key, value);
		Ok(())
	}

	/// Resolve the value most recently bound under `T`.
	///
	/// # Errors
	///
	/// Returns [`DiError::NotFound`] when nothing is bound under `T`.
	pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
		let key = TypeKey::of::<T>();
		self.entries
			.get(&key)
			.and_then(|slot| slot.downcast_ref::<Arc<T>>())
			.cloned()
			.ok_or(DiError::NotFound(key.name()))
	}

	pub fn contains(&self, key: &TypeKey) -> bool {
		self.entries.contains_key(key)
	}

	/// Remove the binding under `T`, returning it.
	pub fn unbind<T: ?Sized + Send + Sync + 'static>(&mut self) -> Option<Arc<T>> {
		self.entries
			.remove(&TypeKey::of::<T>())
			.and_then(|slot| slot.downcast::<Arc<T>>().ok())
			.map(|value| *value)
	}

	pub fn keys(&self) -> impl Iterator<Item = &TypeKey> {
		self.entries.keys()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Drop every binding. Allocated capacity is kept for reuse.
	pub fn reset(&mut self) {
		self.entries.clear();
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.entries.keys()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	trait Shape: Send + Sync {
		fn area(&self) -> u32;
	}

	struct Square(u32);

	impl Shape for Square {
		fn area(&self) -> u32 {
			self.0 * self.0
		}
	}

	#[test]
	fn test_last_write_wins() {
		let mut registry = Registry::new();
		registry.bind("first".to_string());
		registry.bind("second".to_string());

		assert_eq!(registry.len(), 1);
		assert_eq!(*registry.resolve::<String>().unwrap(), "second");
	}

	#[test]
	fn test_interface_lookup_is_exact() {
		let mut registry = Registry::new();
		registry.bind(Square(3));

		assert_eq!(
			registry.resolve::<dyn Shape>().err(),
			Some(DiError::NotFound(TypeKey::of::<dyn Shape>().name()))
		);

		registry.bind_as::<dyn Shape>(Arc::new(Square(4)));
		assert_eq!(registry.resolve::<dyn Shape>().unwrap().area(), 16);
		assert_eq!(registry.resolve::<Square>().unwrap().area(), 9);
	}

	#[rstest]
	#[case::bare_value(Box::new(5u64))]
	#[case::other_arc(Box::new(Arc::new(5i64)))]
	#[case::concrete_for_interface(Box::new(Arc::new(Square(2))))]
	fn test_bind_raw_rejects_wrong_slot(#[case] value: Slot) {
		let mut registry = Registry::new();
		registry.bind(1u64);

		let key = if value.is::<Arc<Square>>() {
			TypeKey::of::<dyn Shape>()
		} else {
			TypeKey::of::<u64>()
		};
		let result = registry.bind_raw(key, value);

		assert!(matches!(result, Err(DiError::TypeMismatch { .. })));
		assert_eq!(*registry.resolve::<u64>().unwrap(), 1);
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn test_bind_raw_accepts_trait_object_slot() {
		let mut registry = Registry::new();
		let shape: Arc<dyn Shape> = Arc::new(Square(5));

		registry
			.bind_raw(TypeKey::of::<dyn Shape>(), Box::new(shape))
			.unwrap();

		assert_eq!(registry.resolve::<dyn Shape>().unwrap().area(), 25);
	}

	#[test]
	fn test_reset_matches_fresh_registry() {
		let mut registry = Registry::new();
		registry.bind(1u8);
		registry.bind_as::<dyn Shape>(Arc::new(Square(1)));

		registry.reset();

		assert!(registry.is_empty());
		assert!(registry.resolve::<u8>().is_err());
		assert!(registry.resolve::<dyn Shape>().is_err());
		assert!(!registry.contains(&TypeKey::of::<u8>()));
	}

	#[test]
	fn test_unbind() {
		let mut registry = Registry::new();
		registry.bind(9i32);
		assert_eq!(registry.unbind::<i32>().as_deref(), Some(&9));
		assert!(registry.unbind::<i32>().is_none());
	}
}
