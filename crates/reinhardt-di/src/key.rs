//! Static type identity used as the registry key.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a concrete type or a trait-object type.
///
/// Values are always stored as `Arc<T>`, so a key also remembers the
/// `TypeId` of that storage slot. Two keys are equal when they name the same
/// type.
///
/// # Examples
///
/// ```
/// use reinhardt_di::TypeKey;
///
/// trait Greeter {}
///
/// assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
/// assert_ne!(TypeKey::of::<String>(), TypeKey::of::<dyn Greeter>());
/// assert!(TypeKey::of::<dyn Greeter>().name().contains("Greeter"));
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
	id: TypeId,
	slot: TypeId,
	name: &'static str,
}

impl TypeKey {
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			slot: TypeId::of::<Arc<T>>(),
			name: type_name::<T>(),
		}
	}

	pub fn id(&self) -> TypeId {
		self.id
	}

	/// `TypeId` of the `Arc<T>` a binding under this key must hold.
	pub fn slot(&self) -> TypeId {
		self.slot
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for TypeKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("TypeKey").field(&self.name).finish()
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}
