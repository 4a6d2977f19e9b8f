//! Registry pool shared by all requests.

use crate::{Registry, Scope};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Idle registries kept by a pool unless configured otherwise.
pub const DEFAULT_MAX_IDLE: usize = 1024;

static GLOBAL_POOL: Lazy<Arc<ScopePool>> =
	Lazy::new(|| Arc::new(ScopePool::new(DEFAULT_MAX_IDLE)));

/// Free list of registries.
///
/// A checkout hands out an empty registry wrapped in a [`PooledScope`]
/// guard. Dropping the guard wipes the registry and returns it, on every
/// exit path: normal completion, an error, a panic unwinding through the
/// request, or the request future being dropped.
///
/// # Examples
///
/// ```
/// use reinhardt_di::ScopePool;
/// use std::sync::Arc;
///
/// let pool = Arc::new(ScopePool::new(8));
/// pool.prewarm(2);
///
/// let lease = pool.checkout();
/// lease.bind(42u32).unwrap();
/// assert_eq!(pool.available(), 1);
/// assert_eq!(pool.in_use(), 1);
///
/// drop(lease);
/// assert_eq!(pool.available(), 2);
///
/// let lease = pool.checkout();
/// assert!(lease.resolve::<u32>().is_err());
/// ```
pub struct ScopePool {
	idle: Mutex<Vec<Registry>>,
	max_idle: usize,
	created: AtomicUsize,
	in_use: AtomicUsize,
}

impl ScopePool {
	pub fn new(max_idle: usize) -> Self {
		Self {
			idle: Mutex::new(Vec::new()),
			max_idle,
			created: AtomicUsize::new(0),
			in_use: AtomicUsize::new(0),
		}
	}

	/// Process-wide pool, created on first use.
	pub fn global() -> Arc<ScopePool> {
		Arc::clone(&GLOBAL_POOL)
	}

	/// Allocate up to `count` idle registries, bounded by `max_idle`.
	pub fn prewarm(&self, count: usize) {
		let mut idle = self.idle.lock();
		let room = self.max_idle.saturating_sub(idle.len());
		let count = count.min(room);
		idle.extend(std::iter::repeat_with(Registry::new).take(count));
		self.created.fetch_add(count, Ordering::Relaxed);
		tracing::debug!("Prewarmed scope pool with {} registries", count);
	}

	/// Check out an empty registry.
	pub fn checkout(self: &Arc<Self>) -> PooledScope {
		let reused = self.idle.lock().pop();
		let mut registry = reused.unwrap_or_else(|| {
			let total = self.created.fetch_add(1, Ordering::Relaxed) + 1;
			tracing::trace!("Scope pool allocated registry #{}", total);
			Registry::new()
		});
		registry.reset();
		self.in_use.fetch_add(1, Ordering::Relaxed);

		PooledScope {
			scope: Scope::new(registry),
			pool: Arc::clone(self),
		}
	}

	fn release(&self, mut registry: Registry) {
		// Values may run arbitrary drop code; do it outside the lock.
		registry.reset();
		self.in_use.fetch_sub(1, Ordering::Relaxed);

		let mut idle = self.idle.lock();
		if idle.len() < self.max_idle {
			idle.push(registry);
		}
	}

	/// Idle registries ready for checkout.
	pub fn available(&self) -> usize {
		self.idle.lock().len()
	}

	/// Registries currently checked out.
	pub fn in_use(&self) -> usize {
		self.in_use.load(Ordering::Relaxed)
	}

	/// Registries allocated over the pool's lifetime.
	pub fn created(&self) -> usize {
		self.created.load(Ordering::Relaxed)
	}

	pub fn max_idle(&self) -> usize {
		self.max_idle
	}

	/// Drop every idle registry, returning how many were dropped.
	///
	/// Checked-out registries are unaffected and still return on release.
	pub fn drain(&self) -> usize {
		let drained = std::mem::take(&mut *self.idle.lock());
		tracing::debug!("Drained {} idle registries from scope pool", drained.len());
		drained.len()
	}
}

impl Default for ScopePool {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_IDLE)
	}
}

impl fmt::Debug for ScopePool {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScopePool")
			.field("available", &self.available())
			.field("in_use", &self.in_use())
			.field("created", &self.created())
			.field("max_idle", &self.max_idle)
			.finish()
	}
}

/// Checked-out registry. Returns it to the pool when dropped.
///
/// Dereferences to the [`Scope`] handle; clones of that handle stop working
/// once the guard is gone.
pub struct PooledScope {
	scope: Scope,
	pool: Arc<ScopePool>,
}

impl PooledScope {
	pub fn scope(&self) -> &Scope {
		&self.scope
	}

	pub fn pool(&self) -> &Arc<ScopePool> {
		&self.pool
	}
}

impl Deref for PooledScope {
	type Target = Scope;

	fn deref(&self) -> &Scope {
		&self.scope
	}
}

impl Drop for PooledScope {
	fn drop(&mut self) {
		if let Some(registry) = self.scope.take() {
			self.pool.release(registry);
		}
	}
}

impl fmt::Debug for PooledScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PooledScope")
			.field("scope", &self.scope)
			.finish_non_exhaustive()
	}
}
