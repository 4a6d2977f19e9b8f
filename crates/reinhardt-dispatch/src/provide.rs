//! Middlewares that bind extra values into the request scope.
//!
//! They must run after a [`RequestScopeBinder`](crate::RequestScopeBinder);
//! without one they fail the request with a configuration error.

use crate::binder::{misconfigured, request_scope};
use async_trait::async_trait;
use reinhardt_di::{Registry, TypeKey};
use reinhardt_http::{Handler, Middleware, Request, Response, Result};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Binds one shared value under `T` on every request.
///
/// With `T = dyn Trait` the value is bound under the interface, so
/// handlers taking `Arc<dyn Trait>` resolve it.
///
/// # Examples
///
/// ```
/// use reinhardt_dispatch::Provide;
/// use std::sync::Arc;
///
/// trait Mailer: Send + Sync {}
/// struct Smtp;
/// impl Mailer for Smtp {}
///
/// let config = Provide::value("postgres://localhost/app".to_string());
/// let mailer = Provide::<dyn Mailer>::new(Arc::new(Smtp));
/// # let _ = (config, mailer);
/// ```
pub struct Provide<T: ?Sized> {
	value: Arc<T>,
}

impl<T: ?Sized + Send + Sync + 'static> Provide<T> {
	pub fn new(value: Arc<T>) -> Self {
		Self { value }
	}
}

impl<T: Send + Sync + 'static> Provide<T> {
	pub fn value(value: T) -> Self {
		Self::new(Arc::new(value))
	}
}

#[async_trait]
impl<T: ?Sized + Send + Sync + 'static> Middleware for Provide<T> {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let scope = request_scope(&request)?;
		scope
			.bind_arc(Arc::clone(&self.value))
			.map_err(|e| misconfigured("providing a value", e))?;
		next.handle(request).await
	}
}

impl<T: ?Sized> fmt::Debug for Provide<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Provide")
			.field("type", &std::any::type_name::<T>())
			.finish()
	}
}

type RawFactory = dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync;

/// Binds a type-erased value under an explicit key on every request.
///
/// The factory must produce the `Arc<T>` for the key's type `T`. Anything
/// else fails the request with a configuration error.
pub struct ProvideRaw {
	key: TypeKey,
	factory: Arc<RawFactory>,
}

impl ProvideRaw {
	pub fn new<F>(key: TypeKey, factory: F) -> Self
	where
		F: Fn() -> Box<dyn Any + Send + Sync> + Send + Sync + 'static,
	{
		Self {
			key,
			factory: Arc::new(factory),
		}
	}

	pub fn key(&self) -> TypeKey {
		self.key
	}
}

#[async_trait]
impl Middleware for ProvideRaw {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let scope = request_scope(&request)?;
		scope
			.bind_raw(self.key, (self.factory)())
			.map_err(|e| misconfigured("providing a raw value", e))?;
		next.handle(request).await
	}
}

impl fmt::Debug for ProvideRaw {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProvideRaw")
			.field("key", &self.key)
			.finish_non_exhaustive()
	}
}

/// Runs a function against the request registry on every request.
///
/// # Examples
///
/// ```
/// use reinhardt_dispatch::Configure;
///
/// let configure = Configure::new(|registry| {
///     registry.bind(30u64);
///     registry.bind("en-US".to_string());
/// });
/// # let _ = configure;
/// ```
pub struct Configure {
	configure: Arc<dyn Fn(&mut Registry) + Send + Sync>,
}

impl Configure {
	pub fn new<F>(configure: F) -> Self
	where
		F: Fn(&mut Registry) + Send + Sync + 'static,
	{
		Self {
			configure: Arc::new(configure),
		}
	}
}

#[async_trait]
impl Middleware for Configure {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let scope = request_scope(&request)?;
		scope
			.with(|registry| (self.configure)(registry))
			.map_err(|e| misconfigured("configuring the request scope", e))?;
		next.handle(request).await
	}
}

impl fmt::Debug for Configure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Configure").finish_non_exhaustive()
	}
}
