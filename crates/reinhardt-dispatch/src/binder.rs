//! Request scope binding middleware.
//!
//! [`RequestScopeBinder`] gives every request its own registry for as long
//! as the rest of the chain runs. Everything downstream finds the registry
//! through the [`Scope`] handle stored in the request extensions.

use crate::context::RequestContext;
use crate::settings::BindingSettings;
use async_trait::async_trait;
use reinhardt_di::{DiError, Scope, ScopePool};
use reinhardt_http::{
	Error, Handler, Middleware, RenderOptions, Request, Response, ResponseWriter, Result,
};
use std::sync::Arc;

/// Middleware that binds a pooled registry to each request.
///
/// The registry is seeded with the [`RequestContext`], the [`Request`] and a
/// [`ResponseWriter`] before the next stage runs, and goes back to the pool
/// once that stage finishes, fails, panics or is dropped. A request that
/// already carries a live scope passes through untouched, so nested chains
/// share one registry.
///
/// # Examples
///
/// ```
/// use reinhardt_dispatch::{HandlerFunc, MiddlewareChain, RequestScopeBinder};
/// use reinhardt_di::ScopePool;
/// use reinhardt_http::{Handler, Request, ResponseWriter};
/// use std::sync::Arc;
///
/// fn hello(writer: ResponseWriter) {
///     writer.write(b"hello");
/// }
///
/// # tokio_test::block_on(async {
/// let pool = Arc::new(ScopePool::new(16));
/// let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(hello)))
///     .with_middleware(Arc::new(RequestScopeBinder::with_pool(Arc::clone(&pool))))
///     .build();
///
/// let response = handler.handle(Request::builder().build().unwrap()).await.unwrap();
///
/// assert_eq!(&response.body[..], b"hello");
/// assert_eq!(pool.in_use(), 0);
/// assert_eq!(pool.available(), 1);
/// # });
/// ```
pub struct RequestScopeBinder {
	pool: Arc<ScopePool>,
	render: Arc<RenderOptions>,
}

impl RequestScopeBinder {
	/// Binder backed by the process-wide pool.
	pub fn new() -> Self {
		Self::with_pool(ScopePool::global())
	}

	pub fn with_pool(pool: Arc<ScopePool>) -> Self {
		Self {
			pool,
			render: Arc::new(RenderOptions::default()),
		}
	}

	/// Binder with its own pool and render options built from `settings`.
	pub fn from_settings(settings: &BindingSettings) -> Self {
		Self {
			pool: settings.build_pool(),
			render: Arc::new(settings.render_options()),
		}
	}

	pub fn with_render(mut self, render: RenderOptions) -> Self {
		self.render = Arc::new(render);
		self
	}

	pub fn pool(&self) -> &Arc<ScopePool> {
		&self.pool
	}

	pub fn render(&self) -> &RenderOptions {
		&self.render
	}
}

impl Default for RequestScopeBinder {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Middleware for RequestScopeBinder {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		if attached_scope(&request).is_some() {
			tracing::trace!("Request already carries a scope, passing through");
			return next.handle(request).await;
		}

		let lease = self.pool.checkout();
		let context = RequestContext::from_request(&request);
		request.extensions.insert(lease.scope().clone());

		let writer = ResponseWriter::new(Arc::clone(&self.render));
		let seeded = lease.with(|registry| {
			registry.bind(context.clone());
			registry.bind(request.clone());
			registry.bind(writer);
		});
		if let Err(e) = seeded {
			return Err(misconfigured("seeding request scope", e));
		}

		tracing::debug!(
			request_id = %context.id,
			"Bound request scope for {} {}",
			context.method,
			context.path
		);

		let result = next.handle(request).await;

		drop(lease);
		tracing::debug!(
			request_id = %context.id,
			"Released request scope after {:?}",
			context.elapsed()
		);

		result
	}
}

fn attached_scope(request: &Request) -> Option<Scope> {
	request
		.extensions
		.get::<Scope>()
		.filter(|scope| !scope.is_released())
}

/// Scope bound to `request` by a [`RequestScopeBinder`].
///
/// # Errors
///
/// Returns `Error::ImproperlyConfigured` when no binder ran for this request,
/// or its scope was already released. The pipeline is misconfigured in
/// that case, so the error is also logged.
pub fn request_scope(request: &Request) -> Result<Scope> {
	attached_scope(request).ok_or_else(|| {
		tracing::error!(
			"No request scope bound for {} {}; is RequestScopeBinder installed ahead of this stage?",
			request.method,
			request.path()
		);
		Error::ImproperlyConfigured(format!(
			"no request scope bound for {} {}",
			request.method,
			request.path()
		))
	})
}

/// Log a registry failure and turn it into a configuration error.
pub(crate) fn misconfigured(action: &str, error: DiError) -> Error {
	tracing::error!("Request scope misconfigured while {}: {}", action, error);
	Error::ImproperlyConfigured(format!("{action}: {error}"))
}
