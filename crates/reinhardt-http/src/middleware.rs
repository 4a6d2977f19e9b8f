//! Handler and middleware traits.
//!
//! A middleware receives the request and the rest of the chain as a
//! `next` handler. It may run code before and after `next`, or answer the
//! request itself without calling it.
//!
//! ```rust
//! use reinhardt_http::{Handler, Middleware, Request, Response, Result};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct RequireJson;
//!
//! #[async_trait]
//! impl Middleware for RequireJson {
//!     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
//!         if request.content_type().as_deref() != Some("application/json") {
//!             return Ok(Response::new(hyper::StatusCode::UNSUPPORTED_MEDIA_TYPE));
//!         }
//!         next.handle(request).await
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Handler trait for processing requests.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Lets `Arc<dyn Handler>` be used wherever a handler is expected.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request through this middleware.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Whether this middleware runs for `request`. Skipped middleware pass
	/// the request straight to `next`.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

#[async_trait]
impl<T: Middleware + ?Sized> Middleware for Arc<T> {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		(**self).process(request, next).await
	}

	fn should_continue(&self, request: &Request) -> bool {
		(**self).should_continue(request)
	}
}
