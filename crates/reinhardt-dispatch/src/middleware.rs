//! Middleware system for request/response processing pipeline.

use async_trait::async_trait;
use reinhardt_http::{Handler, Middleware, Request, Response, Result};
use std::sync::Arc;

/// A middleware chain that composes multiple middleware components with a handler.
///
/// Middleware run in the order they were added; the first one added sees
/// the request first.
///
/// # Examples
///
/// ```
/// use reinhardt_dispatch::{MiddlewareChain, RequestScopeBinder};
/// use reinhardt_http::{Handler, Request, Response, Result};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// struct Hello;
///
/// #[async_trait]
/// impl Handler for Hello {
///     async fn handle(&self, _request: Request) -> Result<Response> {
///         Ok(Response::ok().with_body("hello"))
///     }
/// }
///
/// let handler = MiddlewareChain::new(Arc::new(Hello))
///     .with_middleware(Arc::new(RequestScopeBinder::new()))
///     .build();
/// # let _ = handler;
/// ```
pub struct MiddlewareChain {
	handler: Arc<dyn Handler>,
	middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
	/// Creates a new middleware chain with the given handler.
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
		}
	}

	/// Adds a middleware to the chain.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}

	pub fn len(&self) -> usize {
		self.middlewares.len()
	}

	pub fn is_empty(&self) -> bool {
		self.middlewares.is_empty()
	}

	/// Builds the final handler by composing all middleware.
	pub fn build(self) -> Arc<dyn Handler> {
		let mut handler = self.handler;

		for middleware in self.middlewares.into_iter().rev() {
			handler = Arc::new(MiddlewareHandler {
				middleware,
				next: handler,
			});
		}

		handler
	}
}

/// Internal handler that wraps a middleware with its next handler.
struct MiddlewareHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for MiddlewareHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		if !self.middleware.should_continue(&request) {
			return self.next.handle(request).await;
		}
		self.middleware.process(request, Arc::clone(&self.next)).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct Echo;

	#[async_trait]
	impl Handler for Echo {
		async fn handle(&self, request: Request) -> Result<Response> {
			let trail = request
				.headers
				.get("x-trail")
				.and_then(|value| value.to_str().ok())
				.unwrap_or_default()
				.to_string();
			Ok(Response::ok().with_body(trail))
		}
	}

	/// Appends its name to the `x-trail` header unless the path is skipped.
	struct Mark {
		name: &'static str,
		skip: Option<&'static str>,
	}

	#[async_trait]
	impl Middleware for Mark {
		async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			let trail = match request.headers.get("x-trail").and_then(|v| v.to_str().ok()) {
				Some(trail) => format!("{trail},{}", self.name),
				None => self.name.to_string(),
			};
			request.headers.insert(
				hyper::header::HeaderName::from_static("x-trail"),
				hyper::header::HeaderValue::from_str(&trail)
					.map_err(|e| reinhardt_http::Error::Internal(e.to_string()))?,
			);
			next.handle(request).await
		}

		fn should_continue(&self, request: &Request) -> bool {
			self.skip != Some(request.path())
		}
	}

	fn chain() -> Arc<dyn Handler> {
		let mut chain = MiddlewareChain::new(Arc::new(Echo)).with_middleware(Arc::new(Mark {
			name: "a",
			skip: None,
		}));
		chain.add_middleware(Arc::new(Mark {
			name: "b",
			skip: Some("/skip-b"),
		}));
		assert_eq!(chain.len(), 2);
		chain.build()
	}

	#[rstest]
	#[case("/", "a,b")]
	#[case("/skip-b", "a")]
	#[tokio::test]
	async fn test_order_and_skipping(#[case] uri: &str, #[case] trail: &str) {
		let response = chain()
			.handle(Request::builder().uri(uri).build().unwrap())
			.await
			.unwrap();

		assert_eq!(response.text(), trail);
	}

	#[tokio::test]
	async fn test_empty_chain_is_the_handler() {
		let chain = MiddlewareChain::new(Arc::new(Echo));
		assert!(chain.is_empty());

		let response = chain
			.build()
			.handle(Request::builder().build().unwrap())
			.await
			.unwrap();

		assert_eq!(response.text(), "");
	}
}
