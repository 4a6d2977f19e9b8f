//! Request context seeded into every scope

use hyper::Method;
use reinhardt_http::Request;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Facts about the request being served, fixed when its scope is bound.
#[derive(Debug, Clone)]
pub struct RequestContext {
	pub id: Uuid,
	pub method: Method,
	pub path: String,
	pub started_at: Instant,
}

impl RequestContext {
	/// Capture the context of `request` with a fresh id.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_dispatch::RequestContext;
	/// use reinhardt_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder().method(Method::PUT).uri("/posts/3").build().unwrap();
	/// let context = RequestContext::from_request(&request);
	///
	/// assert_eq!(context.method, Method::PUT);
	/// assert_eq!(context.path, "/posts/3");
	/// ```
	pub fn from_request(request: &Request) -> Self {
		Self {
			id: Uuid::new_v4(),
			method: request.method.clone(),
			path: request.path().to_string(),
			started_at: Instant::now(),
		}
	}

	pub fn elapsed(&self) -> Duration {
		self.started_at.elapsed()
	}
}
