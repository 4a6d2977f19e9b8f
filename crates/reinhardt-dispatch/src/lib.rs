//! # Reinhardt Dispatch
//!
//! Request scope binding and injected handlers for Reinhardt.
//!
//! ## Overview
//!
//! ```text
//! Request → RequestScopeBinder → Provide / Configure → HandlerFunc → Response
//!                  │                    │                  │
//!            checkout + seed       bind values      resolve, invoke, marshal
//!                  └──────────── release on every exit ───────────┘
//! ```
//!
//! - [`RequestScopeBinder`] checks a registry out of a pool for each request
//!   and seeds it with the [`RequestContext`], the request and a
//!   `ResponseWriter`.
//! - [`Provide`], [`ProvideRaw`] and [`Configure`] bind application values
//!   into that registry.
//! - [`HandlerFunc`] adapts a plain function: its parameters are resolved
//!   from the registry, and its return values become the response.
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_dispatch::{impl_json_output, HandlerFunc, MiddlewareChain, Provide, RequestScopeBinder};
//! use reinhardt_http::{Error, Handler, Request};
//! use serde::Serialize;
//! use std::sync::Arc;
//!
//! trait Directory: Send + Sync {
//!     fn lookup(&self, id: u64) -> Option<String>;
//! }
//!
//! struct Fixed;
//!
//! impl Directory for Fixed {
//!     fn lookup(&self, id: u64) -> Option<String> {
//!         (id == 1).then(|| "John".to_string())
//!     }
//! }
//!
//! #[derive(Serialize)]
//! struct Person {
//!     name: String,
//! }
//!
//! impl_json_output!(Person);
//!
//! fn show(directory: Arc<dyn Directory>) -> Result<Person, Error> {
//!     let name = directory.lookup(1).ok_or_else(|| Error::NotFound("person 1".into()))?;
//!     Ok(Person { name })
//! }
//!
//! # tokio_test::block_on(async {
//! let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(show)))
//!     .with_middleware(Arc::new(RequestScopeBinder::new()))
//!     .with_middleware(Arc::new(Provide::<dyn Directory>::new(Arc::new(Fixed))))
//!     .build();
//!
//! let response = handler.handle(Request::builder().build().unwrap()).await.unwrap();
//! assert_eq!(response.text(), r#"{"name":"John"}"#);
//! # });
//! ```

pub mod binder;
pub mod context;
pub mod handler;
pub mod middleware;
pub mod provide;
pub mod settings;

pub use binder::{RequestScopeBinder, request_scope};
pub use context::RequestContext;
pub use handler::{
	HandlerDescriptor, HandlerFunc, HandlerReturn, Json, Output, Resolve, ReturnShape,
	SignatureError,
};
pub use middleware::MiddlewareChain;
pub use provide::{Configure, Provide, ProvideRaw};
pub use settings::{BindingSettings, SettingsError};
