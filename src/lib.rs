//! # Reinhardt Binding
//!
//! Request-scoped dependency injection and reflective handler binding.
//!
//! Each request gets its own type registry, checked out of a pool by
//! [`RequestScopeBinder`] and seeded with the request, a [`RequestContext`]
//! and a [`ResponseWriter`]. Middlewares bind more values into it. A plain
//! function wrapped in [`HandlerFunc`] then has its parameters resolved from
//! the registry, and its return values marshaled into the response.
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |---|---|
//! | [`http`] | Request, response, errors, status translation, response writer |
//! | [`di`] | Type keys, registries, the registry pool and scope handles |
//! | [`dispatch`] | Scope binder, provide middlewares, handler adaptation, settings |
//! | [`params`] | Body decoders, validation and the `Bind*` middlewares (feature `params`) |
//!
//! ## Quick Start
//!
//! ```rust
//! use reinhardt_binding::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Serialize)]
//! struct Person {
//!     name: String,
//! }
//!
//! impl_json_output!(Person);
//!
//! fn show(_writer: ResponseWriter) -> Result<Person> {
//!     Ok(Person { name: "John".to_string() })
//! }
//!
//! # tokio_test::block_on(async {
//! let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(show)))
//!     .with_middleware(Arc::new(RequestScopeBinder::new()))
//!     .build();
//!
//! let response = handler.handle(Request::builder().build().unwrap()).await.unwrap();
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(response.text(), r#"{"name":"John"}"#);
//! # });
//! ```

pub use reinhardt_di as di;
pub use reinhardt_dispatch as dispatch;
pub use reinhardt_http as http;
#[cfg(feature = "params")]
pub use reinhardt_params as params;

pub use hyper::StatusCode;

pub use reinhardt_di::{DiError, DiResult, PooledScope, Registry, Scope, ScopePool, TypeKey};
pub use reinhardt_dispatch::{
	BindingSettings, Configure, HandlerDescriptor, HandlerFunc, Json, MiddlewareChain, Output,
	Provide, ProvideRaw, RequestContext, RequestScopeBinder, ReturnShape, SettingsError,
	SignatureError, impl_error_output, impl_json_output, request_scope,
};
pub use reinhardt_http::{
	ApiStatus, BoxError, DefaultStatusTranslator, Error, FieldError, FieldErrors, Handler,
	Middleware, RenderOptions, Request, Response, ResponseWriter, Result, StatusTranslator,
};

#[cfg(feature = "params")]
pub use reinhardt_params::{
	Bind, BindForm, BindJson, BindMultipart, UploadedFile, UploadedFiles, decode_form,
	decode_form_with_query, decode_json, decode_multipart, validate, validate_username,
};

/// Everything a typical application needs.
pub mod prelude {
	pub use crate::{
		ApiStatus, BindingSettings, Configure, Error, FieldErrors, Handler, HandlerFunc, Json,
		Middleware, MiddlewareChain, Provide, Request, RequestContext, RequestScopeBinder,
		Response, ResponseWriter, Result, StatusCode, StatusTranslator, impl_error_output,
		impl_json_output,
	};

	#[cfg(feature = "params")]
	pub use crate::{Bind, BindForm, BindJson, BindMultipart, UploadedFiles, validate_username};

	// External
	pub use async_trait::async_trait;
	pub use serde::{Deserialize, Serialize};
	#[cfg(feature = "params")]
	pub use validator::Validate;
}
