//! # Reinhardt Params
//!
//! Request body decoding and validation for injected handlers.
//!
//! - [`decode_json`], [`decode_form`], [`decode_form_with_query`] and
//!   [`decode_multipart`] turn a body into a typed value, reporting
//!   failures as [`FieldErrors`](reinhardt_http::FieldErrors).
//! - [`validate`] runs `validator` rules and flattens the result into the
//!   same error list. [`validate_username`] is a ready-made custom rule.
//! - [`BindJson`], [`BindForm`], [`BindMultipart`] and [`Bind`] do both
//!   inside the middleware chain and bind the value into the request
//!   scope, where a handler takes it as `Arc<T>`. Multipart uploads are
//!   bound as `Arc<UploadedFiles>`.
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_dispatch::{HandlerFunc, MiddlewareChain, RequestScopeBinder};
//! use reinhardt_http::{Handler, Request, ResponseWriter};
//! use reinhardt_params::BindJson;
//! use serde::Deserialize;
//! use std::sync::Arc;
//! use validator::Validate;
//!
//! #[derive(Deserialize, Validate)]
//! struct NewPost {
//!     #[validate(length(min = 1, max = 80))]
//!     title: String,
//! }
//!
//! fn create(post: Arc<NewPost>, writer: ResponseWriter) {
//!     writer.write(post.title.as_bytes());
//! }
//!
//! # tokio_test::block_on(async {
//! let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(create)))
//!     .with_middleware(Arc::new(RequestScopeBinder::new()))
//!     .with_middleware(Arc::new(BindJson::<NewPost>::new()))
//!     .build();
//!
//! let ok = handler
//!     .handle(Request::builder().body(r#"{"title": "Hello"}"#).build().unwrap())
//!     .await
//!     .unwrap();
//! assert_eq!(ok.text(), "Hello");
//!
//! let rejected = handler
//!     .handle(Request::builder().body(r#"{"title": ""}"#).build().unwrap())
//!     .await
//!     .unwrap();
//! assert_eq!(rejected.status.as_u16(), 422);
//! # });
//! ```

pub mod bind;
pub mod decode;
pub mod multipart;
pub mod validation;

pub use bind::{
	Bind, BindBody, BindForm, BindJson, BindMultipart, BodyFormat, DecodedBody, FormBody, JsonBody,
	MultipartBody, NegotiatedBody,
};
pub use decode::{decode_form, decode_form_with_query, decode_json};
pub use multipart::{UploadedFile, UploadedFiles, decode_multipart};
pub use validation::{to_field_errors, validate, validate_username};
