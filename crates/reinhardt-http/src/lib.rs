//! # Reinhardt HTTP
//!
//! HTTP vocabulary shared by the binding stack: requests, responses,
//! the `Handler`/`Middleware` traits, the framework error type and the
//! error-to-status translator used for every error-carrying response.
//!
//! ## Overview
//!
//! ```text
//! Request ─→ Middleware ─→ ... ─→ Handler ─→ Response
//!                                    │
//!                              ResponseWriter ─→ StatusTranslator (errors)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_http::{Handler, Request, Response, Result};
//! use async_trait::async_trait;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request) -> Result<Response> {
//!         Ok(Response::ok().with_body("Hello, World!"))
//!     }
//! }
//! ```

pub mod exception;
pub mod extensions;
pub mod middleware;
pub mod request;
pub mod response;
pub mod status;
pub mod writer;

pub use exception::{Error, FieldError, FieldErrors, Result};
pub use extensions::Extensions;
pub use middleware::{Handler, Middleware};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use status::{ApiStatus, DefaultStatusTranslator, StatusTranslator};
pub use writer::{RenderOptions, ResponseWriter};

/// Boxed error type carried through error-returning handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
