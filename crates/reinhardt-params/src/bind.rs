//! Middlewares that decode, validate and bind the request body.
//!
//! ```text
//! Request → RequestScopeBinder → BindJson<T> → HandlerFunc(Arc<T>, ...)
//!                                    │
//!                  decode / validate failure → translator response
//! ```

use crate::decode::{decode_form_with_query, decode_json};
use crate::multipart::{UploadedFiles, decode_multipart};
use crate::validation::validate;
use async_trait::async_trait;
use hyper::header::CONTENT_TYPE;
use reinhardt_di::{Registry, Scope};
use reinhardt_dispatch::request_scope;
use reinhardt_http::{
	Error, FieldErrors, Handler, Middleware, Request, Response, ResponseWriter, Result,
};
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use validator::Validate;

/// A decoded body, plus the files of a multipart request.
#[derive(Debug)]
pub struct DecodedBody<T> {
	pub value: T,
	pub files: Option<UploadedFiles>,
}

impl<T> From<T> for DecodedBody<T> {
	fn from(value: T) -> Self {
		Self { value, files: None }
	}
}

/// How a request body is decoded.
#[async_trait]
pub trait BodyFormat: Send + Sync + 'static {
	/// Name used in logs.
	const NAME: &'static str;

	async fn decode<T: DeserializeOwned + Send>(
		request: &Request,
	) -> std::result::Result<DecodedBody<T>, FieldErrors>;
}

/// Always decodes JSON, whatever the content type says.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody;

#[async_trait]
impl BodyFormat for JsonBody {
	const NAME: &'static str = "JSON";

	async fn decode<T: DeserializeOwned + Send>(
		request: &Request,
	) -> std::result::Result<DecodedBody<T>, FieldErrors> {
		decode_json::<T>(&request.body).map(DecodedBody::<T>::from)
	}
}

/// Always decodes `application/x-www-form-urlencoded`, merged with the
/// query string. Body values win over query values of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBody;

#[async_trait]
impl BodyFormat for FormBody {
	const NAME: &'static str = "form";

	async fn decode<T: DeserializeOwned + Send>(
		request: &Request,
	) -> std::result::Result<DecodedBody<T>, FieldErrors> {
		decode_form_with_query::<T>(request.query(), &request.body).map(DecodedBody::<T>::from)
	}
}

/// Always decodes `multipart/form-data`. Text parts and the query string
/// fill the value, file parts are bound as [`UploadedFiles`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipartBody;

#[async_trait]
impl BodyFormat for MultipartBody {
	const NAME: &'static str = "multipart";

	async fn decode<T: DeserializeOwned + Send>(
		request: &Request,
	) -> std::result::Result<DecodedBody<T>, FieldErrors> {
		let content_type = request
			.headers
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.unwrap_or_default();
		let (value, files) =
			decode_multipart(content_type, request.query(), request.body.clone()).await?;
		Ok(DecodedBody {
			value,
			files: Some(files),
		})
	}
}

/// Picks the decoder from the request content type.
///
/// `application/json` and any `+json` suffix decode as JSON,
/// `application/x-www-form-urlencoded` as a form and `multipart/form-data`
/// as multipart. Without a content type the query string and body decode
/// as a form, so a plain `GET /login?username=alice` binds. Any other
/// type is a `content_type` error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegotiatedBody;

#[async_trait]
impl BodyFormat for NegotiatedBody {
	const NAME: &'static str = "negotiated";

	async fn decode<T: DeserializeOwned + Send>(
		request: &Request,
	) -> std::result::Result<DecodedBody<T>, FieldErrors> {
		match request.content_type().as_deref() {
			Some("application/json") => JsonBody::decode(request).await,
			Some(media_type) if media_type.ends_with("+json") => JsonBody::decode(request).await,
			Some("application/x-www-form-urlencoded") | None => FormBody::decode(request).await,
			Some("multipart/form-data") => MultipartBody::decode(request).await,
			Some(other) => {
				let mut errors = FieldErrors::new();
				errors.add(
					Vec::<String>::new(),
					FieldErrors::CONTENT_TYPE,
					format!("unsupported content type: {other}"),
				);
				Err(errors)
			}
		}
	}
}

type InterfaceBinder<T> = Box<dyn Fn(Arc<T>, &mut Registry) + Send + Sync>;

/// Decodes the body into `T`, validates it and binds `Arc<T>` into the
/// request scope.
///
/// Use one of the aliases: [`BindJson`], [`BindForm`], [`BindMultipart`]
/// or [`Bind`]. Multipart formats also bind `Arc<UploadedFiles>`. On a
/// decode or validation failure the chain stops and the response comes
/// from the scope's writer, so the configured translator renders it.
///
/// # Examples
///
/// ```
/// use reinhardt_params::BindJson;
/// use serde::Deserialize;
/// use std::sync::Arc;
/// use validator::Validate;
///
/// trait Titled: Send + Sync {
///     fn title(&self) -> &str;
/// }
///
/// #[derive(Deserialize, Validate)]
/// struct NewPost {
///     #[validate(length(min = 1))]
///     title: String,
/// }
///
/// impl Titled for NewPost {
///     fn title(&self) -> &str {
///         &self.title
///     }
/// }
///
/// let bind = BindJson::<NewPost>::new().with_interface(|post| post as Arc<dyn Titled>);
/// assert_eq!(bind.interface_count(), 1);
/// ```
pub struct BindBody<T, F> {
	interfaces: Vec<InterfaceBinder<T>>,
	_format: PhantomData<fn() -> F>,
}

/// Binds a JSON body.
pub type BindJson<T> = BindBody<T, JsonBody>;

/// Binds a urlencoded form body and the query string.
pub type BindForm<T> = BindBody<T, FormBody>;

/// Binds a multipart form and its uploaded files.
pub type BindMultipart<T> = BindBody<T, MultipartBody>;

/// Binds a JSON, form or multipart body depending on the content type.
pub type Bind<T> = BindBody<T, NegotiatedBody>;

impl<T, F> BindBody<T, F>
where
	T: DeserializeOwned + Validate + Send + Sync + 'static,
	F: BodyFormat,
{
	pub fn new() -> Self {
		Self {
			interfaces: Vec::new(),
			_format: PhantomData,
		}
	}

	/// Also bind the decoded value under the interface `I`.
	pub fn with_interface<I, C>(mut self, cast: C) -> Self
	where
		I: ?Sized + Send + Sync + 'static,
		C: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
	{
		self.interfaces
			.push(Box::new(move |value: Arc<T>, registry: &mut Registry| {
				registry.bind_as::<I>(cast(value))
			}));
		self
	}

	pub fn interface_count(&self) -> usize {
		self.interfaces.len()
	}

	async fn decode(request: &Request) -> std::result::Result<DecodedBody<T>, FieldErrors> {
		let decoded = F::decode::<T>(request).await?;
		validate(&decoded.value)?;
		Ok(decoded)
	}
}

impl<T, F> Default for BindBody<T, F>
where
	T: DeserializeOwned + Validate + Send + Sync + 'static,
	F: BodyFormat,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<T, F: BodyFormat> fmt::Debug for BindBody<T, F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BindBody")
			.field("type", &std::any::type_name::<T>())
			.field("format", &F::NAME)
			.field("interfaces", &self.interfaces.len())
			.finish()
	}
}

#[async_trait]
impl<T, F> Middleware for BindBody<T, F>
where
	T: DeserializeOwned + Validate + Send + Sync + 'static,
	F: BodyFormat,
{
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let scope = request_scope(&request)?;

		let DecodedBody { value, files } = match Self::decode(&request).await {
			Ok(decoded) => decoded,
			Err(errors) => {
				tracing::debug!(
					"Rejected {} body for {} {}: {}",
					F::NAME,
					request.method,
					request.path(),
					errors
				);
				return Ok(reject(&scope, errors));
			}
		};

		let value = Arc::new(value);
		scope
			.with(|registry| {
				registry.bind_arc(Arc::clone(&value));
				for bind in &self.interfaces {
					bind(Arc::clone(&value), registry);
				}
				if let Some(files) = files {
					registry.bind(files);
				}
			})
			.map_err(|e| {
				tracing::error!("Request scope released before body binding: {}", e);
				Error::ImproperlyConfigured(format!("binding request body: {e}"))
			})?;

		next.handle(request).await
	}
}

/// Response for a rejected body, rendered through the scope's writer.
fn reject(scope: &Scope, errors: FieldErrors) -> Response {
	match scope.resolve::<ResponseWriter>() {
		Ok(writer) => {
			writer.api_error(&errors);
			writer.take_response()
		}
		Err(_) => Response::from(Error::Validation(errors)),
	}
}
