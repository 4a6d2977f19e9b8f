//! Adapts plain functions into [`Handler`]s with injected parameters.

use super::marshal::marshal;
use super::resolve::Resolve;
use super::returns::HandlerReturn;
use super::signature::{HandlerDescriptor, SignatureError};
use crate::binder::{misconfigured, request_scope};
use async_trait::async_trait;
use reinhardt_di::{DiResult, Registry, TypeKey};
use reinhardt_http::{Handler, Request, Response, ResponseWriter, Result};
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A function whose parameters can all be resolved from a registry.
///
/// Implemented for `Fn` items and closures taking up to eight
/// [`Resolve`] parameters and returning a [`HandlerReturn`].
pub trait IntoHandlerFunc<Args>: Send + Sync + 'static {
	type Output: HandlerReturn;

	fn inputs() -> Vec<TypeKey>;

	fn resolve_args(registry: &Registry) -> DiResult<Args>;

	fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_into_handler_func {
	($($arg:ident),*) => {
		impl<F, R, $($arg,)*> IntoHandlerFunc<($($arg,)*)> for F
		where
			F: Fn($($arg),*) -> R + Send + Sync + 'static,
			R: HandlerReturn,
			$($arg: Resolve,)*
		{
			type Output = R;

			fn inputs() -> Vec<TypeKey> {
				vec![$($arg::type_key()),*]
			}

			#[allow(unused_variables)]
			fn resolve_args(registry: &Registry) -> DiResult<($($arg,)*)> {
				Ok(($($arg::resolve(registry)?,)*))
			}

			#[allow(non_snake_case)]
			fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> R {
				(self)($($arg),*)
			}
		}
	};
}

impl_into_handler_func!();
impl_into_handler_func!(A1);
impl_into_handler_func!(A1, A2);
impl_into_handler_func!(A1, A2, A3);
impl_into_handler_func!(A1, A2, A3, A4);
impl_into_handler_func!(A1, A2, A3, A4, A5);
impl_into_handler_func!(A1, A2, A3, A4, A5, A6);
impl_into_handler_func!(A1, A2, A3, A4, A5, A6, A7);
impl_into_handler_func!(A1, A2, A3, A4, A5, A6, A7, A8);

/// A function adapted into a [`Handler`].
///
/// The signature is analyzed once, when the adapter is built. On each call
/// the parameters are resolved from the request scope, the function runs,
/// and its return values are written to the response.
///
/// # Examples
///
/// ```
/// use reinhardt_dispatch::{impl_json_output, HandlerFunc, MiddlewareChain, RequestScopeBinder};
/// use reinhardt_http::{Error, Handler, Request, ResponseWriter};
/// use serde::Serialize;
/// use std::sync::Arc;
///
/// #[derive(Serialize)]
/// struct Person {
///     name: String,
/// }
///
/// impl_json_output!(Person);
///
/// fn person(_writer: ResponseWriter) -> Result<Person, Error> {
///     Ok(Person { name: "John".to_string() })
/// }
///
/// # tokio_test::block_on(async {
/// let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(person)))
///     .with_middleware(Arc::new(RequestScopeBinder::new()))
///     .build();
///
/// let response = handler.handle(Request::builder().build().unwrap()).await.unwrap();
/// assert_eq!(response.status, hyper::StatusCode::OK);
/// assert_eq!(response.text(), r#"{"name":"John"}"#);
/// # });
/// ```
pub struct HandlerFunc<F, Args> {
	func: F,
	descriptor: Arc<HandlerDescriptor>,
	_args: PhantomData<fn() -> Args>,
}

impl<F, Args> HandlerFunc<F, Args>
where
	F: IntoHandlerFunc<Args>,
	Args: Send + 'static,
{
	/// Adapt `func`, rejecting return lists the marshaler cannot handle.
	pub fn try_new(func: F) -> std::result::Result<Self, SignatureError> {
		let descriptor = HandlerDescriptor::analyze(
			type_name::<F>(),
			F::inputs(),
			<F::Output as HandlerReturn>::outputs(),
		)?;
		tracing::debug!(
			"Adapted handler `{}` with {} parameters ({:?})",
			descriptor.name(),
			descriptor.inputs().len(),
			descriptor.shape()
		);
		Ok(Self {
			func,
			descriptor: Arc::new(descriptor),
			_args: PhantomData,
		})
	}

	/// Adapt `func`.
	///
	/// # Panics
	///
	/// Panics when the signature is rejected. Handlers are adapted while the
	/// application is assembled, so this stops startup. Use
	/// [`HandlerFunc::try_new`] to handle the error instead.
	pub fn new(func: F) -> Self {
		match Self::try_new(func) {
			Ok(handler) => handler,
			Err(e) => {
				tracing::error!("Rejected handler `{}`: {}", type_name::<F>(), e);
				panic!("invalid handler `{}`: {}", type_name::<F>(), e);
			}
		}
	}

	pub fn descriptor(&self) -> &HandlerDescriptor {
		&self.descriptor
	}
}

#[async_trait]
impl<F, Args> Handler for HandlerFunc<F, Args>
where
	F: IntoHandlerFunc<Args>,
	Args: Send + 'static,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		let scope = request_scope(&request)?;

		let resolved = scope
			.with(|registry| -> DiResult<(Args, ResponseWriter)> {
				registry.bind(request);
				let args = F::resolve_args(registry)?;
				let writer = ResponseWriter::resolve(registry)?;
				Ok((args, writer))
			})
			.and_then(|resolved| resolved);
		let (args, writer) = match resolved {
			Ok(resolved) => resolved,
			Err(e) => {
				let action = format!("resolving parameters of `{}`", self.descriptor.name());
				return Err(misconfigured(&action, e));
			}
		};

		let returned = HandlerReturn::into_returned(self.func.invoke(args));
		marshal(self.descriptor.shape(), returned, &writer);

		Ok(writer.take_response())
	}
}

impl<F, Args> fmt::Debug for HandlerFunc<F, Args> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HandlerFunc")
			.field("descriptor", &self.descriptor)
			.finish_non_exhaustive()
	}
}
