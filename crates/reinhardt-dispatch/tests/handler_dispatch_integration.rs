//! Integration tests for injected handlers
//!
//! Tests the path from the scope binder through parameter resolution to
//! response marshaling:
//! - Return shapes and their response bodies
//! - Error precedence and status translation
//! - Values provided by upstream middleware

use async_trait::async_trait;
use bytes::Bytes;
use hyper::StatusCode;
use hyper::header::{HeaderName, HeaderValue};
use reinhardt_di::ScopePool;
use reinhardt_dispatch::{
	HandlerFunc, Json, MiddlewareChain, Provide, RequestScopeBinder, SignatureError,
	impl_json_output,
};
use reinhardt_http::{
	ApiStatus, Error, FieldErrors, Handler, Middleware, RenderOptions, Request, Response,
	ResponseWriter, Result, StatusTranslator,
};
use rstest::rstest;
use serde::Serialize;
use std::error::Error as StdError;
use std::sync::Arc;

#[derive(Debug, Default, Serialize)]
struct Person {
	name: String,
}

impl_json_output!(Person);

fn serve(handler: Arc<dyn Handler>) -> Arc<dyn Handler> {
	MiddlewareChain::new(handler)
		.with_middleware(Arc::new(RequestScopeBinder::with_pool(Arc::new(
			ScopePool::new(8),
		))))
		.build()
}

async fn call(handler: Arc<dyn Handler>) -> Response {
	serve(handler)
		.handle(Request::builder().uri("/people/1").build().unwrap())
		.await
		.unwrap()
}

fn john(_writer: ResponseWriter) -> std::result::Result<Person, Error> {
	Ok(Person {
		name: "John".to_string(),
	})
}

fn missing(_writer: ResponseWriter) -> std::result::Result<Person, Error> {
	Err(Error::NotFound("person 1".to_string()))
}

#[tokio::test]
async fn test_value_with_no_error_is_json() {
	let response = call(Arc::new(HandlerFunc::new(john))).await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.text(), r#"{"name":"John"}"#);
	assert_eq!(
		response.headers["content-type"],
		"application/json; charset=utf-8"
	);
}

#[tokio::test]
async fn test_error_replaces_value() {
	let response = call(Arc::new(HandlerFunc::new(missing))).await;

	assert_eq!(response.status, StatusCode::NOT_FOUND);
	let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
	assert_eq!(body["message"], "Not found: person 1");
	assert!(body.get("name").is_none());
}

struct Teapot;

impl StatusTranslator for Teapot {
	fn translate(&self, error: &(dyn StdError + 'static)) -> ApiStatus {
		ApiStatus::new(StatusCode::IM_A_TEAPOT, format!("teapot: {error}"))
	}
}

#[tokio::test]
async fn test_errors_use_configured_translator() {
	let render = RenderOptions::default().with_translator(Arc::new(Teapot));
	let binder = RequestScopeBinder::with_pool(Arc::new(ScopePool::new(1))).with_render(render);
	let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(missing)))
		.with_middleware(Arc::new(binder))
		.build();

	let response = handler
		.handle(Request::builder().build().unwrap())
		.await
		.unwrap();

	let expected = Teapot.translate(&Error::NotFound("person 1".to_string()));
	assert_eq!(response.status, expected.status_code());
	assert_eq!(&response.body[..], serde_json::to_vec(&expected).unwrap());
}

fn raw() -> Vec<u8> {
	vec![0xde, 0xad, 0xbe, 0xef]
}

fn raw_static() -> &'static [u8] {
	b"{\"not\": \"wrapped\"}"
}

fn raw_bytes() -> std::result::Result<Bytes, Error> {
	Ok(Bytes::from_static(b"plain"))
}

#[rstest]
#[case::vec(Arc::new(HandlerFunc::new(raw)) as Arc<dyn Handler>, &[0xde_u8, 0xad, 0xbe, 0xef][..])]
#[case::static_slice(Arc::new(HandlerFunc::new(raw_static)) as Arc<dyn Handler>, &b"{\"not\": \"wrapped\"}"[..])]
#[case::bytes_with_error(Arc::new(HandlerFunc::new(raw_bytes)) as Arc<dyn Handler>, &b"plain"[..])]
#[tokio::test]
async fn test_bytes_are_written_verbatim(#[case] handler: Arc<dyn Handler>, #[case] body: &[u8]) {
	let response = call(handler).await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(&response.body[..], body);
	assert!(response.headers.get("content-type").is_none());
}

fn nobody() -> Option<Json<Person>> {
	None
}

#[tokio::test]
async fn test_absent_value_is_json_null() {
	let response = call(Arc::new(HandlerFunc::new(nobody))).await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.text(), "null");
}

fn created(writer: ResponseWriter) {
	writer.write_header(StatusCode::CREATED);
	writer.write(b"made");
}

#[tokio::test]
async fn test_no_return_keeps_what_handler_wrote() {
	let response = call(Arc::new(HandlerFunc::new(created))).await;

	assert_eq!(response.status, StatusCode::CREATED);
	assert_eq!(response.text(), "made");
}

fn delete_ok() -> Result<()> {
	Ok(())
}

fn delete_invalid() -> std::result::Result<(), FieldErrors> {
	let mut errors = FieldErrors::new();
	errors.add(["id"], FieldErrors::REQUIRED, "id is required");
	Err(errors)
}

#[tokio::test]
async fn test_single_error_shape() {
	let ok = call(Arc::new(HandlerFunc::new(delete_ok))).await;
	assert_eq!(ok.status, StatusCode::OK);
	assert!(ok.body.is_empty());

	let failed = call(Arc::new(HandlerFunc::new(delete_invalid))).await;
	assert_eq!(failed.status, StatusCode::UNPROCESSABLE_ENTITY);
	let body: serde_json::Value = serde_json::from_slice(&failed.body).unwrap();
	assert_eq!(body["details"][0]["fields"][0], "id");
	assert_eq!(body["details"][0]["classification"], "required");
}

fn indirect() -> std::result::Result<Person, anyhow::Error> {
	Ok(Person::default())
}

fn error_first() -> (Error, Person) {
	unreachable!()
}

#[test]
fn test_signatures_rejected_before_any_request() {
	assert!(matches!(
		HandlerFunc::try_new(indirect),
		Err(SignatureError::IndirectError { position: 2, .. })
	));
	assert!(matches!(
		HandlerFunc::try_new(error_first),
		Err(SignatureError::SecondNotError(_))
	));
}

trait Directory: Send + Sync {
	fn name(&self, id: u64) -> Option<String>;
}

struct OneEntry;

impl Directory for OneEntry {
	fn name(&self, id: u64) -> Option<String> {
		(id == 1).then(|| "John".to_string())
	}
}

fn lookup(directory: Arc<dyn Directory>, request: Request) -> std::result::Result<Person, Error> {
	let id = request
		.headers
		.get("x-person-id")
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.parse().ok())
		.ok_or_else(|| Error::BadRequest("missing x-person-id".to_string()))?;
	let name = directory
		.name(id)
		.ok_or_else(|| Error::NotFound(format!("person {id}")))?;
	Ok(Person { name })
}

/// Sets a header after the binder already seeded the request.
struct PersonId(&'static str);

#[async_trait]
impl Middleware for PersonId {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		request.headers.insert(
			HeaderName::from_static("x-person-id"),
			HeaderValue::from_static(self.0),
		);
		next.handle(request).await
	}
}

#[rstest]
#[case("1", StatusCode::OK)]
#[case("2", StatusCode::NOT_FOUND)]
#[case("x", StatusCode::BAD_REQUEST)]
#[tokio::test]
async fn test_interface_and_latest_request_are_injected(
	#[case] id: &'static str,
	#[case] expected: StatusCode,
) {
	let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(lookup)))
		.with_middleware(Arc::new(RequestScopeBinder::with_pool(Arc::new(
			ScopePool::new(1),
		))))
		.with_middleware(Arc::new(Provide::<dyn Directory>::new(Arc::new(OneEntry))))
		.with_middleware(Arc::new(PersonId(id)))
		.build();

	let response = handler
		.handle(Request::builder().build().unwrap())
		.await
		.unwrap();

	assert_eq!(response.status, expected);
}

#[tokio::test]
async fn test_handler_without_binder_never_runs() {
	fn must_not_run(_writer: ResponseWriter) {
		panic!("handler ran without a scope");
	}

	let result = HandlerFunc::new(must_not_run)
		.handle(Request::builder().build().unwrap())
		.await;

	let response = result.map_or_else(Response::from, |response| response);
	assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}
