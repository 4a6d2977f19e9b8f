//! End-to-end tests through the facade crate
//!
//! Each test builds a complete chain: scope binder, provide or bind
//! middlewares, and an injected handler.

use hyper::header::HeaderValue;
use reinhardt_binding::prelude::*;
use reinhardt_binding::{DefaultStatusTranslator, ScopePool, SignatureError, request_scope};
use std::sync::Arc;

#[derive(Debug, Default, Clone, Serialize)]
struct Person {
	name: String,
}

impl_json_output!(Person);

trait People: Send + Sync {
	fn find(&self, name: &str) -> Option<Person>;
}

struct Roster;

impl People for Roster {
	fn find(&self, name: &str) -> Option<Person> {
		(name == "John").then(|| Person {
			name: name.to_string(),
		})
	}
}

fn binder(pool: &Arc<ScopePool>) -> Arc<RequestScopeBinder> {
	Arc::new(RequestScopeBinder::with_pool(Arc::clone(pool)))
}

fn get(uri: &str) -> Request {
	Request::builder().uri(uri).build().unwrap()
}

fn john(_writer: ResponseWriter) -> Result<Person> {
	Ok(Person {
		name: "John".to_string(),
	})
}

#[tokio::test]
async fn test_person_scenario() {
	let pool = Arc::new(ScopePool::new(4));
	let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(john)))
		.with_middleware(binder(&pool))
		.build();

	let response = handler.handle(get("/people/john")).await.unwrap();

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.text(), r#"{"name":"John"}"#);
	assert_eq!(pool.in_use(), 0);
	assert_eq!(pool.available(), 1);
}

fn lookup(people: Arc<dyn People>, request: Request) -> Result<Person> {
	let name = request.path().trim_start_matches("/people/");
	people
		.find(name)
		.ok_or_else(|| Error::NotFound(format!("person {name}")))
}

#[tokio::test]
async fn test_interface_lookup() {
	let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(lookup)))
		.with_middleware(binder(&Arc::new(ScopePool::new(1))))
		.with_middleware(Arc::new(Provide::<dyn People>::new(Arc::new(Roster))))
		.build();

	let response = handler.handle(get("/people/John")).await.unwrap();

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.text(), r#"{"name":"John"}"#);
}

#[tokio::test]
async fn test_error_path_uses_translator_body() {
	let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(lookup)))
		.with_middleware(binder(&Arc::new(ScopePool::new(1))))
		.with_middleware(Arc::new(Provide::<dyn People>::new(Arc::new(Roster))))
		.build();

	let response = handler.handle(get("/people/Jane")).await.unwrap();

	let expected = DefaultStatusTranslator.translate(&Error::NotFound("person Jane".to_string()));
	assert_eq!(response.status, StatusCode::NOT_FOUND);
	assert_eq!(&response.body[..], serde_json::to_vec(&expected).unwrap());
	assert!(!response.text().contains("\"name\""));
}

fn download() -> Vec<u8> {
	b"\x00raw\xff".to_vec()
}

#[tokio::test]
async fn test_bytes_are_not_wrapped() {
	let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(download)))
		.with_middleware(binder(&Arc::new(ScopePool::new(1))))
		.build();

	let response = handler.handle(get("/download")).await.unwrap();

	assert_eq!(&response.body[..], b"\x00raw\xff");
	assert!(response.headers.get("content-type").is_none());
}

fn three() -> (Person, Person, Error) {
	unreachable!()
}

fn three_values() -> (Person, Json<u8>, Vec<u8>) {
	unreachable!()
}

fn four() -> (Person, Person, Person, Error) {
	unreachable!()
}

#[test]
fn test_more_than_two_outputs_rejected() {
	assert!(matches!(
		HandlerFunc::try_new(three),
		Err(SignatureError::TooManyOutputs(3))
	));
	assert!(matches!(
		HandlerFunc::try_new(three_values),
		Err(SignatureError::TooManyOutputs(3))
	));
	assert!(matches!(
		HandlerFunc::try_new(four),
		Err(SignatureError::TooManyOutputs(4))
	));
}

#[test]
#[should_panic]
fn test_rejected_signature_panics_at_registration() {
	let _ = HandlerFunc::new(three);
}

#[tokio::test]
async fn test_missing_binder_is_a_server_error() {
	fn never(_writer: ResponseWriter) {
		panic!("handler ran without a scope");
	}

	let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(never)))
		.with_middleware(Arc::new(Provide::value(1u32)))
		.build();

	let response = handler
		.handle(get("/"))
		.await
		.map_or_else(Response::from, |response| response);

	assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

/// Copies the request id seen by the outer chain into a header.
struct SameScope;

#[async_trait]
impl Middleware for SameScope {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let scope = request_scope(&request)?;
		let context = scope
			.resolve::<RequestContext>()
			.map_err(|e| Error::Internal(e.to_string()))?;
		let mut response = next.handle(request).await?;
		response.headers.insert(
			"x-request-id",
			HeaderValue::from_str(&context.id.to_string())
				.map_err(|e| Error::Internal(e.to_string()))?,
		);
		Ok(response)
	}
}

fn context_id(context: Arc<RequestContext>) -> Json<String> {
	Json(context.id.to_string())
}

#[tokio::test]
async fn test_nested_binders_share_one_registry() {
	let outer = Arc::new(ScopePool::new(2));
	let inner_pool = Arc::new(ScopePool::new(2));

	let inner: Arc<dyn Handler> = MiddlewareChain::new(Arc::new(HandlerFunc::new(context_id)))
		.with_middleware(binder(&inner_pool))
		.build();
	let handler = MiddlewareChain::new(inner)
		.with_middleware(binder(&outer))
		.with_middleware(Arc::new(SameScope))
		.build();

	let response = handler.handle(get("/")).await.unwrap();

	let seen: String = serde_json::from_slice(&response.body).unwrap();
	assert_eq!(response.headers["x-request-id"], seen.as_str());
	assert_eq!(outer.created(), 1);
	assert_eq!(inner_pool.created(), 0);
	assert_eq!(outer.in_use(), 0);
}

#[cfg(feature = "params")]
mod params_flow {
	use super::*;
	use hyper::Method;
	use rstest::rstest;

	#[derive(Debug, Deserialize, Validate)]
	struct NewPerson {
		#[validate(length(min = 2, max = 32))]
		name: String,
	}

	fn create(person: Arc<NewPerson>, writer: ResponseWriter) -> Person {
		writer.write_header(StatusCode::CREATED);
		Person {
			name: person.name.clone(),
		}
	}

	fn post(body: &'static str) -> Request {
		Request::builder()
			.method(Method::POST)
			.uri("/people")
			.header("content-type", "application/json")
			.body(body)
			.build()
			.unwrap()
	}

	#[rstest]
	#[case(r#"{"name": "Ada"}"#, StatusCode::CREATED)]
	#[case(r#"{"name": "A"}"#, StatusCode::UNPROCESSABLE_ENTITY)]
	#[case(r#"{"nom": "Ada"}"#, StatusCode::UNPROCESSABLE_ENTITY)]
	#[case(r#"{"name": "#, StatusCode::BAD_REQUEST)]
	#[tokio::test]
	async fn test_bound_body_reaches_handler(#[case] body: &'static str, #[case] status: StatusCode) {
		let pool = Arc::new(ScopePool::new(1));
		let handler = MiddlewareChain::new(Arc::new(HandlerFunc::new(create)))
			.with_middleware(binder(&pool))
			.with_middleware(Arc::new(Bind::<NewPerson>::new()))
			.build();

		let response = handler.handle(post(body)).await.unwrap();

		assert_eq!(response.status, status);
		assert_eq!(pool.in_use(), 0);
	}
}
