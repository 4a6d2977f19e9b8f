//! `multipart/form-data` decoding.
//!
//! Text parts decode into the target type like a urlencoded form, merged
//! with the query string. Parts that carry a file name are kept aside as
//! [`UploadedFiles`], which the multipart binder puts in the request scope.

use crate::decode::{decode_pairs, deserialization, empty_body, merge_query};
use bytes::Bytes;
use futures::future::ready;
use futures::stream::once;
use reinhardt_http::FieldErrors;
use serde::de::DeserializeOwned;
use std::slice;

/// A file part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
	/// Form field the file was sent under.
	pub field: String,
	/// File name as sent by the client.
	pub file_name: String,
	pub content_type: Option<String>,
	pub data: Bytes,
}

impl UploadedFile {
	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

/// Files of one multipart request, in the order they were sent.
///
/// Handlers take it as `Arc<UploadedFiles>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedFiles {
	files: Vec<UploadedFile>,
}

impl UploadedFiles {
	pub fn new() -> Self {
		Self::default()
	}

	/// First file sent under `field`.
	pub fn get(&self, field: &str) -> Option<&UploadedFile> {
		self.files.iter().find(|file| file.field == field)
	}

	/// Every file sent under `field`.
	pub fn all<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a UploadedFile> + 'a {
		self.files.iter().filter(move |file| file.field == field)
	}

	pub fn iter(&self) -> slice::Iter<'_, UploadedFile> {
		self.files.iter()
	}

	pub fn len(&self) -> usize {
		self.files.len()
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	fn push(&mut self, file: UploadedFile) {
		self.files.push(file);
	}
}

impl<'a> IntoIterator for &'a UploadedFiles {
	type Item = &'a UploadedFile;
	type IntoIter = slice::Iter<'a, UploadedFile>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Decode a `multipart/form-data` body.
///
/// `content_type` is the raw header value, boundary included. A header
/// without a boundary is a `content_type` error, a body multer cannot
/// parse is `deserialization`, and a body with no parts is `required`.
///
/// # Examples
///
/// ```
/// use reinhardt_params::decode_multipart;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Avatar {
///     user: String,
/// }
///
/// let body = concat!(
///     "--XyZ\r\n",
///     "Content-Disposition: form-data; name=\"user\"\r\n\r\n",
///     "ann\r\n",
///     "--XyZ\r\n",
///     "Content-Disposition: form-data; name=\"image\"; filename=\"ann.png\"\r\n",
///     "Content-Type: image/png\r\n\r\n",
///     "PNG\r\n",
///     "--XyZ--\r\n",
/// );
///
/// # tokio_test::block_on(async {
/// let (avatar, files): (Avatar, _) =
///     decode_multipart("multipart/form-data; boundary=XyZ", None, body.into())
///         .await
///         .unwrap();
/// assert_eq!(avatar.user, "ann");
/// assert_eq!(files.get("image").unwrap().file_name, "ann.png");
/// # });
/// ```
pub async fn decode_multipart<T: DeserializeOwned>(
	content_type: &str,
	query: Option<&str>,
	body: Bytes,
) -> Result<(T, UploadedFiles), FieldErrors> {
	let boundary = multer::parse_boundary(content_type).map_err(|e| {
		let mut errors = FieldErrors::new();
		errors.add(
			Vec::<String>::new(),
			FieldErrors::CONTENT_TYPE,
			format!("multipart content type without boundary: {e}"),
		);
		errors
	})?;
	if body.is_empty() {
		return Err(empty_body());
	}

	let mut multipart = multer::Multipart::new(once(ready(Ok::<_, std::io::Error>(body))), boundary);
	let mut pairs = Vec::new();
	let mut files = UploadedFiles::new();

	while let Some(field) = multipart.next_field().await.map_err(malformed)? {
		let Some(name) = field.name().map(str::to_string) else {
			tracing::debug!("Skipping unnamed multipart part");
			continue;
		};
		match field.file_name().map(str::to_string) {
			Some(file_name) => {
				let content_type = field.content_type().map(ToString::to_string);
				let data = field.bytes().await.map_err(malformed)?;
				files.push(UploadedFile {
					field: name,
					file_name,
					content_type,
					data,
				});
			}
			None => pairs.push((name, field.text().await.map_err(malformed)?)),
		}
	}

	if pairs.is_empty() && files.is_empty() {
		return Err(empty_body());
	}
	let value = decode_pairs(&merge_query(pairs, query)?)?;
	Ok((value, files))
}

fn malformed(error: multer::Error) -> FieldErrors {
	deserialization(format!("malformed multipart body: {error}"))
}
