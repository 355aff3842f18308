//! Authentication server client.
//!
//! [`TokenClient::fetch_token`] issues exactly one `GET` against the configured
//! authentication URL. Credentials travel as four fixed request headers, the full body is
//! read before the status is inspected, and the body is then decoded either as an
//! [`AccessTokenResult`] (status `200`) or as an [`AccessTokenError`] (anything else).

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest,
	http::{Method, Request, StatusCode},
};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	audit::Diagnostics,
	config::TokenRequestConfig,
	error::TokenFetchError,
	http::TokenHttpClient,
	token::{AccessTokenError, AccessTokenResult, Secret},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Request header carrying the client identifier.
pub const CLIENT_ID_HEADER: &str = "client-id";
/// Request header carrying the client secret.
pub const CLIENT_SECRET_HEADER: &str = "client-secret";
/// Request header carrying the grant type.
pub const GRANT_TYPE_HEADER: &str = "grant-type";
/// Request header carrying the API version.
pub const API_VERSION_HEADER: &str = "api-version";

/// Calls the authentication server through a pluggable [`TokenHttpClient`].
pub struct TokenClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	http_client: Arc<C>,
}
impl<C> TokenClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a client over the provided transport.
	pub fn new(http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into() }
	}

	/// Requests an access token for `config`.
	///
	/// A single attempt is made; transport defaults apply for timeouts and redirects.
	pub async fn fetch_token(
		&self,
		config: &TokenRequestConfig,
		diagnostics: &Diagnostics<'_>,
	) -> Result<AccessTokenResult, TokenFetchError> {
		let url = &config.authentication_url;
		let request = build_request(config).map_err(|source| TokenFetchError::Request {
			url: url.to_string(),
			source,
		})?;

		diagnostics.debug(format_args!("Requesting access token from url: {url}"));
		diagnostics.debug(format_args!(
			"Using headers: {CLIENT_ID_HEADER}={}, {CLIENT_SECRET_HEADER}={}, {GRANT_TYPE_HEADER}={}, {API_VERSION_HEADER}={}",
			config.client_id, config.client_secret, config.grant_type, config.api_version,
		));

		let handle = self.http_client.handle();
		let response =
			handle.call(request).await.map_err(|err| TokenFetchError::connect(url, err))?;
		let status = response.status();
		let body = String::from_utf8_lossy(response.body()).into_owned();

		diagnostics.debug(format_args!(
			"Authentication server returned code: {}",
			status.as_u16()
		));

		if status != StatusCode::OK {
			return Err(status_error(status, &body));
		}

		diagnostics.debug(format_args!("Response data: {}", RedactedBody(&body)));

		let token = AccessTokenResult::from_json(&body)?;

		diagnostics.debug("Access token extracted from response.");

		Ok(token)
	}
}
#[cfg(feature = "reqwest")]
impl TokenClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn reqwest() -> Self {
		Self::new(ReqwestHttpClient::default())
	}
}
impl<C> Clone for TokenClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone() }
	}
}
impl<C> Debug for TokenClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenClient(..)")
	}
}

// Renders a response body with token fields masked; non-JSON bodies are shown as-is.
struct RedactedBody<'a>(&'a str);
impl Display for RedactedBody<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match serde_json::from_str::<Value>(self.0) {
			Ok(Value::Object(mut fields)) => {
				for name in ["access_token", "refresh_token"] {
					if let Some(value) = fields.get_mut(name) {
						*value = Value::String(Secret::default().to_string());
					}
				}

				write!(f, "{}", Value::Object(fields))
			},
			_ => f.write_str(self.0),
		}
	}
}

fn build_request(config: &TokenRequestConfig) -> Result<HttpRequest, oauth2::http::Error> {
	Request::builder()
		.method(Method::GET)
		.uri(config.authentication_url.as_str())
		.header(CLIENT_ID_HEADER, config.client_id.as_str())
		.header(CLIENT_SECRET_HEADER, config.client_secret.expose())
		.header(GRANT_TYPE_HEADER, config.grant_type.as_str())
		.header(API_VERSION_HEADER, config.api_version.as_str())
		.body(Vec::new())
}

fn status_error(status: StatusCode, body: &str) -> TokenFetchError {
	match AccessTokenError::message_from(body) {
		Some(message) => TokenFetchError::Rejected { status: status.as_u16(), message },
		None => TokenFetchError::Status {
			status: status.as_u16(),
			reason: status.canonical_reason().unwrap_or("Unknown Status").to_owned(),
		},
	}
}
