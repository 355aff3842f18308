//! Success and error bodies returned by the authentication server.

// crates.io
use serde::Deserializer;
use serde_json::Value;
// self
use crate::{_prelude::*, error::TokenFetchError, token::Secret};

/// Token data extracted from a successful authentication response.
///
/// The value lives only as long as one module invocation: it is written into the message
/// and then dropped, never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessTokenResult {
	/// Access token to forward downstream.
	pub access_token: Secret,
	/// Refresh token, if the server issued one.
	pub refresh_token: Option<Secret>,
	/// Access token lifetime in seconds.
	pub expires_in: Option<u64>,
	/// Refresh token lifetime in seconds.
	pub refresh_token_expires_in: Option<u64>,
}
impl AccessTokenResult {
	/// Decodes a `200` response body.
	///
	/// Unknown fields are ignored and every field is optional while decoding, but a body
	/// without a usable `access_token` is rejected with
	/// [`TokenFetchError::MissingAccessToken`].
	pub fn from_json(body: &str) -> Result<Self, TokenFetchError> {
		let mut de = serde_json::Deserializer::from_str(body);
		let raw: AccessTokenResponse = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| TokenFetchError::ResponseParse { body: body.to_owned(), source })?;
		let access_token = raw
			.access_token
			.filter(|token| !token.is_empty())
			.map(Secret::new)
			.ok_or(TokenFetchError::MissingAccessToken)?;

		Ok(Self {
			access_token,
			refresh_token: raw.refresh_token.filter(|token| !token.is_empty()).map(Secret::new),
			expires_in: raw.expires_in,
			refresh_token_expires_in: raw.refresh_token_expires_in,
		})
	}
}

/// Error body returned alongside a non-success status.
///
/// Only `message` is consumed; the rest of the provider-specific schema is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AccessTokenError {
	/// Human-readable failure description.
	#[serde(default)]
	pub message: Option<String>,
}
impl AccessTokenError {
	/// Extracts a non-empty `message` from an error body, if the body is JSON at all.
	pub fn message_from(body: &str) -> Option<String> {
		serde_json::from_str::<Self>(body)
			.ok()
			.and_then(|error| error.message)
			.filter(|message| !message.trim().is_empty())
	}
}

#[derive(Deserialize)]
struct AccessTokenResponse {
	access_token: Option<String>,
	refresh_token: Option<String>,
	#[serde(default, deserialize_with = "deserialize_seconds")]
	expires_in: Option<u64>,
	#[serde(default, deserialize_with = "deserialize_seconds")]
	refresh_token_expires_in: Option<u64>,
}

// Lifetimes are informational only; anything that is not a whole number of seconds decodes
// as absent instead of failing the token.
fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	let seconds = match Option::<Value>::deserialize(deserializer)? {
		Some(Value::Number(number)) => number.as_u64().or_else(|| {
			number.as_f64().filter(|secs| *secs >= 0. && secs.fract() == 0.).map(|secs| secs as u64)
		}),
		Some(Value::String(text)) => text.trim().parse().ok(),
		_ => None,
	};

	Ok(seconds)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decodes_full_response_with_string_lifetimes() {
		let result = AccessTokenResult::from_json(
			r#"{"access_token":"abc123","refresh_token":"r-1","expires_in":"3600","refresh_token_expires_in":"86400","token_type":"bearer"}"#,
		)
		.expect("Full token response should decode.");

		assert_eq!(result.access_token.expose(), "abc123");
		assert_eq!(result.refresh_token.as_ref().map(Secret::expose), Some("r-1"));
		assert_eq!(result.expires_in, Some(3600));
		assert_eq!(result.refresh_token_expires_in, Some(86400));
	}

	#[test]
	fn accepts_numeric_lifetimes_and_missing_optionals() {
		let result = AccessTokenResult::from_json(r#"{"access_token":"abc123","expires_in":900}"#)
			.expect("Numeric lifetime should decode.");

		assert_eq!(result.expires_in, Some(900));
		assert!(result.refresh_token.is_none());
		assert!(result.refresh_token_expires_in.is_none());
	}

	#[test]
	fn missing_or_null_access_token_is_rejected() {
		for body in [r#"{}"#, r#"{"access_token":null}"#, r#"{"access_token":""}"#] {
			let err = AccessTokenResult::from_json(body)
				.expect_err("Bodies without an access token should be rejected.");

			assert!(matches!(err, TokenFetchError::MissingAccessToken), "{body}: {err:?}");
		}
	}

	#[test]
	fn malformed_body_keeps_raw_text_and_path() {
		let err = AccessTokenResult::from_json("not-json")
			.expect_err("Non-JSON body should fail to decode.");

		assert!(err.to_string().contains("not-json"));

		let err = AccessTokenResult::from_json(r#"{"access_token":42}"#)
			.expect_err("Numeric access token should fail to decode.");

		match err {
			TokenFetchError::ResponseParse { source, .. } =>
				assert_eq!(source.path().to_string(), "access_token"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn unusable_lifetimes_do_not_discard_the_token() {
		for (lifetime, expected) in [
			("3600.0", Some(3600)),
			("-1", None),
			("true", None),
			("\"soon\"", None),
			("\"\"", None),
			("null", None),
			("{\"seconds\":60}", None),
		] {
			let body = format!(
				r#"{{"access_token":"abc123","expires_in":{lifetime},"refresh_token_expires_in":{lifetime}}}"#
			);
			let result = AccessTokenResult::from_json(&body)
				.expect("Token should survive an unusable lifetime.");

			assert_eq!(result.access_token.expose(), "abc123");
			assert_eq!(result.expires_in, expected, "{lifetime}");
			assert_eq!(result.refresh_token_expires_in, expected, "{lifetime}");
		}
	}

	#[test]
	fn error_body_message_is_optional() {
		assert_eq!(
			AccessTokenError::message_from(r#"{"message":"invalid client","code":17}"#),
			Some("invalid client".into())
		);
		assert_eq!(AccessTokenError::message_from(r#"{"error":"invalid_client"}"#), None);
		assert_eq!(AccessTokenError::message_from("<html>Bad Gateway</html>"), None);
	}
}
