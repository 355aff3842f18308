//! Module-level error types shared across validation, token fetching, and header injection.

// self
use crate::{
	_prelude::*,
	config::Violation,
	message::{InvalidParamError, MessagePropertyKey},
	module::ProcessStage,
};

/// Module-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical module error returned by [`AccessTokenModule::process`].
///
/// Every variant is terminal for the current message; the host is expected to abort the
/// pipeline invocation that produced it.
///
/// [`AccessTokenModule::process`]: crate::module::AccessTokenModule::process
#[derive(Debug, ThisError)]
pub enum Error {
	/// Module parameters are missing or malformed.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// The authentication server could not produce a usable token.
	#[error(transparent)]
	TokenFetch(#[from] TokenFetchError),
	/// The message refused the dynamic header write.
	#[error(transparent)]
	PropertyInjection(#[from] PropertyInjectionError),
}
impl Error {
	/// Returns the orchestrator stage that raised the error.
	pub fn stage(&self) -> ProcessStage {
		match self {
			Self::Validation(_) => ProcessStage::ValidateConfig,
			Self::TokenFetch(_) => ProcessStage::FetchToken,
			Self::PropertyInjection(_) => ProcessStage::InjectHeader,
		}
	}
}

/// Every parameter violation found while validating module parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
	violations: Vec<Violation>,
}
impl ValidationError {
	/// Wraps a non-empty violation list.
	pub fn new(violations: Vec<Violation>) -> Self {
		Self { violations }
	}

	/// Returns the collected violations in check order.
	pub fn violations(&self) -> &[Violation] {
		&self.violations
	}
}
impl Display for ValidationError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Validation errors found: {}.", self.violations.len())?;

		for violation in &self.violations {
			write!(f, " {violation}")?;
		}

		Ok(())
	}
}
impl StdError for ValidationError {}

/// Failures raised while talking to the authentication server.
#[derive(Debug, ThisError)]
pub enum TokenFetchError {
	/// The outbound request could not be assembled (e.g., a header value is not valid HTTP).
	#[error("Error creating HTTP request to authentication server with url: {url}.")]
	Request {
		/// Target authentication URL.
		url: String,
		/// Underlying request builder failure.
		#[source]
		source: oauth2::http::Error,
	},
	/// The transport failed before a response was received.
	#[error("Error creating HTTP connection to authentication server with url: {url}.")]
	Connect {
		/// Target authentication URL.
		url: String,
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// Non-success status with a structured error body.
	#[error("Error getting access token with server code: {status} and message: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// `message` field extracted from the error body.
		message: String,
	},
	/// Non-success status without a parseable error body.
	#[error("Error getting access token with server code: {status} ({reason}).")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Canonical reason phrase for the status code.
		reason: String,
	},
	/// Success status but the body is not the expected JSON document.
	#[error("Error parsing JSON response: {body}")]
	ResponseParse {
		/// Raw response body.
		body: String,
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Success status but `access_token` is absent, null, or empty.
	#[error("Authentication server response did not contain an access token.")]
	MissingAccessToken,
}
impl TokenFetchError {
	/// Wraps a transport failure for the given URL.
	pub fn connect(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Connect { url: url.to_string(), source: Box::new(src) }
	}

	/// HTTP status code, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. } | Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// The message's property bag rejected the dynamic header write.
#[derive(Debug, ThisError)]
#[error("Error setting \"{}\" ({}) in dynamic configuration: {source}", .key.name, .key.namespace)]
pub struct PropertyInjectionError {
	/// Property the module attempted to write.
	pub key: MessagePropertyKey,
	/// Rejection reported by the message.
	#[source]
	pub source: InvalidParamError,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn validation_error_lists_every_violation() {
		let err = ValidationError::new(vec![
			Violation::Missing { parameter: "clientId" },
			Violation::Missing { parameter: "clientSecret" },
		]);
		let text = err.to_string();

		assert!(text.starts_with("Validation errors found: 2."));
		assert!(text.contains("\"clientId\""));
		assert!(text.contains("\"clientSecret\""));
	}

	#[test]
	fn stage_follows_variant() {
		let err = Error::from(TokenFetchError::MissingAccessToken);

		assert_eq!(err.stage(), ProcessStage::FetchToken);
		assert_eq!(err.to_string(), TokenFetchError::MissingAccessToken.to_string());
	}

	#[test]
	fn status_is_exposed_for_http_failures() {
		let rejected = TokenFetchError::Rejected { status: 401, message: "invalid client".into() };
		let status = TokenFetchError::Status { status: 503, reason: "Service Unavailable".into() };

		assert_eq!(rejected.status(), Some(401));
		assert_eq!(status.status(), Some(503));
		assert_eq!(TokenFetchError::MissingAccessToken.status(), None);
	}
}
