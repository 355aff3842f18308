//! Module parameters: raw host values, validation, and the immutable request configuration.
//!
//! Parameters are read into a [`TokenRequestConfigBuilder`] without failing (missing values
//! become empty strings). [`TokenRequestConfigBuilder::validate`] then inspects every
//! parameter and reports all violations at once.

pub mod context;

pub use context::{ModuleContext, keys, parse_flag};

// self
use crate::{
	_prelude::*,
	error::ValidationError,
	message::{MessagePropertyKey, SYSTEM_NAMESPACE_PREFIX},
	token::Secret,
};

/// Downstream adapter types whose namespace can receive the token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdapterType {
	/// REST adapter.
	Rest,
	/// HTTP adapter.
	Http,
	/// SOAP adapter.
	Soap,
}
impl AdapterType {
	/// Every supported adapter type, in documentation order.
	pub const SUPPORTED: [AdapterType; 3] =
		[AdapterType::Rest, AdapterType::Http, AdapterType::Soap];

	/// Returns the configuration label for the adapter type.
	pub const fn as_str(self) -> &'static str {
		match self {
			AdapterType::Rest => "REST",
			AdapterType::Http => "HTTP",
			AdapterType::Soap => "SOAP",
		}
	}

	/// Dynamic configuration namespace for the adapter type.
	pub fn namespace(self) -> String {
		format!("{SYSTEM_NAMESPACE_PREFIX}{}", self.as_str())
	}
}
impl Display for AdapterType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for AdapterType {
	type Err = Violation;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::SUPPORTED
			.into_iter()
			.find(|adapter| adapter.as_str() == s)
			.ok_or_else(|| Violation::UnsupportedAdapterType { value: s.to_owned() })
	}
}

/// One problem found while validating module parameters.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Violation {
	/// Required parameter is missing or empty.
	#[error("Module parameter \"{parameter}\" must have a value.")]
	Missing {
		/// Parameter key.
		parameter: &'static str,
	},
	/// Authentication URL cannot be parsed as an absolute URL.
	#[error("Module parameter \"authenticationUrl\" is not well-formed ({reason}): {value}.")]
	MalformedUrl {
		/// Rejected value.
		value: String,
		/// Parser diagnosis.
		reason: url::ParseError,
	},
	/// Authentication URL parses but is not reachable over HTTP.
	#[error("Module parameter \"authenticationUrl\" must use http or https, found `{scheme}`.")]
	UnsupportedScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// Adapter type is set but is not one of [`AdapterType::SUPPORTED`].
	#[error(
		"Module parameter \"adapterType\": {value} not supported. Supported types are: [REST, HTTP, SOAP]."
	)]
	UnsupportedAdapterType {
		/// Rejected value.
		value: String,
	},
}

/// Raw module parameters as read from the host, prior to validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenRequestConfigBuilder {
	/// Authentication endpoint URL.
	pub authentication_url: String,
	/// Client identifier.
	pub client_id: String,
	/// Client secret.
	pub client_secret: Secret,
	/// API version.
	pub api_version: String,
	/// Grant type.
	pub grant_type: String,
	/// Dynamic property name receiving the token.
	pub access_token_header_name: String,
	/// Downstream adapter type label.
	pub adapter_type: String,
	/// Debug audit logging flag.
	pub debug: bool,
}
impl TokenRequestConfigBuilder {
	/// Reads every module parameter from the host context; missing values become empty.
	pub fn from_context(context: &(impl ?Sized + ModuleContext)) -> Self {
		let read = |key: &str| context.context_data(key).unwrap_or_default();

		Self {
			authentication_url: read(keys::AUTHENTICATION_URL),
			client_id: read(keys::CLIENT_ID),
			client_secret: Secret::new(read(keys::CLIENT_SECRET)),
			api_version: read(keys::API_VERSION),
			grant_type: read(keys::GRANT_TYPE),
			access_token_header_name: read(keys::ACCESS_TOKEN_HEADER_NAME),
			adapter_type: read(keys::ADAPTER_TYPE),
			debug: parse_flag(context.context_data(keys::DEBUG_ENABLED).as_deref()),
		}
	}

	/// Sets the authentication endpoint URL.
	pub fn authentication_url(mut self, url: impl Into<String>) -> Self {
		self.authentication_url = url.into();

		self
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = client_id.into();

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Secret::new(secret);

		self
	}

	/// Sets the API version.
	pub fn api_version(mut self, version: impl Into<String>) -> Self {
		self.api_version = version.into();

		self
	}

	/// Sets the grant type.
	pub fn grant_type(mut self, grant_type: impl Into<String>) -> Self {
		self.grant_type = grant_type.into();

		self
	}

	/// Sets the dynamic property name receiving the token.
	pub fn access_token_header_name(mut self, name: impl Into<String>) -> Self {
		self.access_token_header_name = name.into();

		self
	}

	/// Sets the downstream adapter type label.
	pub fn adapter_type(mut self, adapter_type: impl Into<String>) -> Self {
		self.adapter_type = adapter_type.into();

		self
	}

	/// Enables or disables debug audit logging.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;

		self
	}

	/// Checks every parameter and reports all violations together.
	pub fn validate(&self) -> Result<(), ValidationError> {
		self.check().map(|_| ())
	}

	/// Validates the parameters and freezes them into a [`TokenRequestConfig`].
	pub fn build(self) -> Result<TokenRequestConfig, ValidationError> {
		let (authentication_url, adapter_type) = self.check()?;

		Ok(TokenRequestConfig {
			authentication_url,
			client_id: self.client_id,
			client_secret: self.client_secret,
			api_version: self.api_version,
			grant_type: self.grant_type,
			access_token_header_name: self.access_token_header_name,
			adapter_type,
			debug: self.debug,
		})
	}

	fn check(&self) -> Result<(Url, AdapterType), ValidationError> {
		let mut violations = Vec::new();
		let url = check_url(&self.authentication_url, &mut violations);

		for (parameter, empty) in [
			(keys::CLIENT_ID, self.client_id.is_empty()),
			("clientSecret", self.client_secret.is_empty()),
			(keys::API_VERSION, self.api_version.is_empty()),
			(keys::GRANT_TYPE, self.grant_type.is_empty()),
			(keys::ACCESS_TOKEN_HEADER_NAME, self.access_token_header_name.is_empty()),
		] {
			if empty {
				violations.push(Violation::Missing { parameter });
			}
		}

		let adapter_type = if self.adapter_type.is_empty() {
			violations.push(Violation::Missing { parameter: keys::ADAPTER_TYPE });

			None
		} else {
			self.adapter_type
				.parse::<AdapterType>()
				.map_err(|violation| violations.push(violation))
				.ok()
		};

		match (url, adapter_type) {
			(Some(url), Some(adapter_type)) if violations.is_empty() => Ok((url, adapter_type)),
			_ => Err(ValidationError::new(violations)),
		}
	}
}

/// Validated, immutable parameters for one module invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRequestConfig {
	/// Authentication endpoint URL.
	pub authentication_url: Url,
	/// Client identifier.
	pub client_id: String,
	/// Client secret; never logged.
	pub client_secret: Secret,
	/// API version.
	pub api_version: String,
	/// Grant type.
	pub grant_type: String,
	/// Dynamic property name receiving the token.
	pub access_token_header_name: String,
	/// Downstream adapter type.
	pub adapter_type: AdapterType,
	/// Debug audit logging flag.
	pub debug: bool,
}
impl TokenRequestConfig {
	/// Returns an empty builder.
	pub fn builder() -> TokenRequestConfigBuilder {
		TokenRequestConfigBuilder::default()
	}

	/// Property key the token is written under.
	pub fn header_key(&self) -> MessagePropertyKey {
		MessagePropertyKey::new(&self.access_token_header_name, self.adapter_type.namespace())
	}
}

fn check_url(raw: &str, violations: &mut Vec<Violation>) -> Option<Url> {
	if raw.is_empty() {
		violations.push(Violation::Missing { parameter: keys::AUTHENTICATION_URL });

		return None;
	}

	match Url::parse(raw) {
		Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
		Ok(url) => {
			violations.push(Violation::UnsupportedScheme { scheme: url.scheme().to_owned() });

			None
		},
		Err(reason) => {
			violations.push(Violation::MalformedUrl { value: raw.to_owned(), reason });

			None
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn complete() -> TokenRequestConfigBuilder {
		TokenRequestConfig::builder()
			.authentication_url("https://auth.example.com/token")
			.client_id("client")
			.client_secret("secret")
			.api_version("v3")
			.grant_type("client_credentials")
			.access_token_header_name("accessTokenHeader")
			.adapter_type("REST")
	}

	#[test]
	fn complete_parameters_build() {
		let config = complete().debug(true).build().expect("Complete parameters should validate.");

		assert_eq!(config.authentication_url.as_str(), "https://auth.example.com/token");
		assert_eq!(config.adapter_type, AdapterType::Rest);
		assert!(config.debug);
		assert_eq!(
			config.header_key(),
			MessagePropertyKey::new("accessTokenHeader", "http://sap.com/xi/XI/System/REST")
		);
	}

	#[test]
	fn missing_client_credentials_yield_two_violations() {
		let err = complete()
			.client_id("")
			.client_secret("")
			.validate()
			.expect_err("Missing credentials should fail validation.");

		assert_eq!(err.violations(), &[
			Violation::Missing { parameter: "clientId" },
			Violation::Missing { parameter: "clientSecret" },
		]);

		let text = err.to_string();

		assert!(text.contains("clientId"));
		assert!(text.contains("clientSecret"));
	}

	#[test]
	fn unsupported_adapter_type_names_value_and_supported_set() {
		let err = complete()
			.adapter_type("FTP")
			.validate()
			.expect_err("FTP adapter type should fail validation.");

		assert_eq!(err.violations(), &[Violation::UnsupportedAdapterType { value: "FTP".into() }]);

		let text = err.to_string();

		for needle in ["FTP", "REST", "HTTP", "SOAP"] {
			assert!(text.contains(needle), "`{needle}` missing from `{text}`");
		}
	}

	#[test]
	fn empty_adapter_type_is_a_missing_parameter() {
		let err = complete().adapter_type("").validate().expect_err("Empty adapter type should fail.");

		assert_eq!(err.violations(), &[Violation::Missing { parameter: "adapterType" }]);
	}

	#[test]
	fn adapter_type_matching_is_case_sensitive() {
		assert_eq!("SOAP".parse::<AdapterType>(), Ok(AdapterType::Soap));
		assert!("rest".parse::<AdapterType>().is_err());
	}

	#[test]
	fn url_checks_cover_malformed_and_non_http() {
		let err = complete()
			.authentication_url("not a url")
			.validate()
			.expect_err("Relative URL should fail validation.");

		assert!(matches!(err.violations(), [Violation::MalformedUrl { .. }]));

		let err = complete()
			.authentication_url("ftp://auth.example.com/token")
			.validate()
			.expect_err("FTP URL should fail validation.");

		assert_eq!(err.violations(), &[Violation::UnsupportedScheme { scheme: "ftp".into() }]);
	}

	#[test]
	fn every_check_runs_before_failing() {
		let err = TokenRequestConfig::builder()
			.adapter_type("FTP")
			.validate()
			.expect_err("Empty parameters should fail validation.");

		assert_eq!(err.violations(), &[
			Violation::Missing { parameter: "authenticationUrl" },
			Violation::Missing { parameter: "clientId" },
			Violation::Missing { parameter: "clientSecret" },
			Violation::Missing { parameter: "apiVersion" },
			Violation::Missing { parameter: "grantType" },
			Violation::Missing { parameter: "accessTokenHeaderName" },
			Violation::UnsupportedAdapterType { value: "FTP".into() },
		]);
		assert!(err.to_string().starts_with("Validation errors found: 7."));
	}

	#[test]
	fn context_values_populate_builder() {
		let context: HashMap<String, String> = [
			(keys::AUTHENTICATION_URL, "https://auth.example.com/token"),
			(keys::CLIENT_ID, "client"),
			(keys::CLIENT_SECRET, "secret"),
			(keys::DEBUG_ENABLED, "True"),
		]
		.into_iter()
		.map(|(key, value)| (key.to_owned(), value.to_owned()))
		.collect();
		let builder = TokenRequestConfigBuilder::from_context(&context);

		assert_eq!(builder.client_id, "client");
		assert_eq!(builder.client_secret.expose(), "secret");
		assert!(builder.grant_type.is_empty());
		assert!(builder.debug);
		assert!(!format!("{builder:?}").contains("\"secret\""));
	}
}
