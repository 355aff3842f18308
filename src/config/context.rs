//! Host configuration lookup.

// self
use crate::_prelude::*;

/// Module parameter keys read from the host context.
pub mod keys {
	/// Authentication endpoint URL.
	pub const AUTHENTICATION_URL: &str = "authenticationUrl";
	/// Client identifier sent in the `client-id` header.
	pub const CLIENT_ID: &str = "clientId";
	/// Client secret; the `pwd.` prefix marks it as a masked parameter in the host UI.
	pub const CLIENT_SECRET: &str = "pwd.clientSecret";
	/// Grant type sent in the `grant-type` header.
	pub const GRANT_TYPE: &str = "grantType";
	/// API version sent in the `api-version` header.
	pub const API_VERSION: &str = "apiVersion";
	/// Debug audit logging flag.
	pub const DEBUG_ENABLED: &str = "debugEnabled";
	/// Name of the dynamic property receiving the token.
	pub const ACCESS_TOKEN_HEADER_NAME: &str = "accessTokenHeaderName";
	/// Downstream adapter type used to derive the property namespace.
	pub const ADAPTER_TYPE: &str = "adapterType";
}

/// Key/value lookup exposing the module parameters configured on the channel.
pub trait ModuleContext {
	/// Returns the raw value configured for `key`, if any.
	fn context_data(&self, key: &str) -> Option<String>;
}
impl ModuleContext for HashMap<String, String> {
	fn context_data(&self, key: &str) -> Option<String> {
		self.get(key).cloned()
	}
}
impl ModuleContext for BTreeMap<String, String> {
	fn context_data(&self, key: &str) -> Option<String> {
		self.get(key).cloned()
	}
}
impl<T> ModuleContext for &T
where
	T: ?Sized + ModuleContext,
{
	fn context_data(&self, key: &str) -> Option<String> {
		(**self).context_data(key)
	}
}

/// Parses a host boolean: `true` in any ASCII case is true, everything else is false.
pub fn parse_flag(value: Option<&str>) -> bool {
	value.is_some_and(|value| value.eq_ignore_ascii_case("true"))
}
