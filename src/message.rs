//! Host message contracts: correlation keys, dynamic property keys, and the property bag.
//!
//! The pipeline engine owns the real message envelope. The module only needs to read the
//! message's correlation key (for audit entries) and write one dynamic property, so the host
//! adapts its envelope through [`ModuleMessage`]. [`PipelineMessage`] is an in-memory
//! implementation that applies the same parameter checks the engine does.

// self
use crate::_prelude::*;

/// Namespace prefix shared by every adapter's dynamic configuration properties.
pub const SYSTEM_NAMESPACE_PREFIX: &str = "http://sap.com/xi/XI/System/";

/// Direction of an in-flight message, as reported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageDirection {
	/// Message leaving the engine towards a receiver.
	Outbound,
	/// Message entering the engine from a sender.
	Inbound,
}
impl MessageDirection {
	/// Returns a stable label suitable for logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			MessageDirection::Outbound => "OUTBOUND",
			MessageDirection::Inbound => "INBOUND",
		}
	}
}
impl Display for MessageDirection {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Correlation key tying audit entries to one in-flight message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageKey {
	/// Engine-assigned message identifier.
	pub message_id: String,
	/// Processing direction.
	pub direction: MessageDirection,
}
impl MessageKey {
	/// Creates a key for the given message identifier and direction.
	pub fn new(message_id: impl Into<String>, direction: MessageDirection) -> Self {
		Self { message_id: message_id.into(), direction }
	}
}
impl Display for MessageKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}({})", self.message_id, self.direction)
	}
}

/// Name + namespace pair addressing one dynamic property.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessagePropertyKey {
	/// Property name.
	pub name: String,
	/// Property namespace, usually [`SYSTEM_NAMESPACE_PREFIX`] plus an adapter type.
	pub namespace: String,
}
impl MessagePropertyKey {
	/// Creates a new key.
	pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
		Self { name: name.into(), namespace: namespace.into() }
	}
}
impl Display for MessagePropertyKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{{{}}}{}", self.namespace, self.name)
	}
}

/// Rejection raised by a message when a property write is not acceptable.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum InvalidParamError {
	/// Property name is empty or contains characters the engine does not accept.
	#[error("property name `{name}` is invalid")]
	Name {
		/// Rejected name.
		name: String,
	},
	/// Property namespace is not an absolute URI.
	#[error("property namespace `{namespace}` is not an absolute URI")]
	Namespace {
		/// Rejected namespace.
		namespace: String,
	},
	/// Property value contains control characters.
	#[error("property value contains control characters")]
	Value,
}

/// Message view the module needs from the host engine.
pub trait ModuleMessage
where
	Self: Send,
{
	/// Correlation key used for every audit entry about this message.
	fn message_key(&self) -> &MessageKey;

	/// Writes (or replaces) one dynamic property.
	fn set_message_property(
		&mut self,
		key: MessagePropertyKey,
		value: &str,
	) -> Result<(), InvalidParamError>;

	/// Reads a dynamic property, if present.
	fn message_property(&self, key: &MessagePropertyKey) -> Option<&str>;
}

/// In-memory message with a dynamic property bag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineMessage {
	key: MessageKey,
	properties: BTreeMap<MessagePropertyKey, String>,
}
impl PipelineMessage {
	/// Creates an empty message carrying the provided correlation key.
	pub fn new(key: MessageKey) -> Self {
		Self { key, properties: BTreeMap::new() }
	}

	/// Returns every property currently set on the message.
	pub fn properties(&self) -> &BTreeMap<MessagePropertyKey, String> {
		&self.properties
	}
}
impl ModuleMessage for PipelineMessage {
	fn message_key(&self) -> &MessageKey {
		&self.key
	}

	fn set_message_property(
		&mut self,
		key: MessagePropertyKey,
		value: &str,
	) -> Result<(), InvalidParamError> {
		validate_property_name(&key.name)?;
		validate_property_namespace(&key.namespace)?;

		if value.chars().any(char::is_control) {
			return Err(InvalidParamError::Value);
		}

		self.properties.insert(key, value.to_owned());

		Ok(())
	}

	fn message_property(&self, key: &MessagePropertyKey) -> Option<&str> {
		self.properties.get(key).map(String::as_str)
	}
}

fn validate_property_name(name: &str) -> Result<(), InvalidParamError> {
	let mut chars = name.chars();
	let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
	let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

	if valid_start && valid_rest {
		Ok(())
	} else {
		Err(InvalidParamError::Name { name: name.to_owned() })
	}
}

fn validate_property_namespace(namespace: &str) -> Result<(), InvalidParamError> {
	match Url::parse(namespace) {
		Ok(_) => Ok(()),
		Err(_) => Err(InvalidParamError::Namespace { namespace: namespace.to_owned() }),
	}
}
