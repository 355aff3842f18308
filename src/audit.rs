//! Audit log contracts and the request-scoped diagnostics handle.
//!
//! The host engine keeps a per-message audit log. The module writes to it through
//! [`AuditSink`]; [`Diagnostics`] binds a sink to one message key and debug flag for the
//! duration of a single invocation, so nothing about the current message is ever stored on
//! the module itself.

// self
use crate::{_prelude::*, message::MessageKey};

/// Severity attached to an audit entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditStatus {
	/// Informational progress entry.
	Success,
	/// Terminal failure for the message.
	Error,
}
impl AuditStatus {
	/// Returns a stable label suitable for logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuditStatus::Success => "success",
			AuditStatus::Error => "error",
		}
	}
}
impl Display for AuditStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One timestamped audit log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditEntry {
	/// Instant the entry was recorded (UTC).
	pub timestamp: OffsetDateTime,
	/// Message the entry belongs to.
	pub key: MessageKey,
	/// Entry severity.
	pub status: AuditStatus,
	/// Free-text description.
	pub text: String,
}

/// Destination for audit entries, shared by every invocation of a module.
pub trait AuditSink
where
	Self: Send + Sync,
{
	/// Appends one entry for the given message.
	fn add_audit_log_entry(&self, key: &MessageKey, status: AuditStatus, text: &str);
}

/// In-memory audit log, primarily for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
	entries: Mutex<Vec<AuditEntry>>,
}
impl MemoryAuditLog {
	/// Returns a snapshot of every entry recorded so far.
	pub fn entries(&self) -> Vec<AuditEntry> {
		self.entries.lock().clone()
	}

	/// Returns the entries recorded for one message, in order.
	pub fn entries_for(&self, key: &MessageKey) -> Vec<AuditEntry> {
		self.entries.lock().iter().filter(|entry| &entry.key == key).cloned().collect()
	}
}
impl AuditSink for MemoryAuditLog {
	fn add_audit_log_entry(&self, key: &MessageKey, status: AuditStatus, text: &str) {
		let entry = AuditEntry {
			timestamp: OffsetDateTime::now_utc(),
			key: key.clone(),
			status,
			text: text.to_owned(),
		};

		self.entries.lock().push(entry);
	}
}

/// Forwards audit entries to `tracing` events under the `access_token_module.audit` target.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;
#[cfg(feature = "tracing")]
impl AuditSink for TracingAuditSink {
	fn add_audit_log_entry(&self, key: &MessageKey, status: AuditStatus, text: &str) {
		let message_id = key.message_id.as_str();
		let direction = key.direction.as_str();

		match status {
			AuditStatus::Success => tracing::info!(
				target: "access_token_module.audit",
				message_id,
				direction,
				"{text}"
			),
			AuditStatus::Error => tracing::error!(
				target: "access_token_module.audit",
				message_id,
				direction,
				"{text}"
			),
		}
	}
}

/// Audit handle scoped to one module invocation.
///
/// Debug entries are only written when the invocation's `debugEnabled` parameter is set;
/// errors are always written.
#[derive(Clone, Copy)]
pub struct Diagnostics<'a> {
	sink: &'a dyn AuditSink,
	key: &'a MessageKey,
	debug: bool,
}
impl<'a> Diagnostics<'a> {
	/// Binds a sink to one message key.
	pub fn new(sink: &'a dyn AuditSink, key: &'a MessageKey, debug: bool) -> Self {
		Self { sink, key, debug }
	}

	/// Writes a success entry when debug mode is on; the text is only rendered in that case.
	pub fn debug(&self, text: impl Display) {
		if self.debug {
			self.sink.add_audit_log_entry(self.key, AuditStatus::Success, &text.to_string());
		}
	}

	/// Writes an error entry unconditionally.
	pub fn error(&self, text: impl Display) {
		self.sink.add_audit_log_entry(self.key, AuditStatus::Error, &text.to_string());
	}
}
impl Debug for Diagnostics<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Diagnostics").field("key", self.key).field("debug", &self.debug).finish()
	}
}
