//! Optional observability helpers for module invocations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `access_token_module.process` with the
//!   `stage` field.
//! - Enable `metrics` to increment the `access_token_module_process_total` counter for every
//!   attempt/success/failure, labeled by `outcome` and the failing `stage`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Sequential stages of one module invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessStage {
	/// Reading module parameters from the host context.
	ParseConfig,
	/// Validating module parameters.
	ValidateConfig,
	/// Calling the authentication server.
	FetchToken,
	/// Writing the token into the message.
	InjectHeader,
	/// Invocation finished successfully.
	Done,
}
impl ProcessStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProcessStage::ParseConfig => "parse_config",
			ProcessStage::ValidateConfig => "validate_config",
			ProcessStage::FetchToken => "fetch_token",
			ProcessStage::InjectHeader => "inject_header",
			ProcessStage::Done => "done",
		}
	}
}
impl Display for ProcessStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessOutcome {
	/// Entry to the module.
	Attempt,
	/// Token injected.
	Success,
	/// Failure propagated back to the host.
	Failure,
}
impl ProcessOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProcessOutcome::Attempt => "attempt",
			ProcessOutcome::Success => "success",
			ProcessOutcome::Failure => "failure",
		}
	}
}
impl Display for ProcessOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
