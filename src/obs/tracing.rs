// self
use crate::{_prelude::*, obs::ProcessStage};

/// A span builder used by module invocations.
#[derive(Clone, Debug)]
pub struct ProcessSpan {
	#[cfg(feature = "tracing")]
	span: ::tracing::Span,
}
impl ProcessSpan {
	/// Creates a new span tagged with the message id and stage.
	pub fn new(message_id: &str, stage: ProcessStage) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = ::tracing::info_span!(
				"access_token_module.process",
				message_id,
				stage = stage.as_str()
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (message_id, stage);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> ProcessSpanGuard {
		#[cfg(feature = "tracing")]
		{
			ProcessSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			ProcessSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> impl Future<Output = Fut::Output>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use ::tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`ProcessSpan::entered`].
pub struct ProcessSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: ::tracing::span::EnteredSpan,
}
impl Debug for ProcessSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ProcessSpanGuard(..)")
	}
}
