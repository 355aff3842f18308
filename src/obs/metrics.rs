// self
use crate::obs::{ProcessOutcome, ProcessStage};

/// Records an invocation outcome via the global metrics recorder (when enabled).
///
/// `stage` is the last stage reached: the failing stage for failures, [`ProcessStage::Done`]
/// for successes, and [`ProcessStage::ParseConfig`] for attempts.
pub fn record_process_outcome(stage: ProcessStage, outcome: ProcessOutcome) {
	#[cfg(feature = "metrics")]
	{
		::metrics::counter!(
			"access_token_module_process_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}
