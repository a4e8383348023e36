// self
use crate::obs::SendPhase;

/// Records a send phase via the global metrics recorder (when enabled).
pub fn record_send_phase(phase: SendPhase) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("apns_courier_send_total", "phase" => phase.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = phase;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_send_phase_noop_without_metrics() {
		record_send_phase(SendPhase::NetworkError);
	}
}
