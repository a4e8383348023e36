//! Optional observability helpers for courier sends.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `apns_courier.send` with the `apns_id` and
//!   `device` (prefix only) fields, plus verbose request/response lines when the courier's
//!   `debug_logging` flag is set.
//! - Enable `metrics` to increment the `apns_courier_send_total` counter for every
//!   attempt/success/delivery-error/network-error, labeled by `phase`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::{_prelude::*, outcome::SendOutcome};

/// Send phases observed by the courier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SendPhase {
	/// Entry to the dispatch path.
	Attempt,
	/// Gateway accepted the notification.
	Success,
	/// Gateway rejected the notification or the request could not be produced.
	DeliveryError,
	/// Transport failed before a classifiable reply arrived.
	NetworkError,
}
impl SendPhase {
	/// Maps a resolved outcome onto its terminal phase.
	pub const fn of(outcome: &SendOutcome) -> Self {
		match outcome {
			SendOutcome::Success { .. } => SendPhase::Success,
			SendOutcome::DeliveryError { .. } => SendPhase::DeliveryError,
			SendOutcome::NetworkError { .. } => SendPhase::NetworkError,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SendPhase::Attempt => "attempt",
			SendPhase::Success => "success",
			SendPhase::DeliveryError => "delivery_error",
			SendPhase::NetworkError => "network_error",
		}
	}
}
impl Display for SendPhase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
