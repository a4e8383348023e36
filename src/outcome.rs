//! Typed per-send outcomes delivered to caller handlers.

// self
use crate::{
	_prelude::*,
	classify::{GatewayReason, ServiceStatus},
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of one (message, device) send.
///
/// Exactly one value is produced per pair and handed to the caller's handler; nothing is thrown
/// across the send boundary and the courier retains no copy.
#[derive(Debug)]
pub enum SendOutcome {
	/// Gateway accepted the notification.
	Success {
		/// Identifier of the delivered message.
		message_id: String,
		/// Target device identifier.
		device_token: String,
		/// Service status derived from the reply.
		status: ServiceStatus,
	},
	/// Gateway rejected the notification, or the request could not be produced.
	DeliveryError {
		/// Identifier of the rejected message.
		message_id: String,
		/// Target device identifier.
		device_token: String,
		/// Rejection kind.
		kind: DeliveryErrorKind,
	},
	/// Transport failed before any classifiable reply arrived.
	NetworkError {
		/// Transport-level cause.
		cause: NetworkCause,
	},
}
impl SendOutcome {
	/// Returns `true` for an accepted notification.
	pub fn is_success(&self) -> bool {
		matches!(self, SendOutcome::Success { .. })
	}
}

/// Rejection kinds carried by [`SendOutcome::DeliveryError`].
#[derive(Debug, ThisError)]
pub enum DeliveryErrorKind {
	/// Gateway returned an explicit reason string.
	#[error("Gateway rejected the notification: {0}.")]
	Gateway(GatewayReason),
	/// Freshly signed provider token failed the public-key self-check.
	#[error("Provider token failed signature self-verification.")]
	InvalidSignature,
	/// Non-success reply without a reason, or a local failure with no better kind.
	#[error("{0}")]
	Unknown(String),
}

/// Transport-level causes carried by [`SendOutcome::NetworkError`].
#[derive(Debug, ThisError)]
pub enum NetworkCause {
	/// Device identifier cannot form a valid gateway URL; no network call was made.
	#[error("Device token `{device_token}` cannot form a valid gateway URL.")]
	BadRequest {
		/// Offending device identifier.
		device_token: String,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the push gateway.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Transport finished without producing a reply or an error.
	#[error("Push gateway returned no response.")]
	NoResponse,
}
impl NetworkCause {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn success_predicate_matches_only_success() {
		let success = SendOutcome::Success {
			message_id: "abc".into(),
			device_token: "d1".into(),
			status: ServiceStatus::Success,
		};
		let rejected = SendOutcome::DeliveryError {
			message_id: "abc".into(),
			device_token: "d1".into(),
			kind: DeliveryErrorKind::Gateway(GatewayReason::BadDeviceToken),
		};
		let failed = SendOutcome::NetworkError { cause: NetworkCause::NoResponse };

		assert!(success.is_success());
		assert!(!rejected.is_success());
		assert!(!failed.is_success());
	}

	#[test]
	fn delivery_error_kinds_render_stable_messages() {
		assert_eq!(
			DeliveryErrorKind::Gateway(GatewayReason::Unregistered).to_string(),
			"Gateway rejected the notification: Unregistered.",
		);
		assert_eq!(
			DeliveryErrorKind::Unknown("ServiceStatus: BadRequest".into()).to_string(),
			"ServiceStatus: BadRequest",
		);
	}
}
