//! Response classification: the gateway's HTTP status and reason strings mapped into one typed
//! outcome per send.

// self
use crate::{
	_prelude::*,
	http::GatewayReply,
	outcome::{DeliveryErrorKind, SendOutcome},
};

/// Service-level status derived from the gateway's HTTP status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
	/// 200, the notification was accepted.
	Success,
	/// 400, bad request.
	BadRequest,
	/// 401, missing or unusable authentication.
	Unauthorized,
	/// 403, certificate or provider-token error.
	Forbidden,
	/// 404, bad device path.
	NotFound,
	/// 405, only POST is supported.
	MethodNotAllowed,
	/// 410, the device token is no longer active for the topic.
	Gone,
	/// 413, the payload exceeds the size limit.
	PayloadTooLarge,
	/// 429, too many requests for the same device token.
	TooManyRequests,
	/// 500, internal gateway error.
	InternalServerError,
	/// 503, the gateway is shutting down or unavailable.
	ServiceUnavailable,
	/// Any other status code.
	Unknown(u16),
}
impl ServiceStatus {
	/// Maps a raw HTTP status code.
	pub const fn from_code(code: u16) -> Self {
		match code {
			200 => ServiceStatus::Success,
			400 => ServiceStatus::BadRequest,
			401 => ServiceStatus::Unauthorized,
			403 => ServiceStatus::Forbidden,
			404 => ServiceStatus::NotFound,
			405 => ServiceStatus::MethodNotAllowed,
			410 => ServiceStatus::Gone,
			413 => ServiceStatus::PayloadTooLarge,
			429 => ServiceStatus::TooManyRequests,
			500 => ServiceStatus::InternalServerError,
			503 => ServiceStatus::ServiceUnavailable,
			other => ServiceStatus::Unknown(other),
		}
	}
}
impl Display for ServiceStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			ServiceStatus::Success => f.write_str("Success"),
			ServiceStatus::BadRequest => f.write_str("BadRequest"),
			ServiceStatus::Unauthorized => f.write_str("Unauthorized"),
			ServiceStatus::Forbidden => f.write_str("Forbidden"),
			ServiceStatus::NotFound => f.write_str("NotFound"),
			ServiceStatus::MethodNotAllowed => f.write_str("MethodNotAllowed"),
			ServiceStatus::Gone => f.write_str("Gone"),
			ServiceStatus::PayloadTooLarge => f.write_str("PayloadTooLarge"),
			ServiceStatus::TooManyRequests => f.write_str("TooManyRequests"),
			ServiceStatus::InternalServerError => f.write_str("InternalServerError"),
			ServiceStatus::ServiceUnavailable => f.write_str("ServiceUnavailable"),
			ServiceStatus::Unknown(code) => write!(f, "Unknown({code})"),
		}
	}
}

macro_rules! def_reasons {
	($( $variant:ident ),* $(,)?) => {
		/// Rejection reason reported explicitly by the gateway's error body.
		#[derive(Clone, Debug, PartialEq, Eq, Hash)]
		pub enum GatewayReason {
			$(
				#[doc = concat!("`", stringify!($variant), "` reason string.")]
				$variant,
			)*
			/// Reason string this crate does not know about yet.
			Other(String),
		}
		impl GatewayReason {
			/// Maps the gateway's reason string.
			pub fn from_reason(reason: &str) -> Self {
				match reason {
					$( stringify!($variant) => GatewayReason::$variant, )*
					other => GatewayReason::Other(other.to_owned()),
				}
			}

			/// Returns the gateway's reason string.
			pub fn as_str(&self) -> &str {
				match self {
					$( GatewayReason::$variant => stringify!($variant), )*
					GatewayReason::Other(reason) => reason,
				}
			}
		}
		impl Display for GatewayReason {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(self.as_str())
			}
		}
	};
}

def_reasons! {
	BadCollapseId,
	BadDeviceToken,
	BadExpirationDate,
	BadMessageId,
	BadPriority,
	BadTopic,
	DeviceTokenNotForTopic,
	DuplicateHeaders,
	IdleTimeout,
	InvalidPushType,
	MissingDeviceToken,
	MissingTopic,
	PayloadEmpty,
	TopicDisallowed,
	BadCertificate,
	BadCertificateEnvironment,
	ExpiredProviderToken,
	Forbidden,
	InvalidProviderToken,
	MissingProviderToken,
	BadPath,
	MethodNotAllowed,
	Unregistered,
	PayloadTooLarge,
	TooManyProviderTokenUpdates,
	TooManyRequests,
	InternalServerError,
	ServiceUnavailable,
	Shutdown,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
	reason: String,
}

/// Maps one gateway reply onto exactly one [`SendOutcome`].
///
/// An explicit `reason` in the body always wins over the status code, even when the status alone
/// would imply success. A body that does not decode to a reason object is ignored and the status
/// decides alone.
pub fn classify(message_id: &str, device_token: &str, reply: &GatewayReply) -> SendOutcome {
	let status = ServiceStatus::from_code(reply.status);

	if let Some(reason) = reply.body.as_deref().and_then(parse_reason) {
		return SendOutcome::DeliveryError {
			message_id: message_id.to_owned(),
			device_token: device_token.to_owned(),
			kind: DeliveryErrorKind::Gateway(reason),
		};
	}
	if matches!(status, ServiceStatus::Success) {
		return SendOutcome::Success {
			message_id: message_id.to_owned(),
			device_token: device_token.to_owned(),
			status,
		};
	}

	SendOutcome::DeliveryError {
		message_id: message_id.to_owned(),
		device_token: device_token.to_owned(),
		kind: DeliveryErrorKind::Unknown(format!("ServiceStatus: {status}")),
	}
}

fn parse_reason(body: &[u8]) -> Option<GatewayReason> {
	serde_json::from_slice::<GatewayErrorBody>(body)
		.ok()
		.map(|body| GatewayReason::from_reason(&body.reason))
}
