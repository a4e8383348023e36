//! Outbound request construction for the gateway's `/3/device/{device}` path.

// self
use crate::{_prelude::*, message::PushMessage};

/// Production gateway origin.
pub const PRODUCTION_ORIGIN: &str = "https://api.push.apple.com";
/// Development (sandbox) gateway origin.
pub const SANDBOX_ORIGIN: &str = "https://api.development.push.apple.com";

/// Immutable outbound request descriptor handed to the transport.
#[derive(Clone, Debug)]
pub struct PushRequest {
	/// Fully formed gateway URL.
	pub url: Url,
	/// Ordered header set, lowercase names.
	pub headers: Vec<(&'static str, String)>,
	/// Serialized payload bytes with a trailing NUL terminator.
	pub body: Vec<u8>,
}

/// Failures that short-circuit a send before any network call is made.
#[derive(Debug, ThisError)]
pub(crate) enum BuildError {
	#[error("Device token cannot form a valid gateway URL.")]
	MalformedDevice,
	#[error("Payload serialization failed.")]
	Serialization(#[from] serde_json::Error),
}

/// Per-send parameters the courier resolves before building one request.
pub(crate) struct RequestContext<'a> {
	pub default_topic: &'a str,
	pub sandbox: bool,
	pub gateway_origin: Option<&'a Url>,
	pub bearer_token: Option<&'a str>,
}

/// Builds the POST request for one (message, device) pair.
pub(crate) fn build_request(
	message: &PushMessage,
	device_token: &str,
	cx: &RequestContext,
) -> Result<PushRequest, BuildError> {
	let url = device_url(message, device_token, cx)?;
	let mut headers = Vec::with_capacity(7);

	headers.push(("apns-id", message.id.clone()));
	headers.push((
		"apns-expiration",
		message.expiration.map(unix_seconds_rounded).unwrap_or(0).to_string(),
	));
	headers.push(("apns-priority", message.priority.as_code().to_string()));
	headers.push((
		"apns-topic",
		message.topic.clone().unwrap_or_else(|| cx.default_topic.to_owned()),
	));

	if let Some(collapse_id) = &message.collapse_id {
		headers.push(("apns-collapse-id", collapse_id.clone()));
	}
	if let Some(thread_id) = &message.thread_id {
		headers.push(("thread-id", thread_id.clone()));
	}
	if let Some(token) = cx.bearer_token {
		headers.push(("authorization", format!("Bearer {token}")));
	}

	let mut body = serde_json::to_vec(&message.payload)?;

	// The gateway protocol expects a NUL-terminated payload.
	body.push(0);

	Ok(PushRequest { url, headers, body })
}

fn device_url(
	message: &PushMessage,
	device_token: &str,
	cx: &RequestContext,
) -> Result<Url, BuildError> {
	if device_token.is_empty() || !device_token.bytes().all(|byte| byte.is_ascii_alphanumeric()) {
		return Err(BuildError::MalformedDevice);
	}

	let origin = match cx.gateway_origin {
		Some(origin) => origin.as_str().trim_end_matches('/').to_owned(),
		None if message.sandbox.unwrap_or(cx.sandbox) => SANDBOX_ORIGIN.to_owned(),
		None => PRODUCTION_ORIGIN.to_owned(),
	};

	Url::parse(&format!("{origin}/3/device/{device_token}"))
		.map_err(|_| BuildError::MalformedDevice)
}

// Sub-second expiration instants round half-up to whole seconds.
fn unix_seconds_rounded(instant: OffsetDateTime) -> i64 {
	((instant.unix_timestamp_nanos() + 500_000_000) / 1_000_000_000) as i64
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros::datetime;
	// self
	use super::*;
	use crate::message::Priority;

	fn context(bearer_token: Option<&str>, sandbox: bool) -> RequestContext<'_> {
		RequestContext {
			default_topic: "com.example.app",
			sandbox,
			gateway_origin: None,
			bearer_token,
		}
	}

	fn header<'a>(request: &'a PushRequest, name: &str) -> Option<&'a str> {
		request
			.headers
			.iter()
			.find(|(header_name, _)| *header_name == name)
			.map(|(_, value)| value.as_str())
	}

	#[test]
	fn header_table_is_complete_for_a_full_message() {
		let message = PushMessage::new(json!({"aps": {"alert": "hi"}}))
			.with_id("abc")
			.with_expiration(datetime!(2026-01-01 00:00:00 UTC))
			.with_priority(Priority::Normal)
			.with_topic("com.example.other")
			.with_collapse_id("batch-1")
			.with_thread_id("thread-9");
		let request = build_request(&message, "d1", &context(Some("tok"), false))
			.expect("Request should build for a well-formed message.");

		assert_eq!(header(&request, "apns-id"), Some("abc"));
		assert_eq!(
			header(&request, "apns-expiration"),
			Some(datetime!(2026-01-01 00:00:00 UTC).unix_timestamp().to_string().as_str()),
		);
		assert_eq!(header(&request, "apns-priority"), Some("5"));
		assert_eq!(header(&request, "apns-topic"), Some("com.example.other"));
		assert_eq!(header(&request, "apns-collapse-id"), Some("batch-1"));
		assert_eq!(header(&request, "thread-id"), Some("thread-9"));
		assert_eq!(header(&request, "authorization"), Some("Bearer tok"));
	}

	#[test]
	fn optional_headers_are_omitted_when_absent() {
		let message = PushMessage::new(json!({})).with_id("abc");
		let request = build_request(&message, "d1", &context(None, false))
			.expect("Request should build without optional fields.");

		assert_eq!(header(&request, "apns-expiration"), Some("0"));
		assert_eq!(header(&request, "apns-priority"), Some("10"));
		assert_eq!(header(&request, "apns-topic"), Some("com.example.app"));
		assert_eq!(header(&request, "apns-collapse-id"), None);
		assert_eq!(header(&request, "thread-id"), None);
		assert_eq!(header(&request, "authorization"), None, "Certificate mode adds no bearer.");
	}

	#[test]
	fn sub_second_expirations_round_to_whole_seconds() {
		let base = datetime!(2026-01-01 00:00:00 UTC);
		let up = PushMessage::new(json!({})).with_expiration(base + Duration::milliseconds(600));
		let down = PushMessage::new(json!({})).with_expiration(base + Duration::milliseconds(400));
		let up_request = build_request(&up, "d1", &context(None, false))
			.expect("Request should build.");
		let down_request = build_request(&down, "d1", &context(None, false))
			.expect("Request should build.");

		assert_eq!(
			header(&up_request, "apns-expiration"),
			Some((base.unix_timestamp() + 1).to_string().as_str()),
		);
		assert_eq!(
			header(&down_request, "apns-expiration"),
			Some(base.unix_timestamp().to_string().as_str()),
		);
	}

	#[test]
	fn body_is_nul_terminated_json() {
		let message = PushMessage::new(json!({"aps": {"badge": 3}}));
		let request = build_request(&message, "d1", &context(None, false))
			.expect("Request should build.");

		assert_eq!(request.body.last(), Some(&0));
		assert_eq!(
			serde_json::from_slice::<serde_json::Value>(&request.body[..request.body.len() - 1])
				.expect("Body without the terminator should be valid JSON."),
			json!({"aps": {"badge": 3}}),
		);
	}

	#[test]
	fn sandbox_flag_selects_the_development_host() {
		let message = PushMessage::new(json!({}));
		let production = build_request(&message, "d1", &context(None, false))
			.expect("Production request should build.");
		let sandbox_default = build_request(&message, "d1", &context(None, true))
			.expect("Sandbox request should build.");
		let sandbox_override = build_request(
			&message.clone().with_sandbox(true),
			"d1",
			&context(None, false),
		)
		.expect("Sandbox override request should build.");

		assert_eq!(production.url.as_str(), "https://api.push.apple.com/3/device/d1");
		assert_eq!(
			sandbox_default.url.as_str(),
			"https://api.development.push.apple.com/3/device/d1",
		);
		assert_eq!(sandbox_default.url, sandbox_override.url);
	}

	#[test]
	fn gateway_origin_override_wins_over_environment() {
		let message = PushMessage::new(json!({})).with_sandbox(true);
		let origin = Url::parse("https://gateway.test:8443/").expect("Origin should parse.");
		let cx = RequestContext {
			default_topic: "com.example.app",
			sandbox: false,
			gateway_origin: Some(&origin),
			bearer_token: None,
		};
		let request = build_request(&message, "d1", &cx).expect("Request should build.");

		assert_eq!(request.url.as_str(), "https://gateway.test:8443/3/device/d1");
	}

	#[test]
	fn malformed_device_tokens_are_rejected() {
		let message = PushMessage::new(json!({}));

		for device in ["", "has space", "slash/y", "quest?ion", "nul\0"] {
			assert!(
				matches!(
					build_request(&message, device, &context(None, false)),
					Err(BuildError::MalformedDevice),
				),
				"Device token {device:?} must be rejected before any network call.",
			);
		}
	}
}
