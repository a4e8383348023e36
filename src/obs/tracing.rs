// self
use crate::{_prelude::*, http::GatewayReply, request::PushRequest};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedSend<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedSend<F> = F;

/// A span builder wrapping one dispatch.
#[derive(Clone, Debug)]
pub struct SendSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl SendSpan {
	/// Creates a new span tagged with the message identifier and a device-token prefix.
	///
	/// Only the first eight characters of the device token are recorded; the full token is a
	/// routing credential and stays out of logs.
	pub fn new(apns_id: &str, device_token: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let device = device_token.chars().take(8).collect::<String>();
			let span = tracing::info_span!("apns_courier.send", apns_id, device = %device);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (apns_id, device_token);

			Self {}
		}
	}

	/// Instruments the dispatch future without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedSend<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a verbose request line when the courier has debug logging enabled.
pub(crate) fn debug_request(enabled: bool, request: &PushRequest) {
	#[cfg(feature = "tracing")]
	if enabled {
		tracing::debug!(
			url = %request.url,
			body_len = request.body.len(),
			"Dispatching push request.",
		);
	}
	#[cfg(not(feature = "tracing"))]
	let _ = (enabled, request);
}

/// Emits a verbose reply line when the courier has debug logging enabled.
pub(crate) fn debug_reply(enabled: bool, reply: &GatewayReply) {
	#[cfg(feature = "tracing")]
	if enabled {
		tracing::debug!(
			status = reply.status,
			body_len = reply.body.as_ref().map(Vec::len).unwrap_or(0),
			"Received gateway reply.",
		);
	}
	#[cfg(not(feature = "tracing"))]
	let _ = (enabled, reply);
}
