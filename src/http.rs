//! Transport primitives for gateway dispatch.
//!
//! The module exposes [`GatewayHttpClient`] so downstream crates can integrate custom HTTP
//! clients without touching the dispatch pipeline. The trait is the courier's only dependency on
//! an HTTP stack; the bundled [`ReqwestGatewayClient`] covers the common case behind the
//! `reqwest` feature.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, request::PushRequest};

/// Boxed future returned by [`GatewayHttpClient::execute`].
pub type GatewayFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<Option<GatewayReply>, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of delivering one push request.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// in-flight send, and they must tolerate concurrent request issuance (connection pooling or
/// HTTP/2 multiplexing) because the fan-out path starts every send without waiting for prior
/// sends to finish. Timeouts are a transport configuration concern; the courier applies none of
/// its own.
pub trait GatewayHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes one request and resolves with the gateway's reply.
	///
	/// Resolving with `Ok(None)` models a transport that finished without producing either a
	/// reply or an error; the courier maps it to a no-response network outcome.
	fn execute(&self, request: PushRequest) -> GatewayFuture<'_, Self::TransportError>;
}

/// Reply captured from the gateway before classification.
#[derive(Clone, Debug)]
pub struct GatewayReply {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body, when one was returned.
	pub body: Option<Vec<u8>>,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The default client relies on reqwest's connection pool for concurrent sends. Certificate-mode
/// deployments should construct their own [`ReqwestClient`] carrying the TLS identity and wrap it
/// with [`ReqwestGatewayClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestGatewayClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestGatewayClient {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestGatewayClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestGatewayClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GatewayHttpClient for ReqwestGatewayClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: PushRequest) -> GatewayFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.post(request.url);

			for (name, value) in &request.headers {
				builder = builder.header(*name, value.as_str());
			}

			let response = builder.body(request.body).send().await?;
			let status = response.status().as_u16();
			let bytes = response.bytes().await?.to_vec();
			let body = (!bytes.is_empty()).then_some(bytes);

			Ok(Some(GatewayReply { status, body }))
		})
	}
}
