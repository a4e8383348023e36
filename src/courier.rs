//! Courier construction, single-device dispatch, and concurrent fan-out.
//!
//! A send moves through three stages: the request is built (pulling a provider token from the
//! cache, re-signing when stale), handed to the transport, and the reply is classified into one
//! [`SendOutcome`]. Every exit branch of that pipeline resolves the caller's completion exactly
//! once, including transport errors, unparsable replies, and absent replies.

// crates.io
use tokio::task::JoinSet;
// self
use crate::{
	_prelude::*,
	auth::{KeyId, SecretString, TeamId, TokenAuthenticator},
	classify,
	error::{ConfigError, TokenError},
	http::GatewayHttpClient,
	message::PushMessage,
	obs::{self, SendPhase, SendSpan},
	outcome::{DeliveryErrorKind, NetworkCause, SendOutcome},
	request::{self, BuildError, RequestContext},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestGatewayClient;

#[cfg(feature = "reqwest")]
/// Courier specialized for the crate's default reqwest transport.
pub type ReqwestCourier = Courier<ReqwestGatewayClient>;

/// Authentication channel selected at construction.
#[derive(Clone, Debug)]
pub enum AuthMode {
	/// Provider-token authentication; the courier signs and caches ES256 tokens.
	Token {
		/// Team identifier placed in the token's `iss` claim.
		team_id: String,
		/// Key identifier placed in the token's `kid` header.
		key_id: String,
		/// EC P-256 private signing key (PEM).
		private_key_pem: SecretString,
		/// Optional public key enabling the post-sign self-check (PEM).
		public_key_pem: Option<String>,
	},
	/// Certificate authentication; the TLS identity lives in the caller-supplied transport and
	/// the pipeline adds no `authorization` header.
	Certificate,
}

/// Immutable courier configuration, validated once at construction.
#[derive(Clone, Debug)]
pub struct CourierOptions {
	/// Authentication channel.
	pub auth: AuthMode,
	/// Topic used when a message does not carry one.
	pub default_topic: String,
	/// Default gateway environment for messages without an explicit sandbox flag.
	pub sandbox: bool,
	/// Emits verbose request/response lines through `tracing` when enabled.
	pub debug_logging: bool,
	/// Gateway origin override for tests and proxied deployments.
	pub gateway_origin: Option<Url>,
}

enum Authenticator {
	Token(TokenAuthenticator),
	Certificate,
}
impl Authenticator {
	fn from_mode(mode: &AuthMode) -> Result<Self, ConfigError> {
		match mode {
			AuthMode::Token { team_id, key_id, private_key_pem, public_key_pem } => {
				let team_id = TeamId::new(team_id)?;
				let key_id = KeyId::new(key_id)?;
				let authenticator = TokenAuthenticator::new(
					team_id,
					key_id,
					private_key_pem.expose(),
					public_key_pem.as_deref(),
				)?;

				Ok(Self::Token(authenticator))
			},
			AuthMode::Certificate => Ok(Self::Certificate),
		}
	}

	fn bearer_token(&self) -> Result<Option<String>, TokenError> {
		match self {
			Self::Token(authenticator) => authenticator.bearer_token().map(Some),
			Self::Certificate => Ok(None),
		}
	}
}

/// Delivers push notifications over one shared transport.
///
/// The courier owns the transport, the authentication state, and the topic defaults so sends can
/// run concurrently against the same instance. Cloning is cheap and clones share the token
/// cache, so a fan-out never signs more tokens than a sequential loop would.
pub struct Courier<C>
where
	C: ?Sized + GatewayHttpClient,
{
	http_client: Arc<C>,
	auth: Arc<Authenticator>,
	default_topic: String,
	sandbox: bool,
	debug_logging: bool,
	gateway_origin: Option<Url>,
}
impl<C> Courier<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Validates the options and wires the courier to a caller-provided transport.
	pub fn with_gateway_client(
		options: CourierOptions,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		if options.default_topic.is_empty() {
			return Err(ConfigError::EmptyDefaultTopic.into());
		}

		let auth = Authenticator::from_mode(&options.auth)?;

		Ok(Self {
			http_client: http_client.into(),
			auth: Arc::new(auth),
			default_topic: options.default_topic,
			sandbox: options.sandbox,
			debug_logging: options.debug_logging,
			gateway_origin: options.gateway_origin,
		})
	}

	/// Sends one message to one device and resolves with exactly one outcome.
	///
	/// The returned future is the caller's one-shot completion: it resolves on every exit path
	/// and nothing is thrown across this boundary. A single send's failure never terminates the
	/// process; any condition that would otherwise be fatal degrades into a [`SendOutcome`].
	pub async fn send_to(&self, message: &PushMessage, device_token: &str) -> SendOutcome {
		let span = SendSpan::new(&message.id, device_token);

		obs::record_send_phase(SendPhase::Attempt);

		let outcome = span.instrument(self.dispatch(message, device_token)).await;

		obs::record_send_phase(SendPhase::of(&outcome));

		outcome
	}

	/// Sends one message to many devices concurrently, invoking `handler` once per device.
	///
	/// Every send starts immediately; no queueing, ordering, or aggregation is applied, and one
	/// device's failure never suppresses or delays the callbacks for the others. The handler
	/// runs from concurrent completion contexts. The returned future resolves after every
	/// per-device completion has run.
	pub async fn fan_out<I, H>(&self, message: &PushMessage, device_tokens: I, handler: H)
	where
		I: IntoIterator,
		I::Item: Into<String>,
		H: 'static + Fn(SendOutcome) + Send + Sync,
	{
		let handler = Arc::new(handler);
		let mut completions = JoinSet::new();

		for device_token in device_tokens {
			let courier = self.clone();
			let message = message.clone();
			let device_token = device_token.into();
			let handler = handler.clone();

			completions.spawn(async move {
				handler(courier.send_to(&message, &device_token).await);
			});
		}

		// A panicking handler surfaces as a join error here; the remaining sends are unaffected.
		while completions.join_next().await.is_some() {}
	}

	async fn dispatch(&self, message: &PushMessage, device_token: &str) -> SendOutcome {
		let bearer_token = match self.auth.bearer_token() {
			Ok(token) => token,
			Err(TokenError::SignatureMismatch) =>
				return SendOutcome::DeliveryError {
					message_id: message.id.clone(),
					device_token: device_token.to_owned(),
					kind: DeliveryErrorKind::InvalidSignature,
				},
			Err(e @ TokenError::Signing { .. }) =>
				return SendOutcome::DeliveryError {
					message_id: message.id.clone(),
					device_token: device_token.to_owned(),
					kind: DeliveryErrorKind::Unknown(e.to_string()),
				},
		};
		let cx = RequestContext {
			default_topic: &self.default_topic,
			sandbox: self.sandbox,
			gateway_origin: self.gateway_origin.as_ref(),
			bearer_token: bearer_token.as_deref(),
		};
		let request = match request::build_request(message, device_token, &cx) {
			Ok(request) => request,
			Err(BuildError::MalformedDevice) =>
				return SendOutcome::NetworkError {
					cause: NetworkCause::BadRequest { device_token: device_token.to_owned() },
				},
			Err(BuildError::Serialization(e)) =>
				return SendOutcome::DeliveryError {
					message_id: message.id.clone(),
					device_token: device_token.to_owned(),
					kind: DeliveryErrorKind::Unknown(format!("Payload serialization failed: {e}")),
				},
		};

		obs::debug_request(self.debug_logging, &request);

		match self.http_client.execute(request).await {
			Ok(Some(reply)) => {
				obs::debug_reply(self.debug_logging, &reply);

				classify::classify(&message.id, device_token, &reply)
			},
			Ok(None) => SendOutcome::NetworkError { cause: NetworkCause::NoResponse },
			Err(e) => SendOutcome::NetworkError { cause: NetworkCause::transport(e) },
		}
	}
}
#[cfg(feature = "reqwest")]
impl Courier<ReqwestGatewayClient> {
	/// Creates a courier backed by the crate's default reqwest transport.
	///
	/// The transport relies on reqwest's connection pooling for concurrent sends. Use
	/// [`Courier::with_gateway_client`] to supply a customized client, e.g. one carrying a TLS
	/// identity for certificate-mode deployments.
	pub fn new(options: CourierOptions) -> Result<Self> {
		Self::with_gateway_client(options, ReqwestGatewayClient::default())
	}
}
impl<C> Clone for Courier<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			auth: self.auth.clone(),
			default_topic: self.default_topic.clone(),
			sandbox: self.sandbox,
			debug_logging: self.debug_logging,
			gateway_origin: self.gateway_origin.clone(),
		}
	}
}
impl<C> Debug for Courier<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Courier")
			.field("default_topic", &self.default_topic)
			.field("sandbox", &self.sandbox)
			.field("token_auth", &matches!(self.auth.as_ref(), Authenticator::Token(_)))
			.finish()
	}
}
