//! Courier-level error types shared across construction, signing, and dispatch.

// self
use crate::_prelude::*;

/// Courier-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical courier error exposed by public APIs.
///
/// Only construction returns this type. A send never fails with an [`Error`]; every condition a
/// send can hit degrades into a [`SendOutcome`](crate::outcome::SendOutcome) value instead.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider-token signing problem.
	#[error(transparent)]
	Token(#[from] TokenError),
}

/// Configuration and validation failures raised at construction time.
///
/// Token-mode key material is validated here, before any send is attempted, so a missing or
/// malformed key fails construction with a descriptive error instead of failing mid-send.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Default topic must not be empty.
	#[error("Default topic must not be empty.")]
	EmptyDefaultTopic,
	/// Team or key identifier validation failed.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
	/// Private signing key could not be parsed.
	#[error("Private signing key is not a valid EC P-256 PEM.")]
	InvalidSigningKey {
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Public verification key could not be parsed.
	#[error("Public verification key is not a valid EC P-256 PEM.")]
	InvalidVerificationKey {
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// Provider-token signing failures.
///
/// These stay internal to the dispatch path and degrade into per-send delivery errors; they are
/// exposed so custom authenticator wrappers can classify them the same way.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// Token could not be signed with the configured private key.
	#[error("Provider token could not be signed.")]
	Signing {
		/// Underlying signer failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Freshly signed token failed the public-key self-check.
	#[error("Provider token failed signature self-verification.")]
	SignatureMismatch,
}
