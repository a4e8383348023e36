//! Strongly typed identifiers for the provider-token claims.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 64;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (team, key).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (team, key).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (team, key).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { TeamId, "Developer team identifier carried in the provider token's `iss` claim.", "Team" }
def_id! { KeyId, "Signing key identifier carried in the provider token's `kid` header.", "Key" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty() {
		assert!(TeamId::new(" TEAMID1234").is_err(), "Leading whitespace must be rejected.");
		assert!(TeamId::new("TEAMID1234 ").is_err(), "Trailing whitespace must be rejected.");
		assert!(TeamId::new("").is_err());
		assert!(KeyId::new("KEY ID").is_err());

		let team = TeamId::new("TEAMID1234").expect("Team fixture should be considered valid.");

		assert_eq!(team.as_ref(), "TEAMID1234");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let key: KeyId =
			serde_json::from_str("\"KEYID12345\"").expect("Key should deserialize successfully.");

		assert_eq!(key.as_ref(), "KEYID12345");
		assert!(serde_json::from_str::<KeyId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_is_enforced() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		TeamId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(TeamId::new(&too_long).is_err());
	}
}
