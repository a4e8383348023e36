//! Secure secret wrapper that redacts key material and signed tokens.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping key material and signed tokens out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretString(String);
impl SecretString {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SecretString {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl Debug for SecretString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SecretString").field(&"<redacted>").finish()
	}
}
impl Display for SecretString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = SecretString::new("super-secret");

		assert_eq!(format!("{secret:?}"), "SecretString(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}
}
