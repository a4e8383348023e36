//! Push message model shared by single sends and fan-outs.

// crates.io
use uuid::Uuid;
// self
use crate::_prelude::*;

/// Delivery priority communicated through the `apns-priority` header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Priority {
	/// Power-conscious delivery (header code 5).
	Normal,
	/// Immediate delivery (header code 10).
	#[default]
	High,
}
impl Priority {
	/// Returns the numeric header code.
	pub const fn as_code(self) -> u8 {
		match self {
			Priority::Normal => 5,
			Priority::High => 10,
		}
	}
}

/// One notification; immutable once built, and a single instance may be sent to many recipients.
#[derive(Clone, Debug)]
pub struct PushMessage {
	/// Opaque JSON payload forwarded to the gateway.
	pub payload: serde_json::Value,
	/// Message identifier carried in the `apns-id` header; generated when not supplied.
	pub id: String,
	/// Absolute expiration instant; `0` is sent when absent.
	pub expiration: Option<OffsetDateTime>,
	/// Delivery priority.
	pub priority: Priority,
	/// Topic override; the courier's default topic applies when absent.
	pub topic: Option<String>,
	/// Collapse identifier letting the gateway coalesce multiple notifications into one alert.
	pub collapse_id: Option<String>,
	/// Thread identifier grouping notifications on the device.
	pub thread_id: Option<String>,
	/// Gateway environment override; the courier's sandbox default applies when absent.
	pub sandbox: Option<bool>,
}
impl PushMessage {
	/// Creates a message with a generated identifier and immediate priority.
	pub fn new(payload: serde_json::Value) -> Self {
		Self {
			payload,
			id: Uuid::new_v4().to_string(),
			expiration: None,
			priority: Priority::default(),
			topic: None,
			collapse_id: None,
			thread_id: None,
			sandbox: None,
		}
	}

	/// Replaces the generated message identifier.
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = id.into();

		self
	}

	/// Sets the absolute expiration instant.
	pub fn with_expiration(mut self, instant: OffsetDateTime) -> Self {
		self.expiration = Some(instant);

		self
	}

	/// Overrides the delivery priority.
	pub fn with_priority(mut self, priority: Priority) -> Self {
		self.priority = priority;

		self
	}

	/// Sets the topic, overriding the courier's default.
	pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
		self.topic = Some(topic.into());

		self
	}

	/// Sets the collapse identifier.
	pub fn with_collapse_id(mut self, collapse_id: impl Into<String>) -> Self {
		self.collapse_id = Some(collapse_id.into());

		self
	}

	/// Sets the thread identifier.
	pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
		self.thread_id = Some(thread_id.into());

		self
	}

	/// Selects the development or production gateway for this message.
	pub fn with_sandbox(mut self, sandbox: bool) -> Self {
		self.sandbox = Some(sandbox);

		self
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn priority_codes_match_the_header_values() {
		assert_eq!(Priority::Normal.as_code(), 5);
		assert_eq!(Priority::High.as_code(), 10);
		assert_eq!(Priority::default(), Priority::High);
	}

	#[test]
	fn generated_identifiers_are_unique() {
		let first = PushMessage::new(json!({"aps": {"alert": "hi"}}));
		let second = PushMessage::new(json!({"aps": {"alert": "hi"}}));

		assert!(!first.id.is_empty());
		assert_ne!(first.id, second.id);
	}

	#[test]
	fn builder_methods_override_defaults() {
		let message = PushMessage::new(json!({}))
			.with_id("abc")
			.with_priority(Priority::Normal)
			.with_topic("com.example.other")
			.with_collapse_id("batch-1")
			.with_thread_id("thread-9")
			.with_sandbox(true);

		assert_eq!(message.id, "abc");
		assert_eq!(message.priority, Priority::Normal);
		assert_eq!(message.topic.as_deref(), Some("com.example.other"));
		assert_eq!(message.collapse_id.as_deref(), Some("batch-1"));
		assert_eq!(message.thread_id.as_deref(), Some("thread-9"));
		assert_eq!(message.sandbox, Some(true));
	}
}
