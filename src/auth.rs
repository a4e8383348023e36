//! Authentication primitives: validated identifiers, redacted secrets, and the provider-token
//! cache.

pub mod id;
pub mod secret;
pub mod token;

pub use id::*;
pub use secret::*;
pub use token::*;
