//! Authentication module
//!
//! OpenProject accepts API keys through HTTP Basic authentication with the
//! literal username `apikey` and the key as password.
//!
//! The key is held in an [`ApiKey`] whose `Debug` output is redacted, and the
//! `Authorization` header is marked sensitive before it is attached.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, API_KEY_USERNAME};
pub use types::ApiKey;
