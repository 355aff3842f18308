//! Token endpoint payloads and the redacting secret wrapper.

pub mod response;
pub mod secret;

pub use response::*;
pub use secret::*;
