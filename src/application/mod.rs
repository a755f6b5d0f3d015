// Application layer - ledger use cases and orchestration.
// Validation lives here and in the domain; the CLI only translates errors
// into user-facing messages.

mod error;
mod service;

pub use error::*;
pub use service::*;
