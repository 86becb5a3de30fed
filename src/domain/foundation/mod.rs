//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the trip concierge domain.

mod category;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use category::Category;
pub use errors::ValidationError;
pub use ids::{SessionId, MAX_SESSION_ID_LEN};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
