//! Storage Adapters
//!
//! Implementations of the SessionStore port.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - Process-local sessions with idle expiry and an LRU cap
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemorySessionStore;
//!
//! let store = InMemorySessionStore::new()
//!     .with_idle_ttl(Duration::from_secs(7200))
//!     .with_max_sessions(10_000);
//! ```

mod in_memory_session_store;

pub use in_memory_session_store::{InMemorySessionStore, DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS};
