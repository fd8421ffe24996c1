//! Actor-based store access
//!
//! The hub keeps its data in a plain in-memory store owned by a single actor
//! task. Request handlers talk to it through a cloneable handle.
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: the actor has an mpsc command channel
//! 2. **Request/Response**: every command carries a oneshot reply channel
//! 3. **Events**: alert fan-out does not go through the actor, see `broadcast`

pub mod messages;
pub mod store;

pub use store::{StoreActor, StoreHandle};
