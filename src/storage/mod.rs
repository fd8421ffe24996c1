//! Entity storage for the hub
//!
//! ## Design
//!
//! - **Plain data**: [`MemoryStore`] holds one [`Table`] per entity type and
//!   has no internal locking
//! - **Single owner**: the store actor (`actors::store`) owns the store and
//!   serializes every read and write
//! - **Uniform tables**: create / get / list / update / delete behave the same
//!   for every entity type
//!
//! ## Usage
//!
//! ```
//! use alertify::storage::{MemoryStore, schema::NewSite};
//!
//! let mut store = MemoryStore::new();
//! let site = store.create_site(NewSite::new("Shop", "https://shop.test"));
//! assert_eq!(site.id, 1);
//! ```

pub mod error;
pub mod memory;
pub mod schema;

pub use error::{StorageError, StorageResult};
pub use memory::{MemoryStore, StoreCounts, Table};
