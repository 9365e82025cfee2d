// ORM Schema
pub mod schema;

// ORM Models
pub mod bookmark;
pub mod quick_view;
pub mod user;

// Storage backends
pub mod memory;
pub mod pg;
pub mod store;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{Storage, Store};

// Driver
pub mod connection;
