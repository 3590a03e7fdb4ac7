pub mod error;
pub mod handle;
pub mod loader;
pub mod record_store;
