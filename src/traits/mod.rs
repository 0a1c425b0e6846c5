//! Trait definitions for Foreman operations.
//!
//! [`Resource`] describes where an entity lives in the API. The operation
//! traits carry default implementations over the client core; each entity
//! opts into the operations its endpoint supports and overrides where the
//! endpoint needs special handling.

mod create;
mod delete;
mod get;
mod resource;
mod search;
mod update;

pub use create::{create_record, Create};
pub use delete::Delete;
pub use get::Get;
pub use resource::Resource;
pub use search::Search;
pub use update::{update_record, Update};
