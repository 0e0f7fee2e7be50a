//! Storage abstractions for the service layer
//!
//! A collection is one JSON array persisted as a whole document. Backends move
//! raw text; `CollectionStore` owns decoding, encoding and the write policy.

use std::fmt;

pub mod backend;
pub mod collection_store;

pub use backend::{CollectionBackend, FileBackend};
pub use collection_store::CollectionStore;
pub use configs::WritePolicy;

/// The two persisted collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Menu,
    Orders,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Menu, Collection::Orders];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Menu => "menu",
            Collection::Orders => "orders",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
