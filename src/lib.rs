//! Minimal HTTP CRUD service for items kept in a JSON file.
//!
//! Every change to the primary file is copied, whole, to a mirror file.
//! Use [`ItemStore`] directly as a library, or run the `items-sync` binary
//! to serve it over HTTP.
//!
//! ```rust,no_run
//! use items_sync::{ItemFields, ItemStore};
//!
//! let store = ItemStore::open("data.json", "parsed_output.json").unwrap();
//! let item = store.create(ItemFields::new("Item1", "First item", 10.0)).unwrap();
//! assert_eq!(store.get(item.id).unwrap(), item);
//! ```
//!
//! **Single-process only.** Writers inside one process are serialized; two
//! processes sharing the files will clobber each other.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod persist;
pub mod policy;
pub mod serializer;
pub mod store;

pub use config::ServerConfig;
pub use error::{Error, FieldError, Result};
pub use model::{Item, ItemFields};
pub use policy::IdPolicy;
pub use store::{ItemStore, ItemStoreBuilder};
