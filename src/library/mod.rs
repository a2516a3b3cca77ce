//! Library sync — read-only reconciliation of the remote voice and audio
//! catalogs with the session's caches.

pub mod sync;

pub use sync::{Catalog, LibrarySync};
