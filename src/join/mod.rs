//! Cross-collection join subsystem
//!
//! An application-level hash join: right documents are indexed by a
//! top-level foreign field, then each left document is enriched from the
//! index, either per element of a nested array or once at a scalar path.
//!
//! `CrossCollectionQuery` adds fetching through a `DocumentSource`.

mod engine;
mod errors;
mod index;
mod path;
mod query;

pub use engine::{join_documents, JoinEngine, JoinSpec};
pub use errors::{JoinError, JoinResult, JoinSide};
pub use index::{JoinIndex, JoinKey};
pub use path::FieldPath;
pub use query::{CrossCollectionQuery, CrossCollectionRequest, JoinOutput};
