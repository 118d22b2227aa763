//! Document source subsystem
//!
//! The database driver, explain generation and statistics retrieval live
//! outside docscope. They are reached only through the `DocumentSource`
//! trait, passed into every operation as an explicit handle.
//!
//! `SnapshotSource` is an in-memory implementation over captured JSON, used
//! by the CLI and tests.

mod errors;
mod filter;
mod request;
mod snapshot;

pub use errors::{SourceCall, SourceError, SourceResult};
pub use filter::{lookup_path, FilterMatcher};
pub use request::{FetchRequest, Namespace, QueryRequest, QueryType};
pub use snapshot::{NamespaceSnapshot, SnapshotSource};

use serde_json::Value;

/// External collaborator that runs explains, reports metadata and fetches
/// documents. Implementations may block; docscope never calls them
/// concurrently.
pub trait DocumentSource {
    /// Explain `request` against `namespace` at `executionStats` verbosity
    fn explain(&self, namespace: &Namespace, request: &QueryRequest) -> SourceResult<Value>;

    /// List index descriptors
    fn list_indexes(&self, namespace: &Namespace) -> SourceResult<Vec<Value>>;

    /// Per-index usage records
    fn index_stats(&self, namespace: &Namespace) -> SourceResult<Vec<Value>>;

    /// Collection size and storage record
    fn collection_stats(&self, namespace: &Namespace) -> SourceResult<Value>;

    /// Fetch documents matching a filter
    fn fetch(&self, namespace: &Namespace, request: &FetchRequest) -> SourceResult<Vec<Value>>;
}
