//! Optimization advisor subsystem
//!
//! Bundles explain analysis with index and collection metadata for one
//! query. The document source is passed in per call; the advisor holds no
//! connection state.

mod advisor;
mod bundle;
mod errors;

pub use advisor::OptimizationAdvisor;
pub use bundle::DiagnosticBundle;
pub use errors::{AdvisorError, AdvisorResult};
