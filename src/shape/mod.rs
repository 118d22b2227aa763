//! Query shape subsystem
//!
//! Groups structurally similar filters by which fields they test for
//! equality and which for range.

mod errors;
mod normalizer;

pub(crate) use errors::json_type_name;
pub use errors::{ShapeError, ShapeResult};
pub use normalizer::{normalize_filter, normalize_shape, query_shape, QueryShape, RangeOperator};
