//! Domain logic for water-well queries
//!
//! - `wells` - Filter compilation, joins, pagination and retrieval
//! - `datasets` - The shipped jurisdiction configurations

pub mod datasets;
pub mod wells;

pub use datasets::{DatasetRegistry, SLUGS};
pub use wells::{ClientRequest, DecodeError, Retriever, WellsResponse};
