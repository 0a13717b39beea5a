//! Fixed-size, reset-per-partition structures shared by the sweep workers.
//!
//! - `twice_set`: 2-bit "seen once / seen twice" occupancy bitmap
//! - `ancestry`: open-addressed node map, latest value per key
//! - `adjacency`: open-addressed node multimap, every value per key

pub mod adjacency;
pub mod ancestry;
pub mod twice_set;

pub use adjacency::AdjacencyTable;
pub use ancestry::{AncestryTable, InsertOutcome, Slot};
pub use twice_set::TwiceSet;
