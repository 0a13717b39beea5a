//! The bipartite cuckoo graph: edges, the keyed edge generator, and proof
//! verification.
//!
//! - `edge`: node sides, parity-tagged node keys, and the [`EdgeGenerator`] contract
//! - `siphash`: the header-keyed SipHash-2-4 generator
//! - `verify`: replaying a proof against a generator

pub mod edge;
pub mod siphash;
pub mod verify;

pub use edge::{node_key, split_key, Edge, EdgeGenerator, Side};
pub use siphash::{SipEdges, SipKeys};
pub use verify::verify;
