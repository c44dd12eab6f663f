//! # vertmatch
//!
//! `vertmatch` snaps a group of 3D points onto the closest points of one or more
//! reference groups, for use in Rust as well as compiled to WebAssembly (WASM).
//! A typical use is fixing up the vertices of a mesh so they land exactly on the
//! vertices of another mesh, or making one half of a symmetric model match the other.
//!
//! ## Features
//!
//! - **Exact lookups**: A balanced k-d tree answers every query with the true
//!   closest reference point under squared Euclidean distance.
//! - **Mirroring**: Reference points can be reflected across `x = 0`, in which case only
//!   targets on the negative-x side are moved.
//! - **Undo / Redo**: Every match keeps a snapshot of the original positions.
//! - **Parallel**: Lookups run on the rayon thread pool, also in the browser via `wasm-bindgen-rayon`.
//!
//! ## Main Interface
//!
//! [`MatchRequest`] runs a single match and yields a reversible [`MatchResult`].
//! [`VertMatch`] wraps that into an undoable command over any host implementing [`PointGroups`].
//! [`KdTree`] can also be used on its own.

mod command;
mod error;
mod kdtree;
mod matching;
mod options;
pub mod point;
mod wasm;

pub use command::MatchSummary;
pub use command::PointGroups;
pub use command::VertMatch;
pub use error::MatchError;
pub use kdtree::KdTree;
pub use matching::MatchRequest;
pub use matching::MatchResult;
pub use options::MatchOptions;
pub use options::LARGE_INPUT_THRESHOLD;
pub use point::BoundingBox;
pub use point::Point3;
pub use wasm::KdTree3D;
pub use wasm::VertMatch3D;
