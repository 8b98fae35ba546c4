//! Storage layer: the vector index and its on-disk snapshot.
//!
//! # Architecture
//!
//! - **VectorIndex**: flat exact k-NN over `f32` vectors
//! - **VectorSearch**: read-only query contract used for serving
//! - **snapshot**: persist/load to a directory of JSON files
//! - **IndexHandle**: set-once shared reference for the server
//!
//! # Snapshot Structure
//!
//! ```text
//! {index_path}/
//! ├── meta.json     # format version, metric, dimension, counts
//! └── index.json    # entries
//! ```

mod handle;
pub mod snapshot;
mod vector_index;

pub use handle::IndexHandle;
pub use snapshot::{delete_snapshot, read_meta, snapshot_exists, SnapshotMeta};
pub use vector_index::{IndexEntry, Metric, VectorIndex, VectorSearch};
