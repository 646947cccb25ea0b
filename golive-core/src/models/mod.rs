pub mod stream;

pub use stream::{AccountSnapshot, SnapshotSet, StreamStatus};
