pub mod snapshot_source;

pub use snapshot_source::{
    create_snapshot_source, FileSnapshotSource, HttpSnapshotSource, SnapshotSource,
};
