pub mod parser;
pub mod snapshot_writer;

pub use parser::{extract_signal, ChannelSignal};
pub use snapshot_writer::{entry_from_signal, message_id, SnapshotWriter};
