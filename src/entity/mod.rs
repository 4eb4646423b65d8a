mod feed_status;
mod snapshot_entry;
mod token;
mod token_price;
mod tracker_error;

pub use feed_status::FeedStatus;
pub use snapshot_entry::SnapshotEntry;
pub use token::Token;
pub use token_price::TokenPrice;
pub use tracker_error::TrackerError;
