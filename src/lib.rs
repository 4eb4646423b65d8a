pub mod dexscreener;
pub mod di;
pub mod entity;
pub mod feed;
pub mod interactor;
pub mod presenter;
pub mod services;
pub mod settings;
pub mod signals;
pub mod utils;
pub mod view;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used items
pub use dexscreener::*;
pub use di::*;
pub use entity::*;
pub use feed::*;
pub use interactor::*;
pub use presenter::*;
pub use services::*;
pub use settings::TrackerSettings;
pub use utils::*;
pub use view::*;
