pub mod tracker_presenter;

pub use tracker_presenter::{TrackerPresenter, TrackerPresenterImpl};
