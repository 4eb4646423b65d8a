pub mod tracker_service;

pub use tracker_service::TrackerService;
