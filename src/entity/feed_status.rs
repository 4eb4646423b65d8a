use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the most recent reconcile tick got its tokens from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeedStatus {
    Live,
    #[default]
    Simulated,
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Live => write!(f, "● Live Feed (Backend)"),
            Self::Simulated => write!(f, "● Live Feed (Simulation)"),
        }
    }
}
