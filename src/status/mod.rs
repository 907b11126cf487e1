//! Status module
//!
//! Triggers the asynchronous cluster status computation and polls for its
//! result.
//!
//! # State machine
//!
//! ```text
//! NotStarted --POST--> Triggered --> Polling --"success"--> Succeeded
//!                                       |
//!                                       +--budget spent--> TimedOut
//! ```

mod poller;
mod types;

pub use poller::StatusPoller;
pub use types::{
    JobStatus, PollConfig, PollState, StatusBody, StatusPayload, STATUS_PATH, SUCCESS_STATUS,
};
