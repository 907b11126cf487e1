//! Status payload and poll loop types

use crate::types::ClusterMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint that both triggers (POST) and reports (GET) the status job
pub const STATUS_PATH: &str = "/api/v1/ocp-shared-clusters/status";

/// Discriminant value reported once the computation is done
pub const SUCCESS_STATUS: &str = "success";

/// Response of the status endpoint
///
/// Pending payloads usually carry no body, so both levels default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusPayload {
    /// Job status discriminant ("pending", "success", ...)
    #[serde(default)]
    pub status: String,
    /// Result body, present once the job succeeded
    #[serde(default)]
    pub body: Option<StatusBody>,
}

/// Body of a status payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusBody {
    /// Cluster identifier -> nested cluster record
    #[serde(default)]
    pub clusters: Option<ClusterMap>,
}

impl StatusPayload {
    /// Build a successful payload around a cluster map
    pub fn success(clusters: ClusterMap) -> Self {
        Self {
            status: SUCCESS_STATUS.to_string(),
            body: Some(StatusBody {
                clusters: Some(clusters),
            }),
        }
    }

    /// Classify the status discriminant
    pub fn job_status(&self, success_value: &str) -> JobStatus {
        if self.status == success_value {
            JobStatus::Success
        } else if self.status.eq_ignore_ascii_case("pending") {
            JobStatus::Pending
        } else {
            JobStatus::Other(self.status.clone())
        }
    }

    /// Borrow the cluster map (empty if the payload has none)
    pub fn clusters(&self) -> Option<&ClusterMap> {
        self.body.as_ref().and_then(|b| b.clusters.as_ref())
    }

    /// Take the cluster map out of the payload
    pub fn into_clusters(self) -> ClusterMap {
        self.body.and_then(|b| b.clusters).unwrap_or_default()
    }
}

/// Status discriminant of one poll response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Still computing
    Pending,
    /// Finished, body is ready
    Success,
    /// Anything else the API reports
    Other(String),
}

/// State of the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    /// Nothing sent yet
    #[default]
    NotStarted,
    /// Trigger POST sent
    Triggered,
    /// Inside the loop, `attempt` GETs issued so far
    Polling {
        /// Attempts made so far
        attempt: u32,
    },
    /// A GET reported success
    Succeeded {
        /// Attempts it took
        attempts: u32,
    },
    /// The attempt budget ran out
    TimedOut {
        /// Attempts made
        attempts: u32,
    },
}

impl PollState {
    /// Check if the loop is finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::TimedOut { .. })
    }

    /// Check if the loop finished successfully
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Poll loop configuration
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Endpoint path for the trigger POST
    pub trigger_path: String,
    /// Endpoint path for the status GET
    pub status_path: String,
    /// Maximum number of status GETs
    pub max_attempts: u32,
    /// Wait before each status GET
    pub interval: Duration,
    /// Status value that ends the loop
    pub success_value: String,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            trigger_path: STATUS_PATH.to_string(),
            status_path: STATUS_PATH.to_string(),
            max_attempts: 10,
            interval: Duration::from_secs(2),
            success_value: SUCCESS_STATUS.to_string(),
        }
    }
}

impl PollConfig {
    /// Create a config with the default endpoints and budget
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt budget
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the wait before each attempt
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the trigger and status endpoints
    #[must_use]
    pub fn with_paths(mut self, trigger_path: impl Into<String>, status_path: impl Into<String>) -> Self {
        self.trigger_path = trigger_path.into();
        self.status_path = status_path.into();
        self
    }

    /// Set the status value that counts as success
    #[must_use]
    pub fn with_success_value(mut self, value: impl Into<String>) -> Self {
        self.success_value = value.into();
        self
    }
}
