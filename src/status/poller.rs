//! Status poller
//!
//! Triggers the asynchronous status computation and polls its result.

use super::types::{JobStatus, PollConfig, PollState, StatusPayload};
use crate::decode;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use reqwest::Method;
use tracing::{debug, info, warn};

/// Drives one trigger-then-poll cycle against the status API
///
/// The client is expected to carry the access token. Every request is
/// sequential: one POST, then at most `max_attempts` GETs.
pub struct StatusPoller<'a> {
    client: &'a HttpClient,
    config: PollConfig,
    state: PollState,
}

impl<'a> StatusPoller<'a> {
    /// Create a poller with the default configuration
    pub fn new(client: &'a HttpClient) -> Self {
        Self::with_config(client, PollConfig::default())
    }

    /// Create a poller with a custom configuration
    pub fn with_config(client: &'a HttpClient, config: PollConfig) -> Self {
        Self {
            client,
            config,
            state: PollState::NotStarted,
        }
    }

    /// Current state of the loop
    pub fn state(&self) -> PollState {
        self.state
    }

    /// Poll configuration
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Trigger the computation, then poll until it succeeds
    pub async fn run(&mut self) -> Result<StatusPayload> {
        self.trigger().await?;
        self.poll().await
    }

    /// Send the trigger POST
    ///
    /// The response is ignored; only a transport failure is an error.
    pub async fn trigger(&mut self) -> Result<()> {
        info!("Initiating status request");

        let response = self
            .client
            .send(Method::POST, &self.config.trigger_path, RequestConfig::new())
            .await
            .map_err(|e| Error::trigger(e.to_string()))?;

        debug!("Trigger answered {}", response.status().as_u16());
        self.set_state(PollState::Triggered);
        Ok(())
    }

    /// Poll the status endpoint until it reports success
    ///
    /// The HTTP status of each answer is not inspected: any body that decodes
    /// as a status payload counts as an attempt. Transport failures and
    /// undecodable bodies end the loop.
    pub async fn poll(&mut self) -> Result<StatusPayload> {
        if self.state == PollState::NotStarted {
            return Err(Error::trigger("status computation was not triggered"));
        }

        let max = self.config.max_attempts;
        self.set_state(PollState::Polling { attempt: 0 });

        for attempt in 1..=max {
            info!("Polling for status (attempt {attempt}/{max})");
            tokio::time::sleep(self.config.interval).await;

            let response = self
                .client
                .send(Method::GET, &self.config.status_path, RequestConfig::new())
                .await?;
            if !response.status().is_success() {
                debug!("Status endpoint answered {}", response.status().as_u16());
            }
            let payload: StatusPayload = decode::read_json(response, "status payload").await?;
            self.set_state(PollState::Polling { attempt });

            match payload.job_status(&self.config.success_value) {
                JobStatus::Success => {
                    self.set_state(PollState::Succeeded { attempts: attempt });
                    return Ok(payload);
                }
                JobStatus::Pending => debug!("Status computation still pending"),
                JobStatus::Other(status) => {
                    warn!("Status computation reported '{status}', polling again");
                }
            }
        }

        self.set_state(PollState::TimedOut { attempts: max });
        Err(Error::PollTimeout { attempts: max })
    }

    fn set_state(&mut self, state: PollState) {
        if state != self.state {
            debug!("Poll state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}
