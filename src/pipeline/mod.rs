//! Report pipeline
//!
//! Runs one report end to end:
//!
//! ```text
//! admin login -> trigger -> poll until success -> flatten -> table -> sink
//! ```
//!
//! Every step is sequential and every failure aborts the run. The sink is
//! only touched once a complete table exists.

mod types;

pub use types::PipelineStats;

use crate::auth::{AccessToken, AuthConfig, Authenticator};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::sink::TableSink;
use crate::status::{PollState, StatusPoller};
use crate::table::{build_report, Table};
use crate::types::ClusterMap;
use std::time::Instant;
use tracing::{info, warn};

/// Orchestrates a single report run
pub struct ReportPipeline {
    config: ReportConfig,
    stats: PipelineStats,
}

impl ReportPipeline {
    /// Create a pipeline for the given configuration
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            stats: PipelineStats::default(),
        }
    }

    /// Pipeline configuration
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Statistics of the last run
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Exchange the admin credential for an access token
    pub async fn authenticate(&self, client: &HttpClient) -> Result<AccessToken> {
        let login = Authenticator::with_client(
            AuthConfig::admin_login(self.config.login_url(), self.config.admin_token.clone()),
            client.inner().clone(),
        );
        let token = login.access_token().await?;
        info!("Authenticated against status API");
        Ok(token)
    }

    /// Log in, trigger the status computation and poll until it succeeds
    pub async fn fetch_clusters(&mut self) -> Result<ClusterMap> {
        let mut client = HttpClient::with_config(self.config.http_config())?;
        let token = self.authenticate(&client).await?;
        client.set_authenticator(AuthConfig::bearer(token));

        let mut poller = StatusPoller::with_config(&client, self.config.poll_config());
        let payload = poller.run().await?;
        if let PollState::Succeeded { attempts } = poller.state() {
            self.stats.poll_attempts = attempts;
        }

        let clusters = payload.into_clusters();
        self.stats.clusters = clusters.len();
        if clusters.is_empty() {
            warn!("Status payload contains no clusters");
        }
        Ok(clusters)
    }

    /// Fetch the clusters and assemble the report table
    pub async fn build_table(&mut self) -> Result<Table> {
        let clusters = self.fetch_clusters().await?;
        let table = build_report(&clusters, self.config.mode)?;
        self.stats.columns = table.width();
        info!(
            mode = %self.config.mode,
            rows = table.len(),
            columns = table.width(),
            "Built report table"
        );
        Ok(table)
    }

    /// Run the whole pipeline and hand the table to `sink`
    pub async fn run(&mut self, sink: &dyn TableSink) -> Result<PipelineStats> {
        let start = Instant::now();
        self.stats = PipelineStats::new();

        let table = self.build_table().await?;
        info!("Writing report to {}", sink.describe());
        sink.replace(&table).await?;

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            clusters = self.stats.clusters,
            columns = self.stats.columns,
            attempts = self.stats.poll_attempts,
            duration_ms = self.stats.duration_ms,
            "Report complete"
        );
        Ok(self.stats.clone())
    }
}

impl std::fmt::Debug for ReportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportPipeline")
            .field("api_route", &self.config.api_route)
            .field("mode", &self.config.mode)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
