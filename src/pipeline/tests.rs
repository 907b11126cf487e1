//! Tests for the pipeline module

use super::*;
use crate::config::{ADMIN_TOKEN, API_ROUTE, POLL_INTERVAL_SECS, POLL_MAX_ATTEMPTS, REPORT_MODE};
use crate::error::Error;
use crate::status::STATUS_PATH;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingSink {
    tables: Mutex<Vec<Table>>,
}

impl RecordingSink {
    fn tables(&self) -> Vec<Table> {
        self.tables.lock().unwrap().clone()
    }
}

#[async_trait]
impl TableSink for RecordingSink {
    async fn replace(&self, table: &Table) -> Result<()> {
        self.tables.lock().unwrap().push(table.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

fn config_for(server: &MockServer, extra: &[(&str, &str)]) -> ReportConfig {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert(API_ROUTE.to_string(), server.uri());
    vars.insert(ADMIN_TOKEN.to_string(), "admin-secret".to_string());
    vars.insert(POLL_INTERVAL_SECS.to_string(), "0".to_string());
    for (k, v) in extra {
        vars.insert((*k).to_string(), (*v).to_string());
    }
    ReportConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/login"))
        .and(header("Authorization", "Bearer admin-secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "session-token"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_trigger(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(STATUS_PATH))
        .and(header("Authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(server)
        .await;
}

fn success_payload() -> serde_json::Value {
    json!({
        "status": "success",
        "body": {
            "clusters": {
                "c2": {"ocp_version": "4.15", "cloud": "gcp"},
                "c1": {"ocp_version": "4.14", "node_summary": {"ready": 3, "total": 3}}
            }
        }
    })
}

#[tokio::test]
async fn test_pipeline_writes_dynamic_table() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_trigger(&server).await;

    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .and(header("Authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_payload()))
        .mount(&server)
        .await;

    let sink = RecordingSink::default();
    let mut pipeline = ReportPipeline::new(config_for(&server, &[]));
    let stats = pipeline.run(&sink).await.unwrap();

    assert_eq!(stats.clusters, 2);
    assert_eq!(stats.columns, 5);
    assert_eq!(stats.poll_attempts, 2);
    assert_eq!(pipeline.stats(), &stats);

    let tables = sink.tables();
    assert_eq!(tables.len(), 1);
    assert_eq!(
        tables[0].to_grid(),
        vec![
            vec!["cloud", "cluster_name", "node_summary_ready", "node_summary_total", "ocp_version"],
            vec!["", "c1", "3", "3", "4.14"],
            vec!["gcp", "c2", "", "", "4.15"],
        ]
        .into_iter()
        .map(|row| row.into_iter().map(String::from).collect::<Vec<_>>())
        .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_pipeline_summary_mode() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_trigger(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_payload()))
        .mount(&server)
        .await;

    let sink = RecordingSink::default();
    let mut pipeline = ReportPipeline::new(config_for(&server, &[(REPORT_MODE, "summary")]));
    let stats = pipeline.run(&sink).await.unwrap();

    assert_eq!(stats.columns, 8);
    assert_eq!(stats.poll_attempts, 1);
    let table = &sink.tables()[0];
    assert_eq!(table.cell(0, "Cluster Name"), Some("c1"));
    assert_eq!(table.cell(0, "Ready Nodes"), Some("3"));
    assert_eq!(table.cell(1, "Cloud"), Some("gcp"));
}

#[tokio::test]
async fn test_pipeline_login_failure_stops_before_trigger() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad admin token"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let sink = RecordingSink::default();
    let mut pipeline = ReportPipeline::new(config_for(&server, &[]));
    let err = pipeline.run(&sink).await.unwrap_err();

    assert!(matches!(err, Error::Auth { .. }), "got {err:?}");
    assert!(sink.tables().is_empty());
}

#[tokio::test]
async fn test_pipeline_timeout_leaves_sink_untouched() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_trigger(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .expect(3)
        .mount(&server)
        .await;

    let sink = RecordingSink::default();
    let mut pipeline = ReportPipeline::new(config_for(&server, &[(POLL_MAX_ATTEMPTS, "3")]));
    let err = pipeline.run(&sink).await.unwrap_err();

    assert!(matches!(err, Error::PollTimeout { attempts: 3 }));
    assert!(sink.tables().is_empty());
}

#[tokio::test]
async fn test_pipeline_empty_cluster_map() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_trigger(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;

    let sink = RecordingSink::default();
    let mut pipeline = ReportPipeline::new(config_for(&server, &[]));
    let stats = pipeline.run(&sink).await.unwrap();

    assert_eq!(stats.clusters, 0);
    assert_eq!(stats.columns, 0);
    assert!(sink.tables()[0].is_empty());
}

#[test]
fn test_pipeline_debug_hides_token() {
    let mut vars = HashMap::new();
    vars.insert(API_ROUTE, "https://status.example.com");
    vars.insert(ADMIN_TOKEN, "admin-secret");
    let config = ReportConfig::from_lookup(|key| vars.get(key).map(ToString::to_string)).unwrap();

    let debug = format!("{:?}", ReportPipeline::new(config));
    assert!(debug.contains("status.example.com"));
    assert!(!debug.contains("admin-secret"));
}
