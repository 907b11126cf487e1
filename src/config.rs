//! Runtime configuration
//!
//! Settings come from environment variables, optionally overridden by CLI
//! flags. An empty variable counts as unset.

use crate::auth::{AccessToken, LOGIN_PATH};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, DEFAULT_TIMEOUT};
use crate::status::PollConfig;
use crate::types::{OptionStringExt, ReportMode};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

// ============================================================================
// Variable names and defaults
// ============================================================================

/// Status API base URL
pub const API_ROUTE: &str = "API_ROUTE";
/// Admin credential exchanged at the login endpoint
pub const ADMIN_TOKEN: &str = "ADMIN_TOKEN";
/// Destination spreadsheet
pub const SPREADSHEET_ID: &str = "SPREADSHEET_ID";
/// Service-account key file for the Sheets API
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// Range cleared and rewritten on every run
pub const SHEET_RANGE: &str = "SHEET_RANGE";
/// Status GETs made before giving up
pub const POLL_MAX_ATTEMPTS: &str = "POLL_MAX_ATTEMPTS";
/// Seconds slept before each status GET
pub const POLL_INTERVAL_SECS: &str = "POLL_INTERVAL_SECS";
/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
/// `dynamic` or `summary`
pub const REPORT_MODE: &str = "REPORT_MODE";

/// Sheet range used when `SHEET_RANGE` is unset
pub const DEFAULT_SHEET_RANGE: &str = "full_data!A1:Z";
/// Attempt budget used when `POLL_MAX_ATTEMPTS` is unset
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 10;
/// Interval used when `POLL_INTERVAL_SECS` is unset
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

// ============================================================================
// Report config
// ============================================================================

/// Everything one report run needs
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Status API base URL, without a trailing slash
    pub api_route: String,
    /// Credential for the login endpoint, redacted in `Debug`
    pub admin_token: AccessToken,
    /// Destination spreadsheet, needed only by `run`
    pub spreadsheet_id: Option<String>,
    /// Service-account key file, needed only by `run`
    pub credentials_file: Option<PathBuf>,
    /// Range cleared and rewritten in the spreadsheet
    pub sheet_range: String,
    /// Status GETs made before timing out (at least 1)
    pub poll_max_attempts: u32,
    /// Sleep before each status GET
    pub poll_interval: Duration,
    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
    /// Table shape
    pub mode: ReportMode,
}

/// Where `run` writes the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTarget {
    /// Spreadsheet identifier from its URL
    pub spreadsheet_id: String,
    /// Service-account key file
    pub credentials_file: PathBuf,
    /// A1 range to replace
    pub range: String,
}

impl ReportConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from the process environment with flag overrides applied first
    pub fn from_env_with(overrides: &ConfigOverrides) -> Result<Self> {
        Self::from_lookup(|key| overrides.get(key).or_else(|| std::env::var(key).ok()))
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).none_if_empty();

        let api_route = get(API_ROUTE).ok_or_else(|| Error::missing_field(API_ROUTE))?;
        let api_route = parse_base_url(API_ROUTE, &api_route)?;
        let admin_token = get(ADMIN_TOKEN).ok_or_else(|| Error::missing_field(ADMIN_TOKEN))?;

        let poll_max_attempts =
            parse_or(POLL_MAX_ATTEMPTS, get(POLL_MAX_ATTEMPTS), DEFAULT_POLL_MAX_ATTEMPTS)?;
        if poll_max_attempts == 0 {
            return Err(Error::invalid_value(POLL_MAX_ATTEMPTS, "must be at least 1"));
        }
        let poll_interval_secs =
            parse_or(POLL_INTERVAL_SECS, get(POLL_INTERVAL_SECS), DEFAULT_POLL_INTERVAL_SECS)?;
        let request_timeout_secs = parse_or(
            REQUEST_TIMEOUT_SECS,
            get(REQUEST_TIMEOUT_SECS),
            DEFAULT_TIMEOUT.as_secs(),
        )?;
        if request_timeout_secs == 0 {
            return Err(Error::invalid_value(REQUEST_TIMEOUT_SECS, "must be at least 1"));
        }
        let mode = match get(REPORT_MODE) {
            Some(raw) => ReportMode::from_str(&raw)
                .map_err(|message| Error::invalid_value(REPORT_MODE, message))?,
            None => ReportMode::default(),
        };

        Ok(Self {
            api_route,
            admin_token: AccessToken::new(admin_token),
            spreadsheet_id: get(SPREADSHEET_ID),
            credentials_file: get(GOOGLE_APPLICATION_CREDENTIALS).map(PathBuf::from),
            sheet_range: get(SHEET_RANGE).unwrap_or_else(|| DEFAULT_SHEET_RANGE.to_string()),
            poll_max_attempts,
            poll_interval: Duration::from_secs(poll_interval_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
            mode,
        })
    }

    /// Spreadsheet settings, required only when writing to Sheets
    pub fn sheet_target(&self) -> Result<SheetTarget> {
        let spreadsheet_id = self
            .spreadsheet_id
            .clone()
            .ok_or_else(|| Error::missing_field(SPREADSHEET_ID))?;
        let credentials_file = self
            .credentials_file
            .clone()
            .ok_or_else(|| Error::missing_field(GOOGLE_APPLICATION_CREDENTIALS))?;

        Ok(SheetTarget {
            spreadsheet_id,
            credentials_file,
            range: self.sheet_range.clone(),
        })
    }

    /// Full URL of the admin login endpoint
    pub fn login_url(&self) -> String {
        format!("{}{LOGIN_PATH}", self.api_route)
    }

    /// HTTP client settings for the status API
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .base_url(&self.api_route)
            .timeout(self.request_timeout)
            .build()
    }

    /// Poll loop settings
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new()
            .with_max_attempts(self.poll_max_attempts)
            .with_interval(self.poll_interval)
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Values given on the command line, keyed by variable name
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    values: HashMap<&'static str, String>,
}

impl ConfigOverrides {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `key` when `value` is present
    #[must_use]
    pub fn set(mut self, key: &'static str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.values.insert(key, value.to_string());
        }
        self
    }

    /// Overridden value for `key`, if any
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// Whether no flag overrode anything
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

fn parse_base_url(field: &str, raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|e| Error::invalid_value(field, format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            field,
            format!("{raw}: scheme must be http or https"),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_or<T>(field: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::invalid_value(field, format!("{raw:?}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        (API_ROUTE, "https://status.example.com/"),
        (ADMIN_TOKEN, "admin-secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = ReportConfig::from_lookup(lookup_from(BASE)).unwrap();

        assert_eq!(config.api_route, "https://status.example.com");
        assert_eq!(config.admin_token.secret(), "admin-secret");
        assert_eq!(config.sheet_range, DEFAULT_SHEET_RANGE);
        assert_eq!(config.poll_max_attempts, 10);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.mode, ReportMode::Dynamic);
        assert_eq!(config.spreadsheet_id, None);
        assert_eq!(config.credentials_file, None);
        assert_eq!(
            config.login_url(),
            "https://status.example.com/api/v1/login"
        );
    }

    #[test]
    fn test_all_values() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            (SPREADSHEET_ID, "sheet-123"),
            (GOOGLE_APPLICATION_CREDENTIALS, "/etc/report/sa.json"),
            (SHEET_RANGE, "overview!A1:H"),
            (POLL_MAX_ATTEMPTS, "30"),
            (POLL_INTERVAL_SECS, "5"),
            (REQUEST_TIMEOUT_SECS, "20"),
            (REPORT_MODE, "summary"),
        ]);
        let config = ReportConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(
            config.sheet_target().unwrap(),
            SheetTarget {
                spreadsheet_id: "sheet-123".to_string(),
                credentials_file: PathBuf::from("/etc/report/sa.json"),
                range: "overview!A1:H".to_string(),
            }
        );
        assert_eq!(config.mode, ReportMode::Summary);

        let poll = config.poll_config();
        assert_eq!(poll.max_attempts, 30);
        assert_eq!(poll.interval, Duration::from_secs(5));

        let http = config.http_config();
        assert_eq!(http.base_url.as_deref(), Some("https://status.example.com"));
        assert_eq!(http.timeout, Duration::from_secs(20));
    }

    #[test_case(API_ROUTE ; "api route")]
    #[test_case(ADMIN_TOKEN ; "admin token")]
    fn test_missing_required(field: &str) {
        let pairs: Vec<_> = BASE.iter().copied().filter(|(k, _)| *k != field).collect();
        let err = ReportConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
        assert!(err.to_string().contains(field));
    }

    #[test]
    fn test_empty_counts_as_missing() {
        let pairs = [(API_ROUTE, "https://status.example.com"), (ADMIN_TOKEN, "  ")];
        let err = ReportConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));

        let mut pairs = BASE.to_vec();
        pairs.push((POLL_MAX_ATTEMPTS, ""));
        pairs.push((SPREADSHEET_ID, ""));
        let config = ReportConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.poll_max_attempts, DEFAULT_POLL_MAX_ATTEMPTS);
        assert_eq!(config.spreadsheet_id, None);
    }

    #[test_case(API_ROUTE, "not a url" ; "unparseable url")]
    #[test_case(API_ROUTE, "ftp://status.example.com" ; "wrong scheme")]
    #[test_case(POLL_MAX_ATTEMPTS, "ten" ; "attempts not a number")]
    #[test_case(POLL_MAX_ATTEMPTS, "-1" ; "negative attempts")]
    #[test_case(POLL_MAX_ATTEMPTS, "0" ; "zero attempts")]
    #[test_case(POLL_INTERVAL_SECS, "1.5" ; "fractional interval")]
    #[test_case(REQUEST_TIMEOUT_SECS, "0" ; "zero timeout")]
    #[test_case(REPORT_MODE, "wide" ; "unknown mode")]
    fn test_invalid_value(field: &str, value: &str) {
        let mut pairs: Vec<_> = BASE.iter().copied().filter(|(k, _)| *k != field).collect();
        pairs.push((field, value));

        let err = ReportConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(
            matches!(err, Error::InvalidConfigValue { .. }),
            "expected invalid value for {field}, got {err:?}"
        );
        assert!(err.is_config());
    }

    #[test]
    fn test_sheet_target_requires_spreadsheet_settings() {
        let config = ReportConfig::from_lookup(lookup_from(BASE)).unwrap();
        let err = config.sheet_target().unwrap_err();
        assert!(err.to_string().contains(SPREADSHEET_ID));

        let mut pairs = BASE.to_vec();
        pairs.push((SPREADSHEET_ID, "sheet-123"));
        let config = ReportConfig::from_lookup(lookup_from(&pairs)).unwrap();
        let err = config.sheet_target().unwrap_err();
        assert!(err.to_string().contains(GOOGLE_APPLICATION_CREDENTIALS));
    }

    #[test]
    fn test_overrides_win() {
        let overrides = ConfigOverrides::new()
            .set(API_ROUTE, Some("http://localhost:8080"))
            .set(POLL_MAX_ATTEMPTS, Some(3))
            .set(SPREADSHEET_ID, None::<String>);
        assert!(!overrides.is_empty());

        let env = lookup_from(BASE);
        let config =
            ReportConfig::from_lookup(|key| overrides.get(key).or_else(|| env(key))).unwrap();

        assert_eq!(config.api_route, "http://localhost:8080");
        assert_eq!(config.poll_max_attempts, 3);
        assert_eq!(config.admin_token.secret(), "admin-secret");
    }

    #[test]
    fn test_debug_redacts_admin_token() {
        let config = ReportConfig::from_lookup(lookup_from(BASE)).unwrap();
        assert!(!format!("{config:?}").contains("admin-secret"));
    }
}
