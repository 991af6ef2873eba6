/// HTTP client for the trends backend.
///
/// Wraps the synchronous `ureq` client behind the [`Backend`] trait so the
/// dashboard can be driven by a scripted backend in tests. All four
/// endpoints are plain `GET`s:
///
/// - `/weeks`: ordered week catalog
/// - `/uptrends?startWeekId&endWeekId&include&exclude`: result rows
/// - `/series?term&startWeekId&endWeekId`: one term's rank history
/// - `/reindex`: rebuild the backend index (response body ignored)
///
/// Non-2xx responses become [`DashError::Request`] carrying
/// `"{status} {statusText} - {body}"`. Nothing is retried here.
pub mod query;

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::schema::BackendConfig;
use crate::error::{DashError, DashResult};
use crate::model::{SeriesPoint, UptrendRow, Week};

pub use query::{SeriesQuery, UptrendQuery};

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// The four backend operations the dashboard consumes.
pub trait Backend {
    fn weeks(&self) -> DashResult<Vec<Week>>;
    fn uptrends(&self, query: &UptrendQuery) -> DashResult<Vec<UptrendRow>>;
    fn series(&self, query: &SeriesQuery) -> DashResult<Vec<SeriesPoint>>;
    fn reindex(&self) -> DashResult<()>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// `ureq`-backed [`Backend`].
#[derive(Debug)]
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    /// Build a client from the resolved config.
    pub fn from_config(config: &BackendConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build();
        Self {
            agent,
            base_url: normalize_base_url(&config.base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}{path}?{params}` and decode the JSON body.
    pub fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> DashResult<T> {
        let response = self.get(path, params)?;
        response
            .into_json::<T>()
            .map_err(|e| DashError::Decode(format!("{path}: {e}")))
    }

    fn get(&self, path: &str, params: &[(&str, String)]) -> DashResult<ureq::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.agent.get(&url);
        for (key, value) in params {
            request = request.query(key, value);
        }

        match request.call() {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(status, response)) => {
                let status_text = response.status_text().to_string();
                let body = response
                    .into_string()
                    .unwrap_or_else(|_| status_text.clone());
                Err(DashError::Request {
                    status,
                    status_text,
                    body,
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(DashError::Transport(transport.to_string()))
            }
        }
    }
}

impl Backend for HttpBackend {
    fn weeks(&self) -> DashResult<Vec<Week>> {
        self.fetch_json("/weeks", &[])
    }

    fn uptrends(&self, query: &UptrendQuery) -> DashResult<Vec<UptrendRow>> {
        self.fetch_json("/uptrends", &query.params())
    }

    fn series(&self, query: &SeriesQuery) -> DashResult<Vec<SeriesPoint>> {
        self.fetch_json("/series", &query.params())
    }

    fn reindex(&self) -> DashResult<()> {
        self.get("/reindex", &[]).map(|_| ())
    }
}

/// Strip trailing slashes and use `127.0.0.1` for `localhost`.
///
/// On Windows, `localhost` may resolve to `::1` first and stall when the
/// service only binds IPv4.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').replace("://localhost", "://127.0.0.1")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
