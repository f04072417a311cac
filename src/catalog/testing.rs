use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use reqwest::StatusCode;
use serde_json::Value;

use super::source::{FetchError, JsonSource};

/// Canned responses keyed by URL, recording every request made.
#[derive(Debug, Default)]
pub struct StaticSource {
    json: HashMap<String, Value>,
    icons: HashSet<String>,
    fail_probes: bool,
    requests: Mutex<Vec<String>>,
    probes: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, url: &str, value: Value) -> Self {
        self.json.insert(url.to_string(), value);
        self
    }

    pub fn with_icon(mut self, url: &str) -> Self {
        self.icons.insert(url.to_string());
        self
    }

    pub fn failing_probes(mut self) -> Self {
        self.fail_probes = true;
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl JsonSource for StaticSource {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.json.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: StatusCode::NOT_FOUND,
        })
    }

    async fn probe(&self, url: &str) -> Result<bool, FetchError> {
        self.probes.lock().unwrap().push(url.to_string());
        if self.fail_probes {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(self.icons.contains(url))
    }
}
