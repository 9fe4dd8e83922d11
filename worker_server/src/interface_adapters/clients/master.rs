use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    host: &'a str,
    port: u16,
}

#[derive(Debug)]
pub enum RegisterError {
    Unreachable,
    Rejected(u16),
}

// Thin reqwest client for announcing this worker to the master.
#[derive(Clone)]
pub struct MasterClient {
    http: reqwest::Client,
    base_url: String,
}

impl MasterClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Announces this worker's public address to the master. Registration
    /// resets the master's view of this host, so it is only called at
    /// startup.
    pub async fn register(&self, host: &str, port: u16) -> Result<(), RegisterError> {
        let url = format!("{}/internal/register", self.base_url);
        let response = self
            .http
            .put(url)
            .json(&RegisterRequest { host, port })
            .send()
            .await
            .map_err(|_| RegisterError::Unreachable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RegisterError::Rejected(response.status().as_u16()))
        }
    }
}
