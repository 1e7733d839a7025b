//! Blocking HTTP transport to a Solr core.
//!
//! Requires the `http` feature to be enabled.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::ClientSettings;
use crate::error::{QuerierError, Result};
use crate::query::request::NativeRequest;
use crate::response::NativeResponse;
use crate::transport::Transport;

/// Error body Solr returns with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: SolrError,
}

#[derive(Debug, Deserialize)]
struct SolrError {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    code: Option<i32>,
}

/// Sends requests to a core's `/select` handler.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
    login: Option<String>,
    password: Option<String>,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| QuerierError::transport(0, format!("Failed to create HTTP client: {e}")))?;

        Ok(HttpTransport {
            client,
            url: settings.select_url(),
            login: settings.login.clone(),
            password: settings.password.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &NativeRequest) -> Result<NativeResponse> {
        let mut builder = self.client.post(&self.url).form(&request.to_params());
        if let Some(login) = &self.login {
            builder = builder.basic_auth(login, self.password.as_ref());
        }

        let response = builder
            .send()
            .map_err(|e| QuerierError::transport(0, format!("Solr request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| QuerierError::transport(status.as_u16().into(), e.to_string()))?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(ErrorBody { error }) => (
                    error.code.unwrap_or(status.as_u16().into()),
                    error.msg.unwrap_or_else(|| status.to_string()),
                ),
                Err(_) => (status.as_u16().into(), status.to_string()),
            };
            return Err(QuerierError::transport(code, message));
        }

        serde_json::from_str(&body).map_err(|e| {
            QuerierError::transport(status.as_u16().into(), format!("Invalid Solr response: {e}"))
        })
    }
}
