use std::time::Duration;

use log::debug;

use crate::errors::TransportError;

/// Blocking GET returning the response body. Every failure means "no
/// response" to the caller; the retry policy decides what happens next.
pub trait Transport {
    fn get(&self, url: &str, timeout: Duration) -> Result<String, TransportError>;
}

/// HTTPS client with certificate validation unless explicitly disabled.
pub struct HttpsTransport {
    client: reqwest::blocking::Client,
}

impl HttpsTransport {
    pub fn new(verify_tls: bool) -> Result<Self, TransportError> {
        if !verify_tls {
            log::warn!("TLS certificate validation disabled for evaluator requests");
        }
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|err| TransportError::Connect(err.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpsTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<String, TransportError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().map_err(map_reqwest_error)?;
        if body.trim().is_empty() {
            debug!("empty body with status {status}");
            return Err(TransportError::EmptyResponse);
        }
        Ok(body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connect(err.to_string())
    }
}
