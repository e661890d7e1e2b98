use log::info;

use crate::config::EvaluatorConfig;
use crate::errors::{EvaluatorError, TransportError};
use crate::evaluator::evaluator_trait::{Evaluator, EvaluatorReply};
use crate::evaluator::http_transport::{HttpsTransport, Transport};
use crate::evaluator::retry_policy::RetryPolicy;
use crate::evaluator::stockfish_api::{build_request_url, parse_response};

/// Evaluator backed by the remote Stockfish service.
pub struct RemoteEvaluator<T: Transport> {
    transport: T,
    base_url: String,
    policy: RetryPolicy,
}

impl<T: Transport> RemoteEvaluator<T> {
    pub fn new(transport: T, base_url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl RemoteEvaluator<HttpsTransport> {
    pub fn from_config(config: &EvaluatorConfig) -> Result<Self, TransportError> {
        let transport = HttpsTransport::new(config.verify_tls)?;
        Ok(Self::new(transport, config.base_url.clone(), RetryPolicy::from_config(config)))
    }
}

impl<T: Transport> Evaluator for RemoteEvaluator<T> {
    fn name(&self) -> &str {
        "stockfish-remote"
    }

    /// A parse failure counts as a failed attempt; the last failure is what
    /// the caller sees once attempts run out.
    fn best_move(&mut self, fen: &str, depth: u8) -> Result<EvaluatorReply, EvaluatorError> {
        let url = build_request_url(&self.base_url, fen, depth)?;
        info!("evaluator request depth {depth}: {fen}");

        let transport = &self.transport;
        self.policy.run(|attempt, timeout| {
            let raw = transport
                .get(&url, timeout)
                .map_err(|_| EvaluatorError::Timeout { attempts: attempt })?;
            parse_response(&raw)
        })
    }
}
