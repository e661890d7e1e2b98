//! Request/response format of the public Stockfish HTTP service.
//!
//! A request is `GET <base>?fen=<fen>&depth=<n>`; the reply body is JSON:
//!
//! ```text
//! {"success":true,"evaluation":0.42,"mate":null,
//!  "bestmove":"bestmove e2e4 ponder e7e5","continuation":"..."}
//! ```

use serde::Deserialize;

use crate::errors::EvaluatorError;
use crate::evaluator::evaluator_trait::{Evaluation, EvaluatorReply};
use crate::utils::long_algebraic::{parse_long_algebraic, CoordinateMove};

pub const DEFAULT_BASE_URL: &str = "https://stockfish.online/api/s/v2.php";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    success: bool,
    #[serde(default)]
    evaluation: Option<f32>,
    #[serde(default)]
    mate: Option<i32>,
    #[serde(default)]
    bestmove: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

pub fn build_request_url(base_url: &str, fen: &str, depth: u8) -> Result<String, EvaluatorError> {
    let depth = depth.to_string();
    reqwest::Url::parse_with_params(base_url, &[("fen", fen), ("depth", depth.as_str())])
        .map(String::from)
        .map_err(|err| EvaluatorError::Parse(format!("invalid evaluator URL {base_url}: {err}")))
}

/// Accepts either a bare JSON body or a raw HTTP response with headers.
pub fn parse_response(raw: &str) -> Result<EvaluatorReply, EvaluatorError> {
    let body = extract_json_object(raw).ok_or_else(|| EvaluatorError::Parse("no JSON object in response".to_owned()))?;
    let response: ApiResponse = serde_json::from_str(body).map_err(|err| EvaluatorError::Parse(err.to_string()))?;

    if !response.success {
        let reason = response.data.unwrap_or_else(|| "request unsuccessful".to_owned());
        return Err(EvaluatorError::Parse(reason));
    }

    let line = response
        .bestmove
        .ok_or_else(|| EvaluatorError::Parse("response has no bestmove".to_owned()))?;
    let token = best_move_token(&line).ok_or_else(|| EvaluatorError::Parse(format!("empty bestmove line: {line:?}")))?;
    if token == "(none)" {
        return Err(EvaluatorError::NoMove);
    }
    validate_uci_move(token)?;

    let evaluation = match response.mate {
        Some(moves) => Evaluation::MateIn(moves),
        None => Evaluation::Pawns(response.evaluation.unwrap_or(0.0)),
    };

    Ok(EvaluatorReply {
        best_move: token.to_owned(),
        evaluation,
    })
}

/// Word following `bestmove`, or the first word when the prefix is absent.
fn best_move_token(line: &str) -> Option<&str> {
    let mut words = line.split_whitespace();
    let first = words.next()?;
    if first == "bestmove" {
        words.next()
    } else {
        Some(first)
    }
}

fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// 4-5 characters: files a-h, ranks 1-8, optional q/r/b/n promotion.
pub fn validate_uci_move(token: &str) -> Result<CoordinateMove, EvaluatorError> {
    parse_long_algebraic(token).map_err(|err| EvaluatorError::RejectedMove {
        mv: token.to_owned(),
        reason: err.to_string(),
    })
}
