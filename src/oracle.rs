//! Client for the external move-recommendation service.

use crate::game::{Board, Player};
use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Source of ranked move suggestions for the automated seat.
///
/// Implementations answer in the oracle's local pit numbering (0-5,
/// closest-to-store last); the orchestrator translates to absolute board
/// indices and screens every candidate for legality.
#[async_trait]
pub trait MoveOracle: Send + Sync {
    /// Returns candidate pits ranked by preference, best first.
    async fn best_moves(
        &self,
        board: &Board,
        started_by: Player,
    ) -> Result<Vec<usize>, OracleError>;
}

/// Request body for the `/best_move/` endpoint.
#[derive(Debug, Clone, Serialize)]
struct BestMoveRequest {
    state: Vec<u8>,
}

/// Success body from the `/best_move/` endpoint.
#[derive(Debug, Clone, Deserialize)]
struct BestMoveResponse {
    best_moves: Vec<usize>,
}

/// Encodes the 15-element request payload: the 14 board slots followed by
/// the origin indicator (1 when the user opened the game, 0 otherwise).
///
/// The service was trained with a canonical seat assignment; the indicator
/// tells it which seat opened so it can swap sides internally.
fn encode_state(board: &Board, started_by: Player) -> Vec<u8> {
    let mut state = board.slots().to_vec();
    state.push(match started_by {
        Player::User => 1,
        Player::Ai => 0,
    });
    state
}

/// Failure talking to the oracle.
///
/// Transport errors, non-success statuses, and malformed bodies all
/// collapse into this one shape - the caller's recovery (random legal
/// fallback) is the same for each, and no retry is attempted.
#[derive(Debug, Clone, Display, Error)]
#[display("Oracle error: {} at {}:{}", message, file, line)]
pub struct OracleError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl OracleError {
    /// Creates a new oracle error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// HTTP client for the move-recommendation service.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    base_url: String,
    client: reqwest::Client,
}

impl HttpOracle {
    /// Creates a client against `base_url` with a per-request latency
    /// budget; a request that overruns it fails like any other outage.
    pub fn new(base_url: impl Into<String>, budget: Duration) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(budget)
            .build()
            .map_err(|e| OracleError::new(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

#[async_trait]
impl MoveOracle for HttpOracle {
    #[instrument(skip(self, board), fields(base_url = %self.base_url))]
    async fn best_moves(
        &self,
        board: &Board,
        started_by: Player,
    ) -> Result<Vec<usize>, OracleError> {
        let request = BestMoveRequest {
            state: encode_state(board, started_by),
        };
        debug!(state = ?request.state, "Requesting ranked moves");

        let response = self
            .client
            .post(format!("{}/best_move/", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Oracle request failed");
                OracleError::new(format!("Oracle request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Oracle returned non-success status");
            return Err(OracleError::new(format!("Oracle returned {status}")));
        }

        let body: BestMoveResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Malformed oracle response");
            OracleError::new(format!("Malformed oracle response: {e}"))
        })?;

        debug!(best_moves = ?body.best_moves, "Oracle answered");
        Ok(body.best_moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_state_appends_origin_indicator() {
        let board = Board::new();

        let user_opened = encode_state(&board, Player::User);
        assert_eq!(user_opened.len(), 15);
        assert_eq!(&user_opened[..14], board.slots());
        assert_eq!(user_opened[14], 1);

        let ai_opened = encode_state(&board, Player::Ai);
        assert_eq!(ai_opened[14], 0);
    }

    #[test]
    fn test_request_serializes_as_state_array() {
        let request = BestMoveRequest {
            state: encode_state(&Board::new(), Player::User),
        };
        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(json["state"].as_array().map(|a| a.len()), Some(15));
    }
}
