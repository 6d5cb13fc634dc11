//! Abstract chain and leaderboard collaborators
//!
//! The simulation never depends on these for correctness: submissions are
//! best-effort, failures degrade to a status line on the game-over screen,
//! and the player can always restart regardless of service health.

pub mod leaderboard;
pub mod sim;

use std::future::Future;

use thiserror::Error;

pub use leaderboard::rank_top_scores;
pub use sim::SimulatedChain;

/// Recoverable failures of the chain collaborator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("wallet not connected")]
    NotConnected,
    #[error("wrong network (expected chain {expected}, got {actual})")]
    WrongNetwork { expected: u64, actual: u64 },
    #[error("transaction rejected by user")]
    UserRejected,
    #[error("transaction failed: {0}")]
    TransactionFailed(String),
}

/// Receipt for an accepted score submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxConfirmation {
    pub tx_hash: String,
}

/// One leaderboard entry as served by the contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub player: String,
    pub score: u32,
    /// Unix seconds
    pub timestamp: i64,
}

/// Score submission seam. Called at most once per completed run, and only
/// when the service reports a connected wallet.
pub trait ChainService {
    fn is_connected(&self) -> bool;

    fn submit_score(
        &self,
        score: u32,
    ) -> impl Future<Output = Result<TxConfirmation, ChainError>> + Send;
}

/// Leaderboard query seam; refreshed opportunistically after submissions and
/// on a periodic timer independent of game phase.
pub trait LeaderboardService {
    fn fetch_top_scores(
        &self,
        n: usize,
    ) -> impl Future<Output = Result<Vec<ScoreEntry>, ChainError>> + Send;
}

/// Player-visible state of the current run's submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// No completed run yet
    Idle,
    /// Run completed without a connected wallet
    NotConnected,
    /// Transaction dispatched, result pending
    InFlight,
    /// Accepted on chain
    Confirmed(TxConfirmation),
    /// Any recoverable failure, reduced to display text
    Failed(ChainError),
}

impl SubmissionStatus {
    /// Inline status line for the game-over screen
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SubmissionStatus::Idle => None,
            SubmissionStatus::NotConnected => Some("Connect wallet to submit"),
            SubmissionStatus::InFlight => Some("Submitting..."),
            SubmissionStatus::Confirmed(_) => Some("Submitted!"),
            SubmissionStatus::Failed(ChainError::UserRejected) => Some("Transaction rejected"),
            SubmissionStatus::Failed(ChainError::WrongNetwork { .. }) => {
                Some("Please switch to the game network")
            }
            SubmissionStatus::Failed(ChainError::NotConnected) => {
                Some("Please reconnect wallet")
            }
            SubmissionStatus::Failed(ChainError::TransactionFailed(_)) => Some("Error submitting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(SubmissionStatus::Idle.message(), None);
        assert_eq!(
            SubmissionStatus::NotConnected.message(),
            Some("Connect wallet to submit")
        );
        assert_eq!(
            SubmissionStatus::Failed(ChainError::UserRejected).message(),
            Some("Transaction rejected")
        );
        assert_eq!(
            SubmissionStatus::Failed(ChainError::TransactionFailed("out of gas".into())).message(),
            Some("Error submitting")
        );
    }

    #[test]
    fn test_error_display() {
        let err = ChainError::WrongNetwork {
            expected: 10143,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "wrong network (expected chain 10143, got 1)"
        );
    }
}
