use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;

use super::{rank_top_scores, ChainError, ChainService, LeaderboardService, ScoreEntry, TxConfirmation};

/// In-memory stand-in for the real chain so the full submit/refresh loop is
/// playable offline. A real implementation only has to provide the same two
/// traits.
pub struct SimulatedChain {
    connected: bool,
    player: String,
    submissions: Mutex<Vec<ScoreEntry>>,
    next_nonce: AtomicU64,
    /// Artificial confirmation latency
    latency: Duration,
}

impl SimulatedChain {
    pub fn new(connected: bool, player: impl Into<String>) -> Self {
        Self {
            connected,
            player: player.into(),
            submissions: Mutex::new(Vec::new()),
            next_nonce: AtomicU64::new(1),
            latency: Duration::from_millis(250),
        }
    }

    /// Pre-populate the board so a fresh install still shows competition
    pub fn with_sample_board(self) -> Self {
        let now = Utc::now().timestamp();
        {
            let mut submissions = self
                .submissions
                .lock()
                .expect("submission store poisoned");
            submissions.extend([
                ScoreEntry {
                    player: "0x64ff...da01".to_string(),
                    score: 530,
                    timestamp: now - 86_400,
                },
                ScoreEntry {
                    player: "0x0a19...2f77".to_string(),
                    score: 320,
                    timestamp: now - 43_200,
                },
                ScoreEntry {
                    player: "0x2dE8...DDf8".to_string(),
                    score: 150,
                    timestamp: now - 3_600,
                },
            ]);
        }
        self
    }

    pub fn player(&self) -> &str {
        &self.player
    }
}

impl ChainService for SimulatedChain {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn submit_score(&self, score: u32) -> Result<TxConfirmation, ChainError> {
        if !self.connected {
            return Err(ChainError::NotConnected);
        }

        tokio::time::sleep(self.latency).await;

        let nonce = self.next_nonce.fetch_add(1, Ordering::Relaxed);
        let entry = ScoreEntry {
            player: self.player.clone(),
            score,
            timestamp: Utc::now().timestamp(),
        };
        self.submissions
            .lock()
            .expect("submission store poisoned")
            .push(entry);

        Ok(TxConfirmation {
            tx_hash: format!("0x{:064x}", u128::from(nonce) << 32 | u128::from(score)),
        })
    }
}

impl LeaderboardService for SimulatedChain {
    async fn fetch_top_scores(&self, n: usize) -> Result<Vec<ScoreEntry>, ChainError> {
        let entries = self
            .submissions
            .lock()
            .expect("submission store poisoned")
            .clone();
        Ok(rank_top_scores(entries, n))
    }
}
