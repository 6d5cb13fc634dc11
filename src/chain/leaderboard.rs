use std::collections::HashMap;

use super::ScoreEntry;

/// Reduce a raw score feed to a display board: one entry per player (their
/// highest score, earliest such entry wins ties), sorted descending,
/// truncated to `n`.
///
/// Player identity is compared case-insensitively, but the original casing
/// is kept for display.
pub fn rank_top_scores(entries: Vec<ScoreEntry>, n: usize) -> Vec<ScoreEntry> {
    let mut best: HashMap<String, ScoreEntry> = HashMap::new();
    for entry in entries {
        let key = entry.player.to_lowercase();
        match best.get(&key) {
            Some(existing) if existing.score >= entry.score => {}
            _ => {
                best.insert(key, entry);
            }
        }
    }

    let mut ranked: Vec<ScoreEntry> = best.into_values().collect();
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
    ranked.truncate(n);
    ranked
}

/// 1-based rank of a player on an already ranked board
pub fn rank_of(board: &[ScoreEntry], player: &str) -> Option<usize> {
    board
        .iter()
        .position(|e| e.player.eq_ignore_ascii_case(player))
        .map(|i| i + 1)
}
