//! Difficulty model: pure functions of cumulative score.
//!
//! Both curves are monotonically non-increasing step functions with a floor.
//! Below the threshold the base value applies unchanged; at or above it, the
//! value steps down once per whole threshold crossed.

use std::time::Duration;

use super::config::GameConfig;

/// Sprite scale for the given score
pub fn scale_for(score: u32, config: &GameConfig) -> f32 {
    if score < config.scale_threshold {
        return config.base_scale;
    }
    let reduction = (score / config.scale_threshold) as f32 * config.scale_step;
    (config.base_scale - reduction).max(config.min_scale)
}

/// Milliseconds between grid ticks for the given score
pub fn move_interval_for(score: u32, config: &GameConfig) -> Duration {
    if score < config.speed_threshold {
        return Duration::from_millis(config.base_move_delay_ms);
    }
    let reduction = (score as u64 / config.speed_threshold as u64) * config.speed_step_ms;
    let delay = config
        .base_move_delay_ms
        .saturating_sub(reduction)
        .max(config.min_move_delay_ms);
    Duration::from_millis(delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_below_threshold_is_constant() {
        let config = GameConfig::default();
        assert_eq!(scale_for(0, &config), config.base_scale);
        assert_eq!(scale_for(499, &config), config.base_scale);
    }

    #[test]
    fn test_scale_steps_down() {
        let config = GameConfig::default();
        let at_threshold = scale_for(500, &config);
        assert!((at_threshold - 0.13).abs() < 1e-6);
        let two_steps = scale_for(1000, &config);
        assert!((two_steps - 0.11).abs() < 1e-6);
    }

    #[test]
    fn test_scale_floor() {
        let config = GameConfig::default();
        assert_eq!(scale_for(1_000_000, &config), config.min_scale);
    }

    #[test]
    fn test_interval_below_threshold_is_constant() {
        let config = GameConfig::default();
        assert_eq!(move_interval_for(0, &config), Duration::from_millis(100));
        assert_eq!(move_interval_for(199, &config), Duration::from_millis(100));
    }

    #[test]
    fn test_interval_steps_down() {
        let config = GameConfig::default();
        assert_eq!(move_interval_for(200, &config), Duration::from_millis(90));
        assert_eq!(move_interval_for(400, &config), Duration::from_millis(80));
    }

    #[test]
    fn test_interval_floor() {
        let config = GameConfig::default();
        assert_eq!(
            move_interval_for(1_000_000, &config),
            Duration::from_millis(config.min_move_delay_ms)
        );
    }

    #[test]
    fn test_monotonicity() {
        let config = GameConfig::default();
        let mut prev_scale = scale_for(0, &config);
        let mut prev_interval = move_interval_for(0, &config);
        for score in (0..5000).step_by(10) {
            let scale = scale_for(score, &config);
            let interval = move_interval_for(score, &config);
            assert!(scale <= prev_scale, "scale increased at score {score}");
            assert!(
                interval <= prev_interval,
                "interval increased at score {score}"
            );
            assert!(scale >= config.min_scale);
            assert!(interval >= Duration::from_millis(config.min_move_delay_ms));
            prev_scale = scale;
            prev_interval = interval;
        }
    }

    #[test]
    fn test_idempotent() {
        let config = GameConfig::default();
        assert_eq!(scale_for(730, &config), scale_for(730, &config));
        assert_eq!(move_interval_for(730, &config), move_interval_for(730, &config));
    }
}
