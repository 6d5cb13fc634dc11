//! Audio intent seam
//!
//! The session signals intent (play/pause/stop); resource lifetimes and the
//! actual playback backend are the sink's business. The binary ships a
//! silent sink.

use crate::game::FoodKind;

/// The two gameplay sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Eat,
    BonusEat,
}

impl SoundEffect {
    /// Which effect a consumed food kind triggers: only the 20-point bonus
    /// has its own jingle, as in the original game
    pub fn for_food(kind: FoodKind) -> Self {
        match kind {
            FoodKind::Bonus20 => SoundEffect::BonusEat,
            FoodKind::Normal | FoodKind::Bonus30 => SoundEffect::Eat,
        }
    }
}

/// Playback intents the game emits
pub trait AudioSink {
    /// Start or resume background music
    fn play_music(&mut self);
    /// Pause background music, keeping position
    fn pause_music(&mut self);
    /// Stop music and any playing effects
    fn stop_all(&mut self);
    /// Fire a one-shot effect
    fn play_effect(&mut self, effect: SoundEffect);
}

/// Silent sink for environments without audio output
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_music(&mut self) {}
    fn pause_music(&mut self) {}
    fn stop_all(&mut self) {}
    fn play_effect(&mut self, _effect: SoundEffect) {}
}
