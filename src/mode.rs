use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Difficulty: how many pairs are dealt
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Hard,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Normal, Mode::Hard];

    pub fn pair_count(self) -> u8 {
        match self {
            Mode::Normal => 8,
            Mode::Hard => 18,
        }
    }

    /// Board width: 4x4 for Normal, 6x6 for Hard
    pub fn columns(self) -> usize {
        match self {
            Mode::Normal => 4,
            Mode::Hard => 6,
        }
    }

    pub fn best_time_key(self) -> &'static str {
        match self {
            Mode::Normal => "bestTimeNormal",
            Mode::Hard => "bestTimeHard",
        }
    }

    pub fn wins_key(self) -> &'static str {
        match self {
            Mode::Normal => "winsNormal",
            Mode::Hard => "winsHard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_counts() {
        assert_eq!(Mode::Normal.pair_count(), 8);
        assert_eq!(Mode::Hard.pair_count(), 18);
    }

    #[test]
    fn test_grid_is_square() {
        for mode in Mode::ALL {
            let cols = mode.columns();
            assert_eq!(cols * cols, mode.pair_count() as usize * 2);
        }
    }

    #[test]
    fn test_keys_are_distinct_per_mode() {
        assert_ne!(Mode::Normal.best_time_key(), Mode::Hard.best_time_key());
        assert_ne!(Mode::Normal.wins_key(), Mode::Hard.wins_key());
        assert_ne!(Mode::Normal.best_time_key(), Mode::Normal.wins_key());
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(Mode::Hard.to_string(), "Hard");
        assert_eq!(serde_json::to_string(&Mode::Normal).unwrap(), "\"normal\"");
        let parsed: Mode = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(parsed, Mode::Hard);
    }
}
