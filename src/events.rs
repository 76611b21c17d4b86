use crate::deck::{Card, CardId};
use crate::mode::Mode;

/// Notifications from the session engine to whatever draws the game
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A fresh board, cards in dealt order
    DeckReady { mode: Mode, cards: Vec<Card> },
    CardRevealed { card: CardId, rank: u8 },
    CardHidden(CardId),
    /// The card is out of play for the rest of the session
    CardMatched(CardId),
    ScoreChanged(u32),
    RemainingChanged(u32),
    TimerTick { elapsed_secs: u64, display: String },
    Win,
    NewBestTime(String),
    WinCountChanged { mode: Mode, count: u32 },
    BestTimeDisplay { mode: Mode, display: String },
}
