//! What the screen shows, rebuilt purely from [`GameEvent`]s.

use crate::events::GameEvent;
use crate::mode::Mode;
use crate::util::{format_time, NO_TIME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardView {
    FaceDown,
    FaceUp(u8),
    Gone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Won,
    NewBest(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub mode: Mode,
    pub cards: Vec<CardView>,
    pub correct_pairs: u32,
    pub pairs_remaining: u32,
    pub timer: String,
    pub best_time: String,
    pub wins: u32,
    pub banners: Vec<Banner>,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            cards: Vec::new(),
            correct_pairs: 0,
            pairs_remaining: 0,
            timer: format_time(0),
            best_time: NO_TIME.to_string(),
            wins: 0,
            banners: Vec::new(),
        }
    }
}

impl BoardView {
    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::DeckReady { mode, cards } => {
                self.mode = *mode;
                self.cards = vec![CardView::FaceDown; cards.len()];
                self.banners.clear();
            }
            GameEvent::CardRevealed { card, rank } => self.set(card.index(), CardView::FaceUp(*rank)),
            GameEvent::CardHidden(card) => self.set(card.index(), CardView::FaceDown),
            GameEvent::CardMatched(card) => self.set(card.index(), CardView::Gone),
            GameEvent::ScoreChanged(n) => self.correct_pairs = *n,
            GameEvent::RemainingChanged(n) => self.pairs_remaining = *n,
            GameEvent::TimerTick { display, .. } => self.timer.clone_from(display),
            GameEvent::Win => self.banners.push(Banner::Won),
            GameEvent::NewBestTime(display) => self.banners.push(Banner::NewBest(display.clone())),
            GameEvent::WinCountChanged { mode, count } => {
                if *mode == self.mode {
                    self.wins = *count;
                }
            }
            GameEvent::BestTimeDisplay { mode, display } => {
                if *mode == self.mode {
                    self.best_time.clone_from(display);
                }
            }
        }
    }

    pub fn apply_all<'a, I: IntoIterator<Item = &'a GameEvent>>(&mut self, events: I) {
        for event in events {
            self.apply(event);
        }
    }

    fn set(&mut self, idx: usize, card: CardView) {
        if let Some(slot) = self.cards.get_mut(idx) {
            *slot = card;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Card, CardId};

    fn deck(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card {
                id: CardId(i),
                rank: (i / 2 + 1) as u8,
            })
            .collect()
    }

    #[test]
    fn test_flip_cycle() {
        let mut view = BoardView::default();
        view.apply_all(&[
            GameEvent::DeckReady {
                mode: Mode::Normal,
                cards: deck(4),
            },
            GameEvent::CardRevealed {
                card: CardId(1),
                rank: 1,
            },
        ]);
        assert_eq!(view.cards[1], CardView::FaceUp(1));

        view.apply(&GameEvent::CardHidden(CardId(1)));
        assert_eq!(view.cards[1], CardView::FaceDown);

        view.apply(&GameEvent::CardMatched(CardId(3)));
        assert_eq!(view.cards[3], CardView::Gone);
    }

    #[test]
    fn test_records_for_other_mode_are_ignored() {
        let mut view = BoardView::default();
        view.apply(&GameEvent::DeckReady {
            mode: Mode::Hard,
            cards: deck(36),
        });
        view.apply(&GameEvent::BestTimeDisplay {
            mode: Mode::Normal,
            display: "00:10".into(),
        });
        assert_eq!(view.best_time, "--:--");

        view.apply(&GameEvent::BestTimeDisplay {
            mode: Mode::Hard,
            display: "01:10".into(),
        });
        view.apply(&GameEvent::WinCountChanged {
            mode: Mode::Hard,
            count: 3,
        });
        assert_eq!(view.best_time, "01:10");
        assert_eq!(view.wins, 3);
    }

    #[test]
    fn test_new_deal_clears_banners() {
        let mut view = BoardView::default();
        view.apply(&GameEvent::Win);
        view.apply(&GameEvent::NewBestTime("00:40".into()));
        assert_eq!(view.banners.len(), 2);

        view.apply(&GameEvent::DeckReady {
            mode: Mode::Normal,
            cards: deck(16),
        });
        assert!(view.banners.is_empty());
        assert!(view.cards.iter().all(|c| *c == CardView::FaceDown));
    }
}
