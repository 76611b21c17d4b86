use crate::deck::{Card, CardId};
use crate::mode::Mode;
use crate::scheduler::{Generation, TaskHandle};

/// How a card is currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Down,
    Up,
    Matched,
}

/// The player's in-progress turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    One(CardId),
    Two(CardId, CardId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingFirstSelection,
    AwaitingSecondSelection,
    MatchDelay,
    MismatchDelay,
    Won,
}

/// Result of offering a card to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Ignored,
    First(Card),
    Second {
        first: Card,
        second: Card,
        matched: bool,
    },
}

/// One deal, from start to win or replacement
#[derive(Debug, Clone)]
pub struct Session {
    generation: Generation,
    mode: Mode,
    deck: Vec<Card>,
    faces: Vec<Face>,
    selection: Selection,
    matched: u32,
    remaining: u32,
    elapsed_secs: u64,
    won: bool,
    pub(crate) timer: Option<TaskHandle>,
}

impl Session {
    pub fn new(generation: Generation, mode: Mode, deck: Vec<Card>) -> Self {
        let faces = vec![Face::Down; deck.len()];
        Self {
            generation,
            mode,
            faces,
            remaining: (deck.len() / 2) as u32,
            deck,
            selection: Selection::None,
            matched: 0,
            elapsed_secs: 0,
            won: false,
            timer: None,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn card(&self, id: CardId) -> Option<Card> {
        self.deck.get(id.index()).copied()
    }

    pub fn face(&self, id: CardId) -> Option<Face> {
        self.faces.get(id.index()).copied()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn matched(&self) -> u32 {
        self.matched
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// No card can be selected while a pair is pending or the game is over
    pub fn is_locked(&self) -> bool {
        self.won || matches!(self.selection, Selection::Two(..))
    }

    pub fn phase(&self) -> Phase {
        if self.won {
            return Phase::Won;
        }
        match self.selection {
            Selection::None => Phase::AwaitingFirstSelection,
            Selection::One(_) => Phase::AwaitingSecondSelection,
            Selection::Two(a, b) => {
                if self.rank_of(a) == self.rank_of(b) {
                    Phase::MatchDelay
                } else {
                    Phase::MismatchDelay
                }
            }
        }
    }

    /// Apply a selection. A completed matching pair is scored immediately;
    /// only clearing the turn is left to the caller.
    pub(crate) fn select(&mut self, id: CardId) -> SelectOutcome {
        if self.is_locked() {
            return SelectOutcome::Ignored;
        }
        let Some(card) = self.card(id) else {
            return SelectOutcome::Ignored;
        };
        if self.faces[id.index()] == Face::Matched {
            return SelectOutcome::Ignored;
        }

        match self.selection {
            Selection::None => {
                self.selection = Selection::One(id);
                self.faces[id.index()] = Face::Up;
                SelectOutcome::First(card)
            }
            Selection::One(first_id) if first_id == id => SelectOutcome::Ignored,
            Selection::One(first_id) => {
                let first = self.deck[first_id.index()];
                self.selection = Selection::Two(first_id, id);
                self.faces[id.index()] = Face::Up;

                let matched = first.rank == card.rank;
                if matched {
                    self.faces[first_id.index()] = Face::Matched;
                    self.faces[id.index()] = Face::Matched;
                    self.matched += 1;
                    self.remaining -= 1;
                    if self.remaining == 0 {
                        self.won = true;
                        self.selection = Selection::None;
                    }
                }

                SelectOutcome::Second {
                    first,
                    second: card,
                    matched,
                }
            }
            Selection::Two(..) => SelectOutcome::Ignored,
        }
    }

    /// Turn a mismatched pair back over and unlock. Returns the cards that were flipped.
    pub(crate) fn hide_pair(&mut self) -> Option<(CardId, CardId)> {
        let Selection::Two(a, b) = self.selection else {
            return None;
        };
        for id in [a, b] {
            if self.faces[id.index()] == Face::Up {
                self.faces[id.index()] = Face::Down;
            }
        }
        self.selection = Selection::None;
        Some((a, b))
    }

    /// Unlock after a matched pair
    pub(crate) fn clear_turn(&mut self) {
        if !self.won {
            self.selection = Selection::None;
        }
    }

    pub(crate) fn tick(&mut self) -> Option<u64> {
        if self.won {
            return None;
        }
        self.elapsed_secs += 1;
        Some(self.elapsed_secs)
    }

    fn rank_of(&self, id: CardId) -> Option<u8> {
        self.card(id).map(|c| c.rank)
    }
}
