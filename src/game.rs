//! The session engine.
//!
//! [`GameService`] owns everything that lives longer than a single deal: the
//! records, the random source, the deferred-task queue and the current
//! [`Session`]. The presentation layer feeds it card selections and elapsed
//! time, and drains [`GameEvent`]s to learn what to draw.

use chrono::Local;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::deck::{build_deck, CardId};
use crate::events::GameEvent;
use crate::history::{GameHistory, HistoryEntry};
use crate::mode::Mode;
use crate::records::{Records, WinRecord};
use crate::scheduler::{Fired, Generation, Scheduler};
use crate::session::{Phase, SelectOutcome, Session};
use crate::util::{format_best_time, format_time};

pub const TIMER_PERIOD_MS: u64 = 1000;

/// Delays between a player action and its visible consequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimings {
    /// How long a mismatched pair stays face up
    pub mismatch_delay_ms: u64,
    /// Pause before the board unlocks after a match; 0 unlocks immediately
    pub match_delay_ms: u64,
    /// Gap between the final match and the win announcement
    pub win_announce_delay_ms: u64,
}

impl Default for GameTimings {
    fn default() -> Self {
        Self {
            mismatch_delay_ms: 1000,
            match_delay_ms: 0,
            win_announce_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    TimerTick,
    ResolveMatch,
    ResolveMismatch,
    AnnounceWin(WinRecord),
}

pub struct GameService {
    rng: StdRng,
    timings: GameTimings,
    records: Records,
    history: Option<GameHistory>,
    scheduler: Scheduler<Task>,
    session: Option<Session>,
    generation: Generation,
    events: Vec<GameEvent>,
}

impl GameService {
    pub fn new(records: Records, rng: StdRng, timings: GameTimings) -> Self {
        Self {
            rng,
            timings,
            records,
            history: None,
            scheduler: Scheduler::new(),
            session: None,
            generation: 0,
            events: Vec::new(),
        }
    }

    /// Log every finished game to `history`
    pub fn with_history(mut self, history: GameHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.session.as_ref().map(Session::mode)
    }

    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::Idle, Session::phase)
    }

    pub fn timings(&self) -> GameTimings {
        self.timings
    }

    pub fn history(&self) -> Option<&GameHistory> {
        self.history.as_ref()
    }

    pub fn best_time(&self, mode: Mode) -> Option<u64> {
        self.records.best_time(mode)
    }

    pub fn wins(&self, mode: Mode) -> u32 {
        self.records.wins(mode)
    }

    /// Virtual clock, in milliseconds since the service was created
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Deal a fresh board for `mode`, discarding whatever session was running
    pub fn start_session(&mut self, mode: Mode) {
        if let Some(old) = self.session.take() {
            let dropped = self.scheduler.cancel_generation(old.generation());
            debug!(
                "discarding session {} ({} pending tasks)",
                old.generation(),
                dropped
            );
        }

        self.generation += 1;
        let deck = build_deck(mode.pair_count(), &mut self.rng);
        let mut session = Session::new(self.generation, mode, deck);
        session.timer = Some(
            self.scheduler
                .every(TIMER_PERIOD_MS, self.generation, Task::TimerTick),
        );
        debug!("session {} started in {} mode", self.generation, mode);

        self.events.push(GameEvent::DeckReady {
            mode,
            cards: session.deck().to_vec(),
        });
        self.events.push(GameEvent::ScoreChanged(session.matched()));
        self.events
            .push(GameEvent::RemainingChanged(session.remaining()));
        self.events.push(GameEvent::TimerTick {
            elapsed_secs: 0,
            display: format_time(0),
        });
        self.session = Some(session);
        self.push_record_displays(mode);
    }

    /// Throw away the current session and start one in `mode`
    pub fn switch_mode(&mut self, mode: Mode) {
        self.start_session(mode);
    }

    /// Start over in the current mode
    pub fn restart(&mut self) {
        let mode = self.mode().unwrap_or_default();
        self.start_session(mode);
    }

    /// Offer a card. Locked boards, repeated picks and unknown cards are ignored.
    pub fn select_card(&mut self, id: CardId) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let generation = session.generation();

        match session.select(id) {
            SelectOutcome::Ignored => {}
            SelectOutcome::First(card) => {
                self.events.push(GameEvent::CardRevealed {
                    card: card.id,
                    rank: card.rank,
                });
            }
            SelectOutcome::Second {
                first,
                second,
                matched,
            } => {
                self.events.push(GameEvent::CardRevealed {
                    card: second.id,
                    rank: second.rank,
                });

                if !matched {
                    self.scheduler.after(
                        self.timings.mismatch_delay_ms,
                        generation,
                        Task::ResolveMismatch,
                    );
                    return;
                }

                self.events.push(GameEvent::CardMatched(first.id));
                self.events.push(GameEvent::CardMatched(second.id));
                self.events.push(GameEvent::ScoreChanged(session.matched()));
                self.events
                    .push(GameEvent::RemainingChanged(session.remaining()));

                if session.has_won() {
                    self.on_won();
                } else if self.timings.match_delay_ms == 0 {
                    session.clear_turn();
                } else {
                    self.scheduler.after(
                        self.timings.match_delay_ms,
                        generation,
                        Task::ResolveMatch,
                    );
                }
            }
        }
    }

    /// Let `elapsed_ms` pass, running every deferred task that comes due in order
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.scheduler.now_ms() + elapsed_ms;
        while let Some(fired) = self.scheduler.pop_due(until) {
            self.run(fired);
        }
        self.scheduler.advance_to(until);
    }

    fn run(&mut self, fired: Fired<Task>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.generation() != fired.generation {
            debug!(
                "ignoring {:?} from discarded session {}",
                fired.task, fired.generation
            );
            return;
        }

        match fired.task {
            Task::TimerTick => {
                if let Some(elapsed_secs) = session.tick() {
                    self.events.push(GameEvent::TimerTick {
                        elapsed_secs,
                        display: format_time(elapsed_secs),
                    });
                }
            }
            Task::ResolveMismatch => {
                if let Some((a, b)) = session.hide_pair() {
                    self.events.push(GameEvent::CardHidden(a));
                    self.events.push(GameEvent::CardHidden(b));
                }
            }
            Task::ResolveMatch => session.clear_turn(),
            Task::AnnounceWin(win) => {
                self.events.push(GameEvent::Win);
                self.events.push(GameEvent::WinCountChanged {
                    mode: win.mode,
                    count: win.wins,
                });
                if win.new_best {
                    let display = format_time(win.elapsed_secs);
                    self.events.push(GameEvent::BestTimeDisplay {
                        mode: win.mode,
                        display: display.clone(),
                    });
                    self.events.push(GameEvent::NewBestTime(display));
                }
            }
        }
    }

    fn on_won(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(timer) = session.timer.take() {
            self.scheduler.cancel(timer);
        }

        let mode = session.mode();
        let generation = session.generation();
        let win = self.records.record_win(mode, session.elapsed_secs());
        info!(
            "won {} game in {} (wins: {}, new best: {})",
            mode,
            format_time(win.elapsed_secs),
            win.wins,
            win.new_best
        );

        if let Some(history) = &self.history {
            let entry = HistoryEntry {
                date: Local::now(),
                mode,
                elapsed_secs: win.elapsed_secs,
                new_best: win.new_best,
            };
            if let Err(e) = history.append(&entry) {
                warn!("appending to {}: {}", history.path().display(), e);
            }
        }

        self.scheduler.after(
            self.timings.win_announce_delay_ms,
            generation,
            Task::AnnounceWin(win),
        );
    }

    fn push_record_displays(&mut self, mode: Mode) {
        self.events.push(GameEvent::BestTimeDisplay {
            mode,
            display: format_best_time(self.records.best_time(mode)),
        });
        self.events.push(GameEvent::WinCountChanged {
            mode,
            count: self.records.wins(mode),
        });
    }
}
