use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{game::GameService, mode::Mode};

/// What the loop wakes up for
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Player intent behind a key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move { dx: isize, dy: isize },
    Flip,
    SwitchMode(Mode),
    Restart,
    ToggleHelp,
    Quit,
}

impl Command {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let command = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Command::Quit,
            KeyCode::Left | KeyCode::Char('h') => Command::Move { dx: -1, dy: 0 },
            KeyCode::Right | KeyCode::Char('l') => Command::Move { dx: 1, dy: 0 },
            KeyCode::Up | KeyCode::Char('k') => Command::Move { dx: 0, dy: -1 },
            KeyCode::Down | KeyCode::Char('j') => Command::Move { dx: 0, dy: 1 },
            KeyCode::Enter | KeyCode::Char(' ') => Command::Flip,
            KeyCode::Char('1') | KeyCode::Char('n') => Command::SwitchMode(Mode::Normal),
            KeyCode::Char('2') | KeyCode::Char('d') => Command::SwitchMode(Mode::Hard),
            KeyCode::Char('r') => Command::Restart,
            KeyCode::Char('?') => Command::ToggleHelp,
            _ => return None,
        };
        Some(command)
    }
}

/// Forward terminal input from a reader thread. Key releases are dropped.
pub fn terminal_input() -> Receiver<AppEvent> {
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
            Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
            Ok(_) => continue,
            Err(e) => {
                log::warn!("terminal input closed: {e}");
                break;
            }
        };
        if tx.send(evt).is_err() {
            break;
        }
    });

    rx
}

/// Source of game time for the runner, in milliseconds since the clock started
pub trait Clock {
    fn now_ms(&mut self) -> u64;
}

/// Real time measured from a fixed origin
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(origin: Instant) -> Self {
        Self { origin }
    }

    pub fn ms_at(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.origin).as_millis() as u64
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now_ms(&mut self) -> u64 {
        self.ms_at(Instant::now())
    }
}

/// Moves a fixed amount on every reading. Used to replay games at a known pace.
#[derive(Clone, Copy, Debug)]
pub struct SteppedClock {
    now: u64,
    step: u64,
}

impl SteppedClock {
    pub fn new(step_ms: u64) -> Self {
        Self { now: 0, step: step_ms }
    }
}

impl Clock for SteppedClock {
    fn now_ms(&mut self) -> u64 {
        self.now += self.step;
        self.now
    }
}

/// Drives a [`GameService`] from an input channel and a clock.
///
/// Each step waits up to `tick` for input, then advances the engine to the
/// clock's current reading. The engine is always fed the difference between
/// two absolute readings, so rounding never accumulates.
pub struct Runner<C: Clock> {
    input: Receiver<AppEvent>,
    tick: Duration,
    clock: C,
    fed_ms: u64,
}

impl<C: Clock> Runner<C> {
    pub fn new(input: Receiver<AppEvent>, tick: Duration, clock: C) -> Self {
        Self {
            input,
            tick,
            clock,
            fed_ms: 0,
        }
    }

    /// Game time handed to the engine so far
    pub fn fed_ms(&self) -> u64 {
        self.fed_ms
    }

    pub fn step(&mut self, service: &mut GameService) -> AppEvent {
        let event = match self.input.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        };

        let now = self.clock.now_ms();
        if now > self.fed_ms {
            service.advance(now - self.fed_ms);
            self.fed_ms = now;
        }
        event
    }
}
