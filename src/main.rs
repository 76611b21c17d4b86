pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::KeyEvent,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn, LevelFilter};
use pairs::{
    app_dirs::AppDirs,
    celebration::Celebration,
    config::{ConfigStore, FileConfigStore},
    history::{GameHistory, HistoryEntry},
    logging,
    records::{MemoryRecordStore, RecordStore, Records, SqliteRecordStore},
    runtime::{self, AppEvent, Command, Runner, WallClock},
    view::BoardView,
    CardId, GameEvent, GameService, Mode,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;
const RECENT_GAMES: usize = 5;

/// memory pairs in the terminal: flip two cards, keep the matches, beat your best time
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Find every matching pair on the board as fast as you can. Normal deals 8 pairs on a 4x4 grid, hard deals 18 pairs on a 6x6 grid. Best times and wins are kept per mode."
)]
pub struct Cli {
    /// difficulty to start in (defaults to the last mode played)
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// seed for the shuffle, for replayable deals
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// how long a mismatched pair stays face up, in milliseconds
    #[clap(long)]
    mismatch_delay_ms: Option<u64>,

    /// log verbosity (written to the state directory)
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal front-end: the engine plus everything only the screen cares about
pub struct App {
    pub service: GameService,
    pub view: BoardView,
    pub cursor: usize,
    pub show_help: bool,
    pub celebration: Celebration,
    pub recent: Vec<HistoryEntry>,
}

impl App {
    pub fn new(service: GameService) -> Self {
        let mut app = Self {
            service,
            view: BoardView::default(),
            cursor: 0,
            show_help: false,
            celebration: Celebration::new(),
            recent: Vec::new(),
        };
        app.refresh_recent();
        app
    }

    /// Pull pending engine events into the view
    pub fn sync(&mut self, width: u16, height: u16) {
        let mut headline = None;
        for event in self.service.drain_events() {
            self.view.apply(&event);
            match event {
                GameEvent::DeckReady { ref cards, .. } => {
                    self.cursor = self.cursor.min(cards.len().saturating_sub(1));
                    self.celebration.stop();
                    headline = None;
                }
                GameEvent::Win => {
                    headline.get_or_insert("YOU WON");
                    self.refresh_recent();
                }
                // a record outranks the plain win in the same batch
                GameEvent::NewBestTime(_) => headline = Some("NEW BEST"),
                _ => {}
            }
        }
        if let Some(headline) = headline {
            self.celebration.start(headline, width, height);
        }
    }

    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let count = self.view.cards.len();
        if count == 0 {
            return;
        }
        let cols = self.view.mode.columns() as isize;
        let rows = count.div_ceil(cols as usize) as isize;
        let cursor = self.cursor as isize;

        let col = (cursor % cols + dx).clamp(0, cols - 1);
        let row = (cursor / cols + dy).clamp(0, rows - 1);
        self.cursor = ((row * cols + col) as usize).min(count - 1);
    }

    pub fn select(&mut self) {
        self.service.select_card(CardId(self.cursor));
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        self.service.switch_mode(mode);
        self.cursor = 0;
    }

    fn refresh_recent(&mut self) {
        if let Some(history) = self.service.history() {
            match history.recent(RECENT_GAMES) {
                Ok(recent) => self.recent = recent,
                Err(e) => warn!("reading {}: {}", history.path().display(), e),
            }
        }
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Flow {
    match Command::from_key(key) {
        Some(command) => run_command(app, command),
        None => Flow::Continue,
    }
}

fn run_command(app: &mut App, command: Command) -> Flow {
    match command {
        Command::Quit => return Flow::Quit,
        Command::Move { dx, dy } => app.move_cursor(dx, dy),
        Command::Flip => app.select(),
        Command::SwitchMode(mode) => app.switch_mode(mode),
        Command::Restart => app.service.restart(),
        Command::ToggleHelp => app.show_help = !app.show_help,
    }
    Flow::Continue
}

fn build_service(cli: &Cli, config: &pairs::config::Config) -> GameService {
    let store: Box<dyn RecordStore> = match SqliteRecordStore::new() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!("records database unavailable, best times won't persist: {e}");
            Box::new(MemoryRecordStore::new())
        }
    };
    let rng = cli
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let mut timings = config.timings();
    if let Some(ms) = cli.mismatch_delay_ms {
        timings.mismatch_delay_ms = ms;
    }

    let service = GameService::new(Records::new(store), rng, timings);
    match AppDirs::history_path() {
        Some(path) => service.with_history(GameHistory::with_path(path)),
        None => service,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&path, cli.log_level) {
            eprintln!("logging disabled: {e}");
        }
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    let mut app = App::new(build_service(&cli, &config));
    app.service.start_session(cli.mode.unwrap_or(config.mode));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(mode) = app.service.mode() {
        config.mode = mode;
        if let Err(e) = config_store.save(&config) {
            warn!("saving config: {e}");
        }
    }
    info!("bye");

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        runtime::terminal_input(),
        Duration::from_millis(TICK_RATE_MS),
        WallClock::new(),
    );

    loop {
        let size = terminal.size()?;
        app.sync(size.width, size.height);
        app.celebration.update();
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        if let AppEvent::Key(key) = runner.step(&mut app.service) {
            if handle_key(app, key) == Flow::Quit {
                break;
            }
        }
    }

    Ok(())
}
