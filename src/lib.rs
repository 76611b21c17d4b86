// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod deck;
pub mod events;
pub mod game;
pub mod history;
pub mod logging;
pub mod mode;
pub mod records;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod util;
pub mod view;

pub use deck::{build_deck, Card, CardId};
pub use events::GameEvent;
pub use game::{GameService, GameTimings};
pub use mode::Mode;
pub use session::Phase;
