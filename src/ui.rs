pub mod board;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use pairs::{
    celebration::Celebration,
    util::format_time,
    view::{Banner, CardView},
    Mode,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;

const HOW_TO_PLAY: &str = "Flip two cards per turn with Enter or Space.\n\
Matching ranks stay found; a mismatch flips back after a moment.\n\
Find every pair to win. The clock runs from the first deal.\n\n\
arrows / hjkl  move      1 / n  normal (4x4)     2 / d  hard (6x6)\n\
r  restart     ?  close this help     q / esc  quit";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = &self.view;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1), // mode tabs
                Constraint::Length(1), // score line
                Constraint::Min(3),    // board
                Constraint::Length(1), // banner
                Constraint::Length(1), // recent games
                Constraint::Length(1), // legend
            ])
            .split(area);

        let tabs = Itertools::intersperse(
            Mode::ALL.iter().map(|&mode| {
                let label = format!(" {} ", mode);
                if mode == view.mode {
                    Span::styled(label, bold_style.fg(Color::Black).bg(Color::Cyan))
                } else {
                    Span::styled(label, dim_style)
                }
            }),
            Span::raw(" "),
        )
        .collect::<Vec<Span>>();
        Paragraph::new(Line::from(tabs))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let status = format!(
            "correct pairs {}   remaining {}   time {}   best {}   wins {}",
            view.correct_pairs, view.pairs_remaining, view.timer, view.best_time, view.wins
        );
        Paragraph::new(Span::styled(status, bold_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        render_board(self, chunks[2], buf);

        let banner = view
            .banners
            .iter()
            .map(|b| match b {
                Banner::Won => "Congratulations, you've won!".to_string(),
                Banner::NewBest(time) => format!("New best time! {time}"),
            })
            .join("   ");
        Paragraph::new(Span::styled(banner, bold_style.fg(Color::Green)))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        if !self.recent.is_empty() {
            let recent = self
                .recent
                .iter()
                .map(|g| {
                    format!(
                        "{} {}{}",
                        g.mode,
                        format_time(g.elapsed_secs),
                        if g.new_best { "*" } else { "" }
                    )
                })
                .join("  ·  ");
            Paragraph::new(Span::styled(format!("recent: {recent}"), dim_style))
                .alignment(Alignment::Center)
                .render(chunks[4], buf);
        }

        Paragraph::new(Span::styled(
            "(enter) flip  (1) normal  (2) hard  (r)estart  (?) help  (esc)ape",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        if self.show_help {
            render_help(area, buf);
        }

        if self.celebration.is_active {
            render_celebration_particles(&self.celebration, area, buf);
        }
    }
}

fn render_board(app: &App, area: Rect, buf: &mut Buffer) {
    let view = &app.view;
    let rects = board::card_rects(area, view.mode.columns(), view.cards.len());

    for (idx, (card, rect)) in view.cards.iter().zip(rects).enumerate() {
        let is_cursor = idx == app.cursor;
        let (label, label_style) = match card {
            CardView::FaceDown => ("?".to_string(), Style::default().fg(Color::Blue)),
            CardView::FaceUp(rank) => (
                rank.to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            CardView::Gone if is_cursor => ("·".to_string(), Style::default()),
            CardView::Gone => continue,
        };

        let border_style = if is_cursor {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if *card == CardView::Gone {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };

        let block = Block::bordered().border_style(border_style);
        let inner = block.inner(rect);
        if inner.width == 0 || label.width() > inner.width as usize {
            // no room for a frame: show the bare label
            Paragraph::new(Span::styled(label, label_style.patch(border_style)))
                .render(rect, buf);
            continue;
        }

        let padding = inner.height.saturating_sub(1) / 2;
        let mut lines = vec![Line::default(); padding as usize];
        lines.push(Line::from(Span::styled(label, label_style)));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .render(rect, buf);
    }
}

fn render_help(area: Rect, buf: &mut Buffer) {
    let width = area.width.saturating_sub(4).min(72);
    let height = area.height.saturating_sub(2).min(9);
    let pane = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    Clear.render(pane, buf);
    Paragraph::new(HOW_TO_PLAY)
        .block(Block::bordered().title(" How to play "))
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: false })
        .render(pane, buf);
}

/// Render celebration particles on top of the board
fn render_celebration_particles(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        // fade out with age
        let alpha = 1.0 - (particle.age / particle.max_age);
        let style = if particle.is_text || alpha > 0.7 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if alpha > 0.3 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairs::{
        records::{MemoryRecordStore, Records},
        CardId, GameService, GameTimings,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn test_app(mode: Mode) -> App {
        let service = GameService::new(
            Records::new(Box::new(MemoryRecordStore::new())),
            StdRng::seed_from_u64(21),
            GameTimings::default(),
        );
        let mut app = App::new(service);
        app.service.start_session(mode);
        app.sync(80, 30);
        app
    }

    fn rendered(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .join("\n")
    }

    #[test]
    fn test_fresh_board_shows_status_and_hidden_cards() {
        let app = test_app(Mode::Normal);
        let screen = rendered(&app, 80, 30);

        assert!(screen.contains("correct pairs 0"));
        assert!(screen.contains("remaining 8"));
        assert!(screen.contains("time 00:00"));
        assert!(screen.contains("best --:--"));
        assert_eq!(screen.matches('?').count(), 16 + 1); // cards plus the legend's "(?)"
    }

    #[test]
    fn test_revealed_card_shows_rank() {
        let mut app = test_app(Mode::Normal);
        let rank = app.service.session().unwrap().deck()[0].rank;
        app.service.select_card(CardId(0));
        app.sync(80, 30);

        let screen = rendered(&app, 80, 30);
        assert!(screen.contains(&format!("│{:^7}│", rank)));
    }

    #[test]
    fn test_help_pane() {
        let mut app = test_app(Mode::Hard);
        app.show_help = true;
        let screen = rendered(&app, 100, 40);
        assert!(screen.contains("How to play"));
        assert!(screen.contains("Find every pair to win."));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let app = test_app(Mode::Hard);
        rendered(&app, 10, 8);
    }
}
