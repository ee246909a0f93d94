//! # Console Viewer
//!
//! Terminal front end for the simulator. The circuit is drawn two cells per
//! pixel in a viewport that follows a cursor.
//!
//! ## Keys
//! - arrows: move the cursor
//! - space: toggle the wire under the cursor
//! - `r`: run / pause, `n`: single tick while paused
//! - `l`: reload the image from disk (wire states carry over)
//! - `h`: help, `q` / Esc: quit

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use serde::{Deserialize, Serialize};

use crate::pixel::load_bitmap;
use crate::simulator::Simulator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub refresh_rate_ms: u64,
    pub show_stats: bool,
    pub start_running: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 50,
            show_stats: true,
            start_running: true,
        }
    }
}

/// First visible index along one axis so `cursor` stays centered while the
/// window never leaves the grid.
pub fn viewport_offset(cursor: usize, visible: usize, total: usize) -> usize {
    cursor
        .saturating_sub(visible / 2)
        .min(total.saturating_sub(visible))
}

pub struct ConsoleApp {
    simulator: Simulator,
    image_path: Option<PathBuf>,
    config: ConsoleConfig,
    ticks_per_refresh: u32,
    running: bool,
    quit: bool,
    show_help: bool,
    cursor: (usize, usize),
    status: String,
}

impl ConsoleApp {
    pub fn new(
        simulator: Simulator,
        image_path: Option<PathBuf>,
        config: ConsoleConfig,
        ticks_per_refresh: u32,
    ) -> Self {
        Self {
            simulator,
            image_path,
            running: config.start_running,
            config,
            ticks_per_refresh,
            quit: false,
            show_help: false,
            cursor: (0, 0),
            status: String::new(),
        }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
        run_then_restore(
            || {
                let mut stdout = io::stdout();
                execute!(stdout, EnterAlternateScreen)
                    .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;
                let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
                self.event_loop(&mut terminal)
            },
            restore_terminal,
        )
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let refresh = Duration::from_millis(self.config.refresh_rate_ms.max(1));
        let mut last_draw: Option<Instant> = None;

        while !self.quit {
            if event::poll(Duration::from_millis(5))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if last_draw.map_or(true, |t| t.elapsed() >= refresh) {
                if self.running {
                    self.simulator.simulate_n(self.ticks_per_refresh);
                }
                terminal.draw(|f| self.draw_ui(f))?;
                last_draw = Some(Instant::now());
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        let (width, height) = self.simulator.size();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('h') | KeyCode::Char('H') => self.show_help = true,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.running = !self.running;
                debug!("running: {}", self.running);
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                if !self.running {
                    self.simulator.simulate();
                }
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.reload(),
            KeyCode::Char(' ') => self.toggle_cursor_wire(),
            KeyCode::Left => self.cursor.0 = self.cursor.0.saturating_sub(1),
            KeyCode::Right if self.cursor.0 + 1 < width => self.cursor.0 += 1,
            KeyCode::Up => self.cursor.1 = self.cursor.1.saturating_sub(1),
            KeyCode::Down if self.cursor.1 + 1 < height => self.cursor.1 += 1,
            other => debug!("unhandled key {:?}", other),
        }
    }

    fn toggle_cursor_wire(&mut self) {
        let (x, y) = self.cursor;
        let result = self
            .simulator
            .get(x, y)
            .and_then(|state| self.simulator.set(x, y, !state));
        self.status = match result {
            Ok(true) => format!("toggled wire at ({}, {})", x, y),
            Ok(false) => format!("({}, {}) is not a wire", x, y),
            Err(e) => e.to_string(),
        };
    }

    fn reload(&mut self) {
        let Some(path) = self.image_path.clone() else {
            self.status = "no image file to reload".to_string();
            return;
        };
        match load_bitmap(&path) {
            Ok(bitmap) => {
                self.simulator.load_image(&bitmap);
                let (width, height) = self.simulator.size();
                self.cursor = (
                    self.cursor.0.min(width.saturating_sub(1)),
                    self.cursor.1.min(height.saturating_sub(1)),
                );
                self.status = format!("reloaded '{}'", path.display());
            }
            Err(e) => {
                error!("reload of '{}' failed: {}", path.display(), e);
                self.status = format!("reload failed: {}", e);
            }
        }
    }

    fn draw_ui(&self, f: &mut Frame) {
        let size = f.size();

        if self.show_help {
            self.draw_help_screen(f);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(size);

        if self.config.show_stats {
            let content = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(10), Constraint::Length(30)])
                .split(chunks[0]);
            self.draw_circuit(f, content[0]);
            self.draw_stats(f, content[1]);
        } else {
            self.draw_circuit(f, chunks[0]);
        }

        let status = if self.status.is_empty() {
            "h=help  q=quit  r=run/pause  n=step  space=toggle  l=reload"
        } else {
            self.status.as_str()
        };
        let status_bar = Paragraph::new(status)
            .style(Style::default().fg(Color::White))
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(status_bar, chunks[1]);
    }

    fn draw_circuit(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Circuit");
        let inner = block.inner(area);
        let (width, height) = self.simulator.size();
        let cols = (inner.width as usize / 2).min(width);
        let rows = (inner.height as usize).min(height);
        let off_x = viewport_offset(self.cursor.0, cols, width);
        let off_y = viewport_offset(self.cursor.1, rows, height);

        let mut lines = Vec::with_capacity(rows);
        for y in off_y..off_y + rows {
            let mut spans = Vec::with_capacity(cols);
            for x in off_x..off_x + cols {
                let wire = self.simulator.wire_at(x, y).ok().flatten();
                let powered = wire
                    .and_then(|w| self.simulator.wire_state(w))
                    .unwrap_or(false);
                let bg = match (wire.is_some(), powered) {
                    _ if (x, y) == self.cursor => Color::Magenta,
                    (true, true) => Color::Yellow,
                    (true, false) => Color::DarkGray,
                    (false, _) => Color::Black,
                };
                spans.push(Span::styled("  ", Style::default().bg(bg)));
            }
            lines.push(Line::from(spans));
        }

        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_stats(&self, f: &mut Frame, area: Rect) {
        let (width, height) = self.simulator.size();
        let (x, y) = self.cursor;
        let cursor_wire = match self.simulator.wire_at(x, y) {
            Ok(Some(wire)) => format!(
                "{} = {}",
                wire,
                self.simulator.wire_state(wire).unwrap_or(false)
            ),
            _ => "-".to_string(),
        };

        let run_style = if self.running {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };
        let stats = vec![
            Line::from(vec![Span::styled(
                if self.running { "● Running" } else { "● Paused" },
                run_style.add_modifier(Modifier::BOLD),
            )]),
            Line::from(format!("Size: {}x{}", width, height)),
            Line::from(format!("Wires: {}", self.simulator.wire_count())),
            Line::from(format!("Gates: {}", self.simulator.gate_count())),
            Line::from(format!("Ticks: {}", self.simulator.ticks())),
            Line::from(format!("Ticks/frame: {}", self.ticks_per_refresh)),
            Line::from(""),
            Line::from(format!("Cursor: ({}, {})", x, y)),
            Line::from(format!("Wire: {}", cursor_wire)),
        ];

        let widget = Paragraph::new(stats)
            .block(Block::default().borders(Borders::ALL).title("Circuit Info"))
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
    }

    fn draw_help_screen(&self, f: &mut Frame) {
        let size = f.size();
        let key = |k: &'static str, text: &'static str| {
            Line::from(vec![
                Span::styled(k, Style::default().fg(Color::Yellow)),
                Span::raw(text),
            ])
        };
        let help_text = vec![
            Line::from(vec![Span::styled(
                "Bitmap Logic Console Help",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            key("  arrows", " - Move the cursor"),
            key("  space", " - Toggle the wire under the cursor"),
            key("  r", " - Run / pause the simulation"),
            key("  n", " - Single tick while paused"),
            key("  l", " - Reload the image from disk"),
            key("  h", " - Show this help"),
            key("  q, Esc", " - Quit"),
            Line::from(""),
            Line::from("Yellow cells are powered wires, grey cells unpowered wires."),
            Line::from(""),
            Line::from("Press any key to return..."),
        ];

        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, size);
    }
}

/// Run `body`, then `restore` no matter how `body` ended. An error from
/// `body` takes precedence over one from `restore`.
fn run_then_restore<T>(
    body: impl FnOnce() -> Result<T, Box<dyn std::error::Error>>,
    restore: impl FnOnce() -> Result<(), Box<dyn std::error::Error>>,
) -> Result<T, Box<dyn std::error::Error>> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

/// Leave raw mode and the alternate screen. Every step is attempted; the
/// first failure is reported.
fn restore_terminal() -> Result<(), Box<dyn std::error::Error>> {
    let raw = disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e));
    let screen = execute!(io::stdout(), LeaveAlternateScreen, Show)
        .map_err(|e| format!("Failed to leave alternate screen: {}", e));
    raw?;
    screen?;
    Ok(())
}

/// Run the console viewer until the user quits.
pub fn run_console(
    simulator: Simulator,
    image_path: Option<PathBuf>,
    config: ConsoleConfig,
    ticks_per_refresh: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = ConsoleApp::new(simulator, image_path, config, ticks_per_refresh);
    app.run()
}
