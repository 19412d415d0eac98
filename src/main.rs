use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    fs::File,
    io::{self, stdout, Stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use match3::game::{Cell, Game, GameEvent, Phase, Position, TileColor};
use match3::GameConfig;

// ============================================================================
// Command Line
// ============================================================================

/// Match-3 in the terminal: swap neighbouring tiles to line up three or more.
#[derive(Debug, Parser)]
#[command(name = "match3", version)]
struct Args {
    /// Seed for tile colors. Random when omitted.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Pause between cascade steps so falls and clears stay visible.
    #[arg(long, default_value = "200", value_name = "MS")]
    step_ms: u64,

    /// Write logs to this file. RUST_LOG sets the filter.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

// ============================================================================
// Visual Constants
// ============================================================================

const TILE_CHAR: &str = "██";
const CURSOR_CHAR: &str = "▓▓";
const SELECTED_CHAR: &str = "░░";
const EMPTY_CHAR: &str = "  ";
const IDLE_POLL: Duration = Duration::from_millis(250);

fn tile_color(color: TileColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

// ============================================================================
// Input State
// ============================================================================

/// Cursor plus an optional first pick. The second pick becomes a swap request.
struct Selection {
    cursor: Position,
    picked: Option<Position>,
    message: String,
}

impl Selection {
    fn move_cursor(&mut self, d_row: isize, d_col: isize, size: usize) {
        let clamp = |v: usize, d: isize| v.saturating_add_signed(d).min(size - 1);
        self.cursor = Position::new(clamp(self.cursor.row, d_row), clamp(self.cursor.col, d_col));
    }

    fn pick(&mut self, game: &mut Game) {
        if !game.is_idle() {
            self.message = "Wait for the board to settle".into();
            return;
        }
        match self.picked.take() {
            None => self.picked = Some(self.cursor),
            Some(first) if first == self.cursor => {}
            Some(first) => {
                if let Err(err) = game.request_swap(first, self.cursor) {
                    self.message = err.to_string();
                }
            }
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &Game, selection: &Selection) {
    let area = frame.size();
    let size = game.grid().size() as u16;
    let grid_width = size * 2 + 2;
    let grid_height = size + 2;
    let info_width = 18;

    let main_area = centered_rect(grid_width + info_width, grid_height + 2, area);
    let vertical = Layout::vertical([Constraint::Length(grid_height), Constraint::Fill(1)]).split(main_area);
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_width),
        Constraint::Length(info_width),
    ])
    .split(vertical[0]);

    render_grid(frame, game, selection, horizontal[0]);
    render_info(frame, game, horizontal[1]);

    let footer = Paragraph::new(vec![
        Line::from(Span::styled(selection.message.as_str(), Style::default().fg(Color::Yellow))),
        Line::from("Arrows/HJKL: Move | Space: Pick | Q/ESC: Quit"),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, vertical[1]);
}

fn render_grid(frame: &mut Frame, game: &Game, selection: &Selection, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Match 3 ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = game
        .grid()
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let pos = Position::new(row, col);
                    match cell {
                        Cell::Empty => Span::raw(EMPTY_CHAR),
                        Cell::Occupied(tile) => {
                            let symbol = if selection.picked == Some(pos) {
                                SELECTED_CHAR
                            } else if selection.cursor == pos {
                                CURSOR_CHAR
                            } else {
                                TILE_CHAR
                            };
                            Span::styled(symbol, Style::default().fg(tile_color(tile.color)))
                        }
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let stats = game.stats();
    let state = match game.phase() {
        Phase::Idle => "Ready",
        Phase::AwaitingSwapResolution { .. } => "Swapping",
        Phase::Clearing { .. } => "Clearing",
        Phase::Collapsing => "Falling",
    };
    let lines = vec![
        Line::from(Span::styled(state, Style::default().fg(Color::Green))),
        Line::from(""),
        Line::from(Span::styled("Cleared", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", stats.tiles_cleared)),
        Line::from(Span::styled("Best chain", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", stats.longest_chain)),
        Line::from(Span::styled("Swaps", Style::default().fg(Color::Magenta))),
        Line::from(format!("{} / {}", stats.swaps_accepted, stats.swaps_rejected)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn describe(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::SwapRejected { .. } => Some("No match".into()),
        GameEvent::CascadeSettled { chains } if *chains > 1 => Some(format!("Chain x{}!", chains)),
        GameEvent::CascadeAborted { steps } => Some(format!("Cascade stopped after {} steps", steps)),
        _ => None,
    }
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, game: &mut Game, step: Duration) -> io::Result<()> {
    let size = game.grid().size();
    let mut selection = Selection {
        cursor: Position::new(0, 0),
        picked: None,
        message: String::new(),
    };
    let mut last_step = Instant::now();
    game.take_events();

    loop {
        terminal.draw(|frame| render(frame, game, &selection))?;

        let timeout = if game.is_idle() {
            IDLE_POLL
        } else {
            step.checked_sub(last_step.elapsed()).unwrap_or(Duration::ZERO)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    selection.message.clear();
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        KeyCode::Up | KeyCode::Char('k') => selection.move_cursor(-1, 0, size),
                        KeyCode::Down | KeyCode::Char('j') => selection.move_cursor(1, 0, size),
                        KeyCode::Left | KeyCode::Char('h') => selection.move_cursor(0, -1, size),
                        KeyCode::Right | KeyCode::Char('l') => selection.move_cursor(0, 1, size),
                        KeyCode::Char(' ') | KeyCode::Enter => {
                            selection.pick(game);
                            last_step = Instant::now();
                        }
                        _ => {}
                    }
                }
            }
        }

        if !game.is_idle() && last_step.elapsed() >= step {
            if let Err(err) = game.notify_visual_settled() {
                selection.message = err.to_string();
            }
            last_step = Instant::now();
        }

        for event in game.take_events() {
            if let Some(text) = describe(&event) {
                selection.message = text;
            }
        }
    }

    Ok(())
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = GameConfig::default();
    let mut game = match args.seed {
        Some(seed) => Game::seeded(config, seed),
        None => Game::new(config),
    }
    .map_err(io::Error::other)?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal, &mut game, Duration::from_millis(args.step_ms));

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
