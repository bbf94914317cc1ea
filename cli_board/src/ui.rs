use std::collections::VecDeque;

use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use board_core::Board;
use board_proto::{ActionKind, Point};

/// The board pane's backdrop, the light gray the original page used.
const BOARD_BG: (u16, u16, u16) = (0xf0, 0xf0, 0xf0);

pub struct UiState {
    pub logs: VecDeque<String>,
    pub max_logs: usize,
    pub connected: bool,
    pub delete_mode: bool,
    pub chat_input: Option<String>,
    pub pointer: Point,
    pub palette_index: usize,
    pub selected_snapshot: Option<u64>,
    /// Inner rect of the board pane from the last draw, for mapping
    /// terminal cells back to board coordinates.
    pub board_area: Rect,
    pub board_size: (u32, u32),
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            logs: VecDeque::new(),
            max_logs: 8,
            connected: false,
            delete_mode: false,
            chat_input: None,
            pointer: Point::new(300.0, 200.0),
            palette_index: 0,
            selected_snapshot: None,
            board_area: Rect::default(),
            board_size: (600, 400),
        }
    }
}

impl UiState {
    pub fn push_log<S: Into<String>>(&mut self, line: S) {
        let mut text: String = line.into();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        if text.is_empty() {
            return;
        }
        self.logs.push_front(text);
        while self.logs.len() > self.max_logs {
            self.logs.pop_back();
        }
    }

    pub fn next_color(&mut self, palette: &[board_proto::Color]) -> board_proto::Color {
        let color = palette[self.palette_index % palette.len()];
        self.palette_index += 1;
        color
    }

    /// Map a terminal cell onto board coordinates, if it lies inside the
    /// board pane. Each cell covers one column and two pixel rows of the
    /// downsampled composite.
    pub fn board_position(&self, column: u16, row: u16) -> Option<Point> {
        let area = self.board_area;
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let (board_w, board_h) = self.board_size;
        let x = (f32::from(column - area.x) + 0.5) * board_w as f32 / f32::from(area.width);
        let y = (f32::from(row - area.y) + 0.5) * board_h as f32 / f32::from(area.height);
        Some(Point::new(x, y))
    }
}

pub fn draw_ui(frame: &mut Frame, state: &mut UiState, board: &Board) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(7),
        ])
        .split(frame.size());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(38)])
        .split(chunks[1]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main[1]);

    draw_header(frame, chunks[0], state, board);
    draw_board(frame, main[0], state, board);
    draw_action_log(frame, side[0], state, board);
    draw_chat(frame, side[1], state, board);
    draw_logs(frame, chunks[2], state);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &UiState, board: &Board) {
    let block = Block::default().borders(Borders::ALL).title("Tabletop Board");
    let connection = if state.connected {
        Span::styled("Connected", Style::default().fg(Color::Green))
    } else {
        Span::styled("Waiting for backend", Style::default().fg(Color::Yellow))
    };
    let view = match board.view_mode() {
        board_core::ViewMode::Live => Span::styled("live", Style::default().fg(Color::Cyan)),
        board_core::ViewMode::Viewing(id) => Span::styled(
            format!("viewing action {}", id),
            Style::default().fg(Color::Magenta),
        ),
    };
    let store = board.store();
    let mut status = vec![
        connection,
        Span::raw(" | view: "),
        view,
        Span::raw(" | units "),
        Span::styled(
            format!("{}", store.units().len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | terrain "),
        Span::styled(
            format!("{}", store.terrain().len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | decals "),
        Span::styled(
            format!("{}", store.underlays().len() + store.overlays().len()),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if state.delete_mode {
        status.push(Span::styled(
            " | DELETE MODE",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    let hints = Line::from(Span::raw(
        "q quit | r roll | a unit | g/b terrain | n underlay | o overlay | d delete | x clear | [ ] scrub | l live | c chat",
    ));
    let text = Paragraph::new(vec![Line::from(status), hints]).wrap(Wrap { trim: true });
    frame.render_widget(block, area);
    frame.render_widget(
        text,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

/// Blit the composited board into the pane, two pixel rows per cell via
/// the upper-half-block glyph.
fn draw_board(frame: &mut Frame, area: Rect, state: &mut UiState, board: &Board) {
    let block = Block::default().borders(Borders::ALL).title("Board");
    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });
    frame.render_widget(block, area);
    let surface = board.frame();
    state.board_area = inner;
    state.board_size = (surface.width(), surface.height());
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let sample = |cell_x: u32, sub_row: u32| -> Color {
        let sx = (cell_x * surface.width() / u32::from(inner.width)).min(surface.width() - 1);
        let sy = (sub_row * surface.height() / (2 * u32::from(inner.height)))
            .min(surface.height() - 1);
        over_backdrop(surface.pixel(sx, sy))
    };

    let mut lines = Vec::with_capacity(inner.height as usize);
    for cell_y in 0..u32::from(inner.height) {
        let mut spans = Vec::with_capacity(inner.width as usize);
        for cell_x in 0..u32::from(inner.width) {
            let upper = sample(cell_x, 2 * cell_y);
            let lower = sample(cell_x, 2 * cell_y + 1);
            spans.push(Span::styled(
                "▀",
                Style::default().fg(upper).bg(lower),
            ));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn over_backdrop(pixel: board_proto::Color) -> Color {
    let alpha = u16::from(pixel.a);
    let channel = |c: u8, bg: u16| -> u8 {
        ((u16::from(c) * alpha + bg * (255 - alpha)) / 255) as u8
    };
    Color::Rgb(
        channel(pixel.r, BOARD_BG.0),
        channel(pixel.g, BOARD_BG.1),
        channel(pixel.b, BOARD_BG.2),
    )
}

fn draw_action_log(frame: &mut Frame, area: Rect, state: &UiState, board: &Board) {
    let block = Block::default().borders(Borders::ALL).title("Action Log");
    let lines: Vec<Line> = if board.action_log().is_empty() {
        // Passive placeholder until the action stream produces anything.
        vec![Line::from(Span::styled(
            "Waiting for action data...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        board
            .action_log()
            .iter()
            .map(|action| {
                let mut spans = vec![Span::styled(
                    format!("[{}] ", format_clock(action.timestamp_ms)),
                    Style::default().fg(Color::DarkGray),
                )];
                if board.history().lookup(action.id).is_some() {
                    let marker = if state.selected_snapshot == Some(action.id) {
                        Span::styled("● ", Style::default().fg(Color::Magenta))
                    } else {
                        Span::styled("● ", Style::default().fg(Color::Cyan))
                    };
                    spans.push(marker);
                }
                spans.push(Span::raw(action.description.clone()));
                Line::from(spans)
            })
            .collect()
    };
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_chat(frame: &mut Frame, area: Rect, state: &UiState, board: &Board) {
    let block = Block::default().borders(Borders::ALL).title("Chat");
    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let capacity = inner.height.saturating_sub(1) as usize;
    let mut messages: Vec<Line> = board
        .action_log()
        .iter()
        .filter(|action| action.kind == ActionKind::Chat)
        .take(capacity)
        .map(|action| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", format_clock(action.timestamp_ms)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(action.description.clone()),
            ])
        })
        .collect();
    messages.reverse();

    let input = match &state.chat_input {
        Some(buffer) => Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Green)),
            Span::raw(buffer.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        None => Line::from(Span::styled(
            "press c to chat",
            Style::default().fg(Color::DarkGray),
        )),
    };
    messages.push(input);
    frame.render_widget(Paragraph::new(messages).wrap(Wrap { trim: false }), inner);
}

fn draw_logs(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Logs");
    let lines: Vec<Line> = state
        .logs
        .iter()
        .map(|entry| Line::from(Span::raw(entry)))
        .collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn format_clock(timestamp_ms: u64) -> String {
    let secs = timestamp_ms / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}
