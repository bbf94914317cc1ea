use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use board_core::{Board, BoardConfig, PointerEvent, PointerPhase};
use board_proto::{Color, Point, ReducerRequest, ShapeKind, TableUpdate};

use crate::ui::{draw_ui, UiState};

/// Colors cycled through by the add-unit key, the setup form palette.
const PALETTE: [Color; 5] = [
    Color::BLUE,
    Color::RED,
    Color::GREEN,
    Color::ORANGE,
    Color::PURPLE,
];

pub struct BoardTerminal {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    board: Board,
    ui_state: UiState,
    receiver: UnboundedReceiver<TableUpdate>,
    shutdown_sender: Sender<()>,
    log_receiver: Receiver<String>,
}

impl BoardTerminal {
    pub fn new(
        game: u64,
        receiver: UnboundedReceiver<TableUpdate>,
        command_sender: Sender<ReducerRequest>,
        shutdown_sender: Sender<()>,
        log_receiver: Receiver<String>,
    ) -> Result<Self> {
        let mut stdout = std::io::stdout();
        execute!(stdout, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        crossterm::terminal::enable_raw_mode()?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        let config = BoardConfig {
            game,
            ..BoardConfig::default()
        };
        Ok(Self {
            terminal,
            board: Board::mount(config, command_sender),
            ui_state: UiState::default(),
            receiver,
            shutdown_sender,
            log_receiver,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let mut last_draw = Instant::now();
        self.board.start();

        loop {
            while let Ok(update) = self.receiver.try_recv() {
                self.ui_state.connected = true;
                self.board.apply(update);
            }

            while let Ok(line) = self.log_receiver.try_recv() {
                self.ui_state.push_log(line);
            }

            if self.board.frame_pending() {
                let _ = self.board.render_frame();
            }

            if last_draw.elapsed() >= Duration::from_millis(100) {
                let ui_state = &mut self.ui_state;
                let board = &self.board;
                self.terminal
                    .draw(|frame| draw_ui(frame, ui_state, board))?;
                last_draw = Instant::now();
            }

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        self.terminal.show_cursor()?;
        crossterm::terminal::disable_raw_mode()?;
        let _ = execute!(self.terminal.backend_mut(), DisableMouseCapture);
        let _ = self.shutdown_sender.send(());
        Ok(())
    }

    /// Returns true when the session should end.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // An open chat input swallows every key first.
        if self.ui_state.chat_input.is_some() {
            self.handle_chat_key(key.code);
            return false;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => {
                self.board.send(ReducerRequest::RollDice);
                info!("Requested dice roll");
            }
            KeyCode::Char('c') => {
                self.ui_state.chat_input = Some(String::new());
            }
            KeyCode::Char('d') => {
                self.ui_state.delete_mode = !self.ui_state.delete_mode;
                info!(
                    "Delete mode {}",
                    if self.ui_state.delete_mode { "on" } else { "off" }
                );
            }
            KeyCode::Char('a') => {
                let pos = self.ui_state.pointer;
                let color = self.ui_state.next_color(&PALETTE);
                self.board.send(ReducerRequest::AddUnit {
                    x: pos.x,
                    y: pos.y,
                    size: 28.0,
                    color,
                });
            }
            KeyCode::Char('g') => self.add_terrain(true),
            KeyCode::Char('b') => self.add_terrain(false),
            KeyCode::Char('n') => {
                let pos = self.ui_state.pointer;
                self.board.send(ReducerRequest::AddUnderlay {
                    kind: ShapeKind::Rectangle,
                    size: Vec::new(),
                    color: Color::rgb(0xbd, 0xc3, 0xc7),
                    position: vec![pos, Point::new(pos.x + 80.0, pos.y + 40.0)],
                });
            }
            KeyCode::Char('o') => {
                let pos = self.ui_state.pointer;
                self.board.send(ReducerRequest::AddOverlay {
                    kind: ShapeKind::Circle,
                    size: vec![24.0],
                    color: Color::ORANGE,
                    position: vec![pos],
                });
            }
            KeyCode::Char('x') => {
                self.board.send(ReducerRequest::DeleteAll);
                info!("Requested board clear");
            }
            KeyCode::Char('[') => self.scrub_older(),
            KeyCode::Char(']') => self.scrub_newer(),
            KeyCode::Char('l') => {
                self.ui_state.selected_snapshot = None;
                let _ = self.board.scrub(None);
            }
            _ => {}
        }
        false
    }

    fn handle_chat_key(&mut self, code: KeyCode) {
        let Some(buffer) = self.ui_state.chat_input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => self.ui_state.chat_input = None,
            KeyCode::Enter => {
                let text = buffer.trim().to_string();
                if !text.is_empty() {
                    self.board.send(ReducerRequest::Chat {
                        game: self.board.game(),
                        text,
                    });
                }
                self.ui_state.chat_input = None;
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
    }

    fn add_terrain(&mut self, traversable: bool) {
        let pos = self.ui_state.pointer;
        self.board.send(ReducerRequest::AddTerrain {
            x: pos.x,
            y: pos.y,
            length: 100.0,
            height: 50.0,
            traversable,
        });
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(pos) = self.ui_state.board_position(mouse.column, mouse.row) else {
            return;
        };
        self.ui_state.pointer = pos;
        // Gestures are view-gated; the board suppresses drags itself, but
        // delete clicks are interpreted here so they need the same gate.
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !self.board.view_mode().is_live() {
                    return;
                }
                if self.ui_state.delete_mode {
                    match self.board.unit_at(pos) {
                        Some(id) => self.board.send(ReducerRequest::DeleteUnit { id }),
                        None => self.board.send(ReducerRequest::DeleteAt { x: pos.x, y: pos.y }),
                    }
                } else {
                    self.board
                        .handle_pointer(PointerEvent::new(PointerPhase::Down, pos));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.ui_state.delete_mode {
                    self.board
                        .handle_pointer(PointerEvent::new(PointerPhase::Move, pos));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if !self.ui_state.delete_mode {
                    self.board
                        .handle_pointer(PointerEvent::new(PointerPhase::Up, pos));
                }
            }
            _ => {}
        }
    }

    fn scrub_older(&mut self) {
        let keys = self.board.snapshot_actions();
        if keys.is_empty() {
            warn!("No snapshots recorded yet");
            return;
        }
        let next = match self.selected_index(&keys) {
            None => 0,
            Some(index) => (index + 1).min(keys.len() - 1),
        };
        self.select_snapshot(keys[next]);
    }

    fn scrub_newer(&mut self) {
        let keys = self.board.snapshot_actions();
        match self.selected_index(&keys) {
            None => {}
            Some(0) => {
                self.ui_state.selected_snapshot = None;
                let _ = self.board.scrub(None);
            }
            Some(index) => self.select_snapshot(keys[index - 1]),
        }
    }

    fn selected_index(&self, keys: &[u64]) -> Option<usize> {
        let selected = self.ui_state.selected_snapshot?;
        keys.iter().position(|id| *id == selected)
    }

    fn select_snapshot(&mut self, id: u64) {
        if self.board.scrub(Some(id)).is_ok() {
            self.ui_state.selected_snapshot = Some(id);
        }
    }
}

pub fn channel() -> (UnboundedSender<TableUpdate>, UnboundedReceiver<TableUpdate>) {
    unbounded_channel()
}
