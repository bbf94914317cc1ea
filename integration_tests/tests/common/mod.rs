#![allow(dead_code)]

use std::sync::mpsc::{channel, Receiver};

use board_core::{Board, BoardConfig};
use board_proto::{
    ActionKind, ActionRecord, Color, GameState, Point, ReducerRequest, RowChange, ShapeDef,
    TableUpdate, Terrain, Unit,
};

/// A mounted board with its first full paint done and the outbound
/// reducer channel's receiving end for assertions.
pub fn mounted_board() -> (Board, Receiver<ReducerRequest>) {
    let (tx, rx) = channel();
    let mut board = Board::mount(BoardConfig::default(), tx);
    board.start();
    let _ = board.render_frame();
    (board, rx)
}

pub fn unit(id: u64, x: f32, y: f32, size: f32, color: Color) -> Unit {
    Unit {
        id,
        shape: ShapeDef::circle(Point::new(x, y), size),
        color,
    }
}

pub fn terrain(id: u64, x: f32, y: f32, length: f32, height: f32, traversable: bool) -> Terrain {
    Terrain {
        id,
        shape: ShapeDef::rectangle(Point::new(x, y), Point::new(x + length, y + height)),
        color: Color::rgb(0x8f, 0xbc, 0x8f),
        traversable,
    }
}

pub fn insert_unit(board: &mut Board, row: Unit) {
    board.apply(TableUpdate::Unit(RowChange::Insert(row)));
}

pub fn snapshot_action(id: u64, snapshot: GameState) -> ActionRecord {
    ActionRecord {
        id,
        timestamp_ms: 1_000 * id,
        kind: ActionKind::SnapshotCapture,
        description: format!("Checkpoint {id}"),
        snapshot: Some(snapshot),
    }
}
