use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::{Color, Point, ShapeKind};

/// One invocation of a backend reducer.
///
/// The client never mutates its own mirror in response to these; the
/// authoritative effect arrives later as a table update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReducerRequest {
    MoveUnit {
        id: u64,
        x: f32,
        y: f32,
    },
    AddUnit {
        x: f32,
        y: f32,
        size: f32,
        color: Color,
    },
    AddTerrain {
        x: f32,
        y: f32,
        length: f32,
        height: f32,
        traversable: bool,
    },
    AddUnderlay {
        kind: ShapeKind,
        size: Vec<f32>,
        color: Color,
        position: Vec<Point>,
    },
    AddOverlay {
        kind: ShapeKind,
        size: Vec<f32>,
        color: Color,
        position: Vec<Point>,
    },
    DeleteUnit {
        id: u64,
    },
    DeleteAt {
        x: f32,
        y: f32,
    },
    DeleteAll,
    RollDice,
    Chat {
        game: u64,
        text: String,
    },
}

impl ReducerRequest {
    /// The newline-terminated text line the backend's command listener
    /// accepts. Variable-length vectors are written as a count followed by
    /// their elements.
    pub fn command_line(&self) -> String {
        match self {
            ReducerRequest::MoveUnit { id, x, y } => {
                format!("move_unit {} {:.2} {:.2}\n", id, x, y)
            }
            ReducerRequest::AddUnit { x, y, size, color } => {
                format!("add_unit {:.2} {:.2} {:.2} {}\n", x, y, size, color)
            }
            ReducerRequest::AddTerrain {
                x,
                y,
                length,
                height,
                traversable,
            } => format!(
                "add_terrain {:.2} {:.2} {:.2} {:.2} {}\n",
                x, y, length, height, traversable
            ),
            ReducerRequest::AddUnderlay {
                kind,
                size,
                color,
                position,
            } => shape_line("add_underlay", *kind, size, *color, position),
            ReducerRequest::AddOverlay {
                kind,
                size,
                color,
                position,
            } => shape_line("add_overlay", *kind, size, *color, position),
            ReducerRequest::DeleteUnit { id } => format!("delete_unit {}\n", id),
            ReducerRequest::DeleteAt { x, y } => format!("delete_at {:.2} {:.2}\n", x, y),
            ReducerRequest::DeleteAll => "delete_all\n".to_string(),
            ReducerRequest::RollDice => "roll_dice\n".to_string(),
            ReducerRequest::Chat { game, text } => format!("chat {} {}\n", game, text),
        }
    }
}

fn shape_line(
    verb: &str,
    kind: ShapeKind,
    size: &[f32],
    color: Color,
    position: &[Point],
) -> String {
    let mut line = format!("{} {} {} {}", verb, kind.as_str(), color, size.len());
    for value in size {
        let _ = write!(line, " {:.2}", value);
    }
    let _ = write!(line, " {}", position.len());
    for point in position {
        let _ = write!(line, " {:.2} {:.2}", point.x, point.y);
    }
    line.push('\n');
    line
}
