//! Wire types shared between the board client and the backend module.
//!
//! The backend owns the authoritative tables (units, terrain, underlays,
//! overlays, actions); the client mirrors them from row-change
//! notifications and invokes reducers by name. Subscription frames are
//! length-prefixed bincode; reducer calls go out as text command lines.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod commands;

pub use commands::ReducerRequest;

/// A position in board space. The origin is the board's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An RGBA display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    // The setup palette the original forms offered.
    pub const BLUE: Color = Color::rgb(0x34, 0x98, 0xdb);
    pub const RED: Color = Color::rgb(0xe7, 0x4c, 0x3c);
    pub const GREEN: Color = Color::rgb(0x2e, 0xcc, 0x71);
    pub const ORANGE: Color = Color::rgb(0xf3, 0x9c, 0x12);
    pub const PURPLE: Color = Color::rgb(0x9b, 0x59, 0xb6);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when a color string cannot be interpreted.
#[derive(Debug, Error)]
#[error("unrecognized color '{0}'")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "black" => return Ok(Color::BLACK),
            "white" => return Ok(Color::WHITE),
            "blue" => return Ok(Color::BLUE),
            "red" => return Ok(Color::RED),
            "green" => return Ok(Color::GREEN),
            "orange" => return Ok(Color::ORANGE),
            "purple" => return Ok(Color::PURPLE),
            _ => {}
        }
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError(s.to_string()))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Color::rgb(parse(0..2)?, parse(2..4)?, parse(4..6)?))
    }
}

/// Closed set of drawable shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Line,
    Polygon,
    Text,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Line => "line",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Text => "text",
        }
    }
}

/// Geometry of one entity: a shape tag plus its size and position vectors.
///
/// Position counts are shape-dependent (circle/text 1, rectangle/line 2,
/// polygon at least 3). A definition with too few entries is not an error;
/// the renderer skips it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDef {
    pub kind: ShapeKind,
    pub size: Vec<f32>,
    pub position: Vec<Point>,
    /// Display string for `Text` shapes; unused by the others.
    pub label: String,
}

impl ShapeDef {
    pub fn circle(center: Point, diameter: f32) -> Self {
        Self {
            kind: ShapeKind::Circle,
            size: vec![diameter],
            position: vec![center],
            label: String::new(),
        }
    }

    /// Rectangle from a top-left and bottom-right corner. Callers may pass
    /// an inverted pair; the difference is forwarded to the surface as-is.
    pub fn rectangle(top_left: Point, bottom_right: Point) -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            size: Vec::new(),
            position: vec![top_left, bottom_right],
            label: String::new(),
        }
    }

    pub fn line(from: Point, to: Point, width: f32) -> Self {
        Self {
            kind: ShapeKind::Line,
            size: vec![width],
            position: vec![from, to],
            label: String::new(),
        }
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        Self {
            kind: ShapeKind::Polygon,
            size: Vec::new(),
            position: points,
            label: String::new(),
        }
    }

    pub fn text(origin: Point, font_px: f32, label: impl Into<String>) -> Self {
        Self {
            kind: ShapeKind::Text,
            size: vec![font_px],
            position: vec![origin],
            label: label.into(),
        }
    }

    pub fn center(&self) -> Option<Point> {
        self.position.first().copied()
    }

    /// Hit radius for selection, half of `size[0]`.
    pub fn hit_radius(&self) -> Option<f32> {
        self.size.first().map(|size| size / 2.0)
    }
}

/// A movable playing piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: u64,
    pub shape: ShapeDef,
    pub color: Color,
}

/// A board feature. Non-traversable terrain blocks movement and is drawn
/// with a heavier outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    pub id: u64,
    pub shape: ShapeDef,
    pub color: Color,
    pub traversable: bool,
}

/// A decorative marking; the underlay and overlay tables both carry these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decal {
    pub id: u64,
    pub shape: ShapeDef,
    pub color: Color,
}

/// The four entity collections at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub units: Vec<Unit>,
    pub terrain: Vec<Terrain>,
    pub underlays: Vec<Decal>,
    pub overlays: Vec<Decal>,
}

/// What an action was, decided once at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Roll,
    Move,
    Chat,
    SnapshotCapture,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Roll => "roll",
            ActionKind::Move => "move",
            ActionKind::Chat => "chat",
            ActionKind::SnapshotCapture => "snapshot",
        }
    }
}

/// A server-emitted log entry, delivered once via an insert notification.
///
/// Some actions embed the full board state at the moment they were logged;
/// those are what the time-travel view navigates between, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: u64,
    pub timestamp_ms: u64,
    pub kind: ActionKind,
    pub description: String,
    pub snapshot: Option<GameState>,
}

/// One row-change notification from a subscribed table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowChange<T> {
    Insert(T),
    Update(T),
    Delete(u64),
}

/// A notification from any of the subscribed tables.
///
/// The transport guarantees per-id delivery in server commit order and
/// nothing more; the client must tolerate arbitrary interleaving across
/// tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableUpdate {
    Unit(RowChange<Unit>),
    Terrain(RowChange<Terrain>),
    Underlay(RowChange<Decal>),
    Overlay(RowChange<Decal>),
    Action(ActionRecord),
}

pub fn encode_update(update: &TableUpdate) -> bincode::Result<Vec<u8>> {
    bincode::serialize(update)
}

pub fn decode_update(data: &[u8]) -> bincode::Result<TableUpdate> {
    bincode::deserialize(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_names_and_hex() {
        assert_eq!("blue".parse::<Color>().unwrap(), Color::BLUE);
        assert_eq!("#f39c12".parse::<Color>().unwrap(), Color::ORANGE);
        assert!("#f39c".parse::<Color>().is_err());
        assert!("mauve-ish".parse::<Color>().is_err());
    }

    #[test]
    fn color_displays_as_hex() {
        assert_eq!(Color::BLUE.to_string(), "#3498db");
    }

    #[test]
    fn update_round_trips_through_bincode() {
        let update = TableUpdate::Unit(RowChange::Insert(Unit {
            id: 7,
            shape: ShapeDef::circle(Point::new(100.0, 100.0), 28.0),
            color: Color::BLUE,
        }));
        let bytes = encode_update(&update).unwrap();
        assert_eq!(decode_update(&bytes).unwrap(), update);
    }

    #[test]
    fn action_with_snapshot_round_trips() {
        let action = ActionRecord {
            id: 7,
            timestamp_ms: 1_700_000_000_000,
            kind: ActionKind::Roll,
            description: "Rolled a 4".into(),
            snapshot: Some(GameState::default()),
        };
        let bytes = encode_update(&TableUpdate::Action(action.clone())).unwrap();
        assert_eq!(decode_update(&bytes).unwrap(), TableUpdate::Action(action));
    }
}
