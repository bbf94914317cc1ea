use board_proto::{Color, Decal, GameState, ShapeDef, ShapeKind, Terrain, Unit};

use crate::layer::Layer;
use crate::raster::{PixelSurface, DEFAULT_STROKE};

/// Units always stroke black over their fill color.
const UNIT_OUTLINE: Color = Color::BLACK;
/// Blocking terrain gets a heavier, high-contrast outline so it reads as
/// impassable at a glance.
const BLOCKING_OUTLINE: Color = Color::BLACK;
const BLOCKING_STROKE: f32 = 4.0;

/// The four z-ordered surfaces plus the composite they blend into.
#[derive(Debug, Clone)]
pub struct LayerStack {
    terrain: PixelSurface,
    underlay: PixelSurface,
    units: PixelSurface,
    overlay: PixelSurface,
    composite: PixelSurface,
}

impl LayerStack {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            terrain: PixelSurface::new(width, height),
            underlay: PixelSurface::new(width, height),
            units: PixelSurface::new(width, height),
            overlay: PixelSurface::new(width, height),
            composite: PixelSurface::new(width, height),
        }
    }

    pub fn surface_mut(&mut self, layer: Layer) -> &mut PixelSurface {
        match layer {
            Layer::Terrain => &mut self.terrain,
            Layer::Underlay => &mut self.underlay,
            Layer::Units => &mut self.units,
            Layer::Overlay => &mut self.overlay,
        }
    }

    pub fn surface(&self, layer: Layer) -> &PixelSurface {
        match layer {
            Layer::Terrain => &self.terrain,
            Layer::Underlay => &self.underlay,
            Layer::Units => &self.units,
            Layer::Overlay => &self.overlay,
        }
    }

    /// Re-blend the stack back to front.
    pub fn recomposite(&mut self) {
        self.composite.clear();
        for layer in Layer::Z_ORDER {
            let surface = match layer {
                Layer::Terrain => &self.terrain,
                Layer::Underlay => &self.underlay,
                Layer::Units => &self.units,
                Layer::Overlay => &self.overlay,
            };
            self.composite.blend_over(surface);
        }
    }

    pub fn composite(&self) -> &PixelSurface {
        &self.composite
    }

    /// Paint one layer of `state` onto its surface.
    pub fn paint_layer(&mut self, layer: Layer, state: &GameState) {
        match layer {
            Layer::Terrain => paint_terrain(&mut self.terrain, &state.terrain),
            Layer::Underlay => paint_decals(&mut self.underlay, &state.underlays),
            Layer::Units => paint_units(&mut self.units, &state.units),
            Layer::Overlay => paint_decals(&mut self.overlay, &state.overlays),
        }
    }
}

/// Clear then repaint the units surface in store order, so later rows
/// occlude earlier ones within the layer.
pub fn paint_units(surface: &mut PixelSurface, units: &[Unit]) {
    surface.clear();
    for unit in units {
        paint_shape(surface, &unit.shape, unit.color, UNIT_OUTLINE, DEFAULT_STROKE);
    }
}

pub fn paint_terrain(surface: &mut PixelSurface, rows: &[Terrain]) {
    surface.clear();
    for terrain in rows {
        let (outline, stroke) = if terrain.traversable {
            (terrain.color, DEFAULT_STROKE)
        } else {
            (BLOCKING_OUTLINE, BLOCKING_STROKE)
        };
        paint_shape(surface, &terrain.shape, terrain.color, outline, stroke);
    }
}

pub fn paint_decals(surface: &mut PixelSurface, rows: &[Decal]) {
    surface.clear();
    for decal in rows {
        paint_shape(surface, &decal.shape, decal.color, decal.color, DEFAULT_STROKE);
    }
}

/// Draw one shape. Definitions with too few position or size entries are
/// skipped outright; incomplete rows must never take the paint down.
fn paint_shape(
    surface: &mut PixelSurface,
    shape: &ShapeDef,
    fill: Color,
    outline: Color,
    stroke: f32,
) {
    match shape.kind {
        ShapeKind::Circle => {
            let (Some(center), Some(diameter)) = (shape.position.first(), shape.size.first())
            else {
                return;
            };
            let radius = diameter / 2.0;
            surface.fill_circle(*center, radius, fill);
            surface.stroke_circle(*center, radius, stroke, outline);
        }
        ShapeKind::Rectangle => {
            let [a, b, ..] = shape.position[..] else {
                return;
            };
            // Signed extent, forwarded as-is; the surface normalizes an
            // inverted corner pair the way the canvas primitive does.
            let width = b.x - a.x;
            let height = b.y - a.y;
            surface.fill_rect(a, width, height, fill);
            surface.stroke_rect(a, width, height, stroke, outline);
        }
        ShapeKind::Line => {
            let [from, to, ..] = shape.position[..] else {
                return;
            };
            let width = shape.size.first().copied().unwrap_or(DEFAULT_STROKE);
            surface.line(from, to, width, outline);
        }
        ShapeKind::Polygon => {
            if shape.position.len() < 3 {
                return;
            }
            surface.fill_polygon(&shape.position, fill);
            surface.stroke_polygon(&shape.position, stroke, outline);
        }
        ShapeKind::Text => {
            let (Some(origin), Some(font_px)) = (shape.position.first(), shape.size.first())
            else {
                return;
            };
            surface.text(*origin, *font_px, &shape.label, fill);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_proto::Point;

    fn surface() -> PixelSurface {
        PixelSurface::new(200, 200)
    }

    #[test]
    fn incomplete_shapes_are_skipped_without_painting() {
        let mut target = surface();
        let rows = vec![
            Unit {
                id: 1,
                shape: ShapeDef {
                    kind: ShapeKind::Circle,
                    size: Vec::new(),
                    position: vec![Point::new(50.0, 50.0)],
                    label: String::new(),
                },
                color: Color::RED,
            },
            Unit {
                id: 2,
                shape: ShapeDef {
                    kind: ShapeKind::Polygon,
                    size: Vec::new(),
                    position: vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)],
                    label: String::new(),
                },
                color: Color::RED,
            },
            Unit {
                id: 3,
                shape: ShapeDef {
                    kind: ShapeKind::Line,
                    size: Vec::new(),
                    position: vec![Point::new(30.0, 30.0)],
                    label: String::new(),
                },
                color: Color::RED,
            },
        ];
        paint_units(&mut target, &rows);
        assert_eq!(target, surface());
    }

    #[test]
    fn inverted_rectangle_covers_the_same_pixels() {
        let mut forward = surface();
        let mut inverted = surface();
        let decal = |a: Point, b: Point| Decal {
            id: 1,
            shape: ShapeDef::rectangle(a, b),
            color: Color::GREEN,
        };
        paint_decals(
            &mut forward,
            &[decal(Point::new(40.0, 40.0), Point::new(120.0, 90.0))],
        );
        paint_decals(
            &mut inverted,
            &[decal(Point::new(120.0, 90.0), Point::new(40.0, 40.0))],
        );
        assert_eq!(forward, inverted);
        assert_eq!(forward.pixel(80, 60), Color::GREEN);
    }

    #[test]
    fn blocking_terrain_strokes_heavier_than_traversable() {
        let row = |traversable| Terrain {
            id: 1,
            shape: ShapeDef::rectangle(Point::new(40.0, 40.0), Point::new(120.0, 90.0)),
            color: Color::GREEN,
            traversable,
        };
        let mut blocking = surface();
        let mut open = surface();
        paint_terrain(&mut blocking, &[row(false)]);
        paint_terrain(&mut open, &[row(true)]);
        // The heavier black outline reaches pixels the light one does not.
        assert_eq!(blocking.pixel(38, 60), Color::BLACK);
        assert_eq!(open.pixel(38, 60), Color::TRANSPARENT);
    }

    #[test]
    fn lines_polygons_and_text_paint_where_expected() {
        let mut target = surface();
        let rows = vec![
            Decal {
                id: 1,
                shape: ShapeDef::line(Point::new(10.0, 10.0), Point::new(60.0, 10.0), 2.0),
                color: Color::RED,
            },
            Decal {
                id: 2,
                shape: ShapeDef::polygon(vec![
                    Point::new(100.0, 100.0),
                    Point::new(140.0, 100.0),
                    Point::new(120.0, 140.0),
                ]),
                color: Color::GREEN,
            },
            Decal {
                id: 3,
                shape: ShapeDef::text(Point::new(20.0, 190.0), 14.0, "GO"),
                color: Color::BLACK,
            },
        ];
        paint_decals(&mut target, &rows);
        assert_eq!(target.pixel(30, 10), Color::RED);
        assert_eq!(target.pixel(120, 110), Color::GREEN);
        // The label paints glyph pixels above its baseline.
        let glyphs = (0..200)
            .any(|x| (176..190).any(|y| target.pixel(x, y) == Color::BLACK));
        assert!(glyphs);
    }

    #[test]
    fn stack_paints_a_snapshot_and_composites_in_z_order() {
        let mut stack = LayerStack::new(200, 200);
        let state = GameState {
            terrain: vec![Terrain {
                id: 1,
                shape: ShapeDef::rectangle(Point::new(20.0, 20.0), Point::new(180.0, 180.0)),
                color: Color::GREEN,
                traversable: true,
            }],
            units: vec![Unit {
                id: 2,
                shape: ShapeDef::circle(Point::new(100.0, 100.0), 28.0),
                color: Color::BLUE,
            }],
            ..GameState::default()
        };
        for layer in Layer::Z_ORDER {
            stack.paint_layer(layer, &state);
        }
        stack.recomposite();
        assert_eq!(stack.surface(Layer::Units).pixel(100, 100), Color::BLUE);
        assert_eq!(stack.surface(Layer::Terrain).pixel(100, 100), Color::GREEN);
        assert_eq!(stack.composite().pixel(100, 100), Color::BLUE);
        assert_eq!(stack.composite().pixel(30, 30), Color::GREEN);
    }

    #[test]
    fn later_rows_occlude_earlier_ones_in_the_same_layer() {
        let mut target = surface();
        let unit = |id, color| Unit {
            id,
            shape: ShapeDef::circle(Point::new(100.0, 100.0), 28.0),
            color,
        };
        paint_units(&mut target, &[unit(1, Color::RED), unit(2, Color::BLUE)]);
        assert_eq!(target.pixel(100, 100), Color::BLUE);
    }
}
