mod common;

use board_core::LayerMask;
use board_proto::{Color, Decal, Point, RowChange, ShapeDef, TableUpdate};

use common::{insert_unit, mounted_board, terrain, unit};

#[test]
fn mutations_within_one_frame_paint_exactly_once() {
    let (mut board, _rx) = mounted_board();

    insert_unit(&mut board, unit(1, 100.0, 100.0, 28.0, Color::BLUE));
    insert_unit(&mut board, unit(2, 200.0, 100.0, 28.0, Color::RED));
    board.apply(TableUpdate::Unit(RowChange::Delete(2)));
    assert!(board.frame_pending());

    // One coalesced paint reflecting the state after all three mutations.
    let painted = board.render_frame();
    assert_eq!(painted, LayerMask::UNITS);
    assert_eq!(board.frame().pixel(100, 100), Color::BLUE);
    assert_eq!(board.frame().pixel(200, 100), Color::TRANSPARENT);

    // Nothing left to paint until the next mutation arrives.
    assert!(!board.frame_pending());
    assert_eq!(board.render_frame(), LayerMask::empty());
}

#[test]
fn unit_lifecycle_updates_the_painted_frame() {
    let (mut board, _rx) = mounted_board();

    insert_unit(&mut board, unit(1, 100.0, 100.0, 28.0, Color::BLUE));
    board.render_frame();
    assert_eq!(board.frame().pixel(100, 100), Color::BLUE);

    board.apply(TableUpdate::Unit(RowChange::Update(unit(
        1,
        150.0,
        100.0,
        28.0,
        Color::BLUE,
    ))));
    board.render_frame();
    // Painted at the new position only, not both.
    assert_eq!(board.frame().pixel(100, 100), Color::TRANSPARENT);
    assert_eq!(board.frame().pixel(150, 100), Color::BLUE);

    board.apply(TableUpdate::Unit(RowChange::Delete(1)));
    board.render_frame();
    assert_eq!(board.frame().pixel(150, 100), Color::TRANSPARENT);
}

#[test]
fn layers_composite_back_to_front() {
    let (mut board, _rx) = mounted_board();

    board.apply(TableUpdate::Terrain(RowChange::Insert(terrain(
        1, 50.0, 50.0, 200.0, 120.0, true,
    ))));
    insert_unit(&mut board, unit(2, 150.0, 110.0, 28.0, Color::BLUE));
    board.apply(TableUpdate::Overlay(RowChange::Insert(Decal {
        id: 3,
        shape: ShapeDef::circle(Point::new(150.0, 110.0), 10.0),
        color: Color::ORANGE,
    })));
    let painted = board.render_frame();
    assert_eq!(
        painted,
        LayerMask::TERRAIN | LayerMask::UNITS | LayerMask::OVERLAY
    );

    // Overlay covers the unit, the unit covers the terrain, and the
    // terrain shows where nothing sits above it.
    assert_eq!(board.frame().pixel(150, 110), Color::ORANGE);
    assert_eq!(board.frame().pixel(150, 120), Color::BLUE);
    assert_eq!(board.frame().pixel(60, 60), Color::rgb(0x8f, 0xbc, 0x8f));
}

#[test]
fn only_the_mutated_layer_repaints() {
    let (mut board, _rx) = mounted_board();

    board.apply(TableUpdate::Terrain(RowChange::Insert(terrain(
        1, 50.0, 50.0, 100.0, 50.0, true,
    ))));
    board.render_frame();

    insert_unit(&mut board, unit(2, 300.0, 200.0, 28.0, Color::RED));
    assert_eq!(board.render_frame(), LayerMask::UNITS);
}
